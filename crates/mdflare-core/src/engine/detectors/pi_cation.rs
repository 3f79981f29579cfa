use super::rings::{Ring, frame_geometries, group_rings};
use super::{Detector, DetectorKind, FrameContext, FrameOutput};
use crate::core::contacts::itype::InteractionType;
use crate::core::contacts::record::ContactRecord;
use crate::core::models::label::AtomLabel;
use crate::core::utils::geometry::axis_angle_degrees;
use crate::engine::error::ProviderError;
use crate::engine::provider::{CandidateKind, StructureProvider};

/// Cations sitting above the face of an aromatic ring.
pub struct PiCationDetector {
    cations: Vec<AtomLabel>,
    rings: Vec<Ring>,
}

impl PiCationDetector {
    pub fn prepare(provider: &dyn StructureProvider, frame: usize) -> Result<Self, ProviderError> {
        Ok(Self {
            cations: provider.candidate_atoms(frame, &CandidateKind::Cation)?,
            rings: group_rings(provider.candidate_atoms(frame, &CandidateKind::AromaticRing)?),
        })
    }
}

impl Detector for PiCationDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::PiCation
    }

    fn detect(&self, ctx: &FrameContext<'_>, out: &mut FrameOutput) {
        let geometries = frame_geometries(&self.rings, ctx.provider, ctx.frame);

        for cation in &self.cations {
            let cation_residue = cation.residue_key();
            for (ring, geometry) in self.rings.iter().zip(&geometries) {
                if ring.residue == cation_residue || !ctx.scope.admits(cation, ring.anchor()) {
                    continue;
                }
                let geometry = match geometry {
                    Ok(Some(geometry)) => geometry,
                    Ok(None) => continue,
                    Err(error) => {
                        out.skip(self.kind(), error);
                        continue;
                    }
                };
                let position = match ctx.provider.position(ctx.frame, cation) {
                    Ok(position) => position,
                    Err(error) => {
                        out.skip(self.kind(), &error);
                        continue;
                    }
                };

                let offset = position - geometry.centroid;
                if offset.norm() >= ctx.cutoffs.pi_cation_distance {
                    continue;
                }
                let within_cone = axis_angle_degrees(&geometry.normal, &offset)
                    .is_some_and(|angle| angle < ctx.cutoffs.pi_cation_angle);
                if within_cone {
                    out.push(ContactRecord::pair(
                        ctx.frame,
                        InteractionType::PiCation,
                        cation.clone(),
                        ring.anchor().clone(),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::rings::hexagon_atoms;
    use super::super::test_support::{lines, run, trajectory};
    use super::*;

    fn system(cation_at: [f64; 3]) -> crate::core::models::trajectory::Trajectory {
        let mut atoms = hexagon_atoms('A', 10, "PHE", [0.0, 0.0, 0.0], 'z');
        atoms.push(('A', 20, "LYS", "NZ", cation_at));
        trajectory(&atoms)
    }

    #[test]
    fn cation_above_ring_face_is_detected() {
        let t = system([0.3, 0.0, 4.0]);
        let detector = PiCationDetector::prepare(&t, 0).unwrap();
        assert_eq!(lines(&run(&detector, &t)), ["0 pc A:LYS:20:NZ A:PHE:10:CG"]);
    }

    #[test]
    fn cation_below_ring_counts_because_normal_is_unsigned() {
        let t = system([0.0, 0.0, -4.5]);
        let detector = PiCationDetector::prepare(&t, 0).unwrap();
        assert_eq!(run(&detector, &t).records.len(), 1);
    }

    #[test]
    fn cation_in_ring_plane_is_rejected() {
        let t = system([4.0, 0.0, 0.0]);
        let detector = PiCationDetector::prepare(&t, 0).unwrap();
        assert!(run(&detector, &t).records.is_empty());
    }

    #[test]
    fn distant_cation_is_rejected() {
        let t = system([0.0, 0.0, 6.0]);
        let detector = PiCationDetector::prepare(&t, 0).unwrap();
        assert!(run(&detector, &t).records.is_empty());
    }

    #[test]
    fn histidine_cation_and_ring_of_same_residue_are_ignored() {
        let atoms = [
            ('A', 5, "HIS", "CG", [1.4, 0.0, 0.0]),
            ('A', 5, "HIS", "ND1", [0.43, 1.33, 0.0]),
            ('A', 5, "HIS", "CD2", [-1.13, 0.82, 0.0]),
            ('A', 5, "HIS", "CE1", [-1.13, -0.82, 0.0]),
            ('A', 5, "HIS", "NE2", [0.43, -1.33, 0.0]),
        ];
        let t = trajectory(&atoms);
        let detector = PiCationDetector::prepare(&t, 0).unwrap();
        assert!(run(&detector, &t).records.is_empty());
    }
}
