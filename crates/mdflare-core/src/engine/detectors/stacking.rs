use super::rings::{Ring, RingGeometry, frame_geometries, group_rings};
use super::{Detector, DetectorKind, FrameContext, FrameOutput};
use crate::core::contacts::itype::InteractionType;
use crate::core::contacts::record::ContactRecord;
use crate::core::utils::geometry::axis_angle_degrees;
use crate::engine::config::GeometryCutoffs;
use crate::engine::error::ProviderError;
use crate::engine::provider::{CandidateKind, StructureProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingMode {
    /// Face-to-face stacking (`ps`).
    Parallel,
    /// Edge-to-face stacking (`ts`).
    TShaped,
}

impl StackingMode {
    fn accepts(&self, a: &RingGeometry, b: &RingGeometry, cutoffs: &GeometryCutoffs) -> bool {
        let distance = (b.centroid - a.centroid).norm();
        let Some(angle) = axis_angle_degrees(&a.normal, &b.normal) else {
            return false;
        };
        match self {
            StackingMode::Parallel => {
                distance < cutoffs.pi_stack_distance && angle < cutoffs.pi_stack_angle
            }
            StackingMode::TShaped => {
                distance < cutoffs.t_stack_distance
                    && angle >= cutoffs.t_stack_min_angle
                    && angle <= 90.0
            }
        }
    }
}

/// Pairs of aromatic rings in stacked or T-shaped arrangements.
pub struct StackingDetector {
    mode: StackingMode,
    rings: Vec<Ring>,
}

impl StackingDetector {
    pub fn prepare(
        provider: &dyn StructureProvider,
        frame: usize,
        mode: StackingMode,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            mode,
            rings: group_rings(provider.candidate_atoms(frame, &CandidateKind::AromaticRing)?),
        })
    }

    fn interaction_type(&self) -> InteractionType {
        match self.mode {
            StackingMode::Parallel => InteractionType::PiStacking,
            StackingMode::TShaped => InteractionType::TStacking,
        }
    }
}

impl Detector for StackingDetector {
    fn kind(&self) -> DetectorKind {
        match self.mode {
            StackingMode::Parallel => DetectorKind::PiStacking,
            StackingMode::TShaped => DetectorKind::TStacking,
        }
    }

    fn detect(&self, ctx: &FrameContext<'_>, out: &mut FrameOutput) {
        let geometries = frame_geometries(&self.rings, ctx.provider, ctx.frame);

        for (i, ring_a) in self.rings.iter().enumerate() {
            for (j, ring_b) in self.rings.iter().enumerate().skip(i + 1) {
                if ring_a.residue == ring_b.residue
                    || !ctx.scope.admits(ring_a.anchor(), ring_b.anchor())
                {
                    continue;
                }
                match (&geometries[i], &geometries[j]) {
                    (Ok(Some(a)), Ok(Some(b))) => {
                        if self.mode.accepts(a, b, ctx.cutoffs) {
                            out.push(ContactRecord::pair(
                                ctx.frame,
                                self.interaction_type(),
                                ring_a.anchor().clone(),
                                ring_b.anchor().clone(),
                            ));
                        }
                    }
                    (Err(error), _) | (_, Err(error)) => out.skip(self.kind(), error),
                    _ => {}
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

    fn two_rings(second_center: [f64; 3], second_plane: char) -> crate::core::models::trajectory::Trajectory {
        let mut atoms = hexagon_atoms('A', 1, "PHE", [0.0, 0.0, 0.0], 'z');
        atoms.extend(hexagon_atoms('A', 7, "TYR", second_center, second_plane));
        trajectory(&atoms)
    }

    #[test]
    fn parallel_rings_stack() {
        let t = two_rings([0.5, 0.0, 3.6], 'z');
        let ps = StackingDetector::prepare(&t, 0, StackingMode::Parallel).unwrap();
        let ts = StackingDetector::prepare(&t, 0, StackingMode::TShaped).unwrap();
        assert_eq!(lines(&run(&ps, &t)), ["0 ps A:PHE:1:CG A:TYR:7:CG"]);
        assert!(run(&ts, &t).records.is_empty());
    }

    #[test]
    fn perpendicular_rings_form_t_stack() {
        let t = two_rings([0.0, 0.0, 4.5], 'x');
        let ps = StackingDetector::prepare(&t, 0, StackingMode::Parallel).unwrap();
        let ts = StackingDetector::prepare(&t, 0, StackingMode::TShaped).unwrap();
        assert!(run(&ps, &t).records.is_empty());
        assert_eq!(lines(&run(&ts, &t)), ["0 ts A:PHE:1:CG A:TYR:7:CG"]);
    }

    #[test]
    fn distant_rings_do_not_interact() {
        let t = two_rings([0.0, 0.0, 7.5], 'z');
        let ps = StackingDetector::prepare(&t, 0, StackingMode::Parallel).unwrap();
        assert!(run(&ps, &t).records.is_empty());
    }
}
