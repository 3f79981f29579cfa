use crate::core::models::label::{AtomLabel, ResidueKey};
use crate::core::utils::geometry::{centroid, plane_normal};
use crate::engine::error::GeometryQueryError;
use crate::engine::provider::StructureProvider;
use nalgebra::{Point3, Unit, Vector3};

/// The ring atoms of one aromatic residue.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Ring {
    pub residue: ResidueKey,
    pub atoms: Vec<AtomLabel>,
}

impl Ring {
    /// The atom that stands in for the whole ring in contact records.
    pub fn anchor(&self) -> &AtomLabel {
        &self.atoms[0]
    }

    /// Centroid and unit normal in `frame`; `None` for rings too small or degenerate to define a plane.
    pub fn geometry(
        &self,
        provider: &dyn StructureProvider,
        frame: usize,
    ) -> Result<Option<RingGeometry>, GeometryQueryError> {
        let points = self
            .atoms
            .iter()
            .map(|atom| provider.position(frame, atom))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(centroid(&points)
            .zip(plane_normal(&points))
            .map(|(centroid, normal)| RingGeometry { centroid, normal }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct RingGeometry {
    pub centroid: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
}

/// Groups ring atoms by residue, keeping the order in which residues and atoms appear.
pub(super) fn group_rings(atoms: Vec<AtomLabel>) -> Vec<Ring> {
    let mut rings: Vec<Ring> = Vec::new();
    for atom in atoms {
        let residue = atom.residue_key();
        match rings.iter_mut().find(|ring| ring.residue == residue) {
            Some(ring) => ring.atoms.push(atom),
            None => rings.push(Ring {
                residue,
                atoms: vec![atom],
            }),
        }
    }
    rings
}

/// Ring geometries for one frame, computed once and shared by every pair check.
pub(super) fn frame_geometries(
    rings: &[Ring],
    provider: &dyn StructureProvider,
    frame: usize,
) -> Vec<Result<Option<RingGeometry>, GeometryQueryError>> {
    rings
        .iter()
        .map(|ring| ring.geometry(provider, frame))
        .collect()
}

#[cfg(test)]
pub(super) fn hexagon_atoms(
    chain: char,
    number: isize,
    resname: &'static str,
    center: [f64; 3],
    plane: char,
) -> Vec<(char, isize, &'static str, &'static str, [f64; 3])> {
    const NAMES: [&str; 6] = ["CG", "CD1", "CE1", "CZ", "CE2", "CD2"];
    (0..6)
        .map(|i| {
            let theta = i as f64 * std::f64::consts::PI / 3.0;
            let (u, v) = (1.4 * theta.cos(), 1.4 * theta.sin());
            let offset = match plane {
                'z' => [u, v, 0.0],
                'x' => [0.0, u, v],
                _ => [u, 0.0, v],
            };
            (
                chain,
                number,
                resname,
                NAMES[i],
                [center[0] + offset[0], center[1] + offset[1], center[2] + offset[2]],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::trajectory;
    use super::*;

    #[test]
    fn ring_atoms_are_grouped_per_residue_in_order() {
        let rings = group_rings(vec![
            "A:PHE:1:CG".into(),
            "A:TYR:5:CG".into(),
            "A:PHE:1:CD1".into(),
        ]);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].anchor().as_str(), "A:PHE:1:CG");
        assert_eq!(rings[0].atoms.len(), 2);
        assert_eq!(rings[1].residue.as_str(), "A:TYR:5");
    }

    #[test]
    fn hexagon_geometry_has_expected_centroid_and_normal() {
        let t = trajectory(&hexagon_atoms('A', 1, "PHE", [1.0, 2.0, 3.0], 'z'));
        let labels: Vec<AtomLabel> = t.atoms_iter().map(|(id, _)| t.label(id).unwrap().clone()).collect();
        let rings = group_rings(labels);
        let geometry = rings[0].geometry(&t, 0).unwrap().unwrap();
        assert!((geometry.centroid - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-9);
        assert!((geometry.normal.z.abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rings_with_two_atoms_have_no_geometry() {
        let t = trajectory(&[
            ('A', 1, "PHE", "CG", [0.0, 0.0, 0.0]),
            ('A', 1, "PHE", "CZ", [2.8, 0.0, 0.0]),
        ]);
        let rings = group_rings(vec!["A:PHE:1:CG".into(), "A:PHE:1:CZ".into()]);
        assert_eq!(rings[0].geometry(&t, 0), Ok(None));
    }
}
