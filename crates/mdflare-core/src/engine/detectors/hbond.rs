use super::{Detector, DetectorKind, FrameContext, FrameOutput};
use crate::core::contacts::itype::InteractionType;
use crate::core::contacts::record::ContactRecord;
use crate::core::models::atom::AtomRole;
use crate::core::models::label::{AtomLabel, ResidueKey};
use crate::core::utils::geometry::vertex_angle_degrees;
use crate::engine::error::{GeometryQueryError, ProviderError};
use crate::engine::provider::{CandidateKind, StructureProvider};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// A nitrogen or oxygen that may donate or accept a hydrogen bond.
#[derive(Debug, Clone)]
pub(super) struct PolarAtom {
    pub label: AtomLabel,
    pub residue: ResidueKey,
    pub role: AtomRole,
    pub hydrogens: Vec<AtomLabel>,
}

/// Resolves roles and attached hydrogens once, from the preparation frame.
pub(super) fn collect_polar(
    provider: &dyn StructureProvider,
    frame: usize,
    labels: Vec<AtomLabel>,
    hydrogen_bond_length: f64,
) -> Vec<PolarAtom> {
    labels
        .into_iter()
        .map(|label| {
            let hydrogens = provider
                .bonded_hydrogens(frame, &label, hydrogen_bond_length)
                .unwrap_or_else(|error| {
                    debug!(atom = %label, %error, "Could not resolve attached hydrogens");
                    Vec::new()
                });
            PolarAtom {
                residue: label.residue_key(),
                role: provider.atom_role(&label).unwrap_or_default(),
                hydrogens,
                label,
            }
        })
        .collect()
}

fn donates_to(
    ctx: &FrameContext<'_>,
    donor: &PolarAtom,
    acceptor: &PolarAtom,
) -> Result<bool, GeometryQueryError> {
    if donor.hydrogens.is_empty() {
        return Ok(false);
    }
    let d = ctx.provider.position(ctx.frame, &donor.label)?;
    let a = ctx.provider.position(ctx.frame, &acceptor.label)?;
    for hydrogen in &donor.hydrogens {
        let h = ctx.provider.position(ctx.frame, hydrogen)?;
        let bent = vertex_angle_degrees(&d, &h, &a).is_some_and(|angle| 180.0 - angle < ctx.cutoffs.hbond_angle);
        if bent {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Distance and angle test with either atom acting as donor.
pub(super) fn is_hbond(
    ctx: &FrameContext<'_>,
    a: &PolarAtom,
    b: &PolarAtom,
) -> Result<bool, GeometryQueryError> {
    let distance = ctx.provider.distance(ctx.frame, &a.label, &b.label)?;
    if distance >= ctx.cutoffs.hbond_distance {
        return Ok(false);
    }
    Ok(donates_to(ctx, a, b)? || donates_to(ctx, b, a)?)
}

/// The record types emitted for single- and double-water bridges.
#[derive(Debug, Clone, Copy)]
pub(super) struct BridgeTypes {
    pub single: InteractionType,
    pub extended: InteractionType,
}

/// Finds solute–water–solute and solute–water–water–solute bridges.
///
/// With `right = None` both ends come from `left` and each unordered pair is reported once,
/// lower label first. Otherwise the first participant comes from `left` and the second from
/// `right`. Extended bridges are only reported for pairs without a single-water bridge.
pub(super) fn detect_water_bridges(
    ctx: &FrameContext<'_>,
    kind: DetectorKind,
    left: &[PolarAtom],
    right: Option<&[PolarAtom]>,
    waters: &[PolarAtom],
    types: BridgeTypes,
    out: &mut FrameOutput,
) {
    let symmetric = right.is_none();
    let right = right.unwrap_or(left);

    let bonded_to = |solutes: &[PolarAtom], out: &mut FrameOutput| -> Vec<Vec<usize>> {
        waters
            .iter()
            .map(|water| {
                solutes
                    .iter()
                    .enumerate()
                    .filter_map(|(index, solute)| match is_hbond(ctx, solute, water) {
                        Ok(true) => Some(index),
                        Ok(false) => None,
                        Err(error) => {
                            out.skip(kind, &error);
                            None
                        }
                    })
                    .collect()
            })
            .collect()
    };
    let water_left = bonded_to(left, out);
    let water_right = if symmetric {
        water_left.clone()
    } else {
        bonded_to(right, out)
    };

    let admissible = |li: usize, ri: usize| -> bool {
        let (a, b) = (&left[li], &right[ri]);
        if symmetric && a.label >= b.label {
            return false;
        }
        a.residue != b.residue && ctx.scope.admits(&a.label, &b.label)
    };

    let mut single_pairs: HashSet<(usize, usize)> = HashSet::new();
    for (wi, water) in waters.iter().enumerate() {
        for &li in &water_left[wi] {
            for &ri in &water_right[wi] {
                if !admissible(li, ri) {
                    continue;
                }
                single_pairs.insert((li, ri));
                out.push(ContactRecord::bridge(
                    ctx.frame,
                    types.single,
                    left[li].label.clone(),
                    right[ri].label.clone(),
                    std::slice::from_ref(&water.label),
                ));
            }
        }
    }

    // Water–water bonds are only needed between waters that touch some solute.
    let touched: Vec<usize> = (0..waters.len())
        .filter(|&wi| !water_left[wi].is_empty() || !water_right[wi].is_empty())
        .collect();
    let mut water_links: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for (n, &w1) in touched.iter().enumerate() {
        for &w2 in &touched[n + 1..] {
            match is_hbond(ctx, &waters[w1], &waters[w2]) {
                Ok(true) => {
                    water_links.entry(w1).or_default().insert(w2);
                    water_links.entry(w2).or_default().insert(w1);
                }
                Ok(false) => {}
                Err(error) => out.skip(kind, &error),
            }
        }
    }

    for (&w1, linked) in &water_links {
        for &w2 in linked {
            for &li in &water_left[w1] {
                for &ri in &water_right[w2] {
                    if single_pairs.contains(&(li, ri)) || !admissible(li, ri) {
                        continue;
                    }
                    out.push(ContactRecord::bridge(
                        ctx.frame,
                        types.extended,
                        left[li].label.clone(),
                        right[ri].label.clone(),
                        &[waters[w1].label.clone(), waters[w2].label.clone()],
                    ));
                }
            }
        }
    }
}

fn solute_hbond_type(a: AtomRole, b: AtomRole) -> InteractionType {
    match (a == AtomRole::Backbone, b == AtomRole::Backbone) {
        (true, true) => InteractionType::BackboneBackboneHydrogenBond,
        (false, false) => InteractionType::SidechainSidechainHydrogenBond,
        _ => InteractionType::BackboneSidechainHydrogenBond,
    }
}

/// Protein–protein hydrogen bonds and the water bridges between protein atoms.
pub struct HydrogenBondDetector {
    polar: Vec<PolarAtom>,
    waters: Vec<PolarAtom>,
}

impl HydrogenBondDetector {
    pub fn prepare(
        provider: &dyn StructureProvider,
        frame: usize,
        solvent: &str,
        hydrogen_bond_length: f64,
    ) -> Result<Self, ProviderError> {
        let polar = provider.candidate_atoms(frame, &CandidateKind::PolarProtein)?;
        let waters = provider.candidate_atoms(
            frame,
            &CandidateKind::SolventOxygen {
                solvent: solvent.to_string(),
            },
        )?;
        Ok(Self {
            polar: collect_polar(provider, frame, polar, hydrogen_bond_length),
            waters: collect_polar(provider, frame, waters, hydrogen_bond_length),
        })
    }
}

impl Detector for HydrogenBondDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::HydrogenBond
    }

    fn detect(&self, ctx: &FrameContext<'_>, out: &mut FrameOutput) {
        for (i, a) in self.polar.iter().enumerate() {
            for b in &self.polar[i + 1..] {
                if a.residue == b.residue || !ctx.scope.admits(&a.label, &b.label) {
                    continue;
                }
                match is_hbond(ctx, a, b) {
                    Ok(true) => out.push(ContactRecord::pair(
                        ctx.frame,
                        solute_hbond_type(a.role, b.role),
                        a.label.clone(),
                        b.label.clone(),
                    )),
                    Ok(false) => {}
                    Err(error) => out.skip(self.kind(), &error),
                }
            }
        }

        detect_water_bridges(
            ctx,
            self.kind(),
            &self.polar,
            None,
            &self.waters,
            BridgeTypes {
                single: InteractionType::WaterBridge,
                extended: InteractionType::ExtendedWaterBridge,
            },
            out,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{lines, run, trajectory};
    use super::*;

    #[test]
    fn backbone_hbond_with_linear_geometry() {
        let t = trajectory(&[
            ('A', 1, "ALA", "N", [0.0, 0.0, 0.0]),
            ('A', 1, "ALA", "H", [1.0, 0.0, 0.0]),
            ('A', 5, "ALA", "O", [2.9, 0.0, 0.0]),
        ]);
        let detector = HydrogenBondDetector::prepare(&t, 0, "TIP3", 1.3).unwrap();
        assert_eq!(lines(&run(&detector, &t)), ["0 hbbb A:ALA:1:N A:ALA:5:O"]);
    }

    #[test]
    fn sidechain_acceptor_gives_backbone_sidechain_type() {
        let t = trajectory(&[
            ('A', 1, "ALA", "N", [0.0, 0.0, 0.0]),
            ('A', 1, "ALA", "H", [1.0, 0.0, 0.0]),
            ('A', 8, "SER", "OG", [2.9, 0.5, 0.0]),
        ]);
        let detector = HydrogenBondDetector::prepare(&t, 0, "TIP3", 1.3).unwrap();
        assert_eq!(lines(&run(&detector, &t)), ["0 hbsb A:ALA:1:N A:SER:8:OG"]);
    }

    #[test]
    fn bent_or_distant_pairs_are_rejected() {
        // Hydrogen points away from the acceptor: D-H-A angle is 0.
        let t = trajectory(&[
            ('A', 1, "SER", "OG", [0.0, 0.0, 0.0]),
            ('A', 1, "SER", "HG", [-1.0, 0.0, 0.0]),
            ('A', 5, "THR", "OG1", [2.8, 0.0, 0.0]),
            ('A', 9, "ASN", "OD1", [0.0, 3.6, 0.0]),
        ]);
        let detector = HydrogenBondDetector::prepare(&t, 0, "TIP3", 1.3).unwrap();
        assert!(run(&detector, &t).records.is_empty());
    }

    #[test]
    fn acceptor_side_may_donate() {
        let t = trajectory(&[
            ('A', 2, "ASP", "OD1", [0.0, 0.0, 0.0]),
            ('A', 7, "SER", "OG", [2.8, 0.0, 0.0]),
            ('A', 7, "SER", "HG", [1.85, 0.0, 0.0]),
        ]);
        let detector = HydrogenBondDetector::prepare(&t, 0, "TIP3", 1.3).unwrap();
        assert_eq!(lines(&run(&detector, &t)), ["0 hbss A:ASP:2:OD1 A:SER:7:OG"]);
    }

    fn water(number: isize, o: [f64; 3], h1: [f64; 3], h2: [f64; 3]) -> Vec<(char, isize, &'static str, &'static str, [f64; 3])> {
        vec![
            ('W', number, "TIP3", "OH2", o),
            ('W', number, "TIP3", "H1", h1),
            ('W', number, "TIP3", "H2", h2),
        ]
    }

    #[test]
    fn single_water_bridge_is_reported_once_in_label_order() {
        let mut atoms = vec![
            ('A', 9, "THR", "OG1", [-2.8, 0.0, 0.0]),
            ('A', 3, "SER", "OG", [2.8, 0.0, 0.0]),
        ];
        atoms.extend(water(40, [0.0, 0.0, 0.0], [-0.96, 0.0, 0.0], [0.96, 0.0, 0.0]));
        let t = trajectory(&atoms);
        let detector = HydrogenBondDetector::prepare(&t, 0, "TIP3", 1.3).unwrap();
        assert_eq!(
            lines(&run(&detector, &t)),
            ["0 wb A:SER:3:OG A:THR:9:OG1 W:TIP3:40:OH2"]
        );
    }

    #[test]
    fn extended_bridge_needs_two_linked_waters() {
        let mut atoms = vec![
            ('A', 3, "SER", "OG", [-2.8, 0.0, 0.0]),
            ('A', 9, "THR", "OG1", [5.6, 0.0, 0.0]),
        ];
        atoms.extend(water(40, [0.0, 0.0, 0.0], [-0.96, 0.0, 0.0], [0.96, 0.0, 0.0]));
        atoms.extend(water(41, [2.8, 0.0, 0.0], [3.76, 0.0, 0.0], [2.8, 0.96, 0.0]));
        let t = trajectory(&atoms);
        let detector = HydrogenBondDetector::prepare(&t, 0, "TIP3", 1.3).unwrap();
        assert_eq!(
            lines(&run(&detector, &t)),
            ["0 wb2 A:SER:3:OG A:THR:9:OG1 W:TIP3:40:OH2 W:TIP3:41:OH2"]
        );
    }

    #[test]
    fn extended_bridge_is_suppressed_by_a_single_bridge() {
        // THR is bridged by W40 directly and also reachable through W40-W41.
        let mut atoms = vec![
            ('A', 3, "SER", "OG", [-2.8, 0.0, 0.0]),
            ('A', 9, "THR", "OG1", [1.4, 2.4, 0.0]),
        ];
        atoms.extend(water(40, [0.0, 0.0, 0.0], [-0.96, 0.0, 0.0], [0.484, 0.829, 0.0]));
        atoms.extend(water(41, [2.8, 0.0, 0.0], [1.84, 0.0, 0.0], [2.316, 0.829, 0.0]));
        let t = trajectory(&atoms);
        let detector = HydrogenBondDetector::prepare(&t, 0, "TIP3", 1.3).unwrap();
        assert_eq!(
            lines(&run(&detector, &t)),
            ["0 wb A:SER:3:OG A:THR:9:OG1 W:TIP3:40:OH2"]
        );
    }
}
