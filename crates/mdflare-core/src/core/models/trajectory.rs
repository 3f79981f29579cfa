use super::atom::{Atom, AtomRole};
use super::ids::{AtomId, ResidueId};
use super::label::AtomLabel;
use super::residue::Residue;
use crate::core::selection::{AtomContext, SelectionQuery};
use crate::core::utils::identifiers::{infer_element, is_backbone_atom, is_water_residue};
use nalgebra::Point3;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Cannot add atom '{0}' before a residue has been started")]
    NoCurrentResidue(String),
    #[error("Duplicate atom label '{0}'")]
    DuplicateAtom(AtomLabel),
}

/// Coordinates of a subset (usually all) of the topology's atoms at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    positions: SecondaryMap<AtomId, Point3<f64>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, atom_id: AtomId, position: Point3<f64>) {
        self.positions.insert(atom_id, position);
    }

    pub fn position(&self, atom_id: AtomId) -> Option<&Point3<f64>> {
        self.positions.get(atom_id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// An in-memory topology plus an ordered sequence of coordinate frames.
///
/// Atoms and residues are stored in slot maps and iterated in insertion order. Each atom
/// is addressable by its [`AtomLabel`], which must therefore be unique.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    atom_order: Vec<AtomId>,
    labels: SecondaryMap<AtomId, AtomLabel>,
    label_index: HashMap<AtomLabel, AtomId>,
    frames: Vec<Frame>,
}

impl Trajectory {
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atom_order
            .iter()
            .filter_map(move |&id| self.atoms.get(id).map(|atom| (id, atom)))
    }

    pub fn atom_count(&self) -> usize {
        self.atom_order.len()
    }

    pub fn label(&self, id: AtomId) -> Option<&AtomLabel> {
        self.labels.get(id)
    }

    pub fn atom_id(&self, label: &str) -> Option<AtomId> {
        self.label_index.get(label).copied()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn push_frame(&mut self, frame: Frame) -> usize {
        self.frames.push(frame);
        self.frames.len() - 1
    }

    pub fn replace_frames(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
    }

    pub fn coordinates(&self, frame: usize, id: AtomId) -> Option<&Point3<f64>> {
        self.frames.get(frame)?.position(id)
    }

    /// Builds a frame from `(label, position)` pairs; unknown labels are returned separately.
    pub fn frame_from_labels<'a>(
        &self,
        positions: impl IntoIterator<Item = (&'a str, Point3<f64>)>,
    ) -> (Frame, Vec<String>) {
        let mut frame = Frame::new();
        let mut unknown = Vec::new();
        for (label, position) in positions {
            match self.atom_id(label) {
                Some(id) => frame.set_position(id, position),
                None => unknown.push(label.to_string()),
            }
        }
        (frame, unknown)
    }

    pub fn atom_context(&self, id: AtomId) -> Option<AtomContext<'_>> {
        let atom = self.atoms.get(id)?;
        let residue = self.residues.get(atom.residue_id)?;
        Some(AtomContext {
            chain_id: residue.chain_id,
            residue_name: &residue.name,
            residue_number: residue.number,
            atom_name: &atom.name,
            element: &atom.element,
            role: atom.role,
        })
    }

    pub fn select(&self, query: &SelectionQuery) -> Vec<AtomId> {
        self.atom_order
            .iter()
            .copied()
            .filter(|&id| {
                self.atom_context(id)
                    .is_some_and(|context| query.matches(&context))
            })
            .collect()
    }

    /// Hydrogens of the same residue lying within `max_distance` of `id` in `frame`.
    pub fn hydrogens_near(&self, frame: usize, id: AtomId, max_distance: f64) -> Vec<AtomId> {
        let (Some(atom), Some(origin)) = (self.atoms.get(id), self.coordinates(frame, id)) else {
            return Vec::new();
        };
        let Some(residue) = self.residues.get(atom.residue_id) else {
            return Vec::new();
        };
        residue
            .atoms()
            .iter()
            .copied()
            .filter(|&other| other != id)
            .filter(|&other| self.atoms.get(other).is_some_and(Atom::is_hydrogen))
            .filter(|&other| {
                self.coordinates(frame, other)
                    .is_some_and(|p| (p - origin).norm() <= max_distance)
            })
            .collect()
    }
}

fn classify_role(residue: &Residue, atom_name: &str) -> AtomRole {
    if residue.amino_acid().is_some() {
        if is_backbone_atom(atom_name) {
            AtomRole::Backbone
        } else {
            AtomRole::Sidechain
        }
    } else if is_water_residue(&residue.name) {
        AtomRole::Water
    } else {
        AtomRole::Ligand
    }
}

/// Incremental construction of a [`Trajectory`] topology, residue by residue.
///
/// Positions supplied with each atom form the first frame of the built trajectory.
#[derive(Default)]
pub struct TrajectoryBuilder {
    trajectory: Trajectory,
    current_residue: Option<ResidueId>,
    residue_lookup: HashMap<(char, isize, String), ResidueId>,
    first_frame: Frame,
}

impl TrajectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_residue(&mut self, chain_id: char, number: isize, name: &str) -> &mut Self {
        let key = (chain_id, number, name.to_string());
        let trajectory = &mut self.trajectory;
        let id = *self.residue_lookup.entry(key).or_insert_with(|| {
            trajectory
                .residues
                .insert(Residue::new(chain_id, number, name))
        });
        self.current_residue = Some(id);
        self
    }

    pub fn add_atom(
        &mut self,
        name: &str,
        element: Option<&str>,
        position: Point3<f64>,
    ) -> Result<AtomId, TopologyError> {
        let residue_id = self
            .current_residue
            .ok_or_else(|| TopologyError::NoCurrentResidue(name.to_string()))?;
        let residue = self
            .trajectory
            .residues
            .get(residue_id)
            .ok_or_else(|| TopologyError::NoCurrentResidue(name.to_string()))?;

        let label = AtomLabel::from_parts(residue.chain_id, &residue.name, residue.number, name);
        if self.trajectory.label_index.contains_key(&label) {
            return Err(TopologyError::DuplicateAtom(label));
        }

        let element = match element.map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => infer_element(name),
        };
        let mut atom = Atom::new(name, &element, residue_id);
        atom.role = classify_role(residue, name);

        let id = self.trajectory.atoms.insert(atom);
        self.trajectory.atom_order.push(id);
        self.trajectory.labels.insert(id, label.clone());
        self.trajectory.label_index.insert(label, id);
        if let Some(residue) = self.trajectory.residues.get_mut(residue_id) {
            residue.add_atom(id);
        }
        self.first_frame.set_position(id, position);
        Ok(id)
    }

    pub fn set_serial(&mut self, id: AtomId, serial: usize) -> &mut Self {
        if let Some(atom) = self.trajectory.atoms.get_mut(id) {
            atom.serial = Some(serial);
        }
        self
    }

    pub fn build(self) -> Trajectory {
        let mut trajectory = self.trajectory;
        if !self.first_frame.is_empty() {
            trajectory.frames.push(self.first_frame);
        }
        trajectory
    }
}
