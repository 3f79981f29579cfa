use super::error::ProviderError;
use super::provider::StructureProvider;
use crate::core::models::label::AtomLabel;
use crate::core::selection::SelectionQuery;
use std::collections::HashSet;

/// Restricts which solute atom pairs a detector may report in one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionScope {
    #[default]
    Unrestricted,
    /// Both atoms must belong to the selection.
    Single(HashSet<AtomLabel>),
    /// One atom must belong to each selection, in either order.
    Dual {
        first: HashSet<AtomLabel>,
        second: HashSet<AtomLabel>,
    },
}

impl SelectionScope {
    /// Evaluates the configured selections against `frame`.
    pub fn resolve(
        provider: &dyn StructureProvider,
        frame: usize,
        first: Option<&SelectionQuery>,
        second: Option<&SelectionQuery>,
    ) -> Result<Self, ProviderError> {
        match (first, second) {
            (None, _) => Ok(SelectionScope::Unrestricted),
            (Some(first), None) => Ok(SelectionScope::Single(
                provider.selection_atoms(frame, first)?,
            )),
            (Some(first), Some(second)) => Ok(SelectionScope::Dual {
                first: provider.selection_atoms(frame, first)?,
                second: provider.selection_atoms(frame, second)?,
            }),
        }
    }

    pub fn admits(&self, a: &AtomLabel, b: &AtomLabel) -> bool {
        match self {
            SelectionScope::Unrestricted => true,
            SelectionScope::Single(atoms) => atoms.contains(a) && atoms.contains(b),
            SelectionScope::Dual { first, second } => {
                let forward = first.contains(a) && second.contains(b);
                let reverse = second.contains(a) && first.contains(b);
                forward || reverse
            }
        }
    }
}
