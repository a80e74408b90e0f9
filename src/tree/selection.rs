use std::collections::HashSet;

use crate::tree::flatten::FlatId;

/// Aggregate checkbox state of a node, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Partial,
    Checked,
}

/// Multi-select set with descendant-aware toggle, select-all and clear.
///
/// Composes a plain set of flat identities; aggregate states are computed
/// from a node's descendant list, never stored.
pub struct SelectionCoordinator {
    selected: HashSet<FlatId>,
    multiple: bool,
}

impl SelectionCoordinator {
    pub fn new(multiple: bool) -> Self {
        Self {
            selected: HashSet::new(),
            multiple,
        }
    }

    pub fn is_selected(&self, fid: FlatId) -> bool {
        self.selected.contains(&fid)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Snapshot of the currently selected identities.
    pub fn selected(&self) -> Vec<FlatId> {
        self.selected.iter().copied().collect()
    }

    pub fn select(&mut self, items: impl IntoIterator<Item = FlatId>) {
        for fid in items {
            if !self.multiple {
                self.selected.clear();
            }
            self.selected.insert(fid);
        }
    }

    pub fn deselect(&mut self, items: impl IntoIterator<Item = FlatId>) {
        for fid in items {
            self.selected.remove(&fid);
        }
    }

    /// Total reset of the selection set. Idempotent.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Whether every descendant (not including the node itself) is selected.
    ///
    /// Vacuously true for an empty descendant list, so a childless group
    /// reads as fully selected by default.
    pub fn descendants_all_selected(&self, descendants: &[FlatId]) -> bool {
        descendants.iter().all(|&child| self.is_selected(child))
    }

    /// Whether at least one descendant is selected but not all of them.
    pub fn descendants_partially_selected(&self, descendants: &[FlatId]) -> bool {
        let some = descendants.iter().any(|&child| self.is_selected(child));
        some && !self.descendants_all_selected(descendants)
    }

    /// Flip the node's own membership, then cascade to its descendants based
    /// on the post-toggle state: newly selected selects them all, newly
    /// unselected deselects them all.
    pub fn toggle(&mut self, node: FlatId, descendants: &[FlatId]) {
        if self.is_selected(node) {
            self.selected.remove(&node);
        } else {
            self.select([node]);
        }
        if self.is_selected(node) {
            self.select(descendants.iter().copied());
        } else {
            self.deselect(descendants.iter().copied());
        }
    }

    /// Select every row plus all of each row's descendants. The descendant
    /// pass is redundant with the row pass but idempotent.
    pub fn select_all(&mut self, rows: &[FlatId], descendants_of: impl Fn(FlatId) -> Vec<FlatId>) {
        for &fid in rows {
            self.select([fid]);
            self.select(descendants_of(fid));
        }
    }

    /// Re-select every currently selected identity.
    ///
    /// Filtering leaves the set untouched, but the caller re-affirms it
    /// after every filter/clear so re-flattening cannot shed it.
    pub fn reaffirm(&mut self) {
        let current = self.selected();
        self.select(current);
    }

    /// Checkbox state for rendering: groups aggregate their descendants,
    /// leaves report their own membership.
    pub fn check_state(&self, node: FlatId, descendants: &[FlatId]) -> CheckState {
        if descendants.is_empty() {
            return if self.is_selected(node) {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            };
        }
        if self.descendants_all_selected(descendants) {
            CheckState::Checked
        } else if self.descendants_partially_selected(descendants) {
            CheckState::Partial
        } else {
            CheckState::Unchecked
        }
    }
}
