//! Re-bind guard for presentation slots.
//!
//! A presentation slot (a reusable cell) remembers which `(ItemId, Revision)`
//! it last displayed. Binding the same item at the same revision again is a
//! no-op; a new item or a bumped revision requires a full bind.

use crate::model::{ItemId, ListItem, Revision};
use std::collections::HashMap;

/// Slot identifier chosen by the presentation layer (typically a row index or
/// a reusable cell handle).
pub type SlotId = usize;

/// Tracks the last bound `(id, revision)` per slot.
#[derive(Debug, Default, Clone)]
pub struct BindGuard {
    bound: HashMap<SlotId, (ItemId, Revision)>,
}

impl BindGuard {
    /// Empty guard; every slot needs its first bind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `slot` must be (re)bound to display `item`.
    ///
    /// Returns `false` when the slot already shows the same item at the same
    /// revision. Otherwise records the new pair and returns `true`.
    pub fn needs_bind(&mut self, slot: SlotId, item: &ListItem) -> bool {
        let current = (item.id(), item.revision());
        match self.bound.insert(slot, current) {
            Some(previous) => previous != current,
            None => true,
        }
    }

    /// Forget what `slot` shows, e.g. when a cell is recycled.
    pub fn forget(&mut self, slot: SlotId) {
        self.bound.remove(&slot);
    }

    /// Forget every slot, e.g. after a refresh.
    pub fn clear(&mut self) {
        self.bound.clear();
    }
}
