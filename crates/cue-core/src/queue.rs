//! FIFO queue of planned transfer units.
//!
//! Insertion order is transmission order. A unit leaves the queue only on
//! successful transfer, explicit index removal, or a full clear.

use crate::planner::TransferUnit;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct UploadQueue {
    units: VecDeque<TransferUnit>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn extend(&mut self, units: impl IntoIterator<Item = TransferUnit>) {
        self.units.extend(units);
    }

    pub fn front(&self) -> Option<&TransferUnit> {
        self.units.front()
    }

    pub fn pop_front(&mut self) -> Option<TransferUnit> {
        self.units.pop_front()
    }

    /// Removes the unit at `index`, shifting later units forward. `None` when
    /// the index is out of range; relative order of the rest is preserved.
    pub fn remove(&mut self, index: usize) -> Option<TransferUnit> {
        self.units.remove(index)
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }

    /// Appends the given text fields to every queued unit. No-op when empty;
    /// chunk metadata fields are untouched.
    pub fn add_fields_to_all(&mut self, fields: &[(String, String)]) {
        for unit in &mut self.units {
            for (name, value) in fields {
                unit.push_text(name.clone(), value.clone());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransferUnit> {
        self.units.iter()
    }
}
