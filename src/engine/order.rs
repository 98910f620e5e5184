//! Sibling collections and order positions.
//!
//! Every structural mutation goes through the helpers here so that the dense
//! position invariant (`position == index`) is restored in one place.

use crate::shared::board::{Column, EntityKind, Group, Label, LogEntry, Task};
use crate::shared::error::{BoardError, BoardResult};

/// An entity living in an ordered sibling collection.
pub trait Sibling {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Record the entity's index. Collections whose order is implied by the
    /// sequence alone keep the default no-op.
    fn set_position(&mut self, _position: usize) {}
}

impl Sibling for Group {
    const KIND: EntityKind = EntityKind::Group;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

impl Sibling for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

impl Sibling for Column {
    const KIND: EntityKind = EntityKind::Column;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Sibling for Label {
    const KIND: EntityKind = EntityKind::Label;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Sibling for LogEntry {
    const KIND: EntityKind = EntityKind::Update;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Rewrite positions so they equal indices. O(n).
pub fn renumber<T: Sibling>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index);
    }
}

/// Clamp a requested index into `[0, len]`.
pub fn clamp_index(requested: usize, len: usize) -> usize {
    requested.min(len)
}

pub fn position_of<T: Sibling>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Reject an id that already exists among the siblings.
pub fn ensure_unique<T: Sibling>(items: &[T], id: &str) -> BoardResult<()> {
    if position_of(items, id).is_some() {
        return Err(BoardError::validation(
            "id",
            format!("{} id {} already exists in this collection", T::KIND, id),
        ));
    }
    Ok(())
}

/// Insert at `at` (clamped; `None` appends) and renumber. Returns the index used.
pub fn insert<T: Sibling>(items: &mut Vec<T>, item: T, at: Option<usize>) -> usize {
    let index = clamp_index(at.unwrap_or(items.len()), items.len());
    items.insert(index, item);
    renumber(items);
    index
}

/// Remove the item at `index` and renumber the rest.
pub fn remove<T: Sibling>(items: &mut Vec<T>, index: usize) -> T {
    let removed = items.remove(index);
    renumber(items);
    removed
}

/// Reposition an item inside its own collection: remove, then reinsert at
/// the clamped index. Returns the final index.
pub fn reposition<T: Sibling>(items: &mut Vec<T>, from: usize, to: usize) -> usize {
    let item = items.remove(from);
    let index = clamp_index(to, items.len());
    items.insert(index, item);
    renumber(items);
    index
}
