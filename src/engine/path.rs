//! Path resolution inside a board aggregate.
//!
//! # Responsibility
//! - Turn raw id tuples into typed paths.
//! - Locate a mutable sub-entity together with its parent collection.
//!
//! # Invariants
//! - Resolution is strictly top-down. A segment is searched only inside the
//!   scope resolved by the previous segment, so an id that exists elsewhere
//!   on the board never matches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::engine::order::{position_of, Sibling};
use crate::shared::board::{Board, Column, EntityKind, Group, Label, LogEntry, Task};
use crate::shared::error::{BoardError, BoardResult};

/// Typed path to an existing entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntityPath {
    Board,
    #[serde(rename_all = "camelCase")]
    Group { group_id: String },
    #[serde(rename_all = "camelCase")]
    Task { group_id: String, task_id: String },
    #[serde(rename_all = "camelCase")]
    TaskUpdate {
        group_id: String,
        task_id: String,
        update_id: String,
    },
    #[serde(rename_all = "camelCase")]
    ColumnValue {
        group_id: String,
        task_id: String,
        column_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Column { column_id: String },
    #[serde(rename_all = "camelCase")]
    Label { column_id: String, label_id: String },
}

impl EntityPath {
    pub fn group(group_id: impl Into<String>) -> Self {
        Self::Group {
            group_id: group_id.into(),
        }
    }

    pub fn task(group_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self::Task {
            group_id: group_id.into(),
            task_id: task_id.into(),
        }
    }

    pub fn task_update(
        group_id: impl Into<String>,
        task_id: impl Into<String>,
        update_id: impl Into<String>,
    ) -> Self {
        Self::TaskUpdate {
            group_id: group_id.into(),
            task_id: task_id.into(),
            update_id: update_id.into(),
        }
    }

    pub fn column_value(
        group_id: impl Into<String>,
        task_id: impl Into<String>,
        column_id: impl Into<String>,
    ) -> Self {
        Self::ColumnValue {
            group_id: group_id.into(),
            task_id: task_id.into(),
            column_id: column_id.into(),
        }
    }

    pub fn column(column_id: impl Into<String>) -> Self {
        Self::Column {
            column_id: column_id.into(),
        }
    }

    pub fn label(column_id: impl Into<String>, label_id: impl Into<String>) -> Self {
        Self::Label {
            column_id: column_id.into(),
            label_id: label_id.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Board => EntityKind::Board,
            Self::Group { .. } => EntityKind::Group,
            Self::Task { .. } => EntityKind::Task,
            Self::TaskUpdate { .. } => EntityKind::Update,
            Self::ColumnValue { .. } => EntityKind::ColumnValue,
            Self::Column { .. } => EntityKind::Column,
            Self::Label { .. } => EntityKind::Label,
        }
    }
}

/// Typed path to the owner of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParentPath {
    Board,
    #[serde(rename_all = "camelCase")]
    Group { group_id: String },
    #[serde(rename_all = "camelCase")]
    Column { column_id: String },
    #[serde(rename_all = "camelCase")]
    Task { group_id: String, task_id: String },
}

impl ParentPath {
    pub fn group(group_id: impl Into<String>) -> Self {
        Self::Group {
            group_id: group_id.into(),
        }
    }

    pub fn column(column_id: impl Into<String>) -> Self {
        Self::Column {
            column_id: column_id.into(),
        }
    }

    pub fn task(group_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self::Task {
            group_id: group_id.into(),
            task_id: task_id.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Board => EntityKind::Board,
            Self::Group { .. } => EntityKind::Group,
            Self::Column { .. } => EntityKind::Column,
            Self::Task { .. } => EntityKind::Task,
        }
    }
}

/// Raw id tuple as it arrives from a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegments {
    pub group_id: Option<String>,
    pub task_id: Option<String>,
    pub column_id: Option<String>,
    pub label_id: Option<String>,
    pub update_id: Option<String>,
}

impl PathSegments {
    /// Interpret the tuple as the address of an entity.
    pub fn into_entity(self) -> BoardResult<EntityPath> {
        let Self {
            group_id,
            task_id,
            column_id,
            label_id,
            update_id,
        } = self;
        match (group_id, task_id, column_id, label_id, update_id) {
            (None, None, None, None, None) => Ok(EntityPath::Board),
            (Some(group_id), None, None, None, None) => Ok(EntityPath::Group { group_id }),
            (Some(group_id), Some(task_id), None, None, None) => {
                Ok(EntityPath::Task { group_id, task_id })
            }
            (Some(group_id), Some(task_id), None, None, Some(update_id)) => {
                Ok(EntityPath::TaskUpdate {
                    group_id,
                    task_id,
                    update_id,
                })
            }
            (Some(group_id), Some(task_id), Some(column_id), None, None) => {
                Ok(EntityPath::ColumnValue {
                    group_id,
                    task_id,
                    column_id,
                })
            }
            (None, None, Some(column_id), None, None) => Ok(EntityPath::Column { column_id }),
            (None, None, Some(column_id), Some(label_id), None) => {
                Ok(EntityPath::Label { column_id, label_id })
            }
            _ => Err(BoardError::validation(
                "path",
                "id combination does not address an entity",
            )),
        }
    }

    /// Interpret the tuple as the address of a collection owner.
    pub fn into_parent(self) -> BoardResult<ParentPath> {
        let Self {
            group_id,
            task_id,
            column_id,
            label_id,
            update_id,
        } = self;
        match (group_id, task_id, column_id, label_id, update_id) {
            (None, None, None, None, None) => Ok(ParentPath::Board),
            (Some(group_id), None, None, None, None) => Ok(ParentPath::Group { group_id }),
            (None, None, Some(column_id), None, None) => Ok(ParentPath::Column { column_id }),
            (Some(group_id), Some(task_id), None, None, None) => {
                Ok(ParentPath::Task { group_id, task_id })
            }
            _ => Err(BoardError::validation(
                "path",
                "id combination does not address a parent collection",
            )),
        }
    }
}

/// A resolved entity: its parent collection and its index in it.
#[derive(Debug)]
pub struct Slot<'a, T> {
    pub collection: &'a mut Vec<T>,
    pub index: usize,
}

impl<'a, T> Slot<'a, T> {
    pub fn target(&mut self) -> &mut T {
        &mut self.collection[self.index]
    }

    pub fn into_target(self) -> &'a mut T {
        &mut self.collection[self.index]
    }
}

/// A resolved column value: the owning task's value map and the key.
#[derive(Debug)]
pub struct ValueSlot<'a> {
    pub values: &'a mut BTreeMap<String, Value>,
    pub column_id: String,
}

impl ValueSlot<'_> {
    pub fn value(&self) -> &Value {
        self.values.get(&self.column_id).unwrap_or(&Value::Null)
    }

    /// Replace the value, returning the previous one.
    pub fn replace(&mut self, value: Value) -> Value {
        self.values
            .insert(self.column_id.clone(), value)
            .unwrap_or(Value::Null)
    }

    /// Drop the key from the task.
    pub fn remove(self) -> Value {
        self.values.remove(&self.column_id).unwrap_or(Value::Null)
    }
}

fn slot_in<'a, T: Sibling>(items: &'a mut Vec<T>, id: &str) -> BoardResult<Slot<'a, T>> {
    let index = position_of(items, id).ok_or_else(|| BoardError::not_found(T::KIND, id))?;
    Ok(Slot {
        collection: items,
        index,
    })
}

pub fn resolve_group<'a>(board: &'a mut Board, group_id: &str) -> BoardResult<Slot<'a, Group>> {
    slot_in(&mut board.groups, group_id)
}

pub fn resolve_task<'a>(
    board: &'a mut Board,
    group_id: &str,
    task_id: &str,
) -> BoardResult<Slot<'a, Task>> {
    let group = resolve_group(board, group_id)?.into_target();
    slot_in(&mut group.tasks, task_id)
}

pub fn resolve_update<'a>(
    board: &'a mut Board,
    group_id: &str,
    task_id: &str,
    update_id: &str,
) -> BoardResult<Slot<'a, LogEntry>> {
    let task = resolve_task(board, group_id, task_id)?.into_target();
    slot_in(&mut task.updates, update_id)
}

pub fn resolve_column<'a>(board: &'a mut Board, column_id: &str) -> BoardResult<Slot<'a, Column>> {
    slot_in(&mut board.columns, column_id)
}

pub fn resolve_label<'a>(
    board: &'a mut Board,
    column_id: &str,
    label_id: &str,
) -> BoardResult<Slot<'a, Label>> {
    let column = resolve_column(board, column_id)?.into_target();
    slot_in(&mut column.labels, label_id)
}

pub fn resolve_column_value<'a>(
    board: &'a mut Board,
    group_id: &str,
    task_id: &str,
    column_id: &str,
) -> BoardResult<ValueSlot<'a>> {
    let task = resolve_task(board, group_id, task_id)?.into_target();
    if !task.column_values.contains_key(column_id) {
        return Err(BoardError::not_found(EntityKind::ColumnValue, column_id));
    }
    Ok(ValueSlot {
        values: &mut task.column_values,
        column_id: column_id.to_string(),
    })
}

/// Check that an entity path resolves, without mutating anything.
pub fn ensure_entity(board: &mut Board, path: &EntityPath) -> BoardResult<()> {
    match path {
        EntityPath::Board => Ok(()),
        EntityPath::Group { group_id } => resolve_group(board, group_id).map(drop),
        EntityPath::Task { group_id, task_id } => {
            resolve_task(board, group_id, task_id).map(drop)
        }
        EntityPath::TaskUpdate {
            group_id,
            task_id,
            update_id,
        } => resolve_update(board, group_id, task_id, update_id).map(drop),
        EntityPath::ColumnValue {
            group_id,
            task_id,
            column_id,
        } => resolve_column_value(board, group_id, task_id, column_id).map(drop),
        EntityPath::Column { column_id } => resolve_column(board, column_id).map(drop),
        EntityPath::Label {
            column_id,
            label_id,
        } => resolve_label(board, column_id, label_id).map(drop),
    }
}

/// Check that a parent path resolves; failures report `InvalidParent`.
pub fn ensure_parent(board: &mut Board, parent: &ParentPath) -> BoardResult<()> {
    let resolved = match parent {
        ParentPath::Board => Ok(()),
        ParentPath::Group { group_id } => resolve_group(board, group_id).map(drop),
        ParentPath::Column { column_id } => resolve_column(board, column_id).map(drop),
        ParentPath::Task { group_id, task_id } => {
            resolve_task(board, group_id, task_id).map(drop)
        }
    };
    resolved.map_err(into_invalid_parent)
}

/// Re-label a lookup failure on a parent segment.
pub fn into_invalid_parent(err: BoardError) -> BoardError {
    match err {
        BoardError::NotFound { kind, id } => BoardError::InvalidParent { kind, id },
        other => other,
    }
}
