//! Structural invariants of a board aggregate.
//!
//! Checked after every engine operation:
//! 1. ids are unique within each sibling collection
//! 2. group and task positions equal their index
//! 3. column values only reference existing columns and labels

use serde_json::Value;
use std::collections::HashSet;

use crate::engine::order::Sibling;
use crate::shared::board::{Board, EntityKind, Group, Task};
use crate::shared::error::{BoardError, BoardResult};

pub fn check(board: &Board) -> BoardResult<()> {
    unique_ids(&board.groups)?;
    unique_ids(&board.columns)?;
    unique_ids(&board.activities)?;
    for column in &board.columns {
        unique_ids(&column.labels)?;
    }

    for (index, group) in board.groups.iter().enumerate() {
        dense(group, index)?;
        unique_ids(&group.tasks)?;
        for (index, task) in group.tasks.iter().enumerate() {
            dense_task(task, index)?;
            unique_ids(&task.updates)?;
            for (column_id, value) in &task.column_values {
                check_value(board, column_id, value)?;
            }
        }
    }
    Ok(())
}

/// Validate one column value against the board's columns.
///
/// Unknown columns are `NotFound`. Label-valued columns accept `null` or the
/// id of one of their own labels.
pub fn check_value(board: &Board, column_id: &str, value: &Value) -> BoardResult<()> {
    let column = board
        .column(column_id)
        .ok_or_else(|| BoardError::not_found(EntityKind::Column, column_id))?;
    if !column.column_type.uses_labels() {
        return Ok(());
    }
    match value {
        Value::Null => Ok(()),
        Value::String(label_id) if column.label(label_id).is_some() => Ok(()),
        Value::String(label_id) => Err(BoardError::validation(
            "value",
            format!("label {label_id} does not exist in column {column_id}"),
        )),
        _ => Err(BoardError::validation(
            "value",
            format!("column {column_id} expects a label id or null"),
        )),
    }
}

fn unique_ids<T: Sibling>(items: &[T]) -> BoardResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(BoardError::validation(
                "id",
                format!("duplicate {} id {}", T::KIND, item.id()),
            ));
        }
    }
    Ok(())
}

fn dense(group: &Group, index: usize) -> BoardResult<()> {
    if group.position != index {
        return Err(BoardError::validation(
            "position",
            format!("group {} has position {} at index {}", group.id, group.position, index),
        ));
    }
    Ok(())
}

fn dense_task(task: &Task, index: usize) -> BoardResult<()> {
    if task.position != index {
        return Err(BoardError::validation(
            "position",
            format!("task {} has position {} at index {}", task.id, task.position, index),
        ));
    }
    Ok(())
}
