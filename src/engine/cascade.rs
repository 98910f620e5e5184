//! Cleanup of dependent column values after a removal.

use serde_json::Value;

use crate::shared::board::Board;

/// Null out every value of `column_id` that points at `label_id`.
///
/// The key stays on the task; only values under that column are touched.
/// Returns how many values were cleared.
pub fn clear_label_refs(board: &mut Board, column_id: &str, label_id: &str) -> usize {
    let mut cleared = 0;
    for task in board.tasks_mut() {
        if let Some(value) = task.column_values.get_mut(column_id) {
            if value.as_str() == Some(label_id) {
                *value = Value::Null;
                cleared += 1;
            }
        }
    }
    cleared
}

/// Drop the `column_id` key from every task. Returns how many keys went.
pub fn drop_column_refs(board: &mut Board, column_id: &str) -> usize {
    board
        .tasks_mut()
        .filter_map(|task| task.column_values.remove(column_id))
        .count()
}
