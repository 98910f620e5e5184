//! Request and response bodies of the board routes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::PathSegments;
use crate::shared::board::{ColumnDraft, GroupDraft, LabelDraft, TaskDraft};

/// Every id a board route can carry. Routes fill in the ones they declare.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteIds {
    pub board_id: String,
    pub group_id: Option<String>,
    pub task_id: Option<String>,
    pub column_id: Option<String>,
    pub label_id: Option<String>,
    pub update_id: Option<String>,
}

impl RouteIds {
    /// Ids below the board, as a path tuple.
    pub fn segments(&self) -> PathSegments {
        PathSegments {
            group_id: self.group_id.clone(),
            task_id: self.task_id.clone(),
            column_id: self.column_id.clone(),
            label_id: self.label_id.clone(),
            update_id: self.update_id.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub account: Option<String>,
}

/// `isTop` wins over `insertAt`; neither means append.
pub fn insert_index(is_top: bool, insert_at: Option<usize>) -> Option<usize> {
    if is_top {
        Some(0)
    } else {
        insert_at
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub group: GroupDraft,
    #[serde(default)]
    pub is_top: bool,
    #[serde(default)]
    pub insert_at: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub column: ColumnDraft,
    #[serde(default)]
    pub insert_at: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelRequest {
    #[serde(default)]
    pub label: LabelDraft,
    #[serde(default)]
    pub insert_at: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub task: TaskDraft,
    #[serde(default)]
    pub is_top: bool,
    #[serde(default)]
    pub insert_at: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    pub to_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub from_group_id: String,
    pub to_group_id: String,
    pub to_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub board_id: String,
    pub to_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ColumnValueRequest {
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedResponse {
    pub removed_id: String,
}
