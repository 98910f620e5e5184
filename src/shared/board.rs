/**
 * Board Aggregate Data Model
 *
 * This module defines the board document and every entity nested inside it.
 * The whole tree is loaded and saved as a single aggregate; nested entities
 * never outlive the board that owns them.
 *
 * # Hierarchy
 *
 * ```text
 * Board
 * ├── columns[]   Column ── labels[] Label
 * ├── groups[]    Group ── tasks[] Task ── updates[] LogEntry
 * │                                   └── columnValues{columnId → value}
 * └── activities[] LogEntry
 * ```
 *
 * Tasks reference columns (and, for label-valued columns, labels) by id in
 * their `columnValues` map; columns are never embedded into tasks.
 *
 * All types serialize in camelCase so the JSON shape matches what board
 * clients already send and render.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Generate a fresh entity id.
///
/// Ids are short, opaque and URL-safe; uniqueness only matters within the
/// parent collection but a v4 UUID makes collisions a non-issue.
pub fn new_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    uuid[..12].to_string()
}

/// Kind of entity addressed by a path segment.
///
/// Used in error reporting (`NotFound(kind, id)`) and in realtime payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Board,
    Group,
    Task,
    Column,
    Label,
    Update,
    ColumnValue,
    Activity,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Board => "board",
            Self::Group => "group",
            Self::Task => "task",
            Self::Column => "column",
            Self::Label => "label",
            Self::Update => "update",
            Self::ColumnValue => "column value",
            Self::Activity => "activity",
        };
        f.write_str(name)
    }
}

/// Column value types a board supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    Status,
    Priority,
    Label,
    Person,
    Date,
    Timeline,
    Text,
    Number,
    Files,
}

impl ColumnType {
    /// Whether task values of this column are label ids.
    pub fn uses_labels(self) -> bool {
        matches!(self, Self::Status | Self::Priority | Self::Label)
    }
}

/// Caller identity, supplied by the transport layer and trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            account: account.into(),
            full_name: None,
        }
    }

    /// Name shown as author on log entries.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.user_id)
    }
}

/// Short user reference stored on the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl From<&Identity> for UserRef {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            full_name: identity.full_name.clone(),
        }
    }
}

/// The board aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub activities: Vec<LogEntry>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
    #[serde(default)]
    pub modified_by: Option<UserRef>,
    /// Optimistic concurrency token, bumped by the store on every save.
    #[serde(default)]
    pub version: u64,
}

impl Board {
    /// Create an empty board owned by `account`.
    pub fn new(title: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            account: account.into(),
            description: None,
            is_starred: false,
            groups: Vec::new(),
            columns: Vec::new(),
            activities: Vec::new(),
            created_at: Utc::now(),
            created_by: None,
            modified_by: None,
            version: 0,
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// Iterate over every task on the board, group by group.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.groups.iter().flat_map(|group| group.tasks.iter())
    }

    pub fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.groups.iter_mut().flat_map(|group| group.tasks.iter_mut())
    }

    pub fn summary(&self, position: usize) -> BoardSummary {
        BoardSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            account: self.account.clone(),
            is_starred: self.is_starred,
            position,
        }
    }
}

/// A group of tasks; rendered in `position` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub position: usize,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Group {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

/// A column definition; tasks hold values keyed by column id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Column {
    pub fn label(&self, label_id: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.id == label_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub position: usize,
    #[serde(default)]
    pub column_values: BTreeMap<String, Value>,
    #[serde(default)]
    pub updates: Vec<LogEntry>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
}

/// Append-only log entry: a task update or a board activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub text: String,
    pub author: Option<UserRef>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// List projection of a board ("mini board").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: String,
    pub title: String,
    pub account: String,
    pub is_starred: bool,
    pub position: usize,
}

// Drafts: client-supplied shapes for new entities. Ids are optional and get
// assigned by the engine when missing.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDraft>,
    #[serde(default)]
    pub groups: Vec<GroupDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub column_values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}
