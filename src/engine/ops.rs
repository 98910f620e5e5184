//! Mutation operations on a board aggregate.
//!
//! # Responsibility
//! - Apply one `Operation` to an in-memory board.
//! - Keep sibling order dense, run cascades, then check invariants.
//!
//! # Invariants
//! - Operations validate their paths and payloads before mutating.
//! - `apply` returns an error when the resulting board breaks an invariant;
//!   callers must then discard the board instead of saving it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::cascade;
use crate::engine::invariants::{self, check_value};
use crate::engine::order::{self, ensure_unique, Sibling};
use crate::engine::patch::{apply_patch, title_or, value_patch, Patch};
use crate::engine::path::{
    ensure_entity, ensure_parent, into_invalid_parent, resolve_column, resolve_column_value,
    resolve_group, resolve_label, resolve_task, resolve_update, EntityPath, ParentPath,
};
use crate::shared::board::{
    new_id, Board, BoardDraft, Column, ColumnDraft, EntityKind, Group, GroupDraft, Identity,
    Label, LabelDraft, LogDraft, LogEntry, Task, TaskDraft, UserRef,
};
use crate::shared::error::{BoardError, BoardResult};

pub const DEFAULT_GROUP_TITLE: &str = "New Group";
pub const DEFAULT_TASK_TITLE: &str = "New Task";
pub const DEFAULT_COLUMN_TITLE: &str = "New Column";
pub const DEFAULT_BOARD_TITLE: &str = "New Board";

/// Payload of a Create operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "camelCase")]
pub enum NewEntity {
    Group(GroupDraft),
    Column(ColumnDraft),
    Label(LabelDraft),
    Task(TaskDraft),
    #[serde(rename_all = "camelCase")]
    ColumnValue { column_id: String, value: Value },
}

impl NewEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Group(_) => EntityKind::Group,
            Self::Column(_) => EntityKind::Column,
            Self::Label(_) => EntityKind::Label,
            Self::Task(_) => EntityKind::Task,
            Self::ColumnValue { .. } => EntityKind::ColumnValue,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create {
        parent: ParentPath,
        draft: NewEntity,
        insert_at: Option<usize>,
        created_by: Option<UserRef>,
    },
    Update {
        path: EntityPath,
        patch: Patch,
    },
    Remove {
        path: EntityPath,
    },
    Move {
        path: EntityPath,
        destination: ParentPath,
        index: usize,
    },
    AppendLog {
        parent: ParentPath,
        entry: LogDraft,
        author: Option<UserRef>,
    },
}

impl Operation {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Remove { .. } => "remove",
            Self::Move { .. } => "move",
            Self::AppendLog { .. } => "append-log",
        }
    }
}

/// What an applied operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Created { kind: EntityKind, id: String },
    Updated { kind: EntityKind, id: String },
    Removed { kind: EntityKind, id: String },
    Moved { kind: EntityKind, id: String, index: usize },
    Appended { kind: EntityKind, id: String },
}

impl Effect {
    pub fn id(&self) -> &str {
        match self {
            Self::Created { id, .. }
            | Self::Updated { id, .. }
            | Self::Removed { id, .. }
            | Self::Moved { id, .. }
            | Self::Appended { id, .. } => id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Created { kind, .. }
            | Self::Updated { kind, .. }
            | Self::Removed { kind, .. }
            | Self::Moved { kind, .. }
            | Self::Appended { kind, .. } => *kind,
        }
    }
}

/// Apply one operation and check the board's invariants afterwards.
pub fn apply(board: &mut Board, operation: Operation) -> BoardResult<Effect> {
    let effect = match operation {
        Operation::Create {
            parent,
            draft,
            insert_at,
            created_by,
        } => create(board, parent, draft, insert_at, created_by),
        Operation::Update { path, patch } => update(board, path, &patch),
        Operation::Remove { path } => remove(board, path),
        Operation::Move {
            path,
            destination,
            index,
        } => move_entity(board, path, destination, index),
        Operation::AppendLog {
            parent,
            entry,
            author,
        } => append_log(board, parent, entry, author),
    }?;
    invariants::check(board)?;
    Ok(effect)
}

/// Build a new board by replaying `draft` through Create operations.
///
/// Columns and their labels go first so that task values can reference them.
pub fn build_board(draft: BoardDraft, identity: &Identity) -> BoardResult<Board> {
    let mut board = Board::new(
        title_or(Some(draft.title), DEFAULT_BOARD_TITLE),
        identity.account.clone(),
    );
    board.description = draft.description;
    board.created_by = Some(UserRef::from(identity));
    let created_by = board.created_by.clone();

    for mut column in draft.columns {
        let labels = std::mem::take(&mut column.labels);
        let created = apply(
            &mut board,
            Operation::Create {
                parent: ParentPath::Board,
                draft: NewEntity::Column(column),
                insert_at: None,
                created_by: created_by.clone(),
            },
        )?;
        for label in labels {
            apply(
                &mut board,
                Operation::Create {
                    parent: ParentPath::column(created.id()),
                    draft: NewEntity::Label(label),
                    insert_at: None,
                    created_by: created_by.clone(),
                },
            )?;
        }
    }

    for mut group in draft.groups {
        let tasks = std::mem::take(&mut group.tasks);
        let created = apply(
            &mut board,
            Operation::Create {
                parent: ParentPath::Board,
                draft: NewEntity::Group(group),
                insert_at: None,
                created_by: created_by.clone(),
            },
        )?;
        for task in tasks {
            apply(
                &mut board,
                Operation::Create {
                    parent: ParentPath::group(created.id()),
                    draft: NewEntity::Task(task),
                    insert_at: None,
                    created_by: created_by.clone(),
                },
            )?;
        }
    }

    Ok(board)
}

fn create(
    board: &mut Board,
    parent: ParentPath,
    draft: NewEntity,
    insert_at: Option<usize>,
    created_by: Option<UserRef>,
) -> BoardResult<Effect> {
    ensure_parent(board, &parent)?;
    let kind = draft.kind();

    let id = match (parent, draft) {
        (ParentPath::Board, NewEntity::Group(draft)) => {
            let group = build_group(board, draft, &created_by)?;
            ensure_unique(&board.groups, &group.id)?;
            let id = group.id.clone();
            order::insert(&mut board.groups, group, insert_at);
            id
        }
        (ParentPath::Board, NewEntity::Column(draft)) => {
            let column = build_column(draft)?;
            ensure_unique(&board.columns, &column.id)?;
            let id = column.id.clone();
            order::insert(&mut board.columns, column, insert_at);
            id
        }
        (ParentPath::Column { column_id }, NewEntity::Label(draft)) => {
            let label = build_label(draft)?;
            let column = resolve_column(board, &column_id)
                .map_err(into_invalid_parent)?
                .into_target();
            ensure_unique(&column.labels, &label.id)?;
            let id = label.id.clone();
            order::insert(&mut column.labels, label, insert_at);
            id
        }
        (ParentPath::Group { group_id }, NewEntity::Task(draft)) => {
            let task = build_task(board, draft, &created_by)?;
            let group = resolve_group(board, &group_id)
                .map_err(into_invalid_parent)?
                .into_target();
            ensure_unique(&group.tasks, &task.id)?;
            let id = task.id.clone();
            order::insert(&mut group.tasks, task, insert_at);
            id
        }
        (ParentPath::Task { group_id, task_id }, NewEntity::ColumnValue { column_id, value }) => {
            check_value(board, &column_id, &value)?;
            let task = resolve_task(board, &group_id, &task_id)
                .map_err(into_invalid_parent)?
                .into_target();
            if task.column_values.contains_key(&column_id) {
                return Err(BoardError::validation(
                    "columnId",
                    format!("task {task_id} already has a value for column {column_id}"),
                ));
            }
            task.column_values.insert(column_id.clone(), value);
            column_id
        }
        (parent, _) => {
            return Err(BoardError::validation(
                "parent",
                format!("a {kind} cannot be created under a {}", parent.kind()),
            ))
        }
    };

    Ok(Effect::Created { kind, id })
}

fn update(board: &mut Board, path: EntityPath, patch: &Patch) -> BoardResult<Effect> {
    let kind = path.kind();
    let id = match &path {
        EntityPath::Board => {
            apply_patch(board, patch)?;
            board.id.clone()
        }
        EntityPath::Group { group_id } => {
            apply_patch(resolve_group(board, group_id)?.into_target(), patch)?;
            group_id.clone()
        }
        EntityPath::Task { group_id, task_id } => {
            apply_patch(resolve_task(board, group_id, task_id)?.into_target(), patch)?;
            task_id.clone()
        }
        EntityPath::Column { column_id } => {
            apply_patch(resolve_column(board, column_id)?.into_target(), patch)?;
            column_id.clone()
        }
        EntityPath::Label {
            column_id,
            label_id,
        } => {
            apply_patch(resolve_label(board, column_id, label_id)?.into_target(), patch)?;
            label_id.clone()
        }
        EntityPath::ColumnValue {
            group_id,
            task_id,
            column_id,
        } => {
            ensure_entity(board, &path)?;
            let value = value_patch(patch)?;
            check_value(board, column_id, &value)?;
            resolve_column_value(board, group_id, task_id, column_id)?.replace(value);
            column_id.clone()
        }
        EntityPath::TaskUpdate { .. } => {
            ensure_entity(board, &path)?;
            return Err(BoardError::validation(
                "path",
                "log entries are append-only and cannot be updated",
            ));
        }
    };
    Ok(Effect::Updated { kind, id })
}

fn remove(board: &mut Board, path: EntityPath) -> BoardResult<Effect> {
    let kind = path.kind();
    let id = match path {
        EntityPath::Board => {
            return Err(BoardError::validation(
                "path",
                "boards are removed through the store",
            ))
        }
        EntityPath::Group { group_id } => {
            let slot = resolve_group(board, &group_id)?;
            order::remove(slot.collection, slot.index).id
        }
        EntityPath::Task { group_id, task_id } => {
            let slot = resolve_task(board, &group_id, &task_id)?;
            order::remove(slot.collection, slot.index).id
        }
        EntityPath::TaskUpdate {
            group_id,
            task_id,
            update_id,
        } => {
            let slot = resolve_update(board, &group_id, &task_id, &update_id)?;
            order::remove(slot.collection, slot.index).id
        }
        EntityPath::ColumnValue {
            group_id,
            task_id,
            column_id,
        } => {
            resolve_column_value(board, &group_id, &task_id, &column_id)?.remove();
            column_id
        }
        EntityPath::Column { column_id } => {
            let slot = resolve_column(board, &column_id)?;
            order::remove(slot.collection, slot.index);
            cascade::drop_column_refs(board, &column_id);
            column_id
        }
        EntityPath::Label {
            column_id,
            label_id,
        } => {
            let slot = resolve_label(board, &column_id, &label_id)?;
            order::remove(slot.collection, slot.index);
            cascade::clear_label_refs(board, &column_id, &label_id);
            label_id
        }
    };
    Ok(Effect::Removed { kind, id })
}

fn move_entity(
    board: &mut Board,
    path: EntityPath,
    destination: ParentPath,
    index: usize,
) -> BoardResult<Effect> {
    let kind = path.kind();
    ensure_entity(board, &path)?;
    ensure_parent(board, &destination)?;

    let (id, index) = match (path, destination) {
        (EntityPath::Task { group_id, task_id }, ParentPath::Group { group_id: to_group }) => {
            if to_group != group_id {
                if let Some(target) = board.group(&to_group) {
                    ensure_unique(&target.tasks, &task_id)?;
                }
            }
            let task = {
                let slot = resolve_task(board, &group_id, &task_id)?;
                order::remove(slot.collection, slot.index)
            };
            let target = resolve_group(board, &to_group)?.into_target();
            let index = order::insert(&mut target.tasks, task, Some(index));
            (task_id, index)
        }
        (EntityPath::Group { group_id }, ParentPath::Board) => {
            let slot = resolve_group(board, &group_id)?;
            let index = order::reposition(slot.collection, slot.index, index);
            (group_id, index)
        }
        (EntityPath::Column { column_id }, ParentPath::Board) => {
            let slot = resolve_column(board, &column_id)?;
            let index = order::reposition(slot.collection, slot.index, index);
            (column_id, index)
        }
        (
            EntityPath::Label {
                column_id,
                label_id,
            },
            ParentPath::Column {
                column_id: to_column,
            },
        ) => {
            if to_column != column_id {
                return Err(BoardError::validation(
                    "destination",
                    "labels can only move within their own column",
                ));
            }
            let slot = resolve_label(board, &column_id, &label_id)?;
            let index = order::reposition(slot.collection, slot.index, index);
            (label_id, index)
        }
        (EntityPath::TaskUpdate { .. } | EntityPath::ColumnValue { .. } | EntityPath::Board, _) => {
            return Err(BoardError::validation(
                "path",
                format!("a {kind} cannot be moved"),
            ))
        }
        (_, destination) => {
            return Err(BoardError::validation(
                "destination",
                format!("a {kind} cannot be moved into a {}", destination.kind()),
            ))
        }
    };

    Ok(Effect::Moved { kind, id, index })
}

fn append_log(
    board: &mut Board,
    parent: ParentPath,
    draft: LogDraft,
    author: Option<UserRef>,
) -> BoardResult<Effect> {
    ensure_parent(board, &parent)?;
    match parent {
        ParentPath::Board => {
            let entry = build_log_entry(draft, author, None)?;
            ensure_unique(&board.activities, &entry.id)?;
            let id = entry.id.clone();
            board.activities.push(entry);
            Ok(Effect::Appended {
                kind: EntityKind::Activity,
                id,
            })
        }
        ParentPath::Task { group_id, task_id } => {
            let task = resolve_task(board, &group_id, &task_id)
                .map_err(into_invalid_parent)?
                .into_target();
            let entry = build_log_entry(draft, author, Some((group_id, task_id)))?;
            ensure_unique(&task.updates, &entry.id)?;
            let id = entry.id.clone();
            task.updates.push(entry);
            Ok(Effect::Appended {
                kind: EntityKind::Update,
                id,
            })
        }
        other => Err(BoardError::validation(
            "parent",
            format!("log entries cannot be appended to a {}", other.kind()),
        )),
    }
}

fn draft_id(id: Option<String>) -> BoardResult<String> {
    match id {
        Some(id) if id.trim().is_empty() => Err(BoardError::validation("id", "must not be blank")),
        Some(id) => Ok(id),
        None => Ok(new_id()),
    }
}

fn build_group(
    board: &Board,
    draft: GroupDraft,
    created_by: &Option<UserRef>,
) -> BoardResult<Group> {
    let mut group = Group {
        id: draft_id(draft.id)?,
        title: title_or(draft.title, DEFAULT_GROUP_TITLE),
        color: draft.color,
        position: 0,
        tasks: Vec::with_capacity(draft.tasks.len()),
    };
    for task in draft.tasks {
        let task = build_task(board, task, created_by)?;
        ensure_unique(&group.tasks, task.id())?;
        group.tasks.push(task);
    }
    order::renumber(&mut group.tasks);
    Ok(group)
}

fn build_task(board: &Board, draft: TaskDraft, created_by: &Option<UserRef>) -> BoardResult<Task> {
    for (column_id, value) in &draft.column_values {
        check_value(board, column_id, value)?;
    }
    Ok(Task {
        id: draft_id(draft.id)?,
        title: title_or(draft.title, DEFAULT_TASK_TITLE),
        position: 0,
        column_values: draft.column_values,
        updates: Vec::new(),
        created_at: Utc::now(),
        created_by: created_by.clone(),
    })
}

fn build_column(draft: ColumnDraft) -> BoardResult<Column> {
    let mut column = Column {
        id: draft_id(draft.id)?,
        column_type: draft.column_type,
        title: title_or(draft.title, DEFAULT_COLUMN_TITLE),
        labels: Vec::with_capacity(draft.labels.len()),
    };
    for label in draft.labels {
        let label = build_label(label)?;
        ensure_unique(&column.labels, &label.id)?;
        column.labels.push(label);
    }
    Ok(column)
}

fn build_label(draft: LabelDraft) -> BoardResult<Label> {
    Ok(Label {
        id: draft_id(draft.id)?,
        name: draft.name,
        color: draft.color,
    })
}

fn build_log_entry(
    draft: LogDraft,
    author: Option<UserRef>,
    task: Option<(String, String)>,
) -> BoardResult<LogEntry> {
    if draft.text.trim().is_empty() {
        return Err(BoardError::validation("text", "must not be blank"));
    }
    let (group_id, task_id) = match task {
        Some((group_id, task_id)) => (Some(group_id), Some(task_id)),
        None => (draft.group_id, draft.task_id),
    };
    Ok(LogEntry {
        id: draft_id(draft.id)?,
        text: draft.text,
        author,
        timestamp: Utc::now(),
        group_id,
        task_id,
    })
}
