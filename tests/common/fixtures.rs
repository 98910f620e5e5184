//! Board fixtures shared by the integration and property tests.

use boardsync::engine::{EntityPath, NewEntity, Operation, ParentPath};
use boardsync::shared::board::{
    BoardDraft, ColumnDraft, ColumnType, GroupDraft, Identity, LabelDraft, TaskDraft,
};
use serde_json::{json, Value};

pub fn identity() -> Identity {
    Identity::new("u1", "acme")
}

pub fn other_identity() -> Identity {
    Identity::new("u2", "acme")
}

fn label(id: &str, name: &str) -> LabelDraft {
    LabelDraft {
        id: Some(id.to_string()),
        name: name.to_string(),
        color: None,
    }
}

fn task(id: &str, title: &str) -> TaskDraft {
    TaskDraft {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        ..TaskDraft::default()
    }
}

/// Two groups (`todo` with t1, t2 and an empty `doing`), a status column
/// with labels `done`/`stuck`, and a text column `notes`. t1 is `done`.
pub fn sprint_draft() -> BoardDraft {
    let mut t1 = task("t1", "Write docs");
    t1.column_values.insert("status".to_string(), json!("done"));

    BoardDraft {
        title: "Sprint".to_string(),
        description: Some("Two week sprint".to_string()),
        columns: vec![
            ColumnDraft {
                id: Some("status".to_string()),
                column_type: ColumnType::Status,
                title: Some("Status".to_string()),
                labels: vec![label("done", "Done"), label("stuck", "Stuck")],
            },
            ColumnDraft {
                id: Some("notes".to_string()),
                column_type: ColumnType::Text,
                title: Some("Notes".to_string()),
                labels: Vec::new(),
            },
        ],
        groups: vec![
            GroupDraft {
                id: Some("todo".to_string()),
                title: Some("To do".to_string()),
                color: None,
                tasks: vec![t1, task("t2", "Review")],
            },
            GroupDraft {
                id: Some("doing".to_string()),
                title: Some("Doing".to_string()),
                ..GroupDraft::default()
            },
        ],
    }
}

/// `sprint_draft` as the JSON body of `POST /boards`.
pub fn sprint_draft_json() -> Value {
    json!({
        "title": "Sprint",
        "columns": [
            {
                "id": "status",
                "type": "status",
                "title": "Status",
                "labels": [
                    { "id": "done", "name": "Done" },
                    { "id": "stuck", "name": "Stuck" }
                ]
            },
            { "id": "notes", "type": "text", "title": "Notes" }
        ],
        "groups": [
            {
                "id": "todo",
                "title": "To do",
                "tasks": [
                    { "id": "t1", "title": "Write docs", "columnValues": { "status": "done" } },
                    { "id": "t2", "title": "Review" }
                ]
            },
            { "id": "doing", "title": "Doing" }
        ]
    })
}

pub fn add_task(group_id: &str, task_id: &str) -> Operation {
    Operation::Create {
        parent: ParentPath::group(group_id),
        draft: NewEntity::Task(TaskDraft {
            id: Some(task_id.to_string()),
            ..TaskDraft::default()
        }),
        insert_at: None,
        created_by: None,
    }
}

pub fn move_task(from: &str, to: &str, task_id: &str, index: usize) -> Operation {
    Operation::Move {
        path: EntityPath::task(from, task_id),
        destination: ParentPath::group(to),
        index,
    }
}
