/**
 * Board Route Handlers
 *
 * Each handler turns a request into a service call: route ids become typed
 * engine paths, bodies become drafts or patches. Mutations answer with the
 * full updated board, deletions with `{ "removedId": ... }`.
 *
 * The nested update, delete and position routes share one handler each;
 * which entity they address follows from the ids present in the route.
 */
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::backend::boards::service::BoardService;
use crate::backend::boards::types::{
    insert_index, ColumnValueRequest, CreateColumnRequest, CreateGroupRequest,
    CreateLabelRequest, CreateTaskRequest, ListQuery, MoveTaskRequest, PositionRequest,
    RemovedResponse, ReorderRequest, RouteIds,
};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, JsonBody};
use crate::engine::{EntityPath, NewEntity, Operation, ParentPath, PathSegments, Patch};
use crate::shared::board::{Board, BoardDraft, BoardSummary, Identity, LogDraft, UserRef};
use crate::shared::error::BoardError;

type BoardReply = Result<Json<Board>, BackendError>;

async fn run(
    service: &BoardService,
    board_id: &str,
    operation: Operation,
    identity: &Identity,
    context: impl Into<String>,
) -> BoardReply {
    service
        .apply(board_id, operation, identity)
        .await
        .map(|(board, _)| Json(board))
        .map_err(|e| BackendError::operation(context, e))
}

fn invalid_route(error: BoardError) -> BackendError {
    BackendError::operation("Invalid route", error)
}

/// GET /boards?account=
pub async fn list_boards(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BoardSummary>>, BackendError> {
    let account = query.account.unwrap_or(identity.account);
    service
        .list(&account)
        .await
        .map(Json)
        .map_err(|e| BackendError::operation("Failed to load boards", e))
}

/// GET /boards/{board_id}
pub async fn get_board(
    State(service): State<Arc<BoardService>>,
    AuthUser(_identity): AuthUser,
    Path(ids): Path<RouteIds>,
) -> BoardReply {
    service
        .get(&ids.board_id)
        .await
        .map(Json)
        .map_err(|e| BackendError::operation("Failed to load board", e))
}

/// POST /boards
pub async fn create_board(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    JsonBody(draft): JsonBody<BoardDraft>,
) -> BoardReply {
    service
        .create(draft, &identity)
        .await
        .map(Json)
        .map_err(|e| BackendError::operation("Failed to add board", e))
}

/// DELETE /boards/{board_id}
pub async fn remove_board(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
) -> Result<Json<RemovedResponse>, BackendError> {
    service
        .remove(&ids.board_id, &identity)
        .await
        .map(|removed_id| Json(RemovedResponse { removed_id }))
        .map_err(|e| BackendError::operation("Failed to remove board", e))
}

/// PUT /boards/reorder
pub async fn reorder_boards(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    JsonBody(body): JsonBody<ReorderRequest>,
) -> Result<Json<Vec<BoardSummary>>, BackendError> {
    service
        .reorder(&identity, &body.board_id, body.to_index)
        .await
        .map(Json)
        .map_err(|e| BackendError::operation("Failed to reorder boards", e))
}

/// PUT on the board or any nested entity: merge a patch.
pub async fn update_entity(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(patch): JsonBody<Patch>,
) -> BoardReply {
    let path = ids.segments().into_entity().map_err(invalid_route)?;
    let context = format!("Failed to update {}", path.kind());
    run(
        &service,
        &ids.board_id,
        Operation::Update { path, patch },
        &identity,
        context,
    )
    .await
}

/// DELETE on any nested entity.
pub async fn remove_entity(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
) -> Result<Json<RemovedResponse>, BackendError> {
    let path = ids.segments().into_entity().map_err(invalid_route)?;
    let context = format!("Failed to remove {}", path.kind());
    service
        .apply(&ids.board_id, Operation::Remove { path }, &identity)
        .await
        .map(|(_, effect)| {
            Json(RemovedResponse {
                removed_id: effect.id().to_string(),
            })
        })
        .map_err(|e| BackendError::operation(context, e))
}

/// PUT .../position on a group, column or label.
pub async fn move_entity(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(body): JsonBody<PositionRequest>,
) -> BoardReply {
    let path = ids.segments().into_entity().map_err(invalid_route)?;
    let destination = match &path {
        EntityPath::Group { .. } | EntityPath::Column { .. } => ParentPath::Board,
        EntityPath::Label { column_id, .. } => ParentPath::column(column_id.clone()),
        other => {
            return Err(invalid_route(BoardError::validation(
                "path",
                format!("a {} has no position route", other.kind()),
            )))
        }
    };
    let context = format!("Failed to move {}", path.kind());
    run(
        &service,
        &ids.board_id,
        Operation::Move {
            path,
            destination,
            index: body.to_index,
        },
        &identity,
        context,
    )
    .await
}

/// PUT /boards/{board_id}/task/{task_id}
pub async fn move_task(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(body): JsonBody<MoveTaskRequest>,
) -> BoardReply {
    let task_id = ids.task_id.clone().unwrap_or_default();
    let operation = Operation::Move {
        path: EntityPath::task(body.from_group_id, task_id),
        destination: ParentPath::group(body.to_group_id),
        index: body.to_index,
    };
    run(&service, &ids.board_id, operation, &identity, "Failed to move task").await
}

/// POST /boards/{board_id}/group
pub async fn create_group(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(body): JsonBody<CreateGroupRequest>,
) -> BoardReply {
    let operation = Operation::Create {
        parent: ParentPath::Board,
        draft: NewEntity::Group(body.group),
        insert_at: insert_index(body.is_top, body.insert_at),
        created_by: Some(UserRef::from(&identity)),
    };
    run(&service, &ids.board_id, operation, &identity, "Failed to add group").await
}

/// POST /boards/{board_id}/column
pub async fn create_column(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(body): JsonBody<CreateColumnRequest>,
) -> BoardReply {
    let operation = Operation::Create {
        parent: ParentPath::Board,
        draft: NewEntity::Column(body.column),
        insert_at: body.insert_at,
        created_by: Some(UserRef::from(&identity)),
    };
    run(&service, &ids.board_id, operation, &identity, "Failed to add column").await
}

/// POST /boards/{board_id}/column/{column_id}/label
pub async fn create_label(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(body): JsonBody<CreateLabelRequest>,
) -> BoardReply {
    let parent = ids.segments().into_parent().map_err(invalid_route)?;
    let operation = Operation::Create {
        parent,
        draft: NewEntity::Label(body.label),
        insert_at: body.insert_at,
        created_by: Some(UserRef::from(&identity)),
    };
    run(&service, &ids.board_id, operation, &identity, "Failed to add label").await
}

/// POST /boards/{board_id}/group/{group_id}/task
pub async fn create_task(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(body): JsonBody<CreateTaskRequest>,
) -> BoardReply {
    let parent = ids.segments().into_parent().map_err(invalid_route)?;
    let operation = Operation::Create {
        parent,
        draft: NewEntity::Task(body.task),
        insert_at: insert_index(body.is_top, body.insert_at),
        created_by: Some(UserRef::from(&identity)),
    };
    run(&service, &ids.board_id, operation, &identity, "Failed to add task").await
}

/// POST .../task/{task_id}/columnValue/{column_id}
pub async fn create_column_value(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(body): JsonBody<ColumnValueRequest>,
) -> BoardReply {
    let task = PathSegments {
        column_id: None,
        ..ids.segments()
    };
    let parent = task.into_parent().map_err(invalid_route)?;
    let operation = Operation::Create {
        parent,
        draft: NewEntity::ColumnValue {
            column_id: ids.column_id.clone().unwrap_or_default(),
            value: body.value,
        },
        insert_at: None,
        created_by: Some(UserRef::from(&identity)),
    };
    run(&service, &ids.board_id, operation, &identity, "Failed to add column value").await
}

/// PUT /boards/{board_id}/log and POST .../task/{task_id}/update
pub async fn append_log(
    State(service): State<Arc<BoardService>>,
    AuthUser(identity): AuthUser,
    Path(ids): Path<RouteIds>,
    JsonBody(entry): JsonBody<LogDraft>,
) -> BoardReply {
    let parent = ids.segments().into_parent().map_err(invalid_route)?;
    let context = match parent {
        ParentPath::Board => "Failed to add activity",
        _ => "Failed to add update",
    };
    let operation = Operation::AppendLog {
        parent,
        entry,
        author: Some(UserRef::from(&identity)),
    };
    run(&service, &ids.board_id, operation, &identity, context).await
}
