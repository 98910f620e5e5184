/**
 * Board Routes
 *
 * Adds every `/boards` endpoint to the router. Path parameters use the
 * names of `RouteIds` so one extractor serves all nesting levels.
 *
 * # Routes
 *
 * ## Boards
 * - `GET /boards` - board list of an account
 * - `POST /boards` - create a board from a draft
 * - `PUT /boards/reorder` - move a board within the account list
 * - `GET | PUT | DELETE /boards/{board_id}`
 * - `PUT /boards/{board_id}/log` - append a board activity
 *
 * ## Groups, tasks and column values
 * - `POST /boards/{board_id}/group`
 * - `PUT | DELETE /boards/{board_id}/group/{group_id}`
 * - `PUT /boards/{board_id}/group/{group_id}/position`
 * - `POST /boards/{board_id}/group/{group_id}/task`
 * - `PUT | DELETE /boards/{board_id}/group/{group_id}/task/{task_id}`
 * - `PUT /boards/{board_id}/task/{task_id}` - move a task between groups
 * - `POST .../task/{task_id}/update`, `DELETE .../update/{update_id}`
 * - `POST | PUT | DELETE .../task/{task_id}/columnValue/{column_id}`
 *
 * ## Columns and labels
 * - `POST /boards/{board_id}/column`
 * - `PUT | DELETE /boards/{board_id}/column/{column_id}`
 * - `PUT /boards/{board_id}/column/{column_id}/position`
 * - `POST /boards/{board_id}/column/{column_id}/label`
 * - `PUT | DELETE /boards/{board_id}/column/{column_id}/label/{label_id}`
 * - `PUT .../label/{label_id}/position`
 */
use axum::{
    routing::{get, post, put},
    Router,
};

use crate::backend::boards::handlers::{
    append_log, create_board, create_column, create_column_value, create_group, create_label,
    create_task, get_board, list_boards, move_entity, move_task, remove_board, remove_entity,
    reorder_boards, update_entity,
};
use crate::backend::server::state::AppState;

const BOARD: &str = "/boards/{board_id}";
const GROUP: &str = "/boards/{board_id}/group/{group_id}";
const TASK: &str = "/boards/{board_id}/group/{group_id}/task/{task_id}";
const COLUMN: &str = "/boards/{board_id}/column/{column_id}";
const LABEL: &str = "/boards/{board_id}/column/{column_id}/label/{label_id}";

/// Configure the board routes
pub fn configure_board_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/boards", get(list_boards).post(create_board))
        .route("/boards/reorder", put(reorder_boards))
        .route(BOARD, get(get_board).put(update_entity).delete(remove_board))
        .route(&format!("{BOARD}/log"), put(append_log))
        // Groups
        .route(&format!("{BOARD}/group"), post(create_group))
        .route(GROUP, put(update_entity).delete(remove_entity))
        .route(&format!("{GROUP}/position"), put(move_entity))
        // Tasks
        .route(&format!("{GROUP}/task"), post(create_task))
        .route(TASK, put(update_entity).delete(remove_entity))
        .route("/boards/{board_id}/task/{task_id}", put(move_task))
        .route(&format!("{TASK}/update"), post(append_log))
        .route(
            &format!("{TASK}/update/{{update_id}}"),
            axum::routing::delete(remove_entity),
        )
        .route(
            &format!("{TASK}/columnValue/{{column_id}}"),
            post(create_column_value)
                .put(update_entity)
                .delete(remove_entity),
        )
        // Columns and labels
        .route(&format!("{BOARD}/column"), post(create_column))
        .route(COLUMN, put(update_entity).delete(remove_entity))
        .route(&format!("{COLUMN}/position"), put(move_entity))
        .route(&format!("{COLUMN}/label"), post(create_label))
        .route(LABEL, put(update_entity).delete(remove_entity))
        .route(&format!("{LABEL}/position"), put(move_entity))
}
