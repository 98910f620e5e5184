//! Router tests: every request goes through the full axum stack.

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::http::{create_sprint, send, send_as, test_app};

fn ids(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = send_as(&app, None, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let (app, _) = test_app();
    let (status, body) = send_as(&app, None, Method::GET, "/boards", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_create_load_and_list() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, board) = send(&app, Method::GET, &format!("/boards/{board_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["title"], "Sprint");
    assert_eq!(board["account"], "acme");
    assert_eq!(board["version"], 1);
    assert_eq!(ids(&board["groups"]), vec!["todo", "doing"]);

    let (status, list) = send(&app, Method::GET, "/boards", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec![board_id.as_str()]);

    let (_, other) = send(&app, Method::GET, "/boards?account=elsewhere", None).await;
    assert_eq!(other, json!([]));
}

#[tokio::test]
async fn test_unknown_board_is_not_found() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/boards/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Failed to load board");
}

#[tokio::test]
async fn test_create_group_on_top() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, board) = send(
        &app,
        Method::POST,
        &format!("/boards/{board_id}/group"),
        Some(json!({ "group": { "id": "backlog", "title": "Backlog" }, "isTop": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&board["groups"]), vec!["backlog", "todo", "doing"]);
    assert_eq!(board["groups"][2]["position"], 2);
    assert_eq!(board["version"], 2);
}

#[tokio::test]
async fn test_create_task_in_missing_group() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/boards/{board_id}/group/nope/task"),
        Some(json!({ "task": { "title": "Lost" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Failed to add task");
}

#[tokio::test]
async fn test_move_task_between_groups() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, board) = send(
        &app,
        Method::PUT,
        &format!("/boards/{board_id}/task/t1"),
        Some(json!({ "fromGroupId": "todo", "toGroupId": "doing", "toIndex": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&board["groups"][0]["tasks"]), vec!["t2"]);
    assert_eq!(board["groups"][0]["tasks"][0]["position"], 0);
    assert_eq!(ids(&board["groups"][1]["tasks"]), vec!["t1"]);
}

#[tokio::test]
async fn test_reposition_group_and_label() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, board) = send(
        &app,
        Method::PUT,
        &format!("/boards/{board_id}/group/doing/position"),
        Some(json!({ "toIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&board["groups"]), vec!["doing", "todo"]);

    let (status, board) = send(
        &app,
        Method::PUT,
        &format!("/boards/{board_id}/column/status/label/stuck/position"),
        Some(json!({ "toIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&board["columns"][0]["labels"]), vec!["stuck", "done"]);
}

#[tokio::test]
async fn test_update_entities() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, board) = send(
        &app,
        Method::PUT,
        &format!("/boards/{board_id}"),
        Some(json!({ "title": "Sprint 2", "isStarred": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["title"], "Sprint 2");
    assert_eq!(board["isStarred"], true);

    let (status, board) = send(
        &app,
        Method::PUT,
        &format!("/boards/{board_id}/group/todo/task/t2"),
        Some(json!({ "title": "Review PR" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["groups"][0]["tasks"][1]["title"], "Review PR");
    assert_eq!(board["modifiedBy"]["userId"], "u1");
}

#[tokio::test]
async fn test_patch_errors_map_to_status() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;
    let task = format!("/boards/{board_id}/group/todo/task/t1");

    let (status, body) = send(&app, Method::PUT, &task, Some(json!({ "createdAt": "now" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Failed to update task");

    let (status, _) = send(&app, Method::PUT, &task, Some(json!({ "id": "t9" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::PUT, &task, Some(json!({ "color": "red" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, board) = send(&app, Method::GET, &format!("/boards/{board_id}"), None).await;
    assert_eq!(board["version"], 1);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/boards/{board_id}/group"),
        Some(json!({ "group": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request body", "status": 400 }));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/boards/reorder",
        Some(json!({ "boardId": board_id, "toIndex": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");

    let (_, board) = send(&app, Method::GET, &format!("/boards/{board_id}"), None).await;
    assert_eq!(board["version"], 1);
    assert_eq!(board["groups"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_patch_must_be_an_object() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;
    let task = format!("/boards/{board_id}/group/todo/task/t1");

    for patch in [json!([1, 2]), json!("title"), json!(null)] {
        let (status, body) = send(&app, Method::PUT, &task, Some(patch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Invalid request body");
    }

    let (_, board) = send(&app, Method::GET, &format!("/boards/{board_id}"), None).await;
    assert_eq!(board["version"], 1);
}

#[tokio::test]
async fn test_column_value_lifecycle() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;
    let value = format!("/boards/{board_id}/group/todo/task/t2/columnValue/notes");

    let (status, board) = send(&app, Method::POST, &value, Some(json!({ "value": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["groups"][0]["tasks"][1]["columnValues"]["notes"], "hello");

    let (status, _) = send(&app, Method::POST, &value, Some(json!({ "value": "again" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, board) = send(&app, Method::PUT, &value, Some(json!({ "value": "bye" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["groups"][0]["tasks"][1]["columnValues"]["notes"], "bye");

    let (status, body) = send(&app, Method::DELETE, &value, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "removedId": "notes" }));

    let (status, _) = send(&app, Method::DELETE, &value, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_value_must_be_a_label() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/boards/{board_id}/group/todo/task/t1/columnValue/status"),
        Some(json!({ "value": "unknown" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_label_and_column() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/boards/{board_id}/column/status/label/done"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removedId"], "done");

    let (_, board) = send(&app, Method::GET, &format!("/boards/{board_id}"), None).await;
    assert_eq!(board["groups"][0]["tasks"][0]["columnValues"]["status"], Value::Null);

    send(&app, Method::DELETE, &format!("/boards/{board_id}/column/status"), None).await;
    let (_, board) = send(&app, Method::GET, &format!("/boards/{board_id}"), None).await;
    assert!(board["groups"][0]["tasks"][0]["columnValues"].get("status").is_none());
    assert_eq!(ids(&board["columns"]), vec!["notes"]);
}

#[tokio::test]
async fn test_remove_task_twice() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;
    let task = format!("/boards/{board_id}/group/todo/task/t1");

    let (status, body) = send(&app, Method::DELETE, &task, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removedId"], "t1");

    let (status, body) = send(&app, Method::DELETE, &task, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Failed to remove task");
}

#[tokio::test]
async fn test_logs() {
    let (app, _) = test_app();
    let board_id = create_sprint(&app).await;

    let (status, board) = send(
        &app,
        Method::PUT,
        &format!("/boards/{board_id}/log"),
        Some(json!({ "text": "Board renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["activities"][0]["text"], "Board renamed");
    assert_eq!(board["activities"][0]["author"]["userId"], "u1");

    let (status, board) = send(
        &app,
        Method::POST,
        &format!("/boards/{board_id}/group/todo/task/t1/update"),
        Some(json!({ "text": "Half done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let update_id = board["groups"][0]["tasks"][0]["updates"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/boards/{board_id}/group/todo/task/t1/update/{update_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removedId"], update_id.as_str());

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/boards/{board_id}/group/todo/task/t1/update"),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reorder_and_remove_boards() {
    let (app, _) = test_app();
    let first = create_sprint(&app).await;
    let (_, second) = send(&app, Method::POST, "/boards", Some(json!({ "title": "Ops" }))).await;
    let second = second["id"].as_str().unwrap().to_string();

    let (status, list) = send(
        &app,
        Method::PUT,
        "/boards/reorder",
        Some(json!({ "boardId": second, "toIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec![second.as_str(), first.as_str()]);
    assert_eq!(list[1]["position"], 1);

    let (status, body) = send(&app, Method::DELETE, &format!("/boards/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removedId"], first.as_str());

    let (_, list) = send(&app, Method::GET, "/boards", None).await;
    assert_eq!(ids(&list), vec![second.as_str()]);
    assert_eq!(list[0]["position"], 0);
}
