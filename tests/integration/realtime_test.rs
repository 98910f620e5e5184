//! Realtime integration tests: mutations through the router publish on the
//! state's broadcast channel, and `/realtime` streams them as SSE.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use boardsync::backend::realtime::broadcast_event;
use boardsync::shared::board::Board;
use boardsync::shared::event::{BoardEvent, EventType};
use futures_util::StreamExt;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{timeout, Duration};
use tower::ServiceExt;

use crate::common::http::{create_sprint, send, test_app};

#[tokio::test]
async fn test_mutation_publishes_snapshot() {
    let (app, state) = test_app();
    let board_id = create_sprint(&app).await;
    let mut rx = state.realtime_broadcast.subscribe();

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/boards/{board_id}/group"),
        Some(json!({ "group": { "title": "Later" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.event_type, EventType::BoardUpdate);
    assert_eq!(event.board_id.as_deref(), Some(board_id.as_str()));
    assert_eq!(event.user_id.as_deref(), Some("u1"));
    assert_eq!(event.data["version"], 2);
    assert_eq!(event.data["groups"][2]["title"], "Later");
}

#[tokio::test]
async fn test_failed_mutation_publishes_nothing() {
    let (app, state) = test_app();
    let board_id = create_sprint(&app).await;
    let mut rx = state.realtime_broadcast.subscribe();

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/boards/{board_id}/group/missing"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_board_create_publishes_board_list() {
    let (app, state) = test_app();
    let mut rx = state.realtime_broadcast.subscribe();

    create_sprint(&app).await;

    assert_eq!(rx.try_recv().unwrap().event_type, EventType::BoardUpdate);
    let list = rx.try_recv().unwrap();
    assert_eq!(list.event_type, EventType::MiniBoardsUpdate);
    assert_eq!(list.account.as_deref(), Some("acme"));
    assert_eq!(list.data[0]["title"], "Sprint");
}

#[tokio::test]
async fn test_sse_stream_filters_by_board() {
    let (app, state) = test_app();
    let watched = Board::new("Watched", "acme");
    let other = Board::new("Other", "acme");

    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/realtime?board={}&types=board-update", watched.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    broadcast_event(&state.realtime_broadcast, BoardEvent::board_update(&other, None));
    broadcast_event(&state.realtime_broadcast, BoardEvent::board_update(&watched, None));

    let mut body = response.into_body().into_data_stream();
    let chunk = timeout(Duration::from_secs(2), body.next())
        .await
        .expect("no event within timeout")
        .expect("stream ended")
        .unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();

    assert!(text.starts_with("event: board-update\n"), "unexpected frame: {text}");
    assert!(text.contains(&watched.id));
    assert!(!text.contains(&other.id));
}
