/**
 * Real-time Subscription Handler
 *
 * Implements `GET /realtime`, a Server-Sent Events stream of board events.
 *
 * # Query Parameters
 *
 * - `board` - only events concerning this board id (board-list events are
 *   always delivered)
 * - `types` - comma-separated event names, e.g. `?types=board-update`
 *
 * # Connection Management
 *
 * - Connections are kept alive with SSE comment lines
 * - Lagged receivers log the number of skipped events and keep streaming
 * - The stream ends when the broadcast channel closes
 */
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use std::collections::HashMap;
use tokio::sync::broadcast::error::RecvError;

use crate::backend::realtime::broadcast::BoardEventBroadcast;
use crate::shared::event::{BoardEvent, EventType};

/// Which events a subscriber wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub board: Option<String>,
    pub types: Option<Vec<EventType>>,
}

impl SubscriptionFilter {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let board = query
            .get("board")
            .map(|board| board.trim().to_string())
            .filter(|board| !board.is_empty());
        let types = query
            .get("types")
            .map(|names| names.split(',').filter_map(EventType::parse).collect::<Vec<_>>())
            .filter(|types| !types.is_empty());
        Self { board, types }
    }

    pub fn matches(&self, event: &BoardEvent) -> bool {
        if let Some(types) = &self.types {
            if !types.contains(&event.event_type) {
                return false;
            }
        }
        match &self.board {
            Some(board_id) => event.concerns_board(board_id),
            None => true,
        }
    }
}

/// Handle real-time subscription (GET /realtime)
pub async fn handle_realtime_subscription(
    State(broadcast_tx): State<BoardEventBroadcast>,
    Query(query): Query<HashMap<String, String>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let filter = SubscriptionFilter::from_query(&query);
    tracing::info!("[Realtime] Subscription opened with filter {:?}", filter);

    let broadcast_rx = broadcast_tx.subscribe();

    // Only real events are yielded; keep-alive comments are injected by axum.
    let stream = stream::unfold((broadcast_rx, filter), |(mut rx, filter)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if !filter.matches(&event) {
                        continue;
                    }
                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                            continue;
                        }
                    };
                    let sse_event = Event::default()
                        .event(event.event_type.as_str())
                        .data(data);
                    return Some((Ok(sse_event), (rx, filter)));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::warn!("[Realtime] Broadcast channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
