/**
 * Board Change Events
 *
 * This module defines the events published to connected clients after a
 * board mutation has been saved. Events carry full snapshots: the whole
 * updated board for `board-update`, the caller's board list for
 * `mini-boards-update`.
 *
 * Wire shape:
 *
 * ```json
 * { "type": "board-update", "data": { ... }, "userId": "u1", "boardId": "b1", "timestamp": "..." }
 * ```
 */
use serde::{Deserialize, Serialize};

use crate::shared::board::{Board, BoardSummary};

/// Type of board event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A board aggregate changed
    #[serde(rename = "board-update")]
    BoardUpdate,
    /// The board list of an account changed
    #[serde(rename = "mini-boards-update")]
    MiniBoardsUpdate,
}

impl EventType {
    /// Name used as the SSE event name and in `?types=` filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BoardUpdate => "board-update",
            Self::MiniBoardsUpdate => "mini-boards-update",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "board-update" => Some(Self::BoardUpdate),
            "mini-boards-update" => Some(Self::MiniBoardsUpdate),
            _ => None,
        }
    }
}

/// Event broadcast to all subscribers after a successful save
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardEvent {
    /// Type of event
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Snapshot payload
    pub data: serde_json::Value,
    /// User whose request produced the event
    pub user_id: Option<String>,
    /// Board the event concerns, when it concerns a single board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    /// Account the event concerns, for board-list events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Timestamp when the event was created (RFC3339)
    pub timestamp: String,
}

impl BoardEvent {
    pub fn new(event_type: EventType, data: serde_json::Value, user_id: Option<String>) -> Self {
        Self {
            event_type,
            data,
            user_id,
            board_id: None,
            account: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Full snapshot of an updated board.
    pub fn board_update(board: &Board, user_id: Option<String>) -> Self {
        let data = serde_json::to_value(board).unwrap_or(serde_json::Value::Null);
        let mut event = Self::new(EventType::BoardUpdate, data, user_id);
        event.board_id = Some(board.id.clone());
        event
    }

    /// Snapshot of an account's board list.
    pub fn mini_boards_update(
        account: &str,
        boards: &[BoardSummary],
        user_id: Option<String>,
    ) -> Self {
        let data = serde_json::to_value(boards).unwrap_or(serde_json::Value::Null);
        let mut event = Self::new(EventType::MiniBoardsUpdate, data, user_id);
        event.account = Some(account.to_string());
        event
    }

    /// Whether a subscriber scoped to `board_id` should see this event.
    ///
    /// Board-list events are not tied to one board and always match.
    pub fn concerns_board(&self, board_id: &str) -> bool {
        match &self.board_id {
            Some(id) => id == board_id,
            None => true,
        }
    }
}
