/**
 * Application State Management
 *
 * Defines the application state and the `FromRef` implementations that let
 * handlers extract only the part they need.
 *
 * # State
 *
 * - `boards` - the board service (store plus change notifier)
 * - `realtime_broadcast` - sender side of the board event channel, used by
 *   `/realtime` to subscribe
 * - `config` - the loaded configuration
 *
 * Every field is cheap to clone; Axum clones the state per request.
 */
use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::boards::BoardService;
use crate::backend::realtime::{BoardEventBroadcast, BroadcastNotifier};
use crate::backend::store::BoardStore;
use crate::shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<BoardService>,
    pub realtime_broadcast: BoardEventBroadcast,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire a store to a fresh broadcast channel sized from the config.
    pub fn new(config: AppConfig, store: Arc<dyn BoardStore>) -> Self {
        let notifier = BroadcastNotifier::new(config.broadcast_capacity);
        let realtime_broadcast = notifier.sender();
        Self {
            boards: Arc::new(BoardService::new(store, Arc::new(notifier))),
            realtime_broadcast,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<BoardService> {
    fn from_ref(state: &AppState) -> Self {
        state.boards.clone()
    }
}

impl FromRef<AppState> for BoardEventBroadcast {
    fn from_ref(state: &AppState) -> Self {
        state.realtime_broadcast.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
