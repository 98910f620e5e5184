/**
 * Board Event Broadcasting
 *
 * Events are fanned out with `tokio::sync::broadcast`: every connected SSE
 * subscriber holds a receiver and gets a copy of each event. Publishing is a
 * non-blocking send; having no subscribers is not an error.
 */
use tokio::sync::broadcast;

use crate::shared::event::BoardEvent;

/// Sender half of the board event channel, shared through `AppState`.
pub type BoardEventBroadcast = broadcast::Sender<BoardEvent>;

/// Post-save hook receiving every successfully persisted change.
pub trait ChangeNotifier: Send + Sync {
    /// Publish an event; returns how many subscribers received it.
    fn publish(&self, event: BoardEvent) -> usize;
}

/// `ChangeNotifier` backed by the broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: BoardEventBroadcast,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn sender(&self) -> BoardEventBroadcast {
        self.sender.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn publish(&self, event: BoardEvent) -> usize {
        broadcast_event(&self.sender, event)
    }
}

/// Broadcast an event to all subscribers.
///
/// Returns the number of subscribers that received it (0 if none).
pub fn broadcast_event(broadcast_tx: &BoardEventBroadcast, event: BoardEvent) -> usize {
    let event_type = event.event_type;
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::info!(
                "[Realtime] {} broadcast to {} subscribers",
                event_type.as_str(),
                subscriber_count
            );
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers for {}", event_type.as_str());
            0
        }
    }
}
