//! Real-time Update Module
//!
//! Board changes reach connected clients through Server-Sent Events.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - ChangeNotifier and the broadcast channel
//! └── subscription.rs - SSE subscription handler
//! ```
//!
//! # Event Types
//!
//! - `board-update` - full snapshot of a changed board
//! - `mini-boards-update` - an account's board list after a board-level change
//!
//! Clients filter with `?board=<id>` and `?types=board-update,...`.

/// Event broadcasting utilities
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

pub use broadcast::{broadcast_event, BoardEventBroadcast, BroadcastNotifier, ChangeNotifier};
pub use subscription::{handle_realtime_subscription, SubscriptionFilter};
