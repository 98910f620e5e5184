//! Backend Module
//!
//! Server-side code: the Axum HTTP server around the board engine. Only
//! compiled with the `ssr` feature.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization, state and configuration
//! ├── routes/         - Route configuration
//! ├── boards/         - Board service and HTTP handlers
//! ├── store/          - BoardStore trait, PostgreSQL and memory stores
//! ├── realtime/       - Event broadcasting and SSE subscriptions
//! ├── middleware/     - Caller identity extraction
//! └── error/          - Backend error type and HTTP mapping
//! ```
//!
//! # Request Flow
//!
//! A mutating request is authenticated from trusted headers, translated to
//! an engine `Operation`, applied by `BoardService` to the loaded board and
//! saved with a version check. Only after the save succeeds is the new
//! snapshot published on the broadcast channel.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Board service and handlers
pub mod boards;

/// Board persistence
pub mod store;

/// Real-time update system
pub mod realtime;

/// Backend error types
pub mod error;

/// Middleware for request processing
pub mod middleware;

pub use boards::BoardService;
pub use error::BackendError;
pub use realtime::{broadcast_event, handle_realtime_subscription, BoardEventBroadcast};
pub use server::create_app;
pub use store::BoardStore;
