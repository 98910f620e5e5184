//! Route Configuration Module
//!
//! Configures all HTTP routes of the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Router assembly, layers and fallback
//! └── board_routes.rs - The `/boards` endpoints
//! ```
//!
//! # Route Types
//!
//! - `GET /health` - liveness
//! - `GET /realtime` - Server-Sent Events stream of board events
//! - `/boards/...` - board, group, task, column, label and value operations
//!
//! All `/boards` routes require the `x-user-id` header.

/// Main router creation
pub mod router;

/// Board endpoints
pub mod board_routes;

pub use router::create_router;
