//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - configuration loading and the database pool
//! - **`init`** - store selection and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading (file, env, database)
//! └── init.rs         - Server initialization and app creation
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::load_config;
pub use init::{create_app, create_app_with_store};
pub use state::AppState;
