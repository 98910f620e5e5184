//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion into
//! responses.
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and the status code mapping
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::{status_for, BackendError};
