//! Shared Module
//!
//! Types used by both the engine and the backend. Everything here
//! serializes to the camelCase JSON the HTTP API speaks.

/// Board aggregate, entities and drafts
pub mod board;

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use board::{Board, BoardSummary, EntityKind, Identity};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{BoardError, BoardResult};
pub use event::{BoardEvent, EventType};
