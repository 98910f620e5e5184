//! Board Error Types
//!
//! This module defines the error taxonomy of the board mutation engine and the
//! aggregate store. Errors are typed so the transport layer can map each kind
//! to a status code without inspecting messages.
//!
//! # Error Categories
//!
//! - `NotFound` - An id in a path does not match within its resolved scope
//! - `InvalidParent` - The parent of a create/move does not resolve
//! - `ImmutableField` - A patch touches a field that cannot change
//! - `Conflict` - The aggregate was saved by someone else since it was loaded
//! - `Validation` - The operation payload is malformed
//! - `Storage` - The persistence transport failed
//!
//! # Usage
//!
//! ```rust
//! use boardsync::shared::error::BoardError;
//! use boardsync::shared::board::EntityKind;
//!
//! let error = BoardError::not_found(EntityKind::Task, "t1");
//! assert_eq!(error.to_string(), "task not found: t1");
//! ```
use crate::shared::board::EntityKind;
use thiserror::Error;

/// Errors surfaced by the mutation engine and the board store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A path segment did not match inside its scope
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the entity that was looked up
        kind: EntityKind,
        /// The id that did not match
        id: String,
    },

    /// The parent collection of a create or move does not exist
    #[error("invalid parent {kind}: {id}")]
    InvalidParent {
        /// Kind of the parent that was looked up
        kind: EntityKind,
        /// The parent id that did not match
        id: String,
    },

    /// A patch tried to change an immutable field
    #[error("field '{field}' is immutable")]
    ImmutableField {
        /// The offending field name
        field: String,
    },

    /// Optimistic concurrency check failed on save
    #[error("board {board_id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        board_id: String,
        /// Version the caller loaded
        expected: u64,
        /// Version currently stored
        found: u64,
    },

    /// Malformed operation payload
    #[error("validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Persistence transport failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl BoardError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_parent(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::InvalidParent {
            kind,
            id: id.into(),
        }
    }

    pub fn immutable(field: impl Into<String>) -> Self {
        Self::ImmutableField {
            field: field.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation("payload", format!("JSON error: {}", err))
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
