//! boardsync - Collaborative Board Backend
//!
//! Boards hold groups of tasks, typed columns with labels, and per-task
//! column values. Every change is a typed operation applied to the whole
//! board aggregate, persisted with optimistic concurrency and fanned out to
//! subscribers as a full snapshot.
//!
//! # Module Structure
//!
//! - **`shared`** - data model, events, errors and configuration
//! - **`engine`** - pure, synchronous board mutations
//!   - path resolution scoped to the parent subtree
//!   - create, update, remove, move and log operations
//!   - dense ordering and reference cascades
//! - **`backend`** - Axum server (only compiled with `ssr`)
//!   - board service (load, apply, save, publish)
//!   - PostgreSQL and in-memory stores
//!   - Server-Sent Events for realtime updates
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend module and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use boardsync::engine::{apply, NewEntity, Operation, ParentPath};
//! use boardsync::shared::board::{Board, GroupDraft};
//!
//! let mut board = Board::new("Sprint", "acme");
//! let effect = apply(
//!     &mut board,
//!     Operation::Create {
//!         parent: ParentPath::Board,
//!         draft: NewEntity::Group(GroupDraft::default()),
//!         insert_at: None,
//!         created_by: None,
//!     },
//! )?;
//! assert_eq!(board.groups[0].id, effect.id());
//! # Ok::<(), boardsync::shared::error::BoardError>(())
//! ```

/// Shared types and data structures
pub mod shared;

/// Board mutation engine
pub mod engine;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
