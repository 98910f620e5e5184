//! Board Aggregate Store
//!
//! The store loads and saves whole board aggregates and keeps each account's
//! board list order. Board order lives in store metadata, not in the board
//! document, so reordering never races with document saves.
//!
//! # Concurrency
//!
//! `save` is a compare-and-swap on `Board::version`: it succeeds only when the
//! stored version equals the version of the board being saved, and bumps it.
//! Otherwise it fails with `BoardError::Conflict`. Stores never retry.
//!
//! # Implementations
//!
//! - **`memory`** - `MemoryBoardStore`, used when no database is configured
//! - **`postgres`** - `PgBoardStore`, JSONB documents in PostgreSQL

use async_trait::async_trait;

use crate::shared::board::{Board, BoardSummary};
use crate::shared::error::BoardResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryBoardStore;
pub use postgres::PgBoardStore;

/// Persistence for board aggregates.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Load a board with its current version.
    async fn load(&self, board_id: &str) -> BoardResult<Board>;

    /// Persist `board` if nobody saved it since it was loaded.
    ///
    /// Returns the persisted copy carrying its new version.
    async fn save(&self, board: &Board) -> BoardResult<Board>;

    /// Store a new board at the end of its account's list.
    async fn insert(&self, board: Board) -> BoardResult<Board>;

    /// Delete a board, returning the removed document.
    async fn remove(&self, board_id: &str) -> BoardResult<Board>;

    /// Board summaries of an account, in list order.
    async fn list(&self, account: &str) -> BoardResult<Vec<BoardSummary>>;

    /// Move a board to `to_index` (clamped) within its account's list.
    async fn reorder(
        &self,
        account: &str,
        board_id: &str,
        to_index: usize,
    ) -> BoardResult<Vec<BoardSummary>>;
}
