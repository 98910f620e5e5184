/**
 * In-Memory Board Store
 *
 * Boards live in a `HashMap` behind a `tokio::sync::RwLock`, with a separate
 * per-account id list holding board order. Nothing survives a restart; this
 * store backs local development and the test suite.
 */
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::backend::store::BoardStore;
use crate::shared::board::{Board, BoardSummary, EntityKind};
use crate::shared::error::{BoardError, BoardResult};

#[derive(Debug, Default)]
struct Inner {
    boards: HashMap<String, Board>,
    /// account -> board ids in list order
    order: HashMap<String, Vec<String>>,
}

impl Inner {
    fn summaries(&self, account: &str) -> Vec<BoardSummary> {
        self.order
            .get(account)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.boards.get(id))
                    .enumerate()
                    .map(|(position, board)| board.summary(position))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct MemoryBoardStore {
    inner: RwLock<Inner>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn load(&self, board_id: &str) -> BoardResult<Board> {
        self.inner
            .read()
            .await
            .boards
            .get(board_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))
    }

    async fn save(&self, board: &Board) -> BoardResult<Board> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .boards
            .get_mut(&board.id)
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, &board.id))?;

        if stored.version != board.version {
            tracing::warn!(
                "[Store] Version conflict on board {}: expected {}, found {}",
                board.id,
                board.version,
                stored.version
            );
            return Err(BoardError::Conflict {
                board_id: board.id.clone(),
                expected: board.version,
                found: stored.version,
            });
        }

        let mut saved = board.clone();
        saved.version += 1;
        *stored = saved.clone();
        tracing::debug!("[Store] Saved board {} at version {}", saved.id, saved.version);
        Ok(saved)
    }

    async fn insert(&self, mut board: Board) -> BoardResult<Board> {
        let mut inner = self.inner.write().await;
        if inner.boards.contains_key(&board.id) {
            return Err(BoardError::validation(
                "id",
                format!("board {} already exists", board.id),
            ));
        }
        board.version = 1;
        inner
            .order
            .entry(board.account.clone())
            .or_default()
            .push(board.id.clone());
        inner.boards.insert(board.id.clone(), board.clone());
        tracing::debug!("[Store] Inserted board {} for account {}", board.id, board.account);
        Ok(board)
    }

    async fn remove(&self, board_id: &str) -> BoardResult<Board> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .boards
            .remove(board_id)
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))?;
        if let Some(ids) = inner.order.get_mut(&removed.account) {
            ids.retain(|id| id != board_id);
        }
        tracing::debug!("[Store] Removed board {}", board_id);
        Ok(removed)
    }

    async fn list(&self, account: &str) -> BoardResult<Vec<BoardSummary>> {
        Ok(self.inner.read().await.summaries(account))
    }

    async fn reorder(
        &self,
        account: &str,
        board_id: &str,
        to_index: usize,
    ) -> BoardResult<Vec<BoardSummary>> {
        let mut inner = self.inner.write().await;
        let ids = inner
            .order
            .get_mut(account)
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))?;
        let from = ids
            .iter()
            .position(|id| id == board_id)
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))?;
        let id = ids.remove(from);
        let index = to_index.min(ids.len());
        ids.insert(index, id);
        Ok(inner.summaries(account))
    }
}
