/**
 * Board Service
 *
 * Runs every board mutation as load, apply, save, publish:
 *
 * 1. `store.load` fetches the aggregate with its version
 * 2. `engine::apply` mutates it in memory
 * 3. `store.save` persists it (compare-and-swap on the version)
 * 4. the notifier fans the new snapshot out to subscribers
 *
 * A failure in steps 1-3 returns the error and publishes nothing. Publishing
 * itself can never fail a mutation. The service performs no retries: a
 * `Conflict` goes back to the caller.
 */
use std::sync::Arc;

use crate::backend::realtime::ChangeNotifier;
use crate::backend::store::BoardStore;
use crate::engine::{self, Effect, EntityPath, Operation};
use crate::shared::board::{Board, BoardDraft, BoardSummary, Identity, UserRef};
use crate::shared::error::BoardResult;
use crate::shared::event::BoardEvent;

pub struct BoardService {
    store: Arc<dyn BoardStore>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn list(&self, account: &str) -> BoardResult<Vec<BoardSummary>> {
        self.store.list(account).await
    }

    pub async fn get(&self, board_id: &str) -> BoardResult<Board> {
        self.store.load(board_id).await
    }

    /// Build a board from a draft and store it in the caller's account.
    pub async fn create(&self, draft: BoardDraft, identity: &Identity) -> BoardResult<Board> {
        let board = engine::build_board(draft, identity)?;
        let board = self.store.insert(board).await?;
        tracing::info!(
            "[Board] Created board {} for account {} by {}",
            board.id,
            board.account,
            identity.display_name()
        );
        self.notify_board(&board, identity);
        self.notify_board_list(&board.account, identity).await;
        Ok(board)
    }

    /// Apply one engine operation to a stored board.
    pub async fn apply(
        &self,
        board_id: &str,
        operation: Operation,
        identity: &Identity,
    ) -> BoardResult<(Board, Effect)> {
        let mut board = self.store.load(board_id).await?;
        let name = operation.name();
        let board_level = matches!(
            &operation,
            Operation::Update {
                path: EntityPath::Board,
                ..
            }
        );

        let effect = engine::apply(&mut board, operation)?;
        board.modified_by = Some(UserRef::from(identity));
        let saved = self.store.save(&board).await?;

        tracing::info!(
            "[Board] {} {} {} on board {} (version {}) by {}",
            name,
            effect.kind(),
            effect.id(),
            saved.id,
            saved.version,
            identity.display_name()
        );
        self.notify_board(&saved, identity);
        if board_level {
            self.notify_board_list(&saved.account, identity).await;
        }
        Ok((saved, effect))
    }

    /// Delete a board. Returns the removed board id.
    pub async fn remove(&self, board_id: &str, identity: &Identity) -> BoardResult<String> {
        let removed = self.store.remove(board_id).await?;
        tracing::info!("[Board] Removed board {} by {}", removed.id, identity.display_name());
        self.notify_board_list(&removed.account, identity).await;
        Ok(removed.id)
    }

    /// Move a board within the caller's account list.
    pub async fn reorder(
        &self,
        identity: &Identity,
        board_id: &str,
        to_index: usize,
    ) -> BoardResult<Vec<BoardSummary>> {
        let boards = self
            .store
            .reorder(&identity.account, board_id, to_index)
            .await?;
        tracing::info!(
            "[Board] Moved board {} to index {} in account {}",
            board_id,
            to_index,
            identity.account
        );
        self.notifier.publish(BoardEvent::mini_boards_update(
            &identity.account,
            &boards,
            Some(identity.user_id.clone()),
        ));
        Ok(boards)
    }

    fn notify_board(&self, board: &Board, identity: &Identity) {
        self.notifier
            .publish(BoardEvent::board_update(board, Some(identity.user_id.clone())));
    }

    async fn notify_board_list(&self, account: &str, identity: &Identity) {
        match self.store.list(account).await {
            Ok(boards) => {
                self.notifier.publish(BoardEvent::mini_boards_update(
                    account,
                    &boards,
                    Some(identity.user_id.clone()),
                ));
            }
            Err(e) => {
                tracing::warn!("[Realtime] Skipping board list event for {}: {}", account, e);
            }
        }
    }
}
