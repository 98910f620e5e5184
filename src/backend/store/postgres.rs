/**
 * PostgreSQL Board Store
 *
 * Each board is one row of the `boards` table: the aggregate as a JSONB
 * document plus the `version` token and the list `position` kept beside it.
 * The version check of `save` happens inside the `UPDATE ... WHERE version =`
 * statement, so two writers racing on the same version cannot both win.
 *
 * Statements that assign or shift `position` first take a transaction-level
 * advisory lock on the account, so concurrent inserts never pick the same
 * slot. `UNIQUE (account, position)` is checked at commit as a backstop.
 */
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::backend::store::BoardStore;
use crate::shared::board::{Board, BoardSummary, EntityKind};
use crate::shared::error::{BoardError, BoardResult};

impl From<sqlx::Error> for BoardError {
    fn from(err: sqlx::Error) -> Self {
        BoardError::storage(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct PgBoardStore {
    pool: PgPool,
}

impl PgBoardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn from_db_version(version: i64) -> BoardResult<u64> {
    u64::try_from(version).map_err(|_| BoardError::storage(format!("stored version {version} is negative")))
}

fn with_version(Json(mut board): Json<Board>, version: i64) -> BoardResult<Board> {
    board.version = from_db_version(version)?;
    Ok(board)
}

fn as_db_version(version: u64) -> BoardResult<i64> {
    i64::try_from(version).map_err(|_| BoardError::storage(format!("version {version} out of range")))
}

/// Serialize position changes within one account until the transaction ends.
async fn lock_account(tx: &mut Transaction<'_, Postgres>, account: &str) -> BoardResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(account)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl BoardStore for PgBoardStore {
    async fn load(&self, board_id: &str) -> BoardResult<Board> {
        let row = sqlx::query_as::<_, (Json<Board>, i64)>(
            r#"
            SELECT doc, version
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(board_id)
        .fetch_optional(&self.pool)
        .await?;

        let (doc, version) = row.ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))?;
        with_version(doc, version)
    }

    async fn save(&self, board: &Board) -> BoardResult<Board> {
        let expected = as_db_version(board.version)?;
        let mut saved = board.clone();
        saved.version = board.version + 1;

        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE boards
            SET doc = $2, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $3
            RETURNING version
            "#,
        )
        .bind(&board.id)
        .bind(Json(&saved))
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_some() {
            tracing::debug!("[Store] Saved board {} at version {}", saved.id, saved.version);
            return Ok(saved);
        }

        let found = sqlx::query_scalar::<_, i64>("SELECT version FROM boards WHERE id = $1")
            .bind(&board.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, &board.id))?;

        tracing::warn!(
            "[Store] Version conflict on board {}: expected {}, found {}",
            board.id,
            board.version,
            found
        );
        Err(BoardError::Conflict {
            board_id: board.id.clone(),
            expected: board.version,
            found: from_db_version(found)?,
        })
    }

    async fn insert(&self, mut board: Board) -> BoardResult<Board> {
        board.version = 1;
        let mut tx = self.pool.begin().await?;
        lock_account(&mut tx, &board.account).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO boards (id, account, doc, version, position)
            VALUES (
                $1, $2, $3, 1,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM boards WHERE account = $2)
            )
            "#,
        )
        .bind(&board.id)
        .bind(&board.account)
        .bind(Json(&board))
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {
                tx.commit().await?;
                tracing::debug!("[Store] Inserted board {} for account {}", board.id, board.account);
                Ok(board)
            }
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Err(
                BoardError::validation("id", format!("board {} already exists", board.id)),
            ),
            Err(err) => Err(err.into()),
        }
    }

    async fn remove(&self, board_id: &str) -> BoardResult<Board> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_scalar::<_, String>("SELECT account FROM boards WHERE id = $1")
            .bind(board_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))?;
        lock_account(&mut tx, &account).await?;

        let removed = sqlx::query_as::<_, (Json<Board>, i64, i32)>(
            r#"
            DELETE FROM boards
            WHERE id = $1
            RETURNING doc, version, position
            "#,
        )
        .bind(board_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))?;

        let (doc, version, position) = removed;
        let board = with_version(doc, version)?;

        sqlx::query(
            r#"
            UPDATE boards
            SET position = position - 1
            WHERE account = $1 AND position > $2
            "#,
        )
        .bind(&board.account)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!("[Store] Removed board {}", board_id);
        Ok(board)
    }

    async fn list(&self, account: &str) -> BoardResult<Vec<BoardSummary>> {
        let rows = sqlx::query_as::<_, (Json<Board>, i64)>(
            r#"
            SELECT doc, version
            FROM boards
            WHERE account = $1
            ORDER BY position ASC
            "#,
        )
        .bind(account)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .enumerate()
            .map(|(position, (doc, version))| {
                with_version(doc, version).map(|board| board.summary(position))
            })
            .collect()
    }

    async fn reorder(
        &self,
        account: &str,
        board_id: &str,
        to_index: usize,
    ) -> BoardResult<Vec<BoardSummary>> {
        let mut tx = self.pool.begin().await?;
        lock_account(&mut tx, account).await?;

        let mut ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT id
            FROM boards
            WHERE account = $1
            ORDER BY position ASC
            FOR UPDATE
            "#,
        )
        .bind(account)
        .fetch_all(&mut *tx)
        .await?;

        let from = ids
            .iter()
            .position(|id| id == board_id)
            .ok_or_else(|| BoardError::not_found(EntityKind::Board, board_id))?;
        let id = ids.remove(from);
        let index = to_index.min(ids.len());
        ids.insert(index, id);

        for (position, id) in ids.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| BoardError::storage("board list too long"))?;
            sqlx::query("UPDATE boards SET position = $2 WHERE id = $1")
                .bind(id)
                .bind(position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.list(account).await
    }
}
