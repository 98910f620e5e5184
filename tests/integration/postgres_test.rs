//! PostgreSQL store tests
//!
//! Ignored by default: they need a reachable database in `DATABASE_URL`.

use assert_matches::assert_matches;
use boardsync::backend::store::{BoardStore, PgBoardStore};
use boardsync::engine::{apply, build_board};
use boardsync::shared::board::Identity;
use boardsync::shared::error::BoardError;

use crate::common::database::{cleanup_account, create_test_pool};
use crate::common::{add_task, sprint_draft, task_ids};
use crate::assert_ok;

fn account() -> Identity {
    Identity::new("pg-user", format!("pg-test-{}", uuid::Uuid::new_v4().simple()))
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_load_save_roundtrip() {
    let pool = create_test_pool().await;
    let identity = account();
    let store = PgBoardStore::new(pool.clone());

    let board = assert_ok!(store.insert(assert_ok!(build_board(sprint_draft(), &identity))).await);
    assert_eq!(board.version, 1);

    let mut loaded = assert_ok!(store.load(&board.id).await);
    assert_eq!(loaded, board);

    assert_ok!(apply(&mut loaded, add_task("todo", "a")));
    let saved = assert_ok!(store.save(&loaded).await);
    assert_eq!(saved.version, 2);
    assert_eq!(task_ids(&saved, "todo"), vec!["t1", "t2", "a"]);

    // The copy still at version 1 is now stale.
    assert_matches!(
        store.save(&board).await,
        Err(BoardError::Conflict { expected: 1, found: 2, .. })
    );

    cleanup_account(&pool, &identity.account).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_reorder_remove() {
    let pool = create_test_pool().await;
    let identity = account();
    let store = PgBoardStore::new(pool.clone());

    let mut ids = Vec::new();
    for _ in 0..3 {
        let board = assert_ok!(build_board(sprint_draft(), &identity));
        ids.push(assert_ok!(store.insert(board).await).id);
    }

    let list = assert_ok!(store.reorder(&identity.account, &ids[2], 0).await);
    let order: Vec<_> = list.iter().map(|summary| summary.id.clone()).collect();
    assert_eq!(order, vec![ids[2].clone(), ids[0].clone(), ids[1].clone()]);

    assert_ok!(store.remove(&ids[0]).await);
    let list = assert_ok!(store.list(&identity.account).await);
    let positions: Vec<_> = list.iter().map(|summary| summary.position).collect();
    assert_eq!(positions, vec![0, 1]);

    assert_matches!(
        store.remove(&ids[0]).await,
        Err(BoardError::NotFound { .. })
    );

    cleanup_account(&pool, &identity.account).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_inserts_take_distinct_positions() {
    let pool = create_test_pool().await;
    let identity = account();
    let store = PgBoardStore::new(pool.clone());

    let inserts = (0..8).map(|_| {
        let store = store.clone();
        let identity = identity.clone();
        tokio::spawn(async move {
            let board = build_board(sprint_draft(), &identity)?;
            store.insert(board).await
        })
    });
    for handle in inserts.collect::<Vec<_>>() {
        assert_ok!(handle.await.unwrap());
    }

    let positions: Vec<i64> = sqlx::query_scalar(
        "SELECT position::BIGINT FROM boards WHERE account = $1 ORDER BY position",
    )
    .bind(&identity.account)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(positions, (0..8).collect::<Vec<i64>>());

    cleanup_account(&pool, &identity.account).await.unwrap();
}
