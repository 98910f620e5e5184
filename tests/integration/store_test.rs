//! Store and service behaviour under concurrent writers.

use assert_matches::assert_matches;
use boardsync::backend::realtime::BroadcastNotifier;
use boardsync::backend::store::{BoardStore, MemoryBoardStore};
use boardsync::backend::BoardService;
use boardsync::engine::{apply, build_board};
use boardsync::shared::error::BoardError;
use std::sync::Arc;

use crate::common::{add_task, identity, other_identity, sprint_draft, task_ids};
use crate::assert_ok;

#[tokio::test]
async fn test_concurrent_saves_of_same_version() {
    let store = Arc::new(MemoryBoardStore::new());
    let board = assert_ok!(store.insert(assert_ok!(build_board(sprint_draft(), &identity()))).await);

    let mut first = assert_ok!(store.load(&board.id).await);
    let mut second = first.clone();
    assert_ok!(apply(&mut first, add_task("todo", "a")));
    assert_ok!(apply(&mut second, add_task("todo", "b")));

    let (left, right) = tokio::join!(
        {
            let store = store.clone();
            async move { store.save(&first).await }
        },
        {
            let store = store.clone();
            async move { store.save(&second).await }
        }
    );

    let results = [left, right];
    let saved: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    assert_eq!(saved.len(), 1);
    let conflict = results.iter().find(|r| r.is_err()).unwrap();
    assert_matches!(
        conflict,
        Err(BoardError::Conflict { expected: 1, found: 2, .. })
    );

    let stored = assert_ok!(store.load(&board.id).await);
    assert_eq!(stored.version, 2);
    assert_eq!(task_ids(&stored, "todo").len(), 3);
}

#[tokio::test]
async fn test_service_surfaces_conflict_without_retry() {
    let store = Arc::new(MemoryBoardStore::new());
    let notifier = BroadcastNotifier::new(16);
    let service = BoardService::new(store.clone(), Arc::new(notifier.clone()));
    let board = assert_ok!(service.create(sprint_draft(), &identity()).await);

    // A writer that loaded version 1 saves after the service already did.
    let mut stale = assert_ok!(store.load(&board.id).await);
    assert_ok!(service.apply(&board.id, add_task("todo", "a"), &other_identity()).await);
    assert_ok!(apply(&mut stale, add_task("todo", "b")));

    let mut rx = notifier.subscribe();
    assert_matches!(store.save(&stale).await, Err(BoardError::Conflict { .. }));
    assert!(rx.try_recv().is_err());

    let stored = assert_ok!(service.get(&board.id).await);
    assert_eq!(task_ids(&stored, "todo"), vec!["t1", "t2", "a"]);
}

#[tokio::test]
async fn test_sequential_service_writes_all_land() {
    let service = Arc::new(BoardService::new(
        Arc::new(MemoryBoardStore::new()),
        Arc::new(BroadcastNotifier::new(16)),
    ));
    let board = assert_ok!(service.create(sprint_draft(), &identity()).await);

    for id in ["a", "b", "c"] {
        assert_ok!(service.apply(&board.id, add_task("doing", id), &identity()).await);
    }

    let stored = assert_ok!(service.get(&board.id).await);
    assert_eq!(stored.version, 4);
    assert_eq!(task_ids(&stored, "doing"), vec!["a", "b", "c"]);
}
