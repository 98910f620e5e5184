//! Property-based tests for ordering and id uniqueness

use boardsync::engine::{apply, build_board, EntityPath, NewEntity, Operation, ParentPath};
use boardsync::shared::board::{Board, GroupDraft};
use proptest::prelude::*;
use std::collections::HashSet;

use crate::common::{add_task, assert_dense_positions, identity, move_task, sprint_draft};

const GROUPS: [&str; 3] = ["todo", "doing", "done"];
const TASKS: [&str; 5] = ["t1", "t2", "t3", "t4", "t5"];

#[derive(Debug, Clone)]
enum Step {
    AddTask(usize, usize),
    AddGroup(usize, Option<usize>),
    RemoveTask(usize, usize),
    RemoveGroup(usize),
    MoveTask(usize, usize, usize, usize),
    MoveGroup(usize, usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..3usize, 0..5usize).prop_map(|(g, t)| Step::AddTask(g, t)),
        (0..3usize, proptest::option::of(0..6usize)).prop_map(|(g, at)| Step::AddGroup(g, at)),
        (0..3usize, 0..5usize).prop_map(|(g, t)| Step::RemoveTask(g, t)),
        (0..3usize).prop_map(Step::RemoveGroup),
        (0..3usize, 0..3usize, 0..5usize, 0..8usize)
            .prop_map(|(from, to, t, at)| Step::MoveTask(from, to, t, at)),
        (0..3usize, 0..5usize).prop_map(|(g, at)| Step::MoveGroup(g, at)),
    ]
}

fn operation(step: &Step) -> Operation {
    match *step {
        Step::AddTask(g, t) => add_task(GROUPS[g], TASKS[t]),
        Step::AddGroup(g, insert_at) => Operation::Create {
            parent: ParentPath::Board,
            draft: NewEntity::Group(GroupDraft {
                id: Some(GROUPS[g].to_string()),
                ..GroupDraft::default()
            }),
            insert_at,
            created_by: None,
        },
        Step::RemoveTask(g, t) => Operation::Remove {
            path: EntityPath::task(GROUPS[g], TASKS[t]),
        },
        Step::RemoveGroup(g) => Operation::Remove {
            path: EntityPath::group(GROUPS[g]),
        },
        Step::MoveTask(from, to, t, at) => move_task(GROUPS[from], GROUPS[to], TASKS[t], at),
        Step::MoveGroup(g, at) => Operation::Move {
            path: EntityPath::group(GROUPS[g]),
            destination: ParentPath::Board,
            index: at,
        },
    }
}

fn task_ids(board: &Board) -> Vec<&str> {
    board.tasks().map(|task| task.id.as_str()).collect()
}

proptest! {
    #[test]
    fn test_positions_stay_dense(steps in proptest::collection::vec(step(), 1..40)) {
        let mut board = build_board(sprint_draft(), &identity()).unwrap();
        for step in &steps {
            let _ = apply(&mut board, operation(step));
            assert_dense_positions(&board);
        }
    }

    #[test]
    fn test_ids_stay_unique_per_parent(steps in proptest::collection::vec(step(), 1..40)) {
        let mut board = build_board(sprint_draft(), &identity()).unwrap();
        for step in &steps {
            let _ = apply(&mut board, operation(step));

            let groups: HashSet<_> = board.groups.iter().map(|g| g.id.as_str()).collect();
            prop_assert_eq!(groups.len(), board.groups.len());
            for group in &board.groups {
                let tasks: HashSet<_> = group.tasks.iter().map(|t| t.id.as_str()).collect();
                prop_assert_eq!(tasks.len(), group.tasks.len());
            }
        }
    }

    #[test]
    fn test_move_lands_at_clamped_index(to in 0..2usize, at in 0..10usize) {
        // t1 starts in todo; the destination is either todo itself or doing.
        let mut board = build_board(sprint_draft(), &identity()).unwrap();
        let (from, to) = ("todo", ["todo", "doing"][to]);
        let before = task_ids(&board).len();

        apply(&mut board, move_task(from, to, "t1", at)).unwrap();

        let destination = board.group(to).unwrap();
        let index = at.min(destination.tasks.len() - 1);
        prop_assert_eq!(destination.tasks[index].id.as_str(), "t1");
        prop_assert_eq!(task_ids(&board).len(), before);
        if from != to {
            prop_assert!(board.group(from).unwrap().task("t1").is_none());
        }
    }
}
