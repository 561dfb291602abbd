//! Property-based tests for candidate reordering.
//!
//! Every move applied to a dense board must leave it dense, and must put the
//! moved card exactly where it was dropped.

use proptest::prelude::*;
use std::collections::HashSet;

use hireboard_core::candidates::{check_density, project_move, Candidate, Stage};

// =============================================================================
// Generators
// =============================================================================

fn arb_stage() -> impl Strategy<Value = Stage> {
    prop_oneof![
        Just(Stage::New),
        Just(Stage::Interview),
        Just(Stage::Hired),
        Just(Stage::Rejected),
    ]
}

/// Generates a dense board: each card gets a stage, and positions are then
/// assigned 0..n in generation order within each stage.
fn arb_board() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec(arb_stage(), 1..24).prop_map(|stages| {
        let mut next = [0u32; 4];
        stages
            .into_iter()
            .enumerate()
            .map(|(i, stage)| {
                let slot = Stage::ALL
                    .iter()
                    .position(|s| *s == stage)
                    .unwrap_or_default();
                let position = next[slot];
                next[slot] += 1;
                Candidate::new(i as i64 + 1, format!("c{}@example.com", i), stage, position)
            })
            .collect()
    })
}

/// A board plus a move of one of its cards.
fn arb_move() -> impl Strategy<Value = (Vec<Candidate>, usize, Stage, u32)> {
    arb_board().prop_flat_map(|board| {
        let len = board.len();
        (Just(board), 0..len, arb_stage(), 0u32..30)
    })
}

fn column_len(board: &[Candidate], stage: Stage) -> u32 {
    board.iter().filter(|c| c.status == stage).count() as u32
}

fn sorted_by_id(mut board: Vec<Candidate>) -> Vec<Candidate> {
    board.sort_by_key(|c| c.id);
    board
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn generated_boards_are_dense(board in arb_board()) {
        prop_assert!(check_density(&board).is_ok());
    }

    #[test]
    fn moves_keep_every_column_dense((board, pick, stage, index) in arb_move()) {
        let candidate = board[pick].clone();
        let projected = project_move(&board, &candidate, stage, index);

        prop_assert!(check_density(&projected).is_ok(), "{:?}", projected);
    }

    #[test]
    fn moves_keep_every_candidate_exactly_once((board, pick, stage, index) in arb_move()) {
        let candidate = board[pick].clone();
        let projected = project_move(&board, &candidate, stage, index);

        let before: HashSet<i64> = board.iter().map(|c| c.id).collect();
        let after: HashSet<i64> = projected.iter().map(|c| c.id).collect();
        prop_assert_eq!(projected.len(), board.len());
        prop_assert_eq!(before, after);
    }

    #[test]
    fn moved_card_lands_on_the_clamped_target((board, pick, stage, index) in arb_move()) {
        let candidate = board[pick].clone();
        let projected = project_move(&board, &candidate, stage, index);

        let max_index = if candidate.status == stage {
            column_len(&board, stage) - 1
        } else {
            column_len(&board, stage)
        };
        let moved = projected.iter().find(|c| c.id == candidate.id).cloned();
        prop_assert_eq!(moved.map(|c| (c.status, c.position)), Some((stage, index.min(max_index))));
    }

    #[test]
    fn other_columns_are_untouched((board, pick, stage, index) in arb_move()) {
        let candidate = board[pick].clone();
        let projected = project_move(&board, &candidate, stage, index);

        for other in Stage::ALL {
            if other == stage || other == candidate.status {
                continue;
            }
            let before: Vec<_> = sorted_by_id(board.clone()).into_iter().filter(|c| c.status == other).collect();
            let after: Vec<_> = sorted_by_id(projected.clone()).into_iter().filter(|c| c.status == other).collect();
            prop_assert_eq!(before, after);
        }
    }

    #[test]
    fn moving_to_the_current_slot_changes_nothing((board, pick) in arb_board().prop_flat_map(|b| { let n = b.len(); (Just(b), 0..n) })) {
        let candidate = board[pick].clone();
        let projected = project_move(&board, &candidate, candidate.status, candidate.position);

        prop_assert_eq!(sorted_by_id(projected), sorted_by_id(board));
    }
}
