//! Tests for the drag gesture state machine.

#[cfg(test)]
mod tests {
    use crate::board::{DragOrchestrator, DragState, DragUpdate, DropResult, DropTarget};
    use crate::candidates::{check_density, BoardColumns, Candidate, CandidateMove, Stage};
    use crate::errors::Error;

    const A: i64 = 1;
    const B: i64 = 2;
    const X: i64 = 10;

    fn board() -> Vec<Candidate> {
        vec![
            Candidate::new(A, "a@example.com", Stage::New, 0),
            Candidate::new(B, "b@example.com", Stage::New, 1),
            Candidate::new(X, "x@example.com", Stage::Interview, 0),
        ]
    }

    fn update(id: i64, column: &str, index: u32) -> DragUpdate {
        DragUpdate {
            draggable_id: id,
            destination: Some(DropTarget::new(column, index)),
        }
    }

    fn dropped(id: i64, column: &str, index: u32) -> DropResult {
        DropResult {
            draggable_id: id,
            destination: Some(DropTarget::new(column, index)),
        }
    }

    fn ids(cards: &[Candidate], stage: Stage) -> Vec<(i64, u32)> {
        BoardColumns::from_candidates(cards)
            .column(stage)
            .iter()
            .map(|c| (c.id, c.position))
            .collect()
    }

    // ==================== Drag progress ====================

    #[test]
    fn test_drag_start_enters_dragging() {
        let mut orchestrator = DragOrchestrator::new();
        assert_eq!(orchestrator.state(), DragState::Idle);

        orchestrator.drag_start(A);
        assert_eq!(orchestrator.state(), DragState::Dragging { candidate_id: A });
    }

    #[test]
    fn test_update_outside_gesture_is_ignored() {
        let mut orchestrator = DragOrchestrator::new();
        let result = orchestrator
            .drag_update(&board(), &update(A, "interview", 0))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_projects_cross_column_move() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);

        let projected = orchestrator
            .drag_update(&board(), &update(A, "interview", 0))
            .unwrap()
            .unwrap();

        assert_eq!(ids(&projected, Stage::New), vec![(B, 0)]);
        assert_eq!(ids(&projected, Stage::Interview), vec![(A, 0), (X, 1)]);
        assert!(check_density(&projected).is_ok());
        assert_eq!(orchestrator.state(), DragState::Dragging { candidate_id: A });
    }

    #[test]
    fn test_update_to_current_slot_is_ignored() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(B);
        let result = orchestrator.drag_update(&board(), &update(B, "new", 1)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_past_end_of_own_column_at_last_slot_is_ignored() {
        // "new" holds two cards; index 2 is a valid target and lands on slot 1.
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(B);
        let result = orchestrator.drag_update(&board(), &update(B, "new", 2)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_past_end_of_own_column_still_moves_earlier_card() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        let projected = orchestrator
            .drag_update(&board(), &update(A, "new", 2))
            .unwrap()
            .unwrap();
        assert_eq!(ids(&projected, Stage::New), vec![(B, 0), (A, 1)]);
    }

    #[test]
    fn test_update_for_other_card_than_gesture_is_ignored() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        let result = orchestrator
            .drag_update(&board(), &update(X, "new", 0))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(orchestrator.state(), DragState::Dragging { candidate_id: A });
    }

    #[test]
    fn test_update_without_destination_is_ignored() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        let result = orchestrator
            .drag_update(
                &board(),
                &DragUpdate {
                    draggable_id: A,
                    destination: None,
                },
            )
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_for_unknown_candidate_is_ignored() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(99);
        let result = orchestrator
            .drag_update(&board(), &update(99, "hired", 0))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_to_unrecognized_column_fails_fast() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        let err = orchestrator
            .drag_update(&board(), &update(A, "offer", 0))
            .unwrap_err();
        assert_eq!(err, Error::UnrecognizedStage("offer".to_string()));
    }

    // ==================== Drop ====================

    #[test]
    fn test_drop_builds_single_request_and_returns_to_idle() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);

        let outcome = orchestrator
            .drop(&board(), &dropped(A, "interview", 1))
            .unwrap()
            .unwrap();

        assert_eq!(
            outcome.request,
            CandidateMove {
                id: A,
                status: Stage::Interview,
                position: 1
            }
        );
        assert!(outcome.changed);
        assert_eq!(ids(&outcome.candidates, Stage::Interview), vec![(X, 0), (A, 1)]);
        assert_eq!(ids(&outcome.candidates, Stage::New), vec![(B, 0)]);
        assert_eq!(orchestrator.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_after_projection_keeps_collection() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        let projected = orchestrator
            .drag_update(&board(), &update(A, "interview", 1))
            .unwrap()
            .unwrap();

        let outcome = orchestrator
            .drop(&projected, &dropped(A, "interview", 1))
            .unwrap()
            .unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.candidates, projected);
        assert_eq!(outcome.request.position, 1);
        assert_eq!(outcome.request.status, Stage::Interview);
    }

    #[test]
    fn test_drop_past_end_of_own_column_at_last_slot_is_unchanged() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(B);

        let outcome = orchestrator
            .drop(&board(), &dropped(B, "new", 5))
            .unwrap()
            .unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.candidates, board());
        assert_eq!(
            outcome.request,
            CandidateMove {
                id: B,
                status: Stage::New,
                position: 1
            }
        );
    }

    #[test]
    fn test_drop_for_other_card_than_gesture_issues_nothing() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        assert!(orchestrator
            .drop(&board(), &dropped(X, "new", 0))
            .unwrap()
            .is_none());
        assert_eq!(orchestrator.state(), DragState::Idle);
    }

    #[test]
    fn test_cancelled_drop_issues_nothing() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        let outcome = orchestrator
            .drop(
                &board(),
                &DropResult {
                    draggable_id: A,
                    destination: None,
                },
            )
            .unwrap();
        assert!(outcome.is_none());
        assert_eq!(orchestrator.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_of_unknown_candidate_issues_nothing() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(99);
        assert!(orchestrator
            .drop(&board(), &dropped(99, "new", 0))
            .unwrap()
            .is_none());
        assert_eq!(orchestrator.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_without_drag_start_is_ignored() {
        let mut orchestrator = DragOrchestrator::new();
        assert!(orchestrator
            .drop(&board(), &dropped(A, "hired", 0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_drop_on_unrecognized_column_fails_and_ends_gesture() {
        let mut orchestrator = DragOrchestrator::new();
        orchestrator.drag_start(A);
        let err = orchestrator
            .drop(&board(), &dropped(A, "archive", 0))
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(orchestrator.state(), DragState::Idle);
    }
}
