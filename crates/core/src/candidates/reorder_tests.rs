//! Tests for the position reorder algorithm.

#[cfg(test)]
mod tests {
    use crate::candidates::{
        check_density, clamp_index, project_move, reorder_cards, BoardColumns, Candidate,
        CardMovement, Stage,
    };

    fn card(id: i64, status: Stage, position: u32) -> Candidate {
        Candidate::new(id, format!("candidate{}@example.com", id), status, position)
    }

    /// (id, position) pairs of one column in position order.
    fn column_of(cards: &[Candidate], stage: Stage) -> Vec<(i64, u32)> {
        BoardColumns::from_candidates(cards)
            .column(stage)
            .iter()
            .map(|c| (c.id, c.position))
            .collect()
    }

    fn sorted_by_id(mut cards: Vec<Candidate>) -> Vec<Candidate> {
        cards.sort_by_key(|c| c.id);
        cards
    }

    // A=1, B=2, C=3 in "new"; X=10 in "interview"
    fn abc() -> Vec<Candidate> {
        vec![
            card(1, Stage::New, 0),
            card(2, Stage::New, 1),
            card(3, Stage::New, 2),
        ]
    }

    // ==================== reorder_cards ====================

    #[test]
    fn test_same_column_forward() {
        let column = abc();
        let result = reorder_cards(&column[0], 2, &column, CardMovement::Same);
        assert_eq!(column_of(&result, Stage::New), vec![(2, 0), (3, 1), (1, 2)]);
    }

    #[test]
    fn test_same_column_backward() {
        let column = abc();
        let result = reorder_cards(&column[2], 0, &column, CardMovement::Same);
        assert_eq!(column_of(&result, Stage::New), vec![(3, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_same_column_one_step_forward_only_swaps_neighbour() {
        let column = vec![
            card(1, Stage::New, 0),
            card(2, Stage::New, 1),
            card(3, Stage::New, 2),
            card(4, Stage::New, 3),
        ];
        let result = reorder_cards(&column[1], 2, &column, CardMovement::Same);
        assert_eq!(
            column_of(&result, Stage::New),
            vec![(1, 0), (3, 1), (2, 2), (4, 3)]
        );
    }

    #[test]
    fn test_same_column_no_op() {
        let column = abc();
        let result = reorder_cards(&column[1], 1, &column, CardMovement::Same);
        assert_eq!(result, column);
    }

    #[test]
    fn test_outgoing_closes_the_gap_left_by_the_card() {
        let full = vec![
            card(1, Stage::New, 0),
            card(2, Stage::New, 1),
            card(3, Stage::New, 2),
        ];
        let remaining: Vec<Candidate> = full.iter().filter(|c| c.id != 2).cloned().collect();
        // The target index belongs to the other column and must not matter here.
        let result = reorder_cards(&full[1], 0, &remaining, CardMovement::Outgoing);
        assert_eq!(column_of(&result, Stage::New), vec![(1, 0), (3, 1)]);
    }

    #[test]
    fn test_incoming_opens_a_slot_and_restamps_the_card() {
        let moving = card(1, Stage::New, 0);
        let column = vec![
            card(10, Stage::Interview, 0),
            card(11, Stage::Interview, 1),
            moving.clone(),
        ];
        let result = reorder_cards(
            &moving,
            1,
            &column,
            CardMovement::Incoming(Stage::Interview),
        );
        assert_eq!(
            column_of(&result, Stage::Interview),
            vec![(10, 0), (1, 1), (11, 2)]
        );
        assert!(result.iter().all(|c| c.status == Stage::Interview));
    }

    #[test]
    fn test_reorder_does_not_mutate_input() {
        let column = abc();
        let before = column.clone();
        let _ = reorder_cards(&column[0], 2, &column, CardMovement::Same);
        assert_eq!(column, before);
    }

    // ==================== project_move ====================

    #[test]
    fn test_cross_column_move() {
        let collection = vec![
            card(1, Stage::New, 0),
            card(2, Stage::New, 1),
            card(10, Stage::Interview, 0),
        ];
        let result = project_move(&collection, &collection[0], Stage::Interview, 0);

        assert_eq!(column_of(&result, Stage::New), vec![(2, 0)]);
        assert_eq!(column_of(&result, Stage::Interview), vec![(1, 0), (10, 1)]);
        assert_eq!(result.len(), 3);
        assert!(check_density(&result).is_ok());
    }

    #[test]
    fn test_cross_column_move_into_empty_column() {
        let collection = abc();
        let result = project_move(&collection, &collection[1], Stage::Hired, 0);
        assert_eq!(column_of(&result, Stage::New), vec![(1, 0), (3, 1)]);
        assert_eq!(column_of(&result, Stage::Hired), vec![(2, 0)]);
    }

    #[test]
    fn test_untouched_columns_are_carried_over() {
        let mut collection = abc();
        collection.push(card(20, Stage::Rejected, 0));
        collection.push(card(21, Stage::Rejected, 1));
        let result = project_move(&collection, &collection[0], Stage::Interview, 0);

        let rejected: Vec<&Candidate> =
            result.iter().filter(|c| c.status == Stage::Rejected).collect();
        assert_eq!(rejected, vec![&collection[3], &collection[4]]);
    }

    #[test]
    fn test_project_no_op_returns_same_collection() {
        let collection = abc();
        let result = project_move(&collection, &collection[2], Stage::New, 2);
        assert_eq!(sorted_by_id(result), sorted_by_id(collection));
    }

    #[test]
    fn test_index_past_end_is_clamped() {
        let collection = vec![
            card(1, Stage::New, 0),
            card(2, Stage::New, 1),
            card(10, Stage::Interview, 0),
        ];
        let same = project_move(&collection, &collection[0], Stage::New, 9);
        assert_eq!(column_of(&same, Stage::New), vec![(2, 0), (1, 1)]);

        let cross = project_move(&collection, &collection[0], Stage::Interview, 9);
        assert_eq!(column_of(&cross, Stage::Interview), vec![(10, 0), (1, 1)]);
        assert!(check_density(&cross).is_ok());
    }

    #[test]
    fn test_clamp_index_bounds_per_movement() {
        let collection = vec![
            card(1, Stage::New, 0),
            card(2, Stage::New, 1),
            card(10, Stage::Interview, 0),
        ];
        // Own column of two: the last slot is 1, even for index == n.
        assert_eq!(clamp_index(&collection, &collection[1], Stage::New, 2), 1);
        assert_eq!(clamp_index(&collection, &collection[0], Stage::New, 1), 1);
        // Entering a column of one: the append slot 1 is valid.
        assert_eq!(clamp_index(&collection, &collection[0], Stage::Interview, 1), 1);
        assert_eq!(clamp_index(&collection, &collection[0], Stage::Interview, 5), 1);
        assert_eq!(clamp_index(&collection, &collection[0], Stage::Hired, 3), 0);
    }

    #[test]
    fn test_successive_tentative_moves_stay_dense() {
        // A drag hovering over several slots projects from the last projection.
        let mut collection = vec![
            card(1, Stage::New, 0),
            card(2, Stage::New, 1),
            card(10, Stage::Interview, 0),
            card(11, Stage::Interview, 1),
        ];
        let hops = [
            (Stage::Interview, 0),
            (Stage::Interview, 2),
            (Stage::Hired, 0),
            (Stage::New, 1),
        ];
        for (stage, index) in hops {
            let moving = collection.iter().find(|c| c.id == 1).unwrap().clone();
            collection = project_move(&collection, &moving, stage, index);
            assert!(check_density(&collection).is_ok(), "after hop to {stage}:{index}");
            assert_eq!(collection.len(), 4);
        }
        let moved = collection.iter().find(|c| c.id == 1).unwrap();
        assert!(moved.is_at(Stage::New, 1));
    }
}
