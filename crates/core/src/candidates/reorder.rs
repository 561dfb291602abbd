//! Position reorder algorithm.
//!
//! Pure functions: given one card's move they compute the new
//! `(status, position)` of every card in the affected column(s) and return
//! copies. Callers merge the output by id.

use std::collections::HashSet;

use super::candidates_model::{BoardColumns, Candidate, Stage};

/// How a column relates to the card being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMovement {
    /// The card moves within this column.
    Same,
    /// The card leaves this column; the list passed in no longer contains it.
    Outgoing,
    /// The card enters this column, which is the given stage; the list passed
    /// in has the card appended at the end.
    Incoming(Stage),
}

/// Recomputes positions in one column for a move of `candidate` (its pre-move
/// snapshot) to `new_index`.
///
/// Shifts are inclusive on the side the card travels toward and exclusive on
/// the side it leaves, which keeps the column dense.
pub fn reorder_cards(
    candidate: &Candidate,
    new_index: u32,
    column: &[Candidate],
    movement: CardMovement,
) -> Vec<Candidate> {
    let old_index = candidate.position;

    column
        .iter()
        .map(|card| match movement {
            CardMovement::Same => {
                if card.id == candidate.id {
                    card.with_position(new_index)
                } else if new_index > old_index
                    && card.position > old_index
                    && card.position <= new_index
                {
                    card.with_position(card.position - 1)
                } else if new_index < old_index
                    && card.position >= new_index
                    && card.position < old_index
                {
                    card.with_position(card.position + 1)
                } else {
                    card.clone()
                }
            }
            CardMovement::Outgoing => {
                if card.position > old_index {
                    card.with_position(card.position - 1)
                } else {
                    card.clone()
                }
            }
            CardMovement::Incoming(stage) => {
                if card.id == candidate.id {
                    card.moved_to(stage, new_index)
                } else if card.position >= new_index {
                    card.with_position(card.position + 1)
                } else {
                    card.clone()
                }
            }
        })
        .collect()
}

/// Projects a move of `candidate` to `(destination, index)` onto the whole
/// collection.
///
/// Cards outside the source and destination columns are carried over
/// unchanged; the reordered columns replace their stale entries, with the
/// destination column's copy of the moved card winning. `index` is clamped
/// with [`clamp_index`].
pub fn project_move(
    collection: &[Candidate],
    candidate: &Candidate,
    destination: Stage,
    index: u32,
) -> Vec<Candidate> {
    let source = candidate.status;
    let index = clamp_index(collection, candidate, destination, index);
    let columns = BoardColumns::from_candidates(collection);

    let untouched = collection
        .iter()
        .filter(|c| c.status != source && c.status != destination)
        .cloned();

    let mut merged: Vec<Candidate> = untouched.collect();

    if source == destination {
        merged.extend(reorder_cards(
            candidate,
            index,
            columns.column(source),
            CardMovement::Same,
        ));
    } else {
        let remaining: Vec<Candidate> = columns
            .column(source)
            .iter()
            .filter(|c| c.id != candidate.id)
            .cloned()
            .collect();
        merged.extend(reorder_cards(
            candidate,
            index,
            &remaining,
            CardMovement::Outgoing,
        ));

        let mut incoming: Vec<Candidate> = columns
            .column(destination)
            .iter()
            .filter(|c| c.id != candidate.id)
            .cloned()
            .collect();
        incoming.push(candidate.clone());
        merged.extend(reorder_cards(
            candidate,
            index,
            &incoming,
            CardMovement::Incoming(destination),
        ));
    }

    dedup_last_wins(merged)
}

/// The slot a move of `candidate` to `(destination, index)` actually lands
/// in: at most `n - 1` within its own column of `n` cards, at most `n` when
/// entering a column of `n` cards.
pub fn clamp_index(
    collection: &[Candidate],
    candidate: &Candidate,
    destination: Stage,
    index: u32,
) -> u32 {
    let others = collection
        .iter()
        .filter(|c| c.status == destination && c.id != candidate.id)
        .count() as u32;
    index.min(others)
}

/// Drops earlier duplicates of an id, keeping the latest copy in its place.
fn dedup_last_wins(cards: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(cards.len());
    let mut kept: Vec<Candidate> = cards
        .into_iter()
        .rev()
        .filter(|card| seen.insert(card.id))
        .collect();
    kept.reverse();
    kept
}
