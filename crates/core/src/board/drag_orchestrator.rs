use log::{debug, error};

use super::drag_model::{DragUpdate, DropResult, DropTarget};
use crate::candidates::{clamp_index, project_move, Candidate, CandidateId, CandidateMove, Stage};
use crate::errors::Result;

/// Where the orchestrator is within one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { candidate_id: CandidateId },
}

/// Result of a completed drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    /// Collection with the move applied.
    pub candidates: Vec<Candidate>,
    /// Whether `candidates` differs from the collection the drop saw.
    pub changed: bool,
    /// The single persistence request for the moved card.
    pub request: CandidateMove,
}

/// State machine over one drag gesture.
///
/// Every transition is a function of the current state, the collection as
/// last written to the store and the event; the caller owns the store write
/// and the network request.
#[derive(Debug, Default)]
pub struct DragOrchestrator {
    state: DragState,
}

impl DragOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Idle -> Dragging. Nothing is written.
    pub fn drag_start(&mut self, candidate_id: CandidateId) {
        debug!("Drag started for candidate {}", candidate_id);
        self.state = DragState::Dragging { candidate_id };
    }

    /// Dragging -> Dragging. Returns the optimistic projection to write, or
    /// `None` when the event changes nothing.
    ///
    /// Fails only when the target column is not a recognised stage.
    pub fn drag_update(
        &mut self,
        collection: &[Candidate],
        update: &DragUpdate,
    ) -> Result<Option<Vec<Candidate>>> {
        if !self.is_dragging(update.draggable_id) {
            debug!(
                "Ignoring drag update for candidate {} outside its gesture ({:?})",
                update.draggable_id, self.state
            );
            return Ok(None);
        }
        let Some(target) = &update.destination else {
            return Ok(None);
        };
        let Some((candidate, destination, index)) =
            resolve(collection, update.draggable_id, target)?
        else {
            return Ok(None);
        };

        Ok(Some(project_move(collection, candidate, destination, index)))
    }

    /// Dragging -> Idle. Returns the final collection and the persistence
    /// request, or `None` when the drop is cancelled (no destination, a card
    /// other than the one the gesture started with, or a card that cannot be
    /// resolved).
    pub fn drop(
        &mut self,
        collection: &[Candidate],
        result: &DropResult,
    ) -> Result<Option<DropOutcome>> {
        let previous = std::mem::take(&mut self.state);
        match previous {
            DragState::Idle => {
                debug!(
                    "Ignoring drop for candidate {} without a drag start",
                    result.draggable_id
                );
                return Ok(None);
            }
            DragState::Dragging { candidate_id } if candidate_id != result.draggable_id => {
                debug!(
                    "Ignoring drop for candidate {} during the gesture of candidate {}",
                    result.draggable_id, candidate_id
                );
                return Ok(None);
            }
            DragState::Dragging { .. } => {}
        }

        let Some(target) = &result.destination else {
            debug!("Drop for candidate {} cancelled", result.draggable_id);
            return Ok(None);
        };
        let Some(candidate) = collection.iter().find(|c| c.id == result.draggable_id) else {
            debug!(
                "Dropped candidate {} is not in the collection",
                result.draggable_id
            );
            return Ok(None);
        };
        let destination = parse_destination(target)?;
        let index = clamp_index(collection, candidate, destination, target.index);

        let (candidates, changed) = if candidate.is_at(destination, index) {
            (collection.to_vec(), false)
        } else {
            (project_move(collection, candidate, destination, index), true)
        };

        let moved = candidates
            .iter()
            .find(|c| c.id == candidate.id)
            .unwrap_or(candidate);
        let request = CandidateMove::from(moved);

        Ok(Some(DropOutcome {
            candidates,
            changed,
            request,
        }))
    }

    fn is_dragging(&self, candidate_id: CandidateId) -> bool {
        self.state == DragState::Dragging { candidate_id }
    }
}

/// Looks up the dragged card, the target stage and the slot the card would
/// land in. `None` means the event is a no-op: unknown card, or a target that
/// clamps to the card's current slot.
fn resolve<'a>(
    collection: &'a [Candidate],
    candidate_id: CandidateId,
    target: &DropTarget,
) -> Result<Option<(&'a Candidate, Stage, u32)>> {
    let Some(candidate) = collection.iter().find(|c| c.id == candidate_id) else {
        debug!("Dragged candidate {} is not in the collection", candidate_id);
        return Ok(None);
    };

    let destination = parse_destination(target)?;
    let index = clamp_index(collection, candidate, destination, target.index);
    if candidate.is_at(destination, index) {
        return Ok(None);
    }
    Ok(Some((candidate, destination, index)))
}

fn parse_destination(target: &DropTarget) -> Result<Stage> {
    target.stage().inspect_err(|err| {
        error!("Drop target '{}' is not a board column: {}", target.droppable_id, err);
    })
}
