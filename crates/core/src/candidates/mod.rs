//! Candidates module - stage enumeration, domain models, the reorder
//! algorithm and the gateway trait used to fetch and persist them.

mod candidates_model;
mod candidates_traits;
mod reorder;


#[cfg(test)]
mod reorder_tests;

pub use candidates_model::{
    check_density, BoardColumns, Candidate, CandidateId, CandidateMove, Stage,
};
pub use candidates_traits::CandidateGatewayTrait;
pub use reorder::{clamp_index, project_move, reorder_cards, CardMovement};
