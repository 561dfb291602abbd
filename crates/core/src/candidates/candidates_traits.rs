use async_trait::async_trait;

use super::candidates_model::{Candidate, CandidateMove};
use crate::errors::Result;

/// Transport collaborator for a job's candidate collection.
///
/// Implementations do not retry; retry policy, if any, belongs to them.
#[async_trait]
pub trait CandidateGatewayTrait: Send + Sync {
    /// Fetches the full candidate collection of a job.
    async fn fetch_candidates(&self, job_id: &str) -> Result<Vec<Candidate>>;

    /// Persists one move and returns the server's canonical candidate.
    async fn persist_move(&self, job_id: &str, candidate_move: &CandidateMove)
        -> Result<Candidate>;
}
