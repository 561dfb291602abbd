//! Commands, effects and options of a board session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::drag_model::{DragUpdate, DropResult};
use crate::candidates::{Candidate, CandidateId, CandidateMove};
use crate::errors::{Error, Result};

/// What a session does after a move fails to persist.
///
/// Neither policy rolls the optimistic view back or retries the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Keep the optimistic view until the next invalidation arrives.
    AwaitInvalidation,
    /// Refetch once so the view converges to server truth.
    #[default]
    RefetchOnFailure,
}

impl ReconcilePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcilePolicy::AwaitInvalidation => "await-invalidation",
            ReconcilePolicy::RefetchOnFailure => "refetch-on-failure",
        }
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconcilePolicy {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "await-invalidation" => Ok(ReconcilePolicy::AwaitInvalidation),
            "refetch-on-failure" => Ok(ReconcilePolicy::RefetchOnFailure),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown reconcile policy '{}'",
                other
            ))),
        }
    }
}

/// Options of a board session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    pub reconcile_policy: ReconcilePolicy,
}

/// Everything that enters a session's event queue, in arrival order.
#[derive(Debug, Clone)]
pub enum BoardCommand {
    DragStarted { candidate_id: CandidateId },
    DragUpdated(DragUpdate),
    Dropped(DropResult),
    /// Completion of a persistence request.
    PersistCompleted {
        candidate_move: CandidateMove,
        result: Result<Candidate>,
    },
    /// A remote viewer changed something; the payload is not interpreted.
    RemoteInvalidation { payload: Value },
    /// Completion of a collection fetch.
    FetchCompleted { result: Result<Vec<Candidate>> },
    /// Leave the job view and stop the queue.
    Leave,
}

/// Network work requested by the handler of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEffect {
    Fetch,
    Persist(CandidateMove),
}
