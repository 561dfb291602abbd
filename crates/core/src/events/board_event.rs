//! Board event types.

use serde::{Deserialize, Serialize};

use crate::candidates::CandidateId;

/// Facts about a job board emitted by its session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A drag projection was written into the store.
    OptimisticUpdate { job_id: String, version: u64 },

    /// A fetch replaced the store contents with server truth.
    StoreReplaced {
        job_id: String,
        version: u64,
        candidate_count: usize,
    },

    /// The server accepted a move.
    PersistSucceeded {
        job_id: String,
        candidate_id: CandidateId,
    },

    /// A move could not be persisted. The optimistic view is left as is.
    PersistFailed {
        job_id: String,
        candidate_id: CandidateId,
        message: String,
    },

    /// A fetch failed; the store keeps its last-known collection.
    LoadFailed { job_id: String, message: String },

    /// The realtime topic for the job was joined.
    Subscribed { topic: String },

    /// The realtime topic for the job was left.
    Unsubscribed { topic: String },
}

impl BoardEvent {
    /// The job the event concerns, when it names one.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            BoardEvent::OptimisticUpdate { job_id, .. }
            | BoardEvent::StoreReplaced { job_id, .. }
            | BoardEvent::PersistSucceeded { job_id, .. }
            | BoardEvent::PersistFailed { job_id, .. }
            | BoardEvent::LoadFailed { job_id, .. } => Some(job_id),
            BoardEvent::Subscribed { .. } | BoardEvent::Unsubscribed { .. } => None,
        }
    }

    /// Whether the event reports an error to surface to the user.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            BoardEvent::PersistFailed { .. } | BoardEvent::LoadFailed { .. }
        )
    }
}
