//! Candidate store - the per-job source of truth shared by the drag
//! orchestrator and the rendering layer.

mod candidate_store;

pub use candidate_store::{CacheEntry, CandidateStore, EntryOrigin};
