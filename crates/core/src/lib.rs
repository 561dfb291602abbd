//! Hireboard Core - Candidate pipeline board logic.
//!
//! This crate keeps a job's candidate columns consistent while cards are
//! dragged between stages: it projects moves locally, persists the final
//! drop, and reconciles with server truth whenever another viewer changes
//! the same job. Network access goes through the gateway and transport
//! traits, implemented by the `connect` crate.

pub mod board;
pub mod candidates;
pub mod constants;
pub mod errors;
pub mod events;
pub mod jobs;
pub mod realtime;
pub mod store;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
