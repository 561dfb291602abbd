//! Jobs module - the job a board belongs to.

mod jobs_model;
mod jobs_traits;


pub use jobs_model::Job;
pub use jobs_traits::JobGatewayTrait;
