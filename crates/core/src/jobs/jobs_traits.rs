use async_trait::async_trait;

use super::jobs_model::Job;
use crate::errors::Result;

/// Trait for reading jobs from the server
#[async_trait]
pub trait JobGatewayTrait: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<Job>>;
    /// Returns `None` when the job does not exist.
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>>;
}
