/// Prefix of the per-job realtime topic (`candidate:{job_id}`)
pub const CANDIDATE_TOPIC_PREFIX: &str = "candidate";

/// The only realtime event the board reacts to
pub const CANDIDATE_UPDATED_EVENT: &str = "candidate_updated";

/// Default REST API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

/// Default websocket endpoint of the realtime server
pub const DEFAULT_SOCKET_URL: &str = "ws://localhost:4000/socket/websocket";

/// Builds the realtime topic for a job.
pub fn candidate_topic(job_id: &str) -> String {
    format!("{}:{}", CANDIDATE_TOPIC_PREFIX, job_id)
}
