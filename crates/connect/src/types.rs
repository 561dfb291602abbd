//! Types for board API requests, responses and channel frames.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use hireboard_core::candidates::CandidateMove;

// ─────────────────────────────────────────────────────────────────────────────
// HTTP API Types
// ─────────────────────────────────────────────────────────────────────────────

/// Every successful API response wraps its body in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Body of `PATCH /jobs/{job_id}/candidates/{candidate_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCandidateRequest {
    pub candidate: CandidateMove,
}

/// Error body returned by the server on failure. Both the plain and the
/// Phoenix fallback-controller shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ApiErrorResponse {
    pub fn describe(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .or_else(|| self.errors.as_ref().map(Value::to_string))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Channel Frame Types
// ─────────────────────────────────────────────────────────────────────────────

pub const PHX_JOIN: &str = "phx_join";
pub const PHX_LEAVE: &str = "phx_leave";
pub const PHX_REPLY: &str = "phx_reply";
pub const PHX_ERROR: &str = "phx_error";
pub const PHX_CLOSE: &str = "phx_close";
pub const HEARTBEAT: &str = "heartbeat";
pub const PHOENIX_TOPIC: &str = "phoenix";

/// One channel frame, carried on the wire as the v2 JSON array
/// `[join_ref, ref, topic, event, payload]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFrame", into = "RawFrame")]
pub struct PhoenixFrame {
    pub join_ref: Option<String>,
    pub msg_ref: Option<String>,
    pub topic: String,
    pub event: String,
    pub payload: Value,
}

#[derive(Serialize, Deserialize)]
struct RawFrame(Option<String>, Option<String>, String, String, Value);

impl From<RawFrame> for PhoenixFrame {
    fn from(RawFrame(join_ref, msg_ref, topic, event, payload): RawFrame) -> Self {
        Self {
            join_ref,
            msg_ref,
            topic,
            event,
            payload,
        }
    }
}

impl From<PhoenixFrame> for RawFrame {
    fn from(frame: PhoenixFrame) -> Self {
        RawFrame(
            frame.join_ref,
            frame.msg_ref,
            frame.topic,
            frame.event,
            frame.payload,
        )
    }
}

impl PhoenixFrame {
    pub fn join(topic: &str, join_ref: &str) -> Self {
        Self {
            join_ref: Some(join_ref.to_string()),
            msg_ref: Some(join_ref.to_string()),
            topic: topic.to_string(),
            event: PHX_JOIN.to_string(),
            payload: Value::Object(Default::default()),
        }
    }

    pub fn leave(topic: &str, join_ref: &str, msg_ref: &str) -> Self {
        Self {
            join_ref: Some(join_ref.to_string()),
            msg_ref: Some(msg_ref.to_string()),
            topic: topic.to_string(),
            event: PHX_LEAVE.to_string(),
            payload: Value::Object(Default::default()),
        }
    }

    pub fn heartbeat(msg_ref: &str) -> Self {
        Self {
            join_ref: None,
            msg_ref: Some(msg_ref.to_string()),
            topic: PHOENIX_TOPIC.to_string(),
            event: HEARTBEAT.to_string(),
            payload: Value::Object(Default::default()),
        }
    }

    /// Reply status of a `phx_reply` frame (`"ok"` or `"error"`).
    pub fn reply_status(&self) -> Option<&str> {
        if self.event != PHX_REPLY {
            return None;
        }
        self.payload.get("status").and_then(Value::as_str)
    }

    /// Whether this frame tells the client its channel is gone.
    pub fn closes_channel(&self) -> bool {
        self.event == PHX_ERROR || self.event == PHX_CLOSE
    }
}
