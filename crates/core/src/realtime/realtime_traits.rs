use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::errors::Result;

/// One event pushed on a realtime topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub topic: String,
    pub event: String,
    pub payload: Value,
}

impl ChannelMessage {
    pub fn new(topic: impl Into<String>, event: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            event: event.into(),
            payload,
        }
    }
}

/// Runs the transport's leave action exactly once: on [`LeaveGuard::leave`]
/// or on drop, whichever comes first.
pub struct LeaveGuard {
    on_leave: Option<Box<dyn FnOnce() + Send>>,
}

impl LeaveGuard {
    pub fn new(on_leave: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_leave: Some(Box::new(on_leave)),
        }
    }

    pub fn leave(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(on_leave) = self.on_leave.take() {
            on_leave();
        }
    }
}

impl Drop for LeaveGuard {
    fn drop(&mut self) {
        self.run();
    }
}

/// A joined topic: its event stream plus the guard that leaves it.
pub struct Subscription {
    topic: String,
    events: mpsc::UnboundedReceiver<ChannelMessage>,
    guard: LeaveGuard,
}

impl Subscription {
    pub fn new(
        topic: impl Into<String>,
        events: mpsc::UnboundedReceiver<ChannelMessage>,
        guard: LeaveGuard,
    ) -> Self {
        Self {
            topic: topic.into(),
            events,
            guard,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next event on the topic; `None` once the transport has gone away.
    pub async fn recv(&mut self) -> Option<ChannelMessage> {
        self.events.recv().await
    }

    /// Splits the subscription so the event stream and the leave action can
    /// be owned by different tasks.
    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<ChannelMessage>, LeaveGuard) {
        (self.events, self.guard)
    }
}

/// Publish/subscribe transport keyed by topic name.
///
/// Connection management and reconnection belong to implementations.
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Joins `topic`; resolves once the server has accepted the join.
    async fn join(&self, topic: &str) -> Result<Subscription>;
}
