use std::sync::Arc;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::realtime_traits::{LeaveGuard, RealtimeTransport};
use crate::board::BoardCommand;
use crate::constants::{candidate_topic, CANDIDATE_UPDATED_EVENT};
use crate::errors::Result;

struct ActiveSubscription {
    guard: LeaveGuard,
    forwarder: JoinHandle<()>,
}

/// Subscription to a job's realtime topic, scoped to one job view.
///
/// Every `candidate_updated` notification is forwarded into the session
/// queue as a [`BoardCommand::RemoteInvalidation`]; payloads are passed
/// through untouched and never interpreted. Joining and leaving are
/// idempotent, so at most one subscription is live per listener.
pub struct InvalidationListener {
    topic: String,
    transport: Arc<dyn RealtimeTransport>,
    active: Option<ActiveSubscription>,
}

impl InvalidationListener {
    pub fn new(job_id: &str, transport: Arc<dyn RealtimeTransport>) -> Self {
        Self {
            topic: candidate_topic(job_id),
            transport,
            active: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn is_subscribed(&self) -> bool {
        self.active.is_some()
    }

    /// Joins the topic and starts forwarding into `queue`. Returns false,
    /// without joining again, if already subscribed.
    pub async fn join(&mut self, queue: mpsc::UnboundedSender<BoardCommand>) -> Result<bool> {
        if self.active.is_some() {
            debug!("Already subscribed to {}", self.topic);
            return Ok(false);
        }

        let subscription = self.transport.join(&self.topic).await?;
        let (mut events, guard) = subscription.into_parts();
        let topic = self.topic.clone();

        let forwarder = tokio::spawn(async move {
            while let Some(message) = events.recv().await {
                if message.event != CANDIDATE_UPDATED_EVENT {
                    debug!("Ignoring '{}' event on {}", message.event, topic);
                    continue;
                }
                let command = BoardCommand::RemoteInvalidation {
                    payload: message.payload,
                };
                if queue.send(command).is_err() {
                    break;
                }
            }
            debug!("Stopped forwarding events from {}", topic);
        });

        info!("Subscribed to {}", self.topic);
        self.active = Some(ActiveSubscription { guard, forwarder });
        Ok(true)
    }

    /// Leaves the topic. Returns false if there was nothing to leave.
    pub fn leave(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.forwarder.abort();
                active.guard.leave();
                info!("Unsubscribed from {}", self.topic);
                true
            }
            None => false,
        }
    }
}

impl Drop for InvalidationListener {
    fn drop(&mut self) {
        self.leave();
    }
}
