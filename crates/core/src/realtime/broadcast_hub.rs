//! In-process realtime transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use log::warn;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};

use super::realtime_traits::{ChannelMessage, LeaveGuard, RealtimeTransport, Subscription};
use crate::errors::Result;

/// Broadcast bus that fans out topic events to every joined subscription.
///
/// Used to connect several board sessions inside one process, and as the
/// transport in tests. Tracks how many subscriptions each topic has.
#[derive(Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<ChannelMessage>,
    joined: Arc<Mutex<HashMap<String, usize>>>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self {
            sender,
            joined: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Publishes an event; returns how many subscriptions could receive it.
    pub fn publish(&self, topic: &str, event: &str, payload: Value) -> usize {
        // No receivers is not an error: nobody is viewing the topic.
        self.sender
            .send(ChannelMessage::new(topic, event, payload))
            .unwrap_or(0)
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.joined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl RealtimeTransport for BroadcastHub {
    async fn join(&self, topic: &str) -> Result<Subscription> {
        let mut receiver = self.sender.subscribe();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let wanted = topic.to_string();

        let forwarder = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(message) if message.topic == wanted => {
                        if events_tx.send(message).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Subscription on {} lagged by {} event(s)", wanted, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        *self
            .joined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic.to_string())
            .or_insert(0) += 1;

        let joined = Arc::clone(&self.joined);
        let left_topic = topic.to_string();
        let guard = LeaveGuard::new(move || {
            forwarder.abort();
            let mut joined = joined.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(count) = joined.get_mut(&left_topic) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    joined.remove(&left_topic);
                }
            }
        });

        Ok(Subscription::new(topic, events_rx, guard))
    }
}
