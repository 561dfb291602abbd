use hireboard_core::events::{BoardEvent, BoardEventSink};
use tokio::sync::broadcast;

/// Lightweight broadcast bus that fans board events out to the commands
/// waiting on them.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BoardEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: BoardEvent) {
        // Lagging listeners are ignored to avoid blocking the session.
        let _ = self.sender.send(event);
    }
}

/// Board event sink for the CLI: traces every event and forwards it to the
/// bus.
#[derive(Clone)]
pub struct CliBoardEventSink {
    bus: EventBus,
}

impl CliBoardEventSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl BoardEventSink for CliBoardEventSink {
    fn emit(&self, event: BoardEvent) {
        match &event {
            BoardEvent::PersistFailed {
                job_id,
                candidate_id,
                message,
            } => {
                tracing::error!(job_id = %job_id, candidate_id, "Move was not saved: {}", message);
            }
            BoardEvent::LoadFailed { job_id, message } => {
                tracing::error!(job_id = %job_id, "Could not load candidates: {}", message);
            }
            other => {
                tracing::debug!(event = ?other, "board event");
            }
        }
        self.bus.publish(event);
    }
}
