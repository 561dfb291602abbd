//! Board event sink trait and implementations.

use std::sync::{Arc, Mutex, PoisonError};

use super::BoardEvent;

/// Trait for receiving board events.
///
/// `emit()` runs on the session's event queue, so it must be fast and must not
/// block: no network calls, no waiting on the session itself.
pub trait BoardEventSink: Send + Sync {
    fn emit(&self, event: BoardEvent);
}

/// No-op implementation for contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpBoardEventSink;

impl BoardEventSink for NoOpBoardEventSink {
    fn emit(&self, _event: BoardEvent) {}
}

/// Collecting sink, used by tests and by callers that poll for errors.
#[derive(Clone, Default)]
pub struct MockBoardEventSink {
    events: Arc<Mutex<Vec<BoardEvent>>>,
}

impl MockBoardEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<BoardEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns collected events that report errors.
    pub fn errors(&self) -> Vec<BoardEvent> {
        self.events()
            .into_iter()
            .filter(BoardEvent::is_error)
            .collect()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BoardEventSink for MockBoardEventSink {
    fn emit(&self, event: BoardEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
