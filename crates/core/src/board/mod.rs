//! Board module - drag gesture handling and the per-job session event queue.

mod drag_model;
mod drag_orchestrator;
mod session;
mod session_model;

#[cfg(test)]
mod drag_orchestrator_tests;


pub use drag_model::{DragUpdate, DropResult, DropTarget};
pub use drag_orchestrator::{DragOrchestrator, DragState, DropOutcome};
pub use session::{BoardSender, BoardSession};
pub use session_model::{BoardCommand, BoardEffect, ReconcilePolicy, SessionOptions};
