//! Board events module.
//!
//! Board sessions emit these after store writes, persistence outcomes and
//! subscription changes. The rendering layer and the caller's error channel
//! implement the sink.

mod board_event;
mod sink;

pub use board_event::*;
pub use sink::*;
