//! Hireboard Connect - Network adapters for the candidate board.
//!
//! This crate provides the REST client that loads jobs and candidates and
//! persists moves, plus the Phoenix channel socket that delivers remote
//! `candidate_updated` notifications.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hireboard_connect::{BoardApiClient, PhoenixSocket, DEFAULT_TIMEOUT};
//!
//! let client = BoardApiClient::new("http://localhost:4000/api", DEFAULT_TIMEOUT)?;
//! let socket = PhoenixSocket::connect("ws://localhost:4000/socket/websocket").await?;
//! ```

mod channel;
mod client;
mod error;
mod types;

pub use channel::{PhoenixSocket, DEFAULT_JOIN_TIMEOUT, HEARTBEAT_INTERVAL};
pub use client::{BoardApiClient, DEFAULT_TIMEOUT};
pub use error::{ConnectError, Result};
pub use types::*;
