//! Realtime module - topic subscriptions and the remote invalidation
//! listener that turns `candidate_updated` notifications into refetches.

mod broadcast_hub;
mod invalidation_listener;
mod realtime_traits;

pub use broadcast_hub::BroadcastHub;
pub use invalidation_listener::InvalidationListener;
pub use realtime_traits::{ChannelMessage, LeaveGuard, RealtimeTransport, Subscription};
