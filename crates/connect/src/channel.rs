//! Phoenix channel transport over a single websocket.
//!
//! One background task owns the socket. It multiplexes every joined topic,
//! matches `phx_reply` frames to pending joins by ref, routes pushed events
//! to their subscription and sends a heartbeat on the `phoenix` topic. A
//! dropped connection is not re-established; subscriptions simply end.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, timeout, Instant};
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message as TungsteniteMessage, MaybeTlsStream,
    WebSocketStream,
};

use hireboard_core::realtime::{ChannelMessage, LeaveGuard, RealtimeTransport, Subscription};

use crate::error::{ConnectError, Result};
use crate::types::PhoenixFrame;

/// Interval between heartbeats; the server drops silent sockets after 60s.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// How long a join may wait for its `phx_reply`.
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum SocketCommand {
    Join {
        topic: String,
        join_ref: String,
        events: mpsc::UnboundedSender<ChannelMessage>,
        reply: oneshot::Sender<Result<()>>,
    },
    Leave {
        topic: String,
        join_ref: String,
    },
}

struct PendingJoin {
    topic: String,
    events: mpsc::UnboundedSender<ChannelMessage>,
    reply: oneshot::Sender<Result<()>>,
}

struct JoinedTopic {
    join_ref: String,
    events: mpsc::UnboundedSender<ChannelMessage>,
}

/// Monotonic message ref shared by the handle and the connection task.
#[derive(Clone, Default)]
struct RefCounter(Arc<AtomicU64>);

impl RefCounter {
    fn next(&self) -> String {
        (self.0.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

/// Handle to a Phoenix socket. Cloning shares the connection.
#[derive(Clone)]
pub struct PhoenixSocket {
    commands: mpsc::UnboundedSender<SocketCommand>,
    refs: RefCounter,
    join_timeout: Duration,
}

impl PhoenixSocket {
    /// Connects to `url` (e.g. "ws://localhost:4000/socket/websocket") and
    /// starts the connection task.
    pub async fn connect(url: &str) -> Result<Self> {
        let url = with_protocol_version(url);
        let (stream, _) = connect_async(url.as_str()).await?;
        info!("Connected to {}", url);

        let (commands, receiver) = mpsc::unbounded_channel();
        let refs = RefCounter::default();
        tokio::spawn(run_connection(stream, receiver, refs.clone()));

        Ok(Self {
            commands,
            refs,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
        })
    }

    pub fn with_join_timeout(mut self, join_timeout: Duration) -> Self {
        self.join_timeout = join_timeout;
        self
    }

    /// Whether the connection task is still running.
    pub fn is_connected(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn join_topic(&self, topic: &str) -> Result<Subscription> {
        let join_ref = self.refs.next();
        let (events, events_rx) = mpsc::unbounded_channel();
        let (reply, reply_rx) = oneshot::channel();

        self.commands
            .send(SocketCommand::Join {
                topic: topic.to_string(),
                join_ref: join_ref.clone(),
                events,
                reply,
            })
            .map_err(|_| ConnectError::channel("socket is closed"))?;

        match timeout(self.join_timeout, reply_rx).await {
            Ok(Ok(result)) => result?,
            Ok(Err(_)) => return Err(ConnectError::channel("socket closed during join")),
            Err(_) => {
                let _ = self.commands.send(SocketCommand::Leave {
                    topic: topic.to_string(),
                    join_ref,
                });
                return Err(ConnectError::channel(format!("join of {} timed out", topic)));
            }
        }

        let commands = self.commands.clone();
        let left_topic = topic.to_string();
        let guard = LeaveGuard::new(move || {
            // The connection may already be gone; nothing to leave then.
            let _ = commands.send(SocketCommand::Leave {
                topic: left_topic,
                join_ref,
            });
        });

        Ok(Subscription::new(topic, events_rx, guard))
    }
}

#[async_trait]
impl RealtimeTransport for PhoenixSocket {
    async fn join(&self, topic: &str) -> hireboard_core::Result<Subscription> {
        Ok(self.join_topic(topic).await?)
    }
}

/// Array frames need protocol version 2.
fn with_protocol_version(url: &str) -> String {
    if url.contains("vsn=") {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&vsn=2.0.0", url)
    } else {
        format!("{}?vsn=2.0.0", url)
    }
}

async fn send_frame(stream: &mut WsStream, frame: &PhoenixFrame) -> Result<()> {
    let text = serde_json::to_string(frame)?;
    stream.send(TungsteniteMessage::Text(text.into())).await?;
    Ok(())
}

async fn run_connection(
    mut stream: WsStream,
    mut commands: mpsc::UnboundedReceiver<SocketCommand>,
    refs: RefCounter,
) {
    let mut pending: HashMap<String, PendingJoin> = HashMap::new();
    let mut joined: HashMap<String, JoinedTopic> = HashMap::new();
    let mut heartbeat = interval_at(Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if let Err(e) = send_frame(&mut stream, &PhoenixFrame::heartbeat(&refs.next())).await {
                    warn!("Heartbeat failed: {}", e);
                    break;
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("Socket handle dropped, closing connection");
                    let _ = stream.close(None).await;
                    break;
                };
                let sent = match command {
                    SocketCommand::Join { topic, join_ref, events, reply } => {
                        let frame = PhoenixFrame::join(&topic, &join_ref);
                        pending.insert(join_ref, PendingJoin { topic, events, reply });
                        send_frame(&mut stream, &frame).await
                    }
                    SocketCommand::Leave { topic, join_ref } => {
                        pending.remove(&join_ref);
                        if joined.get(&topic).is_some_and(|t| t.join_ref == join_ref) {
                            joined.remove(&topic);
                        }
                        debug!("Leaving {}", topic);
                        send_frame(&mut stream, &PhoenixFrame::leave(&topic, &join_ref, &refs.next())).await
                    }
                };
                if let Err(e) = sent {
                    warn!("Failed to write to socket: {}", e);
                    break;
                }
            }
            message = stream.next() => {
                match message {
                    Some(Ok(TungsteniteMessage::Text(text))) => {
                        match serde_json::from_str::<PhoenixFrame>(text.as_str()) {
                            Ok(frame) => route_frame(frame, &mut pending, &mut joined),
                            Err(e) => warn!("Ignoring malformed frame: {}", e),
                        }
                    }
                    Some(Ok(TungsteniteMessage::Close(_))) | None => {
                        info!("Socket closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Socket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    // Dropping the senders ends every subscription; pending joins fail.
    for (_, join) in pending.drain() {
        let _ = join.reply.send(Err(ConnectError::channel("socket closed")));
    }
}

fn route_frame(
    frame: PhoenixFrame,
    pending: &mut HashMap<String, PendingJoin>,
    joined: &mut HashMap<String, JoinedTopic>,
) {
    if let Some(status) = frame.reply_status() {
        let Some(join) = frame.msg_ref.as_ref().and_then(|r| pending.remove(r)) else {
            // Heartbeat and leave acknowledgements.
            return;
        };
        if status == "ok" {
            debug!("Joined {}", join.topic);
            let join_ref = frame.msg_ref.clone().unwrap_or_default();
            joined.insert(
                join.topic,
                JoinedTopic {
                    join_ref,
                    events: join.events,
                },
            );
            let _ = join.reply.send(Ok(()));
        } else {
            let reason = frame.payload.get("response").cloned().unwrap_or_default();
            let _ = join.reply.send(Err(ConnectError::channel(format!(
                "join of {} refused: {}",
                join.topic, reason
            ))));
        }
        return;
    }

    let Some(topic) = joined.get(&frame.topic) else {
        return;
    };
    if frame
        .join_ref
        .as_ref()
        .is_some_and(|join_ref| *join_ref != topic.join_ref)
    {
        return;
    }

    if frame.closes_channel() {
        warn!("Channel {} closed by server ({})", frame.topic, frame.event);
        joined.remove(&frame.topic);
        return;
    }

    let name = frame.topic.clone();
    let message = ChannelMessage::new(frame.topic, frame.event, frame.payload);
    if topic.events.send(message).is_err() {
        joined.remove(&name);
    }
}
