// WebSocket link to the room server. A background transport loop owns the
// socket; the session talks to it through channels only. Unexpected drops are
// retried a bounded number of times, client-initiated shutdown is not.

use std::fmt;
use std::sync::Arc;

use futures::SinkExt;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::{Notify, mpsc, watch};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, info_span, warn};

use crate::frameworks::config::{
    self, CONNECT_TIMEOUT, NET_EVENT_CHANNEL_CAPACITY, RECONNECT_ATTEMPTS, RECONNECT_DELAY,
};
use crate::interface_adapters::protocol::{ClientMessage, RoomRef, ServerMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Observable connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    /// Retries exhausted; the loop has stopped.
    Failed,
}

/// Everything the session consumes from the link, merged onto one channel so
/// ordering between link transitions and server messages is preserved.
#[derive(Debug, Clone)]
pub enum NetEvent {
    Link(LinkState),
    Server(ServerMessage),
}

#[derive(Debug)]
pub enum NetError {
    Ws(tokio_tungstenite::tungstenite::Error),
    ConnectTimeout,
    NotConnected,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Ws(e) => write!(f, "websocket error: {e}"),
            NetError::ConnectTimeout => write!(f, "connect timed out"),
            NetError::NotConnected => write!(f, "not connected"),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for NetError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        NetError::Ws(e)
    }
}

/// Connection settings, normally derived from the environment.
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub url: String,
    pub room_id: String,
    pub reconnect_attempts: u32,
    pub reconnect_delay: std::time::Duration,
    pub connect_timeout: std::time::Duration,
}

impl NetConfig {
    pub fn from_env(room_id: impl Into<String>) -> Self {
        Self {
            url: config::ws_url(),
            room_id: room_id.into(),
            reconnect_attempts: RECONNECT_ATTEMPTS,
            reconnect_delay: RECONNECT_DELAY,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// Handle to the background transport loop. Sending queues a message; the
/// loop flushes it on the live socket or drops it while the link is down.
pub struct NetClient {
    outbound: mpsc::UnboundedSender<ClientMessage>,
    link: watch::Receiver<LinkState>,
    shutdown: Arc<Notify>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl NetClient {
    /// Spawns the transport loop and returns the handle plus the merged
    /// event receiver.
    pub fn start(config: NetConfig) -> (Self, mpsc::Receiver<NetEvent>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(NET_EVENT_CHANNEL_CAPACITY);
        let (link_tx, link_rx) = watch::channel(LinkState::Disconnected);
        let shutdown = Arc::new(Notify::new());

        let task = tokio::spawn(transport_loop(
            config,
            outbound_rx,
            event_tx,
            link_tx,
            Arc::clone(&shutdown),
        ));

        let client = Self {
            outbound: outbound_tx,
            link: link_rx,
            shutdown,
            task: Some(task),
        };
        (client, event_rx)
    }

    /// Queues a message for the transport loop.
    pub fn send(&self, message: ClientMessage) -> Result<(), NetError> {
        self.outbound.send(message).map_err(|_| NetError::NotConnected)
    }

    pub fn link_state(&self) -> LinkState {
        *self.link.borrow()
    }

    /// Watch half for callers that want to await transitions.
    pub fn link_watch(&self) -> watch::Receiver<LinkState> {
        self.link.clone()
    }

    /// Graceful teardown: the loop sends `room:leave`, closes the socket and
    /// exits without retrying.
    pub async fn shutdown(&mut self) {
        self.shutdown.notify_one();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "transport loop join failed");
            }
        }
    }
}

impl Drop for NetClient {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

enum LoopExit {
    // Server or network dropped us; eligible for a retry.
    Lost,
    // We were asked to stop.
    Requested,
}

async fn transport_loop(
    config: NetConfig,
    mut outbound: mpsc::UnboundedReceiver<ClientMessage>,
    events: mpsc::Sender<NetEvent>,
    link: watch::Sender<LinkState>,
    shutdown: Arc<Notify>,
) {
    let span = info_span!("transport", room_id = %config.room_id);
    let _guard = span.enter();

    let mut attempt: u32 = 0;
    loop {
        let state = if attempt == 0 {
            LinkState::Connecting
        } else {
            LinkState::Reconnecting { attempt }
        };
        publish(&link, &events, state).await;

        match timeout(config.connect_timeout, connect_async(&config.url)).await {
            Ok(Ok((mut socket, _response))) => {
                info!(url = %config.url, "connected");
                attempt = 0;
                publish(&link, &events, LinkState::Connected).await;

                // The server scopes everything to the room; join is the first
                // frame on every (re)connect.
                let join = ClientMessage::RoomJoin(RoomRef {
                    room_id: config.room_id.clone(),
                });
                if let Err(e) = send_json(&mut socket, &join).await {
                    warn!(error = %e, "join failed");
                } else {
                    match pump(&mut socket, &mut outbound, &events, &shutdown).await {
                        LoopExit::Requested => {
                            let leave = ClientMessage::RoomLeave(RoomRef {
                                room_id: config.room_id.clone(),
                            });
                            if let Err(e) = send_json(&mut socket, &leave).await {
                                debug!(error = %e, "leave not delivered");
                            }
                            let _ = socket.close(None).await;
                            publish(&link, &events, LinkState::Disconnected).await;
                            return;
                        }
                        LoopExit::Lost => {
                            publish(&link, &events, LinkState::Disconnected).await;
                        }
                    }
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, attempt, "connect failed");
            }
            Err(_) => {
                warn!(attempt, "connect timed out");
            }
        }

        attempt += 1;
        if attempt > config.reconnect_attempts {
            warn!(attempts = config.reconnect_attempts, "retries exhausted");
            publish(&link, &events, LinkState::Failed).await;
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = shutdown.notified() => {
                publish(&link, &events, LinkState::Disconnected).await;
                return;
            }
        }
    }
}

/// Pumps frames both ways until the socket dies or shutdown is requested.
async fn pump(
    socket: &mut WsStream,
    outbound: &mut mpsc::UnboundedReceiver<ClientMessage>,
    events: &mpsc::Sender<NetEvent>,
    shutdown: &Arc<Notify>,
) -> LoopExit {
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                debug!("shutdown requested");
                return LoopExit::Requested;
            }

            queued = outbound.recv() => {
                let Some(message) = queued else {
                    // All handles dropped; treat as a shutdown.
                    return LoopExit::Requested;
                };
                if let Err(e) = send_json(socket, &message).await {
                    warn!(error = %e, "send failed");
                    return LoopExit::Lost;
                }
            }

            frame = socket.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(text.as_str()) {
                            Ok(message) => {
                                if events.send(NetEvent::Server(message)).await.is_err() {
                                    // Session gone; nothing left to do.
                                    return LoopExit::Requested;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, raw = text.as_str(), "unparseable frame skipped");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Binary(_))) => {
                        debug!("binary frame ignored");
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "server closed");
                        return LoopExit::Lost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "socket error");
                        return LoopExit::Lost;
                    }
                    None => {
                        info!("socket ended");
                        return LoopExit::Lost;
                    }
                }
            }
        }
    }
}

async fn send_json(socket: &mut WsStream, message: &ClientMessage) -> Result<(), NetError> {
    let json = serde_json::to_string(message).map_err(|e| {
        // Serialization of our own DTOs failing is a programmer error, but
        // the loop survives it.
        warn!(error = %e, "serialize failed");
        NetError::NotConnected
    })?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}

async fn publish(
    link: &watch::Sender<LinkState>,
    events: &mpsc::Sender<NetEvent>,
    state: LinkState,
) {
    let _ = link.send(state);
    // Link transitions must not be lost even under backpressure.
    if events.send(NetEvent::Link(state)).await.is_err() {
        debug!("event receiver dropped");
    }
}
