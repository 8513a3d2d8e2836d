//! WebSocket transport.
//!
//! One [`WsTransport`] owns one duplex connection. A single background task
//! owns both halves of the socket: it drains the outbound queue and delivers
//! inbound envelopes to the registered [`EnvelopeHandler`], one at a time and
//! in arrival order.
//!
//! Setup is two-phase. [`WsTransport::connect`] performs the handshake;
//! [`WsTransport::start`] installs the handler and spawns the I/O task.
//! Frames that arrive in between wait in the socket, so nothing is lost
//! while the caller wires up a handler that itself needs the transport (for
//! example a correlator that sends through it).

use crate::error::{Result, TransportError};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives lifecycle notifications and decoded inbound envelopes.
///
/// Callbacks run on the transport's I/O task and must not block or call
/// [`WsTransport::close`] on the transport delivering them.
pub trait EnvelopeHandler: Send + Sync {
    fn on_open(&self) {}

    fn on_message(&self, envelope: Value);

    fn on_error(&self, error: &TransportError) {
        warn!("Transport error: {}", error);
    }

    fn on_close(&self) {}
}

/// Outbound half of a channel.
pub trait EnvelopeSink: Send + Sync {
    fn state(&self) -> ConnectionState;

    /// Queue one serialized envelope. Fails when the channel is not open.
    fn send_text(&self, text: String) -> Result<()>;
}

pub struct WsTransport {
    endpoint: String,
    state: AtomicU8,
    handler: Mutex<Option<Arc<dyn EnvelopeHandler>>>,
    unstarted: Mutex<Option<(WsStream, mpsc::UnboundedReceiver<String>)>>,
    outbound: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl WsTransport {
    /// Open a connection to `endpoint` (a `ws://` or `wss://` URL).
    pub async fn connect(endpoint: &str) -> Result<Arc<Self>> {
        debug!("Connecting to {}", endpoint);
        let (ws, _) = connect_async(endpoint)
            .await
            .map_err(|e| TransportError::Connect {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        info!("Connected to {}", endpoint);

        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Arc::new(Self {
            endpoint: endpoint.to_string(),
            state: AtomicU8::new(ConnectionState::Open as u8),
            handler: Mutex::new(None),
            unstarted: Mutex::new(Some((ws, rx))),
            outbound: tx,
            cancel: CancellationToken::new(),
        }))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Install `handler` and begin delivering inbound envelopes to it.
    ///
    /// Can only be called once.
    pub fn start(self: &Arc<Self>, handler: Arc<dyn EnvelopeHandler>) -> Result<()> {
        let Some((ws, rx)) = self
            .unstarted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        else {
            return Err(TransportError::NotOpen {
                state: format!("{} (already started)", self.state()),
            });
        };

        handler.on_open();
        *self.handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);

        let transport = Arc::clone(self);
        tokio::spawn(async move {
            transport.io_loop(ws, rx).await;
        });
        Ok(())
    }

    /// Serialize and queue an envelope.
    pub fn send_json(&self, envelope: &Value) -> Result<()> {
        let text = serde_json::to_string(envelope)?;
        self.send_text(text)
    }

    /// Tear down the channel.
    ///
    /// After this returns no further `on_message` is delivered. The handler
    /// receives `on_close` exactly once across `close` and remote closure.
    /// Safe to call repeatedly.
    pub fn close(&self) {
        if self.state() == ConnectionState::Closed {
            return;
        }
        self.set_state(ConnectionState::Closing);

        // Taking the handler waits for an in-flight delivery to finish.
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        self.cancel.cancel();

        let never_started = self
            .unstarted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .is_some();
        if never_started {
            self.set_state(ConnectionState::Closed);
        }

        debug!("Closed channel to {}", self.endpoint);
        if let Some(h) = handler {
            h.on_close();
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    fn deliver(&self, text: &str) {
        let envelope: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                warn!("Dropping malformed envelope from {}: {}", self.endpoint, e);
                return;
            }
        };
        trace!("Received from {}: {}", self.endpoint, text);

        let guard = self.handler.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handler) = guard.as_ref() {
            handler.on_message(envelope);
        }
    }

    fn report_error(&self, error: &TransportError) {
        let guard = self.handler.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handler) = guard.as_ref() {
            handler.on_error(error);
        }
    }

    /// Single owner of the socket. Runs until cancelled or the peer goes away.
    async fn io_loop(&self, ws: WsStream, mut outbound: mpsc::UnboundedReceiver<String>) {
        let (mut sink, mut stream) = ws.split();

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    let _ = sink.send(Message::Close(None)).await;
                    let _ = sink.close().await;
                    break;
                }

                out = outbound.recv() => {
                    let Some(text) = out else { break };
                    trace!("Sending to {}: {}", self.endpoint, text);
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        self.report_error(&TransportError::WebSocket(e));
                        break;
                    }
                }

                inbound = stream.next() => {
                    match inbound {
                        Some(Ok(Message::Text(text))) => self.deliver(text.as_str()),
                        Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                            Ok(text) => self.deliver(text),
                            Err(_) => warn!("Dropping non-UTF-8 frame from {}", self.endpoint),
                        },
                        Some(Ok(Message::Close(frame))) => {
                            debug!("Peer closed {}: {:?}", self.endpoint, frame);
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            self.report_error(&TransportError::WebSocket(e));
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        self.set_state(ConnectionState::Closed);
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(h) = handler {
            info!("Channel to {} closed by peer", self.endpoint);
            h.on_close();
        }
    }
}

impl EnvelopeSink for WsTransport {
    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn send_text(&self, text: String) -> Result<()> {
        let state = self.state();
        if state != ConnectionState::Open {
            return Err(TransportError::NotOpen {
                state: state.to_string(),
            });
        }
        self.outbound.send(text).map_err(|_| TransportError::Closed)
    }
}
