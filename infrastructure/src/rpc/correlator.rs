//! Request/response correlation over one shared channel.
//!
//! Each [`RequestCorrelator`] owns the pending-call map for exactly one
//! transport. A call registers a `oneshot` sender under a fresh id before the
//! request is queued, and the transport's handler resolves it when the
//! response with that id arrives. Responses may arrive in any order.
//!
//! When the transport closes, every pending call is resolved with
//! [`CorrelatorError::TransportClosed`].

use crate::error::CorrelatorError;
use crate::rpc::classify::{MessageKind, classify_message};
use crate::rpc::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use crate::transport::{EnvelopeHandler, EnvelopeSink};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

type PendingTx = oneshot::Sender<Result<Option<Value>, CorrelatorError>>;

pub struct RequestCorrelator {
    sink: Arc<dyn EnvelopeSink>,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingTx>>,
}

impl RequestCorrelator {
    pub fn new(sink: Arc<dyn EnvelopeSink>) -> Self {
        Self {
            sink,
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Send a request and wait for the matching response's result.
    pub async fn call(&self, method: &str, params: Value) -> Result<Option<Value>, CorrelatorError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, Some(params));
        let text = serde_json::to_string(&request)
            .map_err(|e| CorrelatorError::Send(e.to_string()))?;

        let (tx, rx) = oneshot::channel();
        self.pending_map().insert(id, tx);
        // Removes the entry on every exit, including a caller dropping this
        // future (e.g. on timeout) before the response arrives.
        let _pending = PendingGuard {
            correlator: self,
            id,
        };

        self.sink.send_text(text)?;
        trace!("Sent {} (id={})", method, id);

        rx.await.unwrap_or(Err(CorrelatorError::TransportClosed))
    }

    /// Send a notification. Nothing is registered.
    pub fn notify(&self, method: &str, params: Value) -> Result<(), CorrelatorError> {
        let note = JsonRpcNotification::new(method, Some(params));
        let text =
            serde_json::to_string(&note).map_err(|e| CorrelatorError::Send(e.to_string()))?;
        self.sink.send_text(text)?;
        Ok(())
    }

    /// Resolve the pending call a response belongs to.
    ///
    /// Returns `true` when exactly one pending call was resolved. Anything
    /// else (notifications, unknown ids, malformed responses) is ignored.
    pub fn handle_message(&self, envelope: &Value) -> bool {
        let id = match classify_message(envelope) {
            MessageKind::Response { id } => id,
            MessageKind::IncomingRequest { id } => {
                debug!("Ignoring server request (id={})", id);
                return false;
            }
            MessageKind::Notification => {
                trace!("Ignoring notification: {}", envelope);
                return false;
            }
        };

        let Some(tx) = self.pending_map().remove(&id) else {
            debug!("No pending call for response id={}", id);
            return false;
        };

        let outcome = match serde_json::from_value::<JsonRpcResponse>(envelope.clone()) {
            Ok(JsonRpcResponse {
                error: Some(err), ..
            }) => Err(CorrelatorError::Rpc {
                code: err.code,
                message: err.message,
            }),
            Ok(resp) => Ok(resp.result.filter(|v| !v.is_null())),
            Err(e) => {
                warn!("Malformed response (id={}): {}", id, e);
                Err(CorrelatorError::Rpc {
                    code: -32700,
                    message: format!("malformed response: {}", e),
                })
            }
        };
        // The caller may have given up; that is not an error here.
        let _ = tx.send(outcome);
        true
    }

    /// Resolve every pending call with a closure error.
    pub fn fail_pending(&self) -> usize {
        let drained: Vec<PendingTx> = self.pending_map().drain().map(|(_, tx)| tx).collect();
        let count = drained.len();
        for tx in drained {
            let _ = tx.send(Err(CorrelatorError::TransportClosed));
        }
        if count > 0 {
            debug!("Released {} pending call(s) on close", count);
        }
        count
    }

    pub fn pending_count(&self) -> usize {
        self.pending_map().len()
    }

    fn pending_map(&self) -> std::sync::MutexGuard<'_, HashMap<u64, PendingTx>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct PendingGuard<'a> {
    correlator: &'a RequestCorrelator,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.correlator.pending_map().remove(&self.id).is_some() {
            trace!("Abandoned call id={}", self.id);
        }
    }
}

impl EnvelopeHandler for RequestCorrelator {
    fn on_message(&self, envelope: Value) {
        self.handle_message(&envelope);
    }

    fn on_close(&self) {
        self.fail_pending();
    }
}
