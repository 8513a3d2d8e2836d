//! Language-intelligence channel adapter.
//!
//! One [`LanguageChannel`] per open editor surface: a WebSocket transport
//! carrying JSON-RPC, with a [`RequestCorrelator`] as its envelope handler.

use crate::error::{CorrelatorError, TransportError};
use crate::rpc::RequestCorrelator;
use crate::transport::{ConnectionState, EnvelopeSink, WsTransport};
use async_trait::async_trait;
use notebook_application::{LanguageClient, LanguageClientError};
use serde_json::Value;
use std::sync::Arc;

pub struct LanguageChannel {
    transport: Arc<WsTransport>,
    correlator: Arc<RequestCorrelator>,
}

impl LanguageChannel {
    pub async fn connect(endpoint: &str) -> Result<Self, TransportError> {
        let transport = WsTransport::connect(endpoint).await?;
        let correlator = Arc::new(RequestCorrelator::new(transport.clone()));
        transport.start(correlator.clone())?;
        Ok(Self {
            transport,
            correlator,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }
}

impl From<CorrelatorError> for LanguageClientError {
    fn from(err: CorrelatorError) -> Self {
        match err {
            CorrelatorError::TransportClosed => LanguageClientError::TransportClosed,
            CorrelatorError::NotOpen { state } => LanguageClientError::NotOpen(state),
            CorrelatorError::Rpc { code, message } => LanguageClientError::Rpc { code, message },
            CorrelatorError::Send(reason) => LanguageClientError::Other(reason),
        }
    }
}

#[async_trait]
impl LanguageClient for LanguageChannel {
    async fn call(&self, method: &str, params: Value) -> Result<Option<Value>, LanguageClientError> {
        Ok(self.correlator.call(method, params).await?)
    }

    async fn notify(&self, method: &str, params: Value) -> Result<(), LanguageClientError> {
        Ok(self.correlator.notify(method, params)?)
    }

    fn close(&self) {
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt, StreamExt};
    use notebook_application::{LanguageBridge, NoEditorHost};
    use notebook_domain::EditorPosition;
    use serde_json::json;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::Message;

    /// Fake language server: answers completion with one item, hover with a
    /// string, and swallows requests whose method is `slow/never`.
    async fn fake_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(tcp).await.unwrap();
            while let Some(Ok(Message::Text(text))) = ws.next().await {
                let req: Value = serde_json::from_str(text.as_str()).unwrap();
                let Some(id) = req.get("id").cloned() else {
                    continue;
                };
                let result = match req["method"].as_str() {
                    Some("textDocument/completion") => json!({
                        "items": [{ "label": "print", "kind": 3 }],
                        "echo": req["params"]["position"].clone(),
                    }),
                    Some("textDocument/hover") => json!({ "contents": "print(*args)" }),
                    _ => continue,
                };
                let reply = json!({ "jsonrpc": "2.0", "id": id, "result": result });
                if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
                    break;
                }
            }
        });
        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn test_bridge_over_real_channel() {
        let endpoint = fake_server().await;
        let channel = Arc::new(LanguageChannel::connect(&endpoint).await.unwrap());
        let bridge = Arc::new(LanguageBridge::new(Arc::new(NoEditorHost)));
        bridge.register("python", "s1_1", channel.clone());

        let suggestions = bridge.completion("s1_1", EditorPosition::new(1, 6)).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].insert_text, "print");

        let hover = bridge.hover("s1_1", EditorPosition::new(1, 2)).await.unwrap();
        assert_eq!(hover.contents[0].value, "print(*args)");

        bridge.unregister("s1_1");
        assert_ne!(channel.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_close_fails_outstanding_call() {
        let endpoint = fake_server().await;
        let channel = Arc::new(LanguageChannel::connect(&endpoint).await.unwrap());

        let c = channel.clone();
        let pending = tokio::spawn(async move { c.call("slow/never", json!({})).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        channel.close();

        let result = tokio::time::timeout(Duration::from_secs(5), pending)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Err(LanguageClientError::TransportClosed));
    }

    #[tokio::test]
    async fn test_notify_after_close_reports_state() {
        let endpoint = fake_server().await;
        let channel = LanguageChannel::connect(&endpoint).await.unwrap();
        channel.close();
        let err = channel
            .notify("textDocument/didChange", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LanguageClientError::NotOpen(_)));
    }
}
