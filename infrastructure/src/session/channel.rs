//! Session channel adapter.
//!
//! Decodes inbound envelopes into [`RemoteEvent`]s and hands them to the
//! owner of the reconciler through an unbounded queue, preserving arrival
//! order. The queue closes when the channel closes.

use crate::error::TransportError;
use crate::session::codec::decode_envelope;
use crate::transport::{ConnectionState, EnvelopeHandler, EnvelopeSink, WsTransport};
use async_trait::async_trait;
use notebook_application::{SessionTransport, SessionTransportError};
use notebook_domain::{CreateRequest, RemoteEvent};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

struct SessionEnvelopeHandler {
    events: mpsc::UnboundedSender<RemoteEvent>,
}

impl EnvelopeHandler for SessionEnvelopeHandler {
    fn on_message(&self, envelope: Value) {
        let event = decode_envelope(&envelope);
        trace!("Session event: {}", event.name());
        if self.events.send(event).is_err() {
            debug!("Session event receiver dropped");
        }
    }

    fn on_close(&self) {
        debug!("Session channel closed");
    }
}

pub struct SessionChannel {
    transport: Arc<WsTransport>,
}

impl SessionChannel {
    /// Connect to `endpoint` and start receiving events.
    pub async fn connect(
        endpoint: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RemoteEvent>), TransportError> {
        let transport = WsTransport::connect(endpoint).await?;
        let (tx, rx) = mpsc::unbounded_channel();
        transport.start(Arc::new(SessionEnvelopeHandler { events: tx }))?;
        Ok((Self { transport }, rx))
    }

    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }

    pub fn close(&self) {
        self.transport.close();
    }
}

#[async_trait]
impl SessionTransport for SessionChannel {
    fn is_open(&self) -> bool {
        self.transport.state() == ConnectionState::Open
    }

    async fn send_create(&self, request: &CreateRequest) -> Result<(), SessionTransportError> {
        let text = serde_json::to_string(request)
            .map_err(|e| SessionTransportError::SendFailed(e.to_string()))?;
        self.transport.send_text(text).map_err(|e| match e {
            TransportError::NotOpen { state } => SessionTransportError::NotOpen(state),
            TransportError::Closed => SessionTransportError::Closed,
            other => SessionTransportError::SendFailed(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::websocket::tests::loopback;
    use notebook_domain::{MessageId, MessageKind};
    use std::time::Duration;

    async fn recv(rx: &mut mpsc::UnboundedReceiver<RemoteEvent>) -> RemoteEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_events_are_decoded_in_order() {
        let endpoint = loopback(vec![
            r#"{"result":"created","tmpID":"t1","id":42}"#.into(),
            r#"{"result":"code execution","id":42,"type":"status","content":"busy"}"#.into(),
            r#"{"result":"mystery"}"#.into(),
        ])
        .await;
        let (channel, mut rx) = SessionChannel::connect(&endpoint).await.unwrap();

        assert!(matches!(recv(&mut rx).await, RemoteEvent::Confirmation { .. }));
        assert!(matches!(recv(&mut rx).await, RemoteEvent::StatusChange { .. }));
        assert!(matches!(recv(&mut rx).await, RemoteEvent::Unrecognized { .. }));
        channel.close();
    }

    #[tokio::test]
    async fn test_send_create_reaches_peer() {
        let endpoint = loopback(Vec::new()).await;
        let (channel, mut rx) = SessionChannel::connect(&endpoint).await.unwrap();
        assert!(channel.is_open());

        let id = MessageId::temporary();
        let request = CreateRequest::new(&id, "print(1)", MessageKind::Code, None).unwrap();
        channel.send_create(&request).await.unwrap();

        // The peer echoes the create envelope; it has no `result` tag.
        let RemoteEvent::Unrecognized { tag, raw } = recv(&mut rx).await else {
            panic!("expected the echoed envelope");
        };
        assert!(tag.is_none());
        let echoed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(echoed["request_type"], "create");
        assert_eq!(echoed["id"], id.as_str());
        channel.close();
    }

    #[tokio::test]
    async fn test_closed_channel_rejects_send_and_ends_stream() {
        let endpoint = loopback(Vec::new()).await;
        let (channel, mut rx) = SessionChannel::connect(&endpoint).await.unwrap();
        channel.close();
        assert!(!channel.is_open());

        let id = MessageId::temporary();
        let request = CreateRequest::new(&id, "hi", MessageKind::Text, None).unwrap();
        let err = channel.send_create(&request).await.unwrap_err();
        assert!(matches!(err, SessionTransportError::NotOpen(_)));

        let end = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert!(end.is_none());
    }
}
