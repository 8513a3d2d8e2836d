//! Message classification for inbound JSON-RPC frames.

/// Classification of an incoming JSON-RPC message.
///
/// - `Response` → resolves a pending call
/// - `IncomingRequest` → server-initiated request (not served by this client)
/// - `Notification` → server push such as `textDocument/publishDiagnostics`
#[derive(Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// A response to a request we sent (has `id`, no `method`).
    Response { id: u64 },
    /// A request from the server (has `id` + `method`).
    IncomingRequest { id: u64 },
    /// A notification, or anything without a usable numeric `id`.
    Notification,
}

/// Classify a JSON-RPC message by inspecting `id` and `method` fields.
pub fn classify_message(json: &serde_json::Value) -> MessageKind {
    let id = json.get("id").and_then(|v| v.as_u64());
    let method = json.get("method").and_then(|v| v.as_str());

    match (id, method) {
        (Some(id), Some(_)) => MessageKind::IncomingRequest { id },
        (Some(id), None) => MessageKind::Response { id },
        _ => MessageKind::Notification,
    }
}
