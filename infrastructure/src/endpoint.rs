//! Channel endpoints derived from the configured server base URL.

/// WebSocket base for an `http(s)` base URL (`http` → `ws`, `https` → `wss`).
pub fn ws_base(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        trimmed.to_string()
    }
}

/// Session channel endpoint: `{ws_base}/ws/{session_id}`.
pub fn session_endpoint(base_url: &str, session_id: &str) -> String {
    format!("{}/ws/{}", ws_base(base_url), session_id)
}

/// Language channel endpoint: `{ws_base}/ws/{session_id}/lsp`.
pub fn language_endpoint(base_url: &str, session_id: &str) -> String {
    format!("{}/ws/{}/lsp", ws_base(base_url), session_id)
}
