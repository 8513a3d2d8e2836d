//! HTTP session directory.
//!
//! - `POST /chats` creates a session
//! - `GET /chats/{id}` fetches a session with its messages
//! - `GET /recent` lists recently used session ids

use crate::session::codec::WireMessage;
use async_trait::async_trait;
use notebook_application::{DirectoryError, SessionDirectory};
use notebook_domain::Session;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct WireSession {
    id: serde_json::Value,
    #[serde(default)]
    messages: Vec<WireMessage>,
}

impl WireSession {
    fn into_session(self) -> Result<Session, DirectoryError> {
        let id = crate::session::codec::wire_id(Some(&self.id))
            .ok_or_else(|| DirectoryError::Decode(format!("invalid session id: {}", self.id)))?;
        let mut messages = Vec::with_capacity(self.messages.len());
        for wire in self.messages {
            let raw_id = wire.id.clone();
            match wire.into_message() {
                Some(m) => messages.push(m),
                None => warn!("Skipping stored message with invalid id {}", raw_id),
            }
        }
        Ok(Session::new(id, messages))
    }
}

pub struct HttpSessionDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, DirectoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SessionDirectory for HttpSessionDirectory {
    async fn create_session(&self) -> Result<Session, DirectoryError> {
        debug!("Creating session at {}", self.base_url);
        let response = self
            .client
            .post(self.url("/chats"))
            .send()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;
        Self::decode::<WireSession>(response).await?.into_session()
    }

    async fn fetch_session(&self, id: &str) -> Result<Session, DirectoryError> {
        debug!("Fetching session {}", id);
        let response = self
            .client
            .get(self.url(&format!("/chats/{}", id)))
            .send()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;
        Self::decode::<WireSession>(response).await?.into_session()
    }

    async fn recent_sessions(&self) -> Result<Vec<String>, DirectoryError> {
        let response = self
            .client
            .get(self.url("/recent"))
            .send()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;
        let ids: Vec<serde_json::Value> = Self::decode(response).await?;
        Ok(ids
            .iter()
            .filter_map(|v| crate::session::codec::wire_id(Some(v)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal HTTP peer answering one request with `status` and `body`.
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut tcp, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = tcp.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            tcp.write_all(response.as_bytes()).await.unwrap();
            request
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_fetch_session() {
        let body = json!({
            "id": "abc",
            "messages": [
                {"id": 1, "type": "text", "content": "hello", "author": "ana"},
                {"id": 2, "type": "code", "content": "print(1)", "output": [], "execution_status": "pending"}
            ]
        })
        .to_string();
        let (base, server) = serve_once("200 OK", body).await;

        let session = HttpSessionDirectory::new(base)
            .fetch_session("abc")
            .await
            .unwrap();
        assert_eq!(session.id(), "abc");
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].author(), "ana");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /chats/abc "));
    }

    #[tokio::test]
    async fn test_create_session_posts() {
        let (base, server) = serve_once("200 OK", json!({"id": 9, "messages": []}).to_string()).await;
        let session = HttpSessionDirectory::new(format!("{}/", base))
            .create_session()
            .await
            .unwrap();
        assert_eq!(session.id(), "9");
        assert!(session.messages().is_empty());
        assert!(server.await.unwrap().starts_with("POST /chats "));
    }

    #[tokio::test]
    async fn test_recent_sessions() {
        let (base, _server) = serve_once("200 OK", json!(["a", 2, null]).to_string()).await;
        let ids = HttpSessionDirectory::new(base).recent_sessions().await.unwrap();
        assert_eq!(ids, vec!["a".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (base, _server) = serve_once("404 Not Found", "chat not found".to_string()).await;
        let err = HttpSessionDirectory::new(base)
            .fetch_session("nope")
            .await
            .unwrap_err();
        match err {
            DirectoryError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "chat not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
