//! Language intelligence bridge.
//!
//! Maps editor surfaces (by document URI) to language clients and serves
//! completion and hover for the editor. Positions arrive 1-based from the
//! editor and leave 0-based on the wire.
//!
//! The editor's provider API takes one provider per language. The bridge
//! installs itself lazily on the first registration for a language and
//! never again, however many surfaces come and go.

use crate::config::BehaviorConfig;
use crate::ports::editor_host::{EditorHost, LanguageProvider};
use crate::ports::language_client::{LanguageClient, LanguageClientError};
use async_trait::async_trait;
use notebook_domain::{
    EditorPosition, Hover, Suggestion, hover_from_result, suggestions_from_result,
};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, trace, warn};

pub struct LanguageBridge {
    host: Arc<dyn EditorHost>,
    behavior: BehaviorConfig,
    clients: RwLock<HashMap<String, Arc<dyn LanguageClient>>>,
    versions: Mutex<HashMap<String, i64>>,
    installed: Mutex<HashSet<String>>,
}

impl LanguageBridge {
    pub fn new(host: Arc<dyn EditorHost>) -> Self {
        Self {
            host,
            behavior: BehaviorConfig::default(),
            clients: RwLock::new(HashMap::new()),
            versions: Mutex::new(HashMap::new()),
            installed: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Bind `client` to the surface identified by `uri`.
    ///
    /// Re-registering a URI replaces (and closes) the previous client unless
    /// it is the same one.
    pub fn register(self: &Arc<Self>, language_id: &str, uri: &str, client: Arc<dyn LanguageClient>) {
        let previous = match self.clients.write() {
            Ok(mut clients) => clients.insert(uri.to_string(), client.clone()),
            Err(e) => {
                warn!("Language client map poisoned: {}", e);
                return;
            }
        };
        let same_client = previous
            .as_ref()
            .is_some_and(|prev| Arc::ptr_eq(prev, &client));
        if !same_client {
            if let Some(prev) = previous {
                debug!("Replacing language client for {}", uri);
                prev.close();
            }
            // A new client starts from the server's open version.
            if let Ok(mut versions) = self.versions.lock() {
                versions.remove(uri);
            }
        }
        self.ensure_installed(language_id);
    }

    /// Drop the client bound to `uri`, closing it. No-op when unknown.
    pub fn unregister(&self, uri: &str) {
        let removed = self
            .clients
            .write()
            .ok()
            .and_then(|mut clients| clients.remove(uri));
        if let Some(client) = removed {
            debug!("Unregistered language client for {}", uri);
            client.close();
        }
        if let Ok(mut versions) = self.versions.lock() {
            versions.remove(uri);
        }
    }

    pub fn is_registered(&self, uri: &str) -> bool {
        self.clients
            .read()
            .map(|clients| clients.contains_key(uri))
            .unwrap_or(false)
    }

    fn ensure_installed(self: &Arc<Self>, language_id: &str) {
        let first = match self.installed.lock() {
            Ok(mut installed) => installed.insert(language_id.to_string()),
            Err(_) => false,
        };
        if first {
            debug!("Installing {} completion and hover provider", language_id);
            self.host
                .install_provider(language_id, self.clone() as Arc<dyn LanguageProvider>);
        }
    }

    fn client(&self, uri: &str) -> Option<Arc<dyn LanguageClient>> {
        self.clients.read().ok()?.get(uri).cloned()
    }

    async fn request(&self, uri: &str, method: &str, position: EditorPosition) -> Option<Value> {
        let Some(client) = self.client(uri) else {
            trace!("No language client for {}", uri);
            return None;
        };
        let params = json!({
            "textDocument": { "uri": uri },
            "position": position.to_protocol(),
        });

        let result = match self.behavior.request_timeout {
            Some(limit) => tokio::time::timeout(limit, client.call(method, params))
                .await
                .unwrap_or(Err(LanguageClientError::Timeout)),
            None => client.call(method, params).await,
        };

        match result {
            Ok(value) => value,
            Err(e) => {
                debug!("{} for {} failed: {}", method, uri, e);
                None
            }
        }
    }

    /// Completion suggestions at a 1-based editor position.
    ///
    /// Empty when no client is registered or the server fails.
    pub async fn completion(&self, uri: &str, position: EditorPosition) -> Vec<Suggestion> {
        let result = self
            .request(uri, "textDocument/completion", position)
            .await;
        suggestions_from_result(result.as_ref())
    }

    pub async fn hover(&self, uri: &str, position: EditorPosition) -> Option<Hover> {
        let result = self.request(uri, "textDocument/hover", position).await;
        hover_from_result(result.as_ref())
    }

    /// Push the full text of the document at `uri` to its language server.
    ///
    /// The server opens each document at version 1, so the first change is
    /// sent as version 2. Returns `Ok(false)` when no client is registered
    /// for `uri`.
    pub async fn did_change(&self, uri: &str, text: &str) -> Result<bool, LanguageClientError> {
        let Some(client) = self.client(uri) else {
            return Ok(false);
        };
        let version = {
            let mut versions = self
                .versions
                .lock()
                .map_err(|e| LanguageClientError::Other(e.to_string()))?;
            let v = versions.entry(uri.to_string()).or_insert(1);
            *v += 1;
            *v
        };
        client
            .notify(
                "textDocument/didChange",
                json!({
                    "textDocument": { "uri": uri, "version": version },
                    "contentChanges": [{ "text": text }],
                }),
            )
            .await?;
        Ok(true)
    }
}

#[async_trait]
impl LanguageProvider for LanguageBridge {
    async fn provide_completion(&self, uri: &str, position: EditorPosition) -> Vec<Suggestion> {
        self.completion(uri, position).await
    }

    async fn provide_hover(&self, uri: &str, position: EditorPosition) -> Option<Hover> {
        self.hover(uri, position).await
    }
}
