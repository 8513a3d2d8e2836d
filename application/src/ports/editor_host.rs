//! Editor host port
//!
//! The text-editing surface exposes a pluggable provider API: one completion
//! and hover provider per language identifier.

use async_trait::async_trait;
use notebook_domain::{EditorPosition, Hover, Suggestion};
use std::sync::Arc;

/// Completion and hover provider, called by the editor with 1-based positions.
#[async_trait]
pub trait LanguageProvider: Send + Sync {
    async fn provide_completion(&self, uri: &str, position: EditorPosition) -> Vec<Suggestion>;

    async fn provide_hover(&self, uri: &str, position: EditorPosition) -> Option<Hover>;
}

pub trait EditorHost: Send + Sync {
    /// Install `provider` for `language_id`.
    fn install_provider(&self, language_id: &str, provider: Arc<dyn LanguageProvider>);
}

/// Host that discards installations (headless use and tests).
pub struct NoEditorHost;

impl EditorHost for NoEditorHost {
    fn install_provider(&self, _language_id: &str, _provider: Arc<dyn LanguageProvider>) {}
}
