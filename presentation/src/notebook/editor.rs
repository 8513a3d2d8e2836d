//! Editor host for the terminal REPL
//!
//! The REPL is the editing surface: it keeps the provider installed for each
//! language and asks it for completion and hover on the draft cell.
//!
//! Providers are held weakly. A provider (the language bridge) owns an
//! `Arc` to its host, so the owner of the provider must keep it alive.

use notebook_application::{EditorHost, LanguageProvider};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};
use tracing::debug;

#[derive(Default)]
pub struct ReplEditorHost {
    providers: RwLock<HashMap<String, Weak<dyn LanguageProvider>>>,
}

impl ReplEditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live provider for `language_id`, if one is installed and still owned.
    pub fn provider(&self, language_id: &str) -> Option<Arc<dyn LanguageProvider>> {
        self.providers.read().ok()?.get(language_id)?.upgrade()
    }
}

impl EditorHost for ReplEditorHost {
    fn install_provider(&self, language_id: &str, provider: Arc<dyn LanguageProvider>) {
        debug!("Provider installed for {}", language_id);
        if let Ok(mut providers) = self.providers.write() {
            providers.insert(language_id.to_string(), Arc::downgrade(&provider));
        }
    }
}
