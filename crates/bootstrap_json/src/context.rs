use std::sync::OnceLock;

use tracing::{debug, info};

use crate::document::Bootstrap;
use crate::error::{BootstrapError, Result};
use crate::render::{Slot, render};
use crate::source::BootstrapSource;

/// State owned by one build invocation: created at build start, loaded once,
/// then read by every render call until it is dropped.
#[derive(Debug, Default)]
pub struct BootstrapContext {
    bootstrap: OnceLock<Bootstrap>,
}

impl BootstrapContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that already holds `bootstrap`.
    #[must_use]
    pub fn with_bootstrap(bootstrap: Bootstrap) -> Self {
        Self {
            bootstrap: OnceLock::from(bootstrap),
        }
    }

    /// Build-step hook: loads the document from `source` and stores it.
    pub fn fetch(&self, source: &dyn BootstrapSource) -> Result<()> {
        if self.is_loaded() {
            return Err(BootstrapError::AlreadyLoaded);
        }

        info!(source = %source.describe(), "fetching bootstrap document");
        let bootstrap = source.load()?;
        debug!(
            stylesheets = bootstrap.stylesheets().count(),
            plugin_js = bootstrap.plugin_js.len(),
            setup_keys = bootstrap.setup_data.len(),
            "bootstrap document loaded"
        );
        self.store(bootstrap)
    }

    pub fn store(&self, bootstrap: Bootstrap) -> Result<()> {
        self.bootstrap
            .set(bootstrap)
            .map_err(|_| BootstrapError::AlreadyLoaded)
    }

    #[must_use]
    pub fn bootstrap(&self) -> Option<&Bootstrap> {
        self.bootstrap.get()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.bootstrap.get().is_some()
    }

    /// Fragment for `slot`, or `None` when nothing has been loaded.
    #[must_use]
    pub fn render(&self, slot: Slot) -> Option<String> {
        let bootstrap = self.bootstrap.get()?;
        let fragment = render(slot, bootstrap);
        debug!(slot = %slot, bytes = fragment.len(), "rendered fragment");
        Some(fragment)
    }

    /// Content-injection hook keyed by slot name. Unknown names yield `None`.
    #[must_use]
    pub fn content_for(&self, slot_name: &str) -> Option<String> {
        if !self.is_loaded() {
            return None;
        }
        self.render(Slot::parse(slot_name)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::BootstrapContext;
    use crate::document::Bootstrap;
    use crate::error::{BootstrapError, Result};
    use crate::render::Slot;
    use crate::source::BootstrapSource;

    struct StaticSource(Value);

    impl BootstrapSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn load_raw(&self) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn every_slot_is_none_before_fetch() {
        let context = BootstrapContext::new();
        for slot in Slot::ALL {
            assert_eq!(context.content_for(slot.as_str()), None);
            assert_eq!(context.render(slot), None);
        }
    }

    #[test]
    fn fetch_stores_document_and_enables_rendering() {
        let context = BootstrapContext::new();
        context
            .fetch(&StaticSource(json!({ "bootstrap": { "html_lang": "en" } })))
            .expect("fetch");
        assert!(context.is_loaded());
        assert_eq!(
            context.content_for("head-tag").as_deref(),
            Some("<head lang=\"en\">")
        );
        assert_eq!(context.content_for("not-a-slot"), None);
    }

    #[test]
    fn second_fetch_is_rejected_and_keeps_first_document() {
        let context = BootstrapContext::new();
        context
            .fetch(&StaticSource(json!({ "bootstrap": { "html_lang": "en" } })))
            .expect("first fetch");
        let error = context
            .fetch(&StaticSource(json!({ "bootstrap": { "html_lang": "fr" } })))
            .expect_err("second fetch");
        assert!(matches!(error, BootstrapError::AlreadyLoaded));
        assert_eq!(context.bootstrap().map(|b| b.html_lang.as_str()), Some("en"));
    }

    #[test]
    fn failed_fetch_leaves_context_empty() {
        let context = BootstrapContext::new();
        let error = context
            .fetch(&StaticSource(json!({ "status": "error" })))
            .expect_err("missing bootstrap");
        assert!(matches!(error, BootstrapError::MissingBootstrap { .. }));
        assert!(!context.is_loaded());
        assert_eq!(context.content_for("head"), None);
    }

    #[test]
    fn rendering_is_idempotent() {
        let context = BootstrapContext::with_bootstrap(Bootstrap {
            html_lang: "en".to_string(),
            csrf_token: Some("abc".to_string()),
            ..Bootstrap::default()
        });
        for slot in Slot::ALL {
            assert_eq!(context.render(slot), context.render(slot));
        }
    }
}
