use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::fetch::{FetchError, ResourceFetcher};
use crate::page::lock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
}

/// A classic script appended to the head, with its extra attributes in the
/// order they were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub src: String,
    pub attrs: Vec<(String, String)>,
}

/// The document's resource registry, keyed by URL.
///
/// Stylesheets and scripts follow link semantics: once a URL has been
/// appended it is never fetched again, even while the first fetch is still in
/// flight. Images remember their load/error outcome and late waiters share the
/// in-flight fetch.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    stylesheets: Mutex<Vec<String>>,
    scripts: Mutex<Vec<ScriptTag>>,
    images: Mutex<HashMap<String, Arc<OnceCell<LoadOutcome>>>>,
}

impl ResourceRegistry {
    pub async fn load_stylesheet(
        &self,
        fetcher: &dyn ResourceFetcher,
        href: &str,
    ) -> Result<(), FetchError> {
        {
            let mut links = lock(&self.stylesheets);
            if links.iter().any(|l| l == href) {
                return Ok(());
            }
            links.push(href.to_string());
        }
        debug!("Loading stylesheet {href}");
        fetcher.fetch(href).await.map(|_| ())
    }

    /// Stylesheet links in the order they were appended.
    pub fn stylesheets(&self) -> Vec<String> {
        lock(&self.stylesheets).clone()
    }

    /// Appends a script unless one with the same `src` is already present.
    /// The attributes of a repeated call are ignored.
    pub async fn load_script(
        &self,
        fetcher: &dyn ResourceFetcher,
        src: &str,
        attrs: &[(&str, &str)],
    ) -> Result<(), FetchError> {
        {
            let mut scripts = lock(&self.scripts);
            if scripts.iter().any(|s| s.src == src) {
                return Ok(());
            }
            scripts.push(ScriptTag {
                src: src.to_string(),
                attrs: attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });
        }
        debug!("Loading script {src}");
        fetcher.fetch(src).await.map(|_| ())
    }

    /// Scripts in the order they were appended.
    pub fn scripts(&self) -> Vec<ScriptTag> {
        lock(&self.scripts).clone()
    }

    /// An image is complete once it has loaded or failed.
    pub fn is_image_complete(&self, src: &str) -> bool {
        lock(&self.images)
            .get(src)
            .is_some_and(|cell| cell.initialized())
    }

    /// Resolves on the image's load or error, whichever comes first.
    pub async fn load_image(&self, fetcher: &dyn ResourceFetcher, src: &str) -> LoadOutcome {
        let cell = lock(&self.images)
            .entry(src.to_string())
            .or_default()
            .clone();
        cell.get_or_init(|| async {
            match fetcher.fetch(src).await {
                Ok(_) => LoadOutcome::Loaded,
                Err(e) => {
                    warn!("Image {src} failed to load: {e}");
                    LoadOutcome::Failed(e.to_string())
                }
            }
        })
        .await
        .clone()
    }
}
