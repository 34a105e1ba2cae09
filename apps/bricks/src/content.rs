//! Shared content fetches used by components: placeholder sheets and plain
//! HTML fragments such as the navigation. Every failure degrades to an empty
//! result.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use reqwest::Url;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::fetch::ResourceFetcher;
use crate::markup::to_camel_case;
use crate::page::{lock, PageHead};

pub type Placeholders = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
struct PlaceholderSheet {
    data: Vec<PlaceholderRow>,
}

#[derive(Debug, Deserialize)]
struct PlaceholderRow {
    #[serde(rename = "Key", default)]
    key: Option<String>,
    #[serde(rename = "Text", default)]
    text: Option<String>,
}

pub struct ContentClient {
    fetcher: Arc<dyn ResourceFetcher>,
    placeholders: Mutex<HashMap<String, Arc<OnceCell<Arc<Placeholders>>>>>,
}

impl ContentClient {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            fetcher,
            placeholders: Mutex::new(HashMap::new()),
        }
    }

    /// Placeholder texts for `prefix`, keyed by camel-cased `Key`. Fetched
    /// once per prefix; a failed fetch caches an empty map.
    pub async fn fetch_placeholders(&self, prefix: &str) -> Arc<Placeholders> {
        let cell = lock(&self.placeholders)
            .entry(prefix.to_string())
            .or_default()
            .clone();
        cell.get_or_init(|| async {
            let path = placeholders_path(prefix);
            match self.load_placeholders(&path).await {
                Ok(placeholders) => Arc::new(placeholders),
                Err(e) => {
                    warn!("Error loading placeholders from {path}: {e}");
                    Arc::new(Placeholders::new())
                }
            }
        })
        .await
        .clone()
    }

    async fn load_placeholders(&self, path: &str) -> anyhow::Result<Placeholders> {
        let body = self.fetcher.fetch(path).await?;
        let sheet: PlaceholderSheet = serde_json::from_slice(&body)?;
        Ok(sheet
            .data
            .into_iter()
            .filter_map(|row| {
                let key = row.key.filter(|k| !k.is_empty())?;
                Some((to_camel_case(&key), row.text.unwrap_or_default()))
            })
            .collect())
    }

    /// Plain HTML of the fragment at `path` (`{path}.plain.html`), or an empty
    /// string when it cannot be fetched.
    pub async fn fetch_fragment(&self, path: &str) -> String {
        let url = format!("{}.plain.html", path.trim_end_matches('/'));
        match self.fetcher.fetch(&url).await {
            Ok(body) => String::from_utf8_lossy(&body).into_owned(),
            Err(e) => {
                debug!("Fragment {url} unavailable: {e}");
                String::new()
            }
        }
    }
}

fn placeholders_path(prefix: &str) -> String {
    if prefix == "default" {
        "/placeholders.json".to_string()
    } else {
        format!("{}/placeholders.json", prefix.trim_end_matches('/'))
    }
}

/// Navigation fragment path: the path of the `nav` metadata URL, `/nav` when
/// absent or unparseable.
pub fn nav_path(head: &PageHead) -> String {
    let meta = head.get_metadata("nav");
    if meta.is_empty() {
        return "/nav".to_string();
    }
    match Url::parse(&meta) {
        Ok(url) => url.path().to_string(),
        Err(_) if meta.starts_with('/') => meta,
        Err(_) => "/nav".to_string(),
    }
}
