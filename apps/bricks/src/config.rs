use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use reqwest::Url;

/// Where raw pages and block assets are read from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    Origin(Url),
    Directory(PathBuf),
}

/// Application configuration loaded from environment variables.
/// Fails at startup if no content source is configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub content: ContentSource,
    pub code_base_path: String,
    /// Block names the reveal gate waits for when one is first on the page.
    pub lcp_blocks: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            content: content_source(env_opt("CONTENT_DIR"), env_opt("CONTENT_ORIGIN"))?,
            code_base_path: env_opt("CODE_BASE_PATH").unwrap_or_default(),
            lcp_blocks: parse_list(&env_opt("LCP_BLOCKS").unwrap_or_else(|| "hero".to_string())),
            port: env_opt("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_opt("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// A set but blank variable counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `CONTENT_DIR` wins over `CONTENT_ORIGIN`; one of them is required.
fn content_source(dir: Option<String>, origin: Option<String>) -> Result<ContentSource> {
    if let Some(dir) = dir {
        return Ok(ContentSource::Directory(PathBuf::from(dir)));
    }
    let Some(origin) = origin else {
        bail!("Either CONTENT_DIR or CONTENT_ORIGIN must be set");
    };
    let url = Url::parse(&origin)
        .with_context(|| format!("CONTENT_ORIGIN '{origin}' is not a valid URL"))?;
    Ok(ContentSource::Origin(url))
}

/// Comma-separated list, entries trimmed, empties dropped.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
