//! Test doubles: an in-memory fetcher and a module loader that records (and
//! optionally holds back) imports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use crate::components::{Component, ModuleCatalog, ModuleLoader, ResolveError};
use crate::context::AppContext;
use crate::fetch::{FetchError, ResourceFetcher};
use crate::page::lock;

#[derive(Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Bytes>,
    counts: Mutex<HashMap<String, usize>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.files
            .insert(path.to_string(), Bytes::copy_from_slice(body.as_bytes()));
        self
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        lock(&self.counts).get(path).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ResourceFetcher for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        *lock(&self.counts).entry(path.to_string()).or_default() += 1;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

pub struct RecordingLoader {
    inner: ModuleCatalog,
    gates: HashMap<String, Arc<Notify>>,
    imports: Mutex<Vec<String>>,
}

impl RecordingLoader {
    pub fn new(inner: ModuleCatalog) -> Self {
        Self {
            inner,
            gates: HashMap::new(),
            imports: Mutex::new(Vec::new()),
        }
    }

    /// Imports of `path` wait until `gate` is notified.
    pub fn gate(mut self, path: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(path.to_string(), gate);
        self
    }

    pub fn imports(&self) -> Vec<String> {
        lock(&self.imports).clone()
    }
}

#[async_trait]
impl ModuleLoader for RecordingLoader {
    async fn import(&self, path: &str) -> Result<Arc<dyn Component>, ResolveError> {
        lock(&self.imports).push(path.to_string());
        if let Some(gate) = self.gates.get(path) {
            gate.notified().await;
        }
        self.inner.import(path).await
    }
}

pub fn catalog() -> Arc<dyn ModuleLoader> {
    Arc::new(ModuleCatalog::with_builtin())
}

pub fn context(fetcher: MemoryFetcher, modules: Arc<dyn ModuleLoader>) -> Arc<AppContext> {
    context_with(Arc::new(fetcher), modules)
}

pub fn context_with(
    fetcher: Arc<MemoryFetcher>,
    modules: Arc<dyn ModuleLoader>,
) -> Arc<AppContext> {
    Arc::new(AppContext::new("", fetcher, modules))
}
