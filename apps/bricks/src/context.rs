use std::sync::Arc;

use tracing::info;

use crate::components::{ComponentRegistry, ModuleLoader};
use crate::content::ContentClient;
use crate::fetch::ResourceFetcher;

/// Process-wide state shared by every page: where block assets live, how to
/// fetch them, the component registry and the content cache.
///
/// Created once at startup and passed around as `Arc<AppContext>`.
pub struct AppContext {
    pub code_base_path: String,
    pub fetcher: Arc<dyn ResourceFetcher>,
    pub registry: ComponentRegistry,
    pub content: ContentClient,
}

impl AppContext {
    pub fn new(
        code_base_path: impl Into<String>,
        fetcher: Arc<dyn ResourceFetcher>,
        modules: Arc<dyn ModuleLoader>,
    ) -> Self {
        let registry = ComponentRegistry::new(modules);
        let standard = registry.register_standard_components();
        info!("Registered {standard} standard components");

        Self {
            code_base_path: code_base_path.into().trim_end_matches('/').to_string(),
            content: ContentClient::new(Arc::clone(&fetcher)),
            fetcher,
            registry,
        }
    }

    /// `{code_base}/blocks/{name}/{name}.{ext}`
    pub fn block_asset(&self, name: &str, ext: &str) -> String {
        format!("{}/blocks/{name}/{name}.{ext}", self.code_base_path)
    }
}
