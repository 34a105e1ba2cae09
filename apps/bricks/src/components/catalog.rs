use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{
    Component, ComponentError, GenericComponent, ModuleLoader, ResolveError, FALLBACK_MODULE,
};

pub type ComponentFactory =
    Arc<dyn Fn() -> Result<Arc<dyn Component>, ComponentError> + Send + Sync>;

/// In-process module table: module path → factory.
///
/// Importing a path runs its factory; a missing path or a failing factory is
/// a `ResolveError`, which the registry answers with the fallback module.
#[derive(Clone, Default)]
pub struct ModuleCatalog {
    modules: HashMap<String, ComponentFactory>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog containing the generic fallback module.
    pub fn with_builtin() -> Self {
        Self::new().with_module(FALLBACK_MODULE, || {
            Ok(Arc::new(GenericComponent) as Arc<dyn Component>)
        })
    }

    pub fn with_module<F>(mut self, path: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Component>, ComponentError> + Send + Sync + 'static,
    {
        self.modules.insert(path.into(), Arc::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[async_trait]
impl ModuleLoader for ModuleCatalog {
    async fn import(&self, path: &str) -> Result<Arc<dyn Component>, ResolveError> {
        let factory = self
            .modules
            .get(path)
            .ok_or_else(|| ResolveError::ModuleNotFound(path.to_string()))?;
        debug!("Importing module {path}");
        factory().map_err(|source| ResolveError::ModuleFailed {
            path: path.to_string(),
            source,
        })
    }
}
