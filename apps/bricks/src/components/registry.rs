use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{debug, error, warn};

use super::standard::standard_components;
use super::{module_path, Component, ComponentSource, ModuleLoader, ResolveError, FALLBACK_MODULE};
use crate::page::lock;

#[derive(Clone)]
pub struct Registration {
    pub component: Arc<dyn Component>,
    pub source: ComponentSource,
}

/// Name → implementation cache shared by every page.
///
/// Each name owns one async once-cell, so concurrent resolutions of the same
/// name share a single import. A name whose fallback also failed leaves its
/// cell empty and is retried on the next call.
pub struct ComponentRegistry {
    modules: Arc<dyn ModuleLoader>,
    registrations: Mutex<HashMap<String, Arc<OnceCell<Registration>>>>,
}

impl ComponentRegistry {
    pub fn new(modules: Arc<dyn ModuleLoader>) -> Self {
        Self {
            modules,
            registrations: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, name: &str) -> Arc<OnceCell<Registration>> {
        lock(&self.registrations)
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        lock(&self.registrations)
            .get(name)
            .is_some_and(|cell| cell.initialized())
    }

    /// Inserts a registration unless the name already has one.
    pub fn register(&self, name: &str, component: Arc<dyn Component>, source: ComponentSource) -> bool {
        self.cell(name)
            .set(Registration { component, source })
            .is_ok()
    }

    /// Pre-registers the structural bricks. Safe to call more than once.
    pub fn register_standard_components(&self) -> usize {
        let mut added = 0;
        for (name, component) in standard_components() {
            if !self.is_registered(name) && self.register(name, component, ComponentSource::Standard)
            {
                added += 1;
            }
        }
        added
    }

    /// Returns the implementation for `name`, importing it on first use.
    pub async fn resolve(&self, name: &str) -> Result<Registration, ResolveError> {
        let cell = self.cell(name);
        if let Some(registration) = cell.get() {
            return Ok(registration.clone());
        }
        cell.get_or_try_init(|| self.import(name))
            .await
            .cloned()
    }

    async fn import(&self, name: &str) -> Result<Registration, ResolveError> {
        let path = module_path(name);
        match self.modules.import(&path).await {
            Ok(component) => {
                debug!("Registered component '{name}' from {path}");
                Ok(Registration {
                    component,
                    source: ComponentSource::Specific,
                })
            }
            Err(e) => {
                warn!("Couldn't load component for '{name}', falling back to generic: {e}");
                match self.modules.import(FALLBACK_MODULE).await {
                    Ok(component) => Ok(Registration {
                        component,
                        source: ComponentSource::Fallback,
                    }),
                    Err(fallback) => {
                        error!("Couldn't load any component for '{name}': {fallback}");
                        Err(ResolveError::Unresolved {
                            name: name.to_string(),
                            fallback: Box::new(fallback),
                        })
                    }
                }
            }
        }
    }
}
