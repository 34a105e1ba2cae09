//! Components: pluggable, trait-based renderers resolved by block name.
//!
//! Implementations live in modules addressed by path (`blocks/{name}/{name}`)
//! and are supplied through a `ModuleLoader`. The `ComponentRegistry` caches
//! one `Registration` per name for the process lifetime.

pub mod catalog;
pub mod generic;
pub mod registry;
pub mod standard;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::context::AppContext;
use crate::fetch::FetchError;
use crate::loader::resources::ResourceRegistry;
use crate::markup::{Element, Node};
use crate::page::{Block, Dataset, PageHead, Slot};

pub use catalog::ModuleCatalog;
pub use generic::GenericComponent;
pub use registry::{ComponentRegistry, Registration};

/// Module every unresolvable block falls back to.
pub const FALLBACK_MODULE: &str = "blocks/generic/generic";

/// Conventional module path for a block name.
pub fn module_path(name: &str) -> String {
    format!("blocks/{name}/{name}")
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("Component factory failed: {0}")]
    Factory(String),

    #[error("Render failed: {0}")]
    Render(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Module {path} failed to load: {source}")]
    ModuleFailed {
        path: String,
        #[source]
        source: ComponentError,
    },

    #[error("No component for '{name}': {fallback}")]
    Unresolved {
        name: String,
        #[source]
        fallback: Box<ResolveError>,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definitions
// ────────────────────────────────────────────────────────────────────────────

/// Where a block's implementation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSource {
    /// Pre-registered structural implementation.
    Standard,
    /// The block's own module.
    Specific,
    /// The generic module, after the block's own module failed.
    Fallback,
}

/// Output of activating a block: the attributes it keeps and the markup it
/// renders in place of its slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub attributes: Dataset,
    pub markup: Vec<Node>,
}

/// What a component can see while rendering.
pub struct ComponentContext<'a> {
    pub app: &'a AppContext,
    pub head: &'a PageHead,
    pub resources: &'a ResourceRegistry,
}

impl ComponentContext<'_> {
    /// Adds a script to the page head, once per `src`.
    pub async fn load_script(&self, src: &str, attrs: &[(&str, &str)]) -> Result<(), FetchError> {
        self.resources
            .load_script(self.app.fetcher.as_ref(), src, attrs)
            .await
    }
}

#[async_trait]
pub trait Component: Send + Sync {
    async fn render(
        &self,
        ctx: &ComponentContext<'_>,
        block: &Block,
    ) -> Result<Rendered, ComponentError>;
}

/// Resolves module paths to component implementations.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn import(&self, path: &str) -> Result<Arc<dyn Component>, ResolveError>;
}

/// `<{label}-brick>` element holding a slot's content.
pub fn slot_element(slot: &Slot) -> Element {
    Element {
        tag: format!("{}-brick", slot.label),
        attrs: Vec::new(),
        children: slot.content.clone(),
    }
}
