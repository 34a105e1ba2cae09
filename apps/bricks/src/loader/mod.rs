//! Block loading: per-block state machine plus the sequential page pass.
//!
//! Flow per block: status guard → (stylesheet ∥ resolve + render) → loaded.
//! Every failure is logged and written to the page diagnostics; a block always
//! ends `loaded` once its fetches settle.

pub mod resources;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::components::{ComponentContext, ComponentSource};
use crate::context::AppContext;
use crate::page::{Block, DiagnosticKind, Page};
use crate::status::update_sections_status;

pub struct BlockLoader {
    ctx: Arc<AppContext>,
}

impl BlockLoader {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Loads a block's stylesheet and component. A block that is already
    /// loading or loaded is returned untouched.
    pub async fn load_block(&self, page: &Page, block: &Arc<Block>) -> Arc<Block> {
        if !block.begin_loading() {
            debug!("Block '{}' already {:?}", block.name(), block.status());
            return Arc::clone(block);
        }

        let name = block.name();
        let href = self.ctx.block_asset(name, "css");
        let (styled, ()) = tokio::join!(
            page.resources()
                .load_stylesheet(self.ctx.fetcher.as_ref(), &href),
            self.activate(page, block),
        );

        if let Err(e) = styled {
            warn!("Failed to load stylesheet for block '{name}': {e}");
            page.diagnostics()
                .push(name, DiagnosticKind::Stylesheet, e.to_string());
        }

        block.finish_loading();
        debug!("Block '{name}' loaded");
        Arc::clone(block)
    }

    async fn activate(&self, page: &Page, block: &Block) {
        let name = block.name();
        let registration = match self.ctx.registry.resolve(name).await {
            Ok(registration) => registration,
            Err(e) => {
                page.diagnostics()
                    .push(name, DiagnosticKind::ComponentUnresolved, e.to_string());
                return;
            }
        };

        if registration.source == ComponentSource::Fallback {
            page.diagnostics().push(
                name,
                DiagnosticKind::ComponentFallback,
                format!("no component module for '{name}', rendered with the generic component"),
            );
        }

        let ctx = ComponentContext {
            app: &self.ctx,
            head: page.head(),
            resources: page.resources(),
        };
        match registration.component.render(&ctx, block).await {
            Ok(rendered) => block.activate(registration.source, rendered),
            Err(e) => {
                warn!("Component for block '{name}' failed to render: {e}");
                page.diagnostics()
                    .push(name, DiagnosticKind::ComponentRender, e.to_string());
            }
        }
    }

    /// Loads every main-content block in document order, one at a time,
    /// re-evaluating section readiness after each.
    pub async fn load_blocks(&self, page: &Page) {
        update_sections_status(page);
        let blocks = page.blocks();
        info!("Loading {} blocks", blocks.len());
        for block in &blocks {
            self.load_block(page, block).await;
            update_sections_status(page);
        }
    }

    pub async fn load_header(&self, page: &Page) {
        if let Some(header) = page.header() {
            self.load_block(page, header).await;
        }
    }

    pub async fn load_footer(&self, page: &Page) {
        if let Some(footer) = page.footer() {
            self.load_block(page, footer).await;
        }
    }
}
