use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::components::ComponentSource;
use crate::content::nav_path;
use crate::context::AppContext;
use crate::decorate::decorate_page;
use crate::loader::BlockLoader;
use crate::page::{Block, BlockStatus, Diagnostic, Page, SectionStatus, WrapperKind};
use crate::reveal::wait_for_priority;

/// Runs the whole page pipeline: decorate, reveal gate, main blocks, then
/// header and footer.
pub struct Hydrator {
    loader: BlockLoader,
    priority_blocks: Vec<String>,
}

impl Hydrator {
    pub fn new(ctx: Arc<AppContext>, priority_blocks: Vec<String>) -> Self {
        Self {
            loader: BlockLoader::new(ctx),
            priority_blocks,
        }
    }

    pub fn context(&self) -> &AppContext {
        self.loader.context()
    }

    pub async fn hydrate(&self, html: &str) -> Page {
        let page = decorate_page(html);
        wait_for_priority(&self.loader, &page, &self.priority_blocks).await;
        self.loader.load_blocks(&page).await;
        self.loader.load_header(&page).await;
        self.loader.load_footer(&page).await;
        info!(
            "Hydrated page: {} blocks, {} diagnostics",
            page.blocks().len(),
            page.diagnostics().snapshot().len()
        );
        page
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Readiness report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PageReport {
    pub hidden: bool,
    pub body_classes: Vec<String>,
    /// Fragment the header navigation is read from.
    pub nav: String,
    pub lcp_image: Option<String>,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub sections: Vec<SectionReport>,
    pub header: Option<BlockReport>,
    pub footer: Option<BlockReport>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct SectionReport {
    pub index: usize,
    pub status: SectionStatus,
    pub classes: Vec<String>,
    pub metadata: Vec<(String, String)>,
    pub wrappers: Vec<WrapperKind>,
    pub blocks: Vec<BlockReport>,
}

#[derive(Debug, Serialize)]
pub struct BlockReport {
    pub id: usize,
    pub name: String,
    pub status: BlockStatus,
    pub source: Option<ComponentSource>,
}

impl PageReport {
    pub fn from_page(page: &Page) -> Self {
        Self {
            hidden: page.is_hidden(),
            body_classes: page.body_classes().to_vec(),
            nav: nav_path(page.head()),
            lcp_image: page.eager_image(),
            stylesheets: page.resources().stylesheets(),
            scripts: page
                .resources()
                .scripts()
                .into_iter()
                .map(|script| script.src)
                .collect(),
            sections: page
                .sections()
                .iter()
                .map(|section| SectionReport {
                    index: section.index(),
                    status: section.status(),
                    classes: section.classes().to_vec(),
                    metadata: section
                        .metadata()
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    wrappers: section.wrappers().iter().map(|w| w.kind()).collect(),
                    blocks: section.blocks().map(|b| BlockReport::from_block(b)).collect(),
                })
                .collect(),
            header: page.header().map(|b| BlockReport::from_block(b)),
            footer: page.footer().map(|b| BlockReport::from_block(b)),
            diagnostics: page.diagnostics().snapshot(),
        }
    }
}

impl BlockReport {
    fn from_block(block: &Block) -> Self {
        Self {
            id: block.id(),
            name: block.name().to_string(),
            status: block.status(),
            source: block.source(),
        }
    }
}
