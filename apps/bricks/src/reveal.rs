//! LCP gate: holds first paint until the priority block and the first image
//! in main content are done.

use tracing::{debug, info};

use crate::loader::resources::LoadOutcome;
use crate::loader::BlockLoader;
use crate::page::{DiagnosticKind, Page};

/// Resolves once the page can be revealed.
///
/// 1. If the first block's name is in `priority_blocks`, load it fully.
/// 2. Clear the page's hidden state.
/// 3. If the first image in main content has not completed, mark it eager and
///    wait for its load or error.
pub async fn wait_for_priority(loader: &BlockLoader, page: &Page, priority_blocks: &[String]) {
    if let Some(block) = page.first_block() {
        if priority_blocks.iter().any(|name| name == block.name()) {
            debug!("Waiting for priority block '{}'", block.name());
            loader.load_block(page, &block).await;
        }
    }

    page.reveal();

    let Some(src) = page
        .first_image()
        .and_then(|img| img.attr("src"))
        .filter(|src| !src.is_empty())
    else {
        return;
    };
    if page.resources().is_image_complete(src) {
        return;
    }

    page.mark_eager(src);
    info!("Waiting for LCP candidate {src}");
    let outcome = page
        .resources()
        .load_image(loader.context().fetcher.as_ref(), src)
        .await;
    if let LoadOutcome::Failed(message) = outcome {
        page.diagnostics().push(src, DiagnosticKind::Image, message);
    }
}
