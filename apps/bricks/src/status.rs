use tracing::debug;

use crate::page::{Page, SectionStatus};

/// Re-evaluates section readiness in document order.
///
/// The first section that is not yet loaded either still has pending blocks,
/// in which case it becomes `loading` and the scan stops, or it becomes
/// `loaded` and the scan moves on. Sections below a pending one are never
/// touched, so content is revealed strictly top to bottom.
pub fn update_sections_status(page: &Page) {
    for section in page.sections() {
        if section.status() == SectionStatus::Loaded {
            continue;
        }
        if section.has_pending_blocks() {
            section.advance(SectionStatus::Loading);
            break;
        }
        section.advance(SectionStatus::Loaded);
        debug!("Section {} revealed", section.index());
    }
}
