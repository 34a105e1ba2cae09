use std::sync::Arc;

use async_trait::async_trait;

use super::{slot_element, Component, ComponentContext, ComponentError, Rendered};
use crate::markup::Node;
use crate::page::Block;

/// Names of the structural bricks the decorator emits.
pub const STANDARD_NAMES: [&str; 4] = ["row", "column", "wrapper", "section-metadata"];

/// Row, column and wrapper bricks: content passes through untouched.
pub struct StructuralComponent;

#[async_trait]
impl Component for StructuralComponent {
    async fn render(
        &self,
        _ctx: &ComponentContext<'_>,
        block: &Block,
    ) -> Result<Rendered, ComponentError> {
        Ok(Rendered {
            attributes: block.dataset().clone(),
            markup: block
                .slots()
                .iter()
                .map(|slot| Node::Element(slot_element(slot)))
                .collect(),
        })
    }
}

/// Section metadata is consumed at decoration time and renders nothing.
pub struct SectionMetadataComponent;

#[async_trait]
impl Component for SectionMetadataComponent {
    async fn render(
        &self,
        _ctx: &ComponentContext<'_>,
        _block: &Block,
    ) -> Result<Rendered, ComponentError> {
        Ok(Rendered::default())
    }
}

pub fn standard_components() -> Vec<(&'static str, Arc<dyn Component>)> {
    STANDARD_NAMES
        .iter()
        .map(|&name| {
            let component: Arc<dyn Component> = if name == "section-metadata" {
                Arc::new(SectionMetadataComponent)
            } else {
                Arc::new(StructuralComponent)
            };
            (name, component)
        })
        .collect()
}
