use async_trait::async_trait;

use super::{slot_element, Component, ComponentContext, ComponentError, Rendered};
use crate::markup::{Element, Node};
use crate::page::Block;

/// Default implementation for any block without a module of its own.
///
/// Drops attributes whose value is empty and wraps the slot content in a
/// single `div`.
pub struct GenericComponent;

#[async_trait]
impl Component for GenericComponent {
    async fn render(
        &self,
        _ctx: &ComponentContext<'_>,
        block: &Block,
    ) -> Result<Rendered, ComponentError> {
        let attributes = block
            .dataset()
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        let container = block
            .slots()
            .iter()
            .fold(Element::new("div"), |div, slot| {
                div.with_child(Node::Element(slot_element(slot)))
            });

        Ok(Rendered {
            attributes,
            markup: vec![Node::Element(container)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::resources::ResourceRegistry;
    use crate::page::{Dataset, PageHead, Slot};
    use crate::testing;

    #[tokio::test]
    async fn test_generic_drops_empty_attributes() {
        let ctx = testing::context(testing::MemoryFetcher::new(), testing::catalog());
        let dataset: Dataset = [("value", ""), ("theme", "dark")].into_iter().collect();
        let block = Block::new(
            0,
            "teaser",
            vec![],
            dataset,
            vec![Slot {
                label: "title".to_string(),
                content: vec![Node::text("Hello")],
            }],
        );
        let head = PageHead::default();
        let resources = ResourceRegistry::default();
        let cctx = ComponentContext {
            app: &ctx,
            head: &head,
            resources: &resources,
        };
        let rendered = GenericComponent
            .render(&cctx, &block)
            .await
            .unwrap();

        let attrs: Vec<_> = rendered.attributes.iter().collect();
        assert_eq!(attrs, vec![("theme", "dark")]);
        assert_eq!(rendered.markup.len(), 1);
        let div = rendered.markup[0].as_element().unwrap();
        assert_eq!(div.outer_html(), "<div><title-brick>Hello</title-brick></div>");
    }
}
