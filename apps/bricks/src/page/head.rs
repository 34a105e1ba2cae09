use crate::markup::{Element, Node};

/// The document `<head>`, kept verbatim for output and queried for metadata.
#[derive(Debug, Clone, Default)]
pub struct PageHead {
    element: Element,
}

impl PageHead {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn from_document(html: &Element) -> Self {
        html.child_elements()
            .find(|e| e.is("head"))
            .cloned()
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn children(&self) -> &[Node] {
        &self.element.children
    }

    /// Content of the `<meta>` tags for `name`, comma-joined. Names containing
    /// `:` (Open Graph style) match on `property`, everything else on `name`.
    /// Empty when absent.
    pub fn get_metadata(&self, name: &str) -> String {
        let attr = if name.contains(':') { "property" } else { "name" };
        let mut metas = Vec::new();
        self.element.find_all(|e| e.is("meta"), &mut metas);
        metas
            .into_iter()
            .filter(|m| m.attr(attr) == Some(name))
            .map(|m| m.attr("content").unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_document_html;

    fn head(html: &str) -> PageHead {
        PageHead::from_document(&parse_document_html(html))
    }

    #[test]
    fn test_metadata_by_name_joined() {
        let h = head(
            r#"<html><head>
                <meta name="theme" content="dark">
                <meta name="theme" content="wide">
                <meta name="template" content="article">
            </head><body></body></html>"#,
        );
        assert_eq!(h.get_metadata("theme"), "dark, wide");
        assert_eq!(h.get_metadata("template"), "article");
    }

    #[test]
    fn test_metadata_by_property() {
        let h = head(
            r#"<html><head><meta property="og:title" content="Shop"></head><body></body></html>"#,
        );
        assert_eq!(h.get_metadata("og:title"), "Shop");
        assert_eq!(h.get_metadata("nav"), "");
    }
}
