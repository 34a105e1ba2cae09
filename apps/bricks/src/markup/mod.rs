//! Owned HTML node tree.
//!
//! Raw pages are parsed with html5ever into an `RcDom`, then copied into the
//! plain `Node`/`Element` tree below so the decorator can move content around
//! freely. Serialization is hand-written and escapes through `html-escape`.

pub mod names;

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

pub use names::{to_camel_case, to_class_name, to_kebab_case};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is written verbatim. The parser runs with
/// scripting enabled, so `noscript` content is raw text too.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Whitespace-only text nodes carry no content for decoration purposes.
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Element(e) => e.text_content(),
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Class tokens in declaration order.
    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Appends a class token unless it is already present.
    pub fn add_class(&mut self, class: &str) {
        if self.classes().contains(&class) {
            return;
        }
        let value = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", value);
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    pub fn has_element_child(&self) -> bool {
        self.child_elements().next().is_some()
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Depth-first, document-order search over descendants (self excluded).
    pub fn find_first<P>(&self, pred: P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool + Copy,
    {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_first(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_all<'a, P>(&'a self, pred: P, out: &mut Vec<&'a Element>)
    where
        P: Fn(&Element) -> bool + Copy,
    {
        for child in self.child_elements() {
            if pred(child) {
                out.push(child);
            }
            child.find_all(pred, out);
        }
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        Serializer::default().write_element(&mut out, self);
        out
    }
}

/// Parses a complete HTML document and returns its `<html>` element.
/// Fragments are wrapped into `html > body` by the HTML5 tree builder.
pub fn parse_document_html(html: &str) -> Element {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    convert_children(&dom.document)
        .into_iter()
        .find_map(|node| match node {
            Node::Element(e) if e.is("html") => Some(e),
            _ => None,
        })
        .unwrap_or_else(|| Element::new("html"))
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            // Template content lives in its own fragment, not in the children.
            let children = template_contents
                .borrow()
                .as_ref()
                .map(convert_children)
                .unwrap_or_else(|| convert_children(handle));
            Some(Node::Element(Element {
                tag: name.local.to_string(),
                attrs,
                children,
            }))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        _ => None,
    }
}

/// Writes nodes back to HTML. `eager_image` names the `src` of the one image
/// that must be rendered with `loading="eager"`.
#[derive(Debug, Default)]
pub struct Serializer<'a> {
    eager_image: Option<&'a str>,
    eager_written: bool,
}

impl<'a> Serializer<'a> {
    pub fn with_eager_image(eager_image: Option<&'a str>) -> Self {
        Self {
            eager_image,
            eager_written: false,
        }
    }

    pub fn write_nodes(&mut self, out: &mut String, nodes: &[Node]) {
        for node in nodes {
            self.write_node(out, node);
        }
    }

    pub fn write_node(&mut self, out: &mut String, node: &Node) {
        match node {
            Node::Text(t) => out.push_str(&html_escape::encode_text(t)),
            Node::Element(e) => self.write_element(out, e),
        }
    }

    pub fn write_element(&mut self, out: &mut String, element: &Element) {
        let eager = !self.eager_written
            && element.is("img")
            && self.eager_image.is_some()
            && element.attr("src") == self.eager_image;
        if eager {
            self.eager_written = true;
            let mut img = element.clone();
            img.set_attr("loading", "eager");
            write_open_tag(out, &img.tag, &img.attrs);
        } else {
            write_open_tag(out, &element.tag, &element.attrs);
        }

        let tag = element.tag.to_ascii_lowercase();
        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            for child in &element.children {
                out.push_str(&child.text_content());
            }
        } else {
            self.write_nodes(out, &element.children);
        }
        write_close_tag(out, &element.tag);
    }
}

pub fn write_open_tag(out: &mut String, tag: &str, attrs: &[(String, String)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
}

pub fn write_close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
