//! Section → Wrapper → Block model produced by the decorator.
//!
//! Structure is fixed at decoration time. Only status, rendered output and the
//! page-level reveal flags change afterwards, each behind a short-lived
//! `Mutex` that is never held across an `.await`.

pub mod diagnostics;
pub mod head;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::components::{ComponentSource, Rendered};
use crate::loader::resources::ResourceRegistry;
use crate::markup::{Element, Node};

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use head::PageHead;

/// Locks a mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ────────────────────────────────────────────────────────────────────────────
// Status enums
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Initialized,
    Loading,
    Loaded,
}

impl SectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionStatus::Initialized => "initialized",
            SectionStatus::Loading => "loading",
            SectionStatus::Loaded => "loaded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    #[default]
    Unset,
    Loading,
    Loaded,
}

impl BlockStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, BlockStatus::Unset | BlockStatus::Loading)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dataset
// ────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered key → value map. Re-inserting a key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset(Vec<(String, String)>);

impl Dataset {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dataset = Dataset::default();
        for (k, v) in iter {
            dataset.insert(k, v);
        }
        dataset
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block
// ────────────────────────────────────────────────────────────────────────────

/// One labeled row of a multi-row block, embedded HTML preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub label: String,
    pub content: Vec<Node>,
}

#[derive(Debug, Default)]
struct BlockState {
    status: BlockStatus,
    source: Option<ComponentSource>,
    rendered: Option<Rendered>,
}

#[derive(Debug)]
pub struct Block {
    id: usize,
    name: String,
    classes: Vec<String>,
    dataset: Dataset,
    slots: Vec<Slot>,
    state: Mutex<BlockState>,
}

impl Block {
    pub fn new(
        id: usize,
        name: impl Into<String>,
        classes: Vec<String>,
        dataset: Dataset,
        slots: Vec<Slot>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            classes,
            dataset,
            slots,
            state: Mutex::new(BlockState::default()),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn status(&self) -> BlockStatus {
        lock(&self.state).status
    }

    /// Which implementation activated this block, once resolved.
    pub fn source(&self) -> Option<ComponentSource> {
        lock(&self.state).source
    }

    pub fn rendered(&self) -> Option<Rendered> {
        lock(&self.state).rendered.clone()
    }

    /// `unset → loading` as a single check-and-set. Returns `false` when the
    /// block is already loading or loaded.
    pub(crate) fn begin_loading(&self) -> bool {
        let mut state = lock(&self.state);
        if state.status != BlockStatus::Unset {
            return false;
        }
        state.status = BlockStatus::Loading;
        true
    }

    pub(crate) fn activate(&self, source: ComponentSource, rendered: Rendered) {
        let mut state = lock(&self.state);
        state.source = Some(source);
        state.rendered = Some(rendered);
    }

    pub(crate) fn finish_loading(&self) {
        lock(&self.state).status = BlockStatus::Loaded;
    }

    fn first_image(&self) -> Option<&Element> {
        self.slots.iter().find_map(|slot| first_image(&slot.content))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapper
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapperKind {
    BlockContainer,
    DefaultContent,
}

#[derive(Debug)]
pub enum WrapperItem {
    Block(Arc<Block>),
    /// A content group without a class list; kept as-is, never loaded.
    Markup(Element),
}

#[derive(Debug)]
pub enum Wrapper {
    DefaultContent(Vec<Node>),
    BlockContainer(Vec<WrapperItem>),
}

impl Wrapper {
    pub fn kind(&self) -> WrapperKind {
        match self {
            Wrapper::DefaultContent(_) => WrapperKind::DefaultContent,
            Wrapper::BlockContainer(_) => WrapperKind::BlockContainer,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Arc<Block>> {
        let items = match self {
            Wrapper::BlockContainer(items) => Some(items.iter()),
            Wrapper::DefaultContent(_) => None,
        };
        items.into_iter().flatten().filter_map(|item| match item {
            WrapperItem::Block(block) => Some(block),
            WrapperItem::Markup(_) => None,
        })
    }

    fn first_image(&self) -> Option<&Element> {
        match self {
            Wrapper::DefaultContent(nodes) => first_image(nodes),
            Wrapper::BlockContainer(items) => items.iter().find_map(|item| match item {
                WrapperItem::Block(block) => block.first_image(),
                WrapperItem::Markup(element) => first_image_in(element),
            }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Section {
    index: usize,
    classes: Vec<String>,
    metadata: Dataset,
    wrappers: Vec<Wrapper>,
    status: Mutex<SectionStatus>,
}

impl Section {
    pub fn new(index: usize, classes: Vec<String>, metadata: Dataset, wrappers: Vec<Wrapper>) -> Self {
        Self {
            index,
            classes,
            metadata,
            wrappers,
            status: Mutex::new(SectionStatus::Initialized),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Section-level metadata, keys camel-cased.
    pub fn metadata(&self) -> &Dataset {
        &self.metadata
    }

    pub fn wrappers(&self) -> &[Wrapper] {
        &self.wrappers
    }

    pub fn status(&self) -> SectionStatus {
        *lock(&self.status)
    }

    /// A section stays out of layout until it is loaded.
    pub fn is_hidden(&self) -> bool {
        self.status() != SectionStatus::Loaded
    }

    /// Moves the status forward; a lower or equal target is ignored.
    pub(crate) fn advance(&self, to: SectionStatus) {
        let mut status = lock(&self.status);
        if to > *status {
            *status = to;
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Arc<Block>> {
        self.wrappers.iter().flat_map(Wrapper::blocks)
    }

    pub fn has_pending_blocks(&self) -> bool {
        self.blocks().any(|b| b.status().is_pending())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct PageState {
    hidden: bool,
    eager_image: Option<String>,
}

#[derive(Debug)]
pub struct Page {
    head: PageHead,
    body_classes: Vec<String>,
    sections: Vec<Section>,
    header: Option<Arc<Block>>,
    footer: Option<Arc<Block>>,
    resources: ResourceRegistry,
    diagnostics: Diagnostics,
    state: Mutex<PageState>,
}

impl Page {
    pub fn new(head: PageHead, body_classes: Vec<String>, sections: Vec<Section>) -> Self {
        Self {
            head,
            body_classes,
            sections,
            header: None,
            footer: None,
            resources: ResourceRegistry::default(),
            diagnostics: Diagnostics::default(),
            state: Mutex::new(PageState {
                hidden: true,
                eager_image: None,
            }),
        }
    }

    pub fn with_header(mut self, header: Block) -> Self {
        self.header = Some(Arc::new(header));
        self
    }

    pub fn with_footer(mut self, footer: Block) -> Self {
        self.footer = Some(Arc::new(footer));
        self
    }

    pub fn head(&self) -> &PageHead {
        &self.head
    }

    pub fn body_classes(&self) -> &[String] {
        &self.body_classes
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn header(&self) -> Option<&Arc<Block>> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&Arc<Block>> {
        self.footer.as_ref()
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Main-content blocks in document order.
    pub fn blocks(&self) -> Vec<Arc<Block>> {
        self.sections
            .iter()
            .flat_map(Section::blocks)
            .cloned()
            .collect()
    }

    pub fn first_block(&self) -> Option<Arc<Block>> {
        self.sections.iter().flat_map(Section::blocks).next().cloned()
    }

    /// First `<img>` in main content, in document order.
    pub fn first_image(&self) -> Option<&Element> {
        self.sections
            .iter()
            .flat_map(|s| s.wrappers.iter())
            .find_map(Wrapper::first_image)
    }

    pub fn is_hidden(&self) -> bool {
        lock(&self.state).hidden
    }

    pub(crate) fn reveal(&self) {
        lock(&self.state).hidden = false;
    }

    pub(crate) fn mark_eager(&self, src: &str) {
        lock(&self.state).eager_image = Some(src.to_string());
    }

    pub fn eager_image(&self) -> Option<String> {
        lock(&self.state).eager_image.clone()
    }
}

fn first_image(nodes: &[Node]) -> Option<&Element> {
    nodes.iter().find_map(|node| match node {
        Node::Element(element) => first_image_in(element),
        Node::Text(_) => None,
    })
}

/// Template content is inert and never an image candidate.
fn first_image_in(element: &Element) -> Option<&Element> {
    if element.is("img") {
        return Some(element);
    }
    if element.is("template") {
        return None;
    }
    element.child_elements().find_map(first_image_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: usize, name: &str) -> Arc<Block> {
        Arc::new(Block::new(id, name, vec![], Dataset::default(), vec![]))
    }

    #[test]
    fn test_block_status_guard_is_single_shot() {
        let b = block(0, "hero");
        assert_eq!(b.status(), BlockStatus::Unset);
        assert!(b.begin_loading());
        assert!(!b.begin_loading());
        b.finish_loading();
        assert!(!b.begin_loading());
        assert_eq!(b.status(), BlockStatus::Loaded);
    }

    #[test]
    fn test_section_status_never_regresses() {
        let section = Section::new(0, vec![], Dataset::default(), vec![]);
        section.advance(SectionStatus::Loaded);
        section.advance(SectionStatus::Loading);
        section.advance(SectionStatus::Initialized);
        assert_eq!(section.status(), SectionStatus::Loaded);
        assert!(!section.is_hidden());
    }

    #[test]
    fn test_dataset_replaces_in_place() {
        let mut data: Dataset = [("a", "1"), ("b", "2")].into_iter().collect();
        data.insert("a", "3");
        let pairs: Vec<_> = data.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
        assert_eq!(data.remove("a").as_deref(), Some("3"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_first_image_searches_in_document_order() {
        let wrappers = vec![
            Wrapper::DefaultContent(vec![Node::Element(
                Element::new("p").with_child(Node::text("intro")),
            )]),
            Wrapper::BlockContainer(vec![WrapperItem::Markup(
                Element::new("div").with_child(Node::Element(
                    Element::new("img").with_attr("src", "/first.png"),
                )),
            )]),
        ];
        let later = Section::new(
            1,
            vec![],
            Dataset::default(),
            vec![Wrapper::DefaultContent(vec![Node::Element(
                Element::new("img").with_attr("src", "/second.png"),
            )])],
        );
        let page = Page::new(
            PageHead::default(),
            vec![],
            vec![Section::new(0, vec![], Dataset::default(), wrappers), later],
        );
        let img = page.first_image().expect("image");
        assert_eq!(img.attr("src"), Some("/first.png"));
    }

    #[test]
    fn test_first_image_skips_template_content() {
        let template = Element::new("template").with_child(Node::Element(
            Element::new("img").with_attr("src", "/inert.png"),
        ));
        let page = Page::new(
            PageHead::default(),
            vec![],
            vec![Section::new(
                0,
                vec![],
                Dataset::default(),
                vec![Wrapper::DefaultContent(vec![
                    Node::Element(template),
                    Node::Element(Element::new("img").with_attr("src", "/live.png")),
                ])],
            )],
        );
        assert_eq!(page.first_image().and_then(|img| img.attr("src")), Some("/live.png"));
    }

    #[test]
    fn test_page_blocks_in_document_order() {
        let page = Page::new(
            PageHead::default(),
            vec![],
            vec![
                Section::new(
                    0,
                    vec![],
                    Dataset::default(),
                    vec![Wrapper::BlockContainer(vec![
                        WrapperItem::Block(block(0, "hero")),
                        WrapperItem::Block(block(1, "cards")),
                    ])],
                ),
                Section::new(
                    1,
                    vec![],
                    Dataset::default(),
                    vec![Wrapper::BlockContainer(vec![WrapperItem::Block(block(
                        2, "columns",
                    ))])],
                ),
            ],
        );
        let names: Vec<_> = page.blocks().iter().map(|b| b.name().to_string()).collect();
        assert_eq!(names, vec!["hero", "cards", "columns"]);
        assert!(page.is_hidden());
    }
}
