//! Page decoration: raw authored HTML → `Page`.
//!
//! Runs once, synchronously, when a page is parsed. Every top-level child of
//! the main container becomes a `Section`; inside a section, runs of loose
//! content and runs of `div` groups are split into wrappers, and classed
//! groups become `Block`s.

mod blocks;
mod buttons;
mod config;

use std::sync::Arc;

use tracing::{debug, info};

use crate::markup::{parse_document_html, to_camel_case, to_class_name, Element, Node};
use crate::page::{Dataset, Page, PageHead, Section, Wrapper, WrapperItem};

pub use blocks::{build_block, decorate_block};
pub use buttons::decorate_buttons;
pub use config::read_block_config;

/// Name of the authored group carrying section-level settings.
pub const SECTION_METADATA: &str = "section-metadata";

/// Parses a full HTML document (or fragment) and decorates it into a page.
///
/// The main container is `<main>`, or `<body>` when there is none. Header and
/// footer blocks are added when the body has `<header>` / `<footer>`
/// children.
pub fn decorate_page(html: &str) -> Page {
    let mut document = parse_document_html(html);
    let head = PageHead::from_document(&document);
    let body_classes = decorate_template_and_theme(&head);

    let Some(body) = document.child_elements_mut().find(|e| e.is("body")) else {
        return Page::new(head, body_classes, Vec::new());
    };
    decorate_buttons(body);
    let body = &*body;

    let mut next_id = 0;
    let sections = match body.find_first(|e| e.is("main")) {
        Some(main) => decorate_sections(main.children.iter(), &mut next_id),
        None => decorate_sections(
            body.children
                .iter()
                .filter(|n| !n.as_element().is_some_and(is_chrome)),
            &mut next_id,
        ),
    };

    let mut page = Page::new(head, body_classes, sections);
    for chrome in body.child_elements().filter(|e| is_chrome(e)) {
        let authored = build_block(&chrome.tag, vec![vec![vec![]]]);
        let Some(block) = decorate_block(&authored, &mut next_id) else {
            continue;
        };
        page = if chrome.is("header") {
            page.with_header(block)
        } else {
            page.with_footer(block)
        };
    }

    info!(
        "Decorated page: {} sections, {} blocks",
        page.sections().len(),
        next_id
    );
    page
}

fn is_chrome(element: &Element) -> bool {
    element.is("header") || element.is("footer")
}

/// Body classes from the `template` and `theme` metadata, each a
/// comma-separated list.
pub fn decorate_template_and_theme(head: &PageHead) -> Vec<String> {
    ["template", "theme"]
        .iter()
        .flat_map(|name| {
            head.get_metadata(name)
                .split(',')
                .map(to_class_name)
                .filter(|c| !c.is_empty())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// One run of section content before blocks are decorated.
enum RawWrapper {
    DefaultContent(Vec<Node>),
    BlockContainer(Vec<Element>),
}

impl RawWrapper {
    fn is_empty(&self) -> bool {
        match self {
            RawWrapper::DefaultContent(nodes) => nodes.is_empty(),
            RawWrapper::BlockContainer(groups) => groups.is_empty(),
        }
    }
}

fn decorate_sections<'a>(
    candidates: impl Iterator<Item = &'a Node>,
    next_id: &mut usize,
) -> Vec<Section> {
    candidates
        .filter(|n| !n.is_blank())
        .enumerate()
        .map(|(index, candidate)| match candidate {
            Node::Element(e) if e.is("div") => decorate_section(index, e, next_id),
            other => Section::new(
                index,
                Vec::new(),
                Dataset::default(),
                vec![Wrapper::DefaultContent(vec![other.clone()])],
            ),
        })
        .collect()
}

fn decorate_section(index: usize, candidate: &Element, next_id: &mut usize) -> Section {
    let mut raw = group_wrappers(&candidate.children);
    let (classes, metadata) = take_section_metadata(&mut raw);

    let wrappers = raw
        .into_iter()
        .map(|wrapper| match wrapper {
            RawWrapper::DefaultContent(nodes) => Wrapper::DefaultContent(nodes),
            RawWrapper::BlockContainer(groups) => Wrapper::BlockContainer(
                groups
                    .into_iter()
                    .map(|group| match decorate_block(&group, next_id) {
                        Some(block) => WrapperItem::Block(Arc::new(block)),
                        None => WrapperItem::Markup(group),
                    })
                    .collect(),
            ),
        })
        .collect();

    debug!("Decorated section {index} with classes {classes:?}");
    Section::new(index, classes, metadata, wrappers)
}

/// Splits a section's children into wrappers: consecutive `div` groups share a
/// block container, everything else is default content. Blank text is
/// dropped.
fn group_wrappers(children: &[Node]) -> Vec<RawWrapper> {
    let mut wrappers: Vec<RawWrapper> = Vec::new();
    for child in children.iter().filter(|n| !n.is_blank()) {
        match child {
            Node::Element(e) if e.is("div") => {
                if let Some(RawWrapper::BlockContainer(groups)) = wrappers.last_mut() {
                    groups.push(e.clone());
                } else {
                    wrappers.push(RawWrapper::BlockContainer(vec![e.clone()]));
                }
            }
            node => {
                if let Some(RawWrapper::DefaultContent(nodes)) = wrappers.last_mut() {
                    nodes.push(node.clone());
                } else {
                    wrappers.push(RawWrapper::DefaultContent(vec![node.clone()]));
                }
            }
        }
    }
    wrappers
}

/// Removes the first section-metadata group and turns its rows into section
/// classes (`style`) and camel-cased metadata (everything else). A wrapper
/// left empty by the removal is dropped.
fn take_section_metadata(wrappers: &mut Vec<RawWrapper>) -> (Vec<String>, Dataset) {
    let mut classes = Vec::new();
    let mut metadata = Dataset::default();

    let found = wrappers.iter_mut().enumerate().find_map(|(i, wrapper)| {
        let RawWrapper::BlockContainer(groups) = wrapper else {
            return None;
        };
        let pos = groups
            .iter()
            .position(|g| g.classes().first() == Some(&SECTION_METADATA))?;
        Some((i, groups.remove(pos)))
    });
    let Some((i, marker)) = found else {
        return (classes, metadata);
    };
    if wrappers[i].is_empty() {
        wrappers.remove(i);
    }

    for (key, value) in read_block_config(&marker).iter() {
        if key == "style" {
            classes.extend(
                value
                    .split(',')
                    .map(to_class_name)
                    .filter(|c| !c.is_empty()),
            );
        } else {
            metadata.insert(to_camel_case(key), value);
        }
    }
    (classes, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{BlockStatus, SectionStatus, WrapperKind};

    fn kinds(section: &Section) -> Vec<WrapperKind> {
        section.wrappers().iter().map(Wrapper::kind).collect()
    }

    #[test]
    fn test_every_top_level_child_becomes_an_initialized_section() {
        let page = decorate_page(
            r#"<main>
                <div><p>One</p></div>
                <div><div class="cards"><div><div>x</div></div></div></div>
                <p>Loose paragraph</p>
            </main>"#,
        );

        assert_eq!(page.sections().len(), 3);
        for (i, section) in page.sections().iter().enumerate() {
            assert_eq!(section.index(), i);
            assert_eq!(section.status(), SectionStatus::Initialized);
            assert!(section.is_hidden());
        }
        assert_eq!(kinds(&page.sections()[2]), vec![WrapperKind::DefaultContent]);
        assert!(page.blocks().iter().all(|b| b.status() == BlockStatus::Unset));
    }

    #[test]
    fn test_wrappers_alternate_between_content_and_block_groups() {
        let page = decorate_page(
            r#"<main><div>
                <h1>Title</h1>
                <p>Intro</p>
                <div class="hero"><div><div>a</div></div></div>
                <div class="cards"><div><div>b</div></div></div>
                <p>Between</p>
                <div class="columns"><div><div>c</div></div></div>
                <div><p>unclassed</p></div>
            </div></main>"#,
        );
        let section = &page.sections()[0];

        assert_eq!(
            kinds(section),
            vec![
                WrapperKind::DefaultContent,
                WrapperKind::BlockContainer,
                WrapperKind::DefaultContent,
                WrapperKind::BlockContainer
            ]
        );
        let Wrapper::DefaultContent(intro) = &section.wrappers()[0] else {
            panic!("expected default content");
        };
        assert_eq!(intro.len(), 2);

        let names: Vec<_> = section.blocks().map(|b| b.name().to_string()).collect();
        assert_eq!(names, vec!["hero", "cards", "columns"]);
        let Wrapper::BlockContainer(items) = &section.wrappers()[3] else {
            panic!("expected block container");
        };
        assert!(matches!(items[1], WrapperItem::Markup(_)));
    }

    #[test]
    fn test_section_metadata_becomes_classes_and_data() {
        let page = decorate_page(
            r#"<main><div>
                <p>Content</p>
                <div class="section-metadata">
                    <div><div>style</div><div>highlight, compact</div></div>
                    <div><div>Background Color</div><div>navy</div></div>
                </div>
            </div></main>"#,
        );
        let section = &page.sections()[0];

        assert_eq!(section.classes(), ["highlight".to_string(), "compact".to_string()]);
        assert_eq!(section.metadata().get("backgroundColor"), Some("navy"));
        assert_eq!(kinds(section), vec![WrapperKind::DefaultContent]);
        assert_eq!(section.blocks().count(), 0);
    }

    #[test]
    fn test_section_without_metadata_is_unchanged() {
        let page = decorate_page("<main><div><p>Only text</p></div></main>");
        let section = &page.sections()[0];
        assert!(section.classes().is_empty());
        assert!(section.metadata().is_empty());
    }

    #[test]
    fn test_block_ids_follow_document_order() {
        let page = decorate_page(
            r#"<main>
                <div><div class="a"><div><div>1</div></div></div><div class="b"><div><div>2</div></div></div></div>
                <div><div class="c"><div><div>3</div></div></div></div>
            </main>"#,
        );
        let ids: Vec<_> = page.blocks().iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_body_is_the_container_without_main() {
        let page = decorate_page(
            "<html><body><header></header><div><p>Hi</p></div><footer></footer></body></html>",
        );
        assert_eq!(page.sections().len(), 1);
        assert_eq!(page.header().map(|b| b.name()), Some("header"));
        assert_eq!(page.footer().map(|b| b.name()), Some("footer"));
        assert_eq!(page.footer().map(|b| b.id()), Some(1));
    }

    #[test]
    fn test_buttons_decorated_in_content_and_blocks() {
        let page = decorate_page(
            r#"<main><div>
                <p><a href="/shop">Shop</a></p>
                <div class="hero"><div><div><p><strong><a href="/buy">Buy</a></strong></p></div></div></div>
            </div></main>"#,
        );
        let section = &page.sections()[0];
        let Wrapper::DefaultContent(nodes) = &section.wrappers()[0] else {
            panic!("expected default content");
        };
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.classes(), vec!["button-container"]);
        assert_eq!(p.find_first(|e| e.is("a")).unwrap().classes(), vec!["button"]);

        let hero = section.blocks().next().unwrap();
        let slot = hero.slots()[0].content[0].as_element().unwrap();
        let link = slot.find_first(|e| e.is("a")).unwrap();
        assert_eq!(link.classes(), vec!["button", "primary"]);
    }

    #[test]
    fn test_template_and_theme_become_body_classes() {
        let page = decorate_page(
            r#"<html><head>
                <meta name="template" content="Product Page">
                <meta name="theme" content="dark, Holiday 2024">
            </head><body><main></main></body></html>"#,
        );
        assert_eq!(page.body_classes(), ["product-page", "dark", "holiday-2024"]);
    }
}
