//! Serializes a page back to HTML with its model state reflected into
//! attributes: `status` on sections and blocks, `display:none` on whatever is
//! still hidden, stylesheet links and scripts appended to the head.

use crate::components::slot_element;
use crate::markup::{to_kebab_case, write_close_tag, write_open_tag, Serializer};
use crate::page::{Block, BlockStatus, Page, Section, Wrapper, WrapperItem};

const HIDDEN: &str = "display:none";

/// Attributes a block element owns; dataset entries never override them.
const RESERVED_ATTRIBUTES: &[&str] = &["class", "block-name", "status"];

pub fn render_page(page: &Page) -> String {
    let eager = page.eager_image();
    let mut ser = Serializer::with_eager_image(eager.as_deref());
    let mut out = String::from("<!DOCTYPE html>");

    out.push_str("<html>");
    write_open_tag(&mut out, "head", &[]);
    ser.write_nodes(&mut out, page.head().children());
    for href in page.resources().stylesheets() {
        write_open_tag(
            &mut out,
            "link",
            &[
                ("rel".to_string(), "stylesheet".to_string()),
                ("href".to_string(), href),
            ],
        );
    }
    for script in page.resources().scripts() {
        let mut attrs = vec![("src".to_string(), script.src)];
        attrs.extend(script.attrs);
        write_open_tag(&mut out, "script", &attrs);
        write_close_tag(&mut out, "script");
    }
    write_close_tag(&mut out, "head");

    let mut body_attrs = Vec::new();
    if !page.body_classes().is_empty() {
        body_attrs.push(("class".to_string(), page.body_classes().join(" ")));
    }
    if page.is_hidden() {
        body_attrs.push(("style".to_string(), HIDDEN.to_string()));
    }
    write_open_tag(&mut out, "body", &body_attrs);

    if let Some(header) = page.header() {
        write_open_tag(&mut out, "header", &[]);
        write_block(&mut out, &mut ser, header);
        write_close_tag(&mut out, "header");
    }

    write_open_tag(&mut out, "main", &[]);
    for section in page.sections() {
        write_section(&mut out, &mut ser, section);
    }
    write_close_tag(&mut out, "main");

    if let Some(footer) = page.footer() {
        write_open_tag(&mut out, "footer", &[]);
        write_block(&mut out, &mut ser, footer);
        write_close_tag(&mut out, "footer");
    }

    write_close_tag(&mut out, "body");
    out.push_str("</html>");
    out
}

fn write_section(out: &mut String, ser: &mut Serializer<'_>, section: &Section) {
    let mut attrs = vec![("status".to_string(), section.status().as_str().to_string())];
    if !section.classes().is_empty() {
        attrs.push(("class".to_string(), section.classes().join(" ")));
    }
    for (key, value) in section.metadata().iter() {
        attrs.push((format!("data-{}", to_kebab_case(key)), value.to_string()));
    }
    if section.is_hidden() {
        attrs.push(("style".to_string(), HIDDEN.to_string()));
    }

    write_open_tag(out, "section", &attrs);
    for wrapper in section.wrappers() {
        write_wrapper(out, ser, wrapper);
    }
    write_close_tag(out, "section");
}

fn write_wrapper(out: &mut String, ser: &mut Serializer<'_>, wrapper: &Wrapper) {
    let mut attrs = vec![("block-name".to_string(), "wrapper".to_string())];
    if let Wrapper::DefaultContent(_) = wrapper {
        attrs.push(("type".to_string(), "default-content".to_string()));
    }

    write_open_tag(out, "wrapper-brick", &attrs);
    match wrapper {
        Wrapper::DefaultContent(nodes) => ser.write_nodes(out, nodes),
        Wrapper::BlockContainer(items) => {
            for item in items {
                match item {
                    WrapperItem::Block(block) => write_block(out, ser, block),
                    WrapperItem::Markup(element) => ser.write_element(out, element),
                }
            }
        }
    }
    write_close_tag(out, "wrapper-brick");
}

/// `<{name}-brick>` with the component's attributes and markup once
/// activated, the decorated dataset and slots before that.
fn write_block(out: &mut String, ser: &mut Serializer<'_>, block: &Block) {
    let tag = format!("{}-brick", block.name());
    let rendered = block.rendered();

    let mut attrs = Vec::new();
    if !block.classes().is_empty() {
        attrs.push(("class".to_string(), block.classes().join(" ")));
    }
    let data = rendered
        .as_ref()
        .map(|r| &r.attributes)
        .unwrap_or(block.dataset());
    attrs.extend(
        data.iter()
            .filter(|(k, _)| !RESERVED_ATTRIBUTES.contains(k))
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    attrs.push(("block-name".to_string(), block.name().to_string()));
    let status = block.status();
    if status != BlockStatus::Unset {
        let value = match status {
            BlockStatus::Loading => "loading",
            _ => "loaded",
        };
        attrs.push(("status".to_string(), value.to_string()));
    }

    write_open_tag(out, &tag, &attrs);
    match &rendered {
        Some(rendered) => ser.write_nodes(out, &rendered.markup),
        None => {
            for slot in block.slots() {
                ser.write_element(out, &slot_element(slot));
            }
        }
    }
    write_close_tag(out, &tag);
}
