use tracing::debug;

use crate::markup::{to_class_name, Element, Node};
use crate::page::{Block, Dataset, Slot};

/// Class token every authored block may carry; never a display class.
const BLOCK_MARKER: &str = "block";

/// Dataset key reserved for the block name itself.
const RESERVED_KEY: &str = "name";

/// Turns one authored `div` group into a `Block`.
///
/// The first class token is the block name. Rows are the group's child `div`s
/// and cells the rows' child `div`s. A row's label is `value` when it has a
/// single cell, otherwise the first cell's text; its value is the last cell.
/// A one-row block whose value is plain text stores it in the dataset, every
/// other row becomes a slot with its markup preserved.
///
/// Returns `None` for groups without a class list.
pub fn decorate_block(group: &Element, next_id: &mut usize) -> Option<Block> {
    let classes = group.classes();
    let (&name, rest) = classes.split_first()?;
    let display: Vec<String> = rest
        .iter()
        .filter(|c| **c != name && **c != BLOCK_MARKER)
        .map(|c| c.to_string())
        .collect();

    let mut dataset: Dataset = group
        .attrs
        .iter()
        .filter_map(|(k, v)| Some((k.strip_prefix("data-")?, v.as_str())))
        .collect();

    let rows: Vec<&Element> = group.child_elements().filter(|e| e.is("div")).collect();
    let single_row = rows.len() == 1;
    let mut slots = Vec::new();
    for row in rows {
        let cells: Vec<&Element> = row.child_elements().filter(|e| e.is("div")).collect();
        let Some(last) = cells.last() else {
            continue;
        };
        let label = if cells.len() == 1 {
            "value".to_string()
        } else {
            slot_label(&cells[0].text_content())
        };

        if single_row && !last.has_element_child() {
            dataset.insert(label, last.text_content().trim());
        } else {
            slots.push(Slot {
                label,
                content: slot_content(last),
            });
        }
    }
    dataset.remove(RESERVED_KEY);

    let id = *next_id;
    *next_id += 1;
    debug!("Decorated block '{name}' ({} slots)", slots.len());
    Some(Block::new(id, name, display, dataset, slots))
}

/// Labels become tag prefixes, so one starting with a digit gets `slot-`.
fn slot_label(text: &str) -> String {
    let label = to_class_name(text);
    if label.is_empty() {
        "value".to_string()
    } else if label.starts_with(|c: char| c.is_ascii_digit()) {
        format!("slot-{label}")
    } else {
        label
    }
}

fn slot_content(cell: &Element) -> Vec<Node> {
    if cell.has_element_child() {
        cell.children.clone()
    } else {
        vec![Node::text(cell.text_content().trim())]
    }
}

/// Builds the authoring structure for a block: a `div` classed `name` whose
/// rows and cells are nested `div`s, each cell holding the given nodes.
pub fn build_block(name: &str, rows: Vec<Vec<Vec<Node>>>) -> Element {
    let mut block = Element::new("div").with_attr("class", name);
    for row in rows {
        let mut row_el = Element::new("div");
        for cell in row {
            let mut cell_el = Element::new("div");
            cell_el.children = cell;
            row_el.children.push(Node::Element(cell_el));
        }
        block.children.push(Node::Element(row_el));
    }
    block
}
