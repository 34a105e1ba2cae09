use crate::markup::{to_class_name, Element};
use crate::page::Dataset;

/// Reads a two-column authoring table as key/value pairs.
///
/// Rows with fewer than two cells are skipped. The key is the first cell's
/// text run through `to_class_name`; the value comes from the second cell,
/// preferring link targets, then image sources, then paragraph text, then the
/// cell's own text. Several matches are joined with `", "`.
pub fn read_block_config(block: &Element) -> Dataset {
    let mut config = Dataset::default();
    for row in block.child_elements().filter(|e| e.is("div")) {
        let cells: Vec<&Element> = row.child_elements().collect();
        let [label, value, ..] = cells.as_slice() else {
            continue;
        };
        config.insert(to_class_name(&label.text_content()), cell_value(value));
    }
    config
}

fn cell_value(cell: &Element) -> String {
    let pick = |tag: &str, read: fn(&Element) -> String| -> Option<String> {
        let mut found = Vec::new();
        cell.find_all(|e| e.is(tag), &mut found);
        if found.is_empty() {
            return None;
        }
        Some(found.into_iter().map(read).collect::<Vec<_>>().join(", "))
    };

    pick("a", |a| a.attr("href").unwrap_or_default().to_string())
        .or_else(|| pick("img", |img| img.attr("src").unwrap_or_default().to_string()))
        .or_else(|| pick("p", |p| p.text_content().trim().to_string()))
        .unwrap_or_else(|| cell.text_content().trim().to_string())
}
