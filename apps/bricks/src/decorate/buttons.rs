use crate::markup::Element;

const CONTAINER_CLASS: &str = "button-container";

/// Turns links that stand alone in their paragraph into buttons.
///
/// A link that is the only child of a `p` or `div` gets the class `button`.
/// Wrapped once more in `strong` or `em` inside a `p`, it becomes
/// `button primary` or `button secondary`. Links showing their own URL and
/// links around images are left alone. Every link without a title takes its
/// text as one.
pub fn decorate_buttons(element: &mut Element) {
    if element.is("a") && element.attr("title").map_or(true, str::is_empty) {
        let text = element.text_content();
        if !text.is_empty() {
            element.set_attr("title", text);
        }
    }
    if mark_button(element) {
        element.add_class(CONTAINER_CLASS);
    }
    for child in element.child_elements_mut() {
        decorate_buttons(child);
    }
}

/// Classes the button link inside `container`, if it holds one.
fn mark_button(container: &mut Element) -> bool {
    let direct = container.is("p") || container.is("div");
    let paragraph = container.is("p");
    let Some(only) = sole_element_mut(container) else {
        return false;
    };

    if only.is("a") {
        if !direct || !is_button_link(only) {
            return false;
        }
        only.set_attr("class", "button");
        return true;
    }

    let variant = if only.is("strong") {
        "primary"
    } else if only.is("em") {
        "secondary"
    } else {
        return false;
    };
    if !paragraph {
        return false;
    }
    match sole_element_mut(only) {
        Some(link) if link.is("a") && is_button_link(link) => {
            link.set_attr("class", format!("button {variant}"));
            true
        }
        _ => false,
    }
}

fn is_button_link(link: &Element) -> bool {
    link.attr("href").unwrap_or_default() != link.text_content()
        && link.find_first(|e| e.is("img")).is_none()
}

/// The single child of `element` when that child is an element. Any text,
/// whitespace included, disqualifies it.
fn sole_element_mut(element: &mut Element) -> Option<&mut Element> {
    match element.children.as_mut_slice() {
        [only] => only.as_element_mut(),
        _ => None,
    }
}
