/// Sanitizes a string for use as a class name: lowercase, every run of
/// characters outside `[0-9a-z]` collapsed to a single `-`, no leading or
/// trailing `-`.
pub fn to_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Sanitizes a string for use as a property name: `to_class_name`, then every
/// `-x` (x a lowercase letter) becomes `X`. A dash before a digit is kept.
pub fn to_camel_case(name: &str) -> String {
    let class_name = to_class_name(name);
    let mut out = String::with_capacity(class_name.len());
    let mut chars = class_name.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, chars.peek()) {
            ('-', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Inverse of `to_camel_case` for attribute output: `backgroundColor` →
/// `background-color`.
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_class_name() {
        assert_eq!(to_class_name("Highlight"), "highlight");
        assert_eq!(to_class_name("  Dark  Mode!! "), "dark-mode");
        assert_eq!(to_class_name("--a__b--"), "a-b");
        assert_eq!(to_class_name(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("Background Color"), "backgroundColor");
        assert_eq!(to_camel_case("max-width"), "maxWidth");
        assert_eq!(to_camel_case("col-2"), "col-2");
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("backgroundColor"), "background-color");
        assert_eq!(to_kebab_case("plain"), "plain");
    }
}
