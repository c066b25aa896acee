//! HTML escaping.
//!
//! Both functions follow the HTML fragment serialization algorithm, so text
//! escaped here comes back byte-identical after a parse/serialize cycle.

/// Escape character data: `&`, `<`, `>` and U+00A0.
pub fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Escape a double-quoted attribute value: `&`, `"` and U+00A0.
pub fn escape_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
