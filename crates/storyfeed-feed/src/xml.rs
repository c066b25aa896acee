//! XML text helpers.

use std::fmt::{self, Write};

/// Characters XML 1.0 allows in a document.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Escape `text` for element content or a quoted attribute.
pub fn escape<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' => out.write_str("&quot;")?,
            '\'' => out.write_str("&apos;")?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Wrap `text` in a CDATA section.
///
/// A `]]>` inside the text is split across two sections so the content
/// round-trips unchanged.
pub fn cdata<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    out.write_str("<![CDATA[")?;
    let cleaned: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    let mut parts = cleaned.split("]]>");
    if let Some(first) = parts.next() {
        out.write_str(first)?;
    }
    for part in parts {
        out.write_str("]]]]><![CDATA[>")?;
        out.write_str(part)?;
    }
    out.write_str("]]>")
}

/// `<name>escaped text</name>`.
pub fn text_element<W: Write>(out: &mut W, name: &str, text: &str) -> fmt::Result {
    write!(out, "<{name}>")?;
    escape(out, text)?;
    write!(out, "</{name}>")
}

/// `<name><![CDATA[text]]></name>`.
pub fn cdata_element<W: Write>(out: &mut W, name: &str, text: &str) -> fmt::Result {
    write!(out, "<{name}>")?;
    cdata(out, text)?;
    write!(out, "</{name}>")
}
