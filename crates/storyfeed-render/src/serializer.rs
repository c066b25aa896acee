use crate::document::{Block, BlockKind, DocumentTree, Inline, InlineKind, Leaf, MarkKind, Node};
use crate::escape::{escape_attr, escape_text};

/// Serialize a document tree to an HTML string.
///
/// Each known node kind maps to exactly one fragment:
///
/// | node            | fragment                       |
/// |-----------------|--------------------------------|
/// | paragraph       | `<p>` (with `class` if set)    |
/// | block-quote     | `<blockquote>`                 |
/// | image           | `<img src>` (children ignored) |
/// | list-item       | `<li>`                         |
/// | numbered-list   | `<ol>`                         |
/// | bulleted-list   | `<ul>`                         |
/// | heading-one..3  | `<h1>`..`<h3>`                 |
/// | link            | `<a href>`                     |
/// | bold/italic/underlined | `<strong>`/`<em>`/`<u>` |
///
/// Anything else contributes only its children. The output is not yet safe;
/// pass it through a [`Sanitizer`](crate::Sanitizer).
pub fn serialize(document: &DocumentTree) -> String {
    let mut out = String::new();
    for node in &document.nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Block(block) => write_block(out, block),
        Node::Inline(inline) => write_inline(out, inline),
        Node::Text(text) => {
            for leaf in &text.leaves {
                write_leaf(out, leaf);
            }
        }
    }
}

fn write_children(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        write_node(out, node);
    }
}

fn write_block(out: &mut String, block: &Block) {
    let tag = match &block.kind {
        BlockKind::Paragraph => {
            out.push_str("<p");
            if let Some(class) = block.data_str("className").filter(|c| !c.is_empty()) {
                write_attr(out, "class", class);
            }
            out.push('>');
            write_children(out, &block.nodes);
            out.push_str("</p>");
            return;
        }
        BlockKind::Image => {
            out.push_str("<img");
            if let Some(src) = block.data_str("src") {
                write_attr(out, "src", src);
            }
            out.push('>');
            return;
        }
        BlockKind::BlockQuote => "blockquote",
        BlockKind::ListItem => "li",
        BlockKind::NumberedList => "ol",
        BlockKind::BulletedList => "ul",
        BlockKind::HeadingOne => "h1",
        BlockKind::HeadingTwo => "h2",
        BlockKind::HeadingThree => "h3",
        BlockKind::Other(_) => {
            write_children(out, &block.nodes);
            return;
        }
    };
    write_wrapped(out, tag, &block.nodes);
}

fn write_inline(out: &mut String, inline: &Inline) {
    match &inline.kind {
        InlineKind::Link => {
            out.push_str("<a");
            if let Some(href) = inline.data_str("href") {
                write_attr(out, "href", href);
            }
            out.push('>');
            write_children(out, &inline.nodes);
            out.push_str("</a>");
        }
        InlineKind::Other(_) => write_children(out, &inline.nodes),
    }
}

// Marks wrap outward in order: the first mark ends up innermost.
fn write_leaf(out: &mut String, leaf: &Leaf) {
    let mut html = String::with_capacity(leaf.text.len());
    escape_text(&mut html, &leaf.text);
    for mark in &leaf.marks {
        let tag = match mark.kind {
            MarkKind::Bold => "strong",
            MarkKind::Italic => "em",
            MarkKind::Underlined => "u",
            MarkKind::Other(_) => continue,
        };
        html = format!("<{tag}>{html}</{tag}>");
    }
    out.push_str(&html);
}

fn write_wrapped(out: &mut String, tag: &str, nodes: &[Node]) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    write_children(out, nodes);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_attr(out, value);
    out.push('"');
}
