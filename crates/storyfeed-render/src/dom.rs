use scraper::{ElementRef, Html};

/// A parsed HTML node, independent of the parser that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomNode {
    Element {
        /// Lower-case local name.
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<DomNode>,
    },
    Text(String),
    Comment(String),
}

impl DomNode {
    /// Shorthand for an element node.
    pub fn element(name: &str, attrs: &[(&str, &str)], children: Vec<DomNode>) -> Self {
        Self::Element {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        }
    }

    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Capability that turns an HTML fragment into a node list.
///
/// The sanitizer is built around one of these. A server uses
/// [`HeadlessDom`]; an embedder with its own DOM (a browser host, a test
/// double) supplies its own implementation.
pub trait DomProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Parse `html` as the children of a `<body>` element.
    fn parse_fragment(&self, html: &str) -> Vec<DomNode>;
}

/// Headless DOM backed by html5ever (through `scraper`).
///
/// Parsing follows the HTML fragment algorithm exactly, so malformed markup is
/// repaired the same way a browser would repair it.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessDom;

impl DomProvider for HeadlessDom {
    fn name(&self) -> &'static str {
        "html5ever"
    }

    fn parse_fragment(&self, html: &str) -> Vec<DomNode> {
        let fragment = Html::parse_fragment(html);
        // Fragment roots hang off a synthetic <html> element.
        convert_children(fragment.root_element())
    }
}

fn convert_children(parent: ElementRef<'_>) -> Vec<DomNode> {
    parent
        .children()
        .filter_map(|child| {
            if let Some(element) = ElementRef::wrap(child) {
                return Some(convert_element(element));
            }
            match child.value() {
                scraper::Node::Text(text) => Some(DomNode::Text(String::from(&**text))),
                scraper::Node::Comment(comment) => Some(DomNode::Comment(String::from(&**comment))),
                _ => None,
            }
        })
        .collect()
}

fn convert_element(element: ElementRef<'_>) -> DomNode {
    let value = element.value();
    DomNode::Element {
        name: value.name().to_ascii_lowercase(),
        attrs: value
            .attrs()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect(),
        children: convert_children(element),
    }
}
