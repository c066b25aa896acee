use std::fmt;

use serde::Serialize;
use url::{ParseError, Url};

use crate::dom::{DomNode, DomProvider, HeadlessDom};
use crate::escape::{escape_attr, escape_text};

// ---------------------------------------------------------------------------
// SafeHtml
// ---------------------------------------------------------------------------

/// HTML that has been through a [`Sanitizer`].
///
/// Only the sanitizer constructs values of this type, so holding one is proof
/// that the markup contains nothing outside the allow-list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// The empty fragment.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// AllowList
// ---------------------------------------------------------------------------

/// Which elements and attributes survive sanitization.
#[derive(Clone, Debug)]
pub struct AllowList {
    /// Allowed tags with the attributes each may carry.
    pub tags: &'static [(&'static str, &'static [&'static str])],
    /// Elements removed together with everything inside them.
    pub drop_with_content: &'static [&'static str],
    /// Schemes accepted in `href` and `src`.
    pub url_schemes: &'static [&'static str],
}

impl AllowList {
    /// The set of fragments the serializer can emit.
    pub fn story_content() -> Self {
        Self {
            tags: &[
                ("p", &["class"]),
                ("blockquote", &[]),
                ("img", &["src"]),
                ("li", &[]),
                ("ol", &[]),
                ("ul", &[]),
                ("h1", &[]),
                ("h2", &[]),
                ("h3", &[]),
                ("strong", &[]),
                ("em", &[]),
                ("u", &[]),
                ("a", &["href"]),
            ],
            drop_with_content: &[
                "script", "style", "iframe", "object", "embed", "template", "noscript",
                "textarea", "title", "xmp", "noembed", "noframes", "svg", "math",
            ],
            url_schemes: &["http", "https", "mailto", "tel"],
        }
    }

    fn attributes_for(&self, tag: &str) -> Option<&'static [&'static str]> {
        self.tags
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, attrs)| *attrs)
    }

    fn drops_content(&self, tag: &str) -> bool {
        self.drop_with_content.iter().any(|t| *t == tag)
    }

    fn url_is_allowed(&self, attr: &str, value: &str) -> bool {
        // The WHATWG parser strips embedded tabs and newlines the way browsers
        // do, so `java\tscript:` still parses as a javascript URL.
        let url = match Url::parse(value) {
            Ok(url) => url,
            Err(ParseError::RelativeUrlWithoutBase) => return true,
            Err(_) => return false,
        };
        if attr == "src" && url.scheme() == "data" {
            return url.path().to_ascii_lowercase().starts_with("image/");
        }
        self.url_schemes.iter().any(|s| *s == url.scheme())
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::story_content()
    }
}

// ---------------------------------------------------------------------------
// Sanitizer
// ---------------------------------------------------------------------------

/// Allow-list HTML sanitizer.
///
/// Disallowed elements are unwrapped (their children are kept and filtered),
/// except for raw-content elements such as `<script>`, which are removed with
/// everything inside them. Disallowed attributes, comments, and URLs with an
/// unexpected scheme are removed.
pub struct Sanitizer {
    dom: Box<dyn DomProvider>,
    allow: AllowList,
}

impl Sanitizer {
    /// Build a sanitizer over the given DOM provider with the default
    /// allow-list.
    pub fn new(dom: impl DomProvider + 'static) -> Self {
        Self::with_allow_list(dom, AllowList::default())
    }

    /// Build a sanitizer over the headless html5ever DOM.
    pub fn headless() -> Self {
        Self::new(HeadlessDom)
    }

    pub fn with_allow_list(dom: impl DomProvider + 'static, allow: AllowList) -> Self {
        Self {
            dom: Box::new(dom),
            allow,
        }
    }

    /// Name of the DOM provider in use.
    pub fn provider(&self) -> &'static str {
        self.dom.name()
    }

    /// Sanitize an HTML fragment.
    pub fn sanitize(&self, html: &str) -> SafeHtml {
        if html.is_empty() {
            return SafeHtml::empty();
        }
        let nodes = self.dom.parse_fragment(html);
        let mut out = String::with_capacity(html.len());
        self.write_nodes(&mut out, &nodes);
        SafeHtml(out)
    }

    fn write_nodes(&self, out: &mut String, nodes: &[DomNode]) {
        for node in nodes {
            self.write_node(out, node);
        }
    }

    fn write_node(&self, out: &mut String, node: &DomNode) {
        match node {
            DomNode::Text(text) => escape_text(out, text),
            DomNode::Comment(_) => {}
            DomNode::Element {
                name,
                attrs,
                children,
            } => {
                let tag = name.as_str();
                if self.allow.drops_content(tag) {
                    tracing::debug!(tag, "dropping element with content");
                    return;
                }
                let Some(allowed_attrs) = self.allow.attributes_for(tag) else {
                    tracing::debug!(tag, "unwrapping disallowed element");
                    self.write_nodes(out, children);
                    return;
                };

                out.push('<');
                out.push_str(tag);
                for (attr, value) in attrs {
                    if !allowed_attrs.iter().any(|a| *a == attr.as_str()) {
                        continue;
                    }
                    if matches!(attr.as_str(), "href" | "src")
                        && !self.allow.url_is_allowed(attr, value)
                    {
                        tracing::debug!(tag, attr = attr.as_str(), "dropping unsafe url");
                        continue;
                    }
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    escape_attr(out, value);
                    out.push('"');
                }
                out.push('>');

                if is_void(tag) {
                    return;
                }
                self.write_nodes(out, children);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::headless()
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer")
            .field("provider", &self.dom.name())
            .field("tags", &self.allow.tags.len())
            .finish()
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}
