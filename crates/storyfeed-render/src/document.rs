use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RenderError, RenderResult};

// ---------------------------------------------------------------------------
// DocumentTree
// ---------------------------------------------------------------------------

/// A decoded rich-text document: an ordered list of top-level nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl DocumentTree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Decode a stored story body.
    ///
    /// Accepts the full editor envelope (`{"object":"value","document":{...}}`)
    /// as well as a bare document (`{"nodes":[...]}`).
    pub fn from_json(encoded: &str) -> RenderResult<Self> {
        let value: Value = serde_json::from_str(encoded)?;
        Self::from_value(value)
    }

    /// Decode an already-parsed body.
    pub fn from_value(mut value: Value) -> RenderResult<Self> {
        let document = match value.get_mut("document").map(Value::take) {
            Some(doc) => doc,
            None if value.get("nodes").is_some() => value,
            None => return Err(RenderError::UnknownEnvelope),
        };
        serde_json::from_value(document).map_err(|e| RenderError::MalformedNodes(e.to_string()))
    }

    /// Encode back into the editor envelope.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "object": "value",
            "document": { "object": "document", "nodes": self.nodes }
        })
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One node of the tree, tagged by its `object` member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum Node {
    Block(Block),
    Inline(Inline),
    Text(Text),
}

impl Node {
    /// A block of the given kind with children.
    pub fn block(kind: BlockKind, nodes: Vec<Node>) -> Self {
        Self::Block(Block {
            kind,
            data: Map::new(),
            nodes,
        })
    }

    /// A paragraph carrying a CSS class.
    pub fn paragraph_with_class(class: impl Into<String>, nodes: Vec<Node>) -> Self {
        let mut data = Map::new();
        data.insert("className".into(), Value::String(class.into()));
        Self::Block(Block {
            kind: BlockKind::Paragraph,
            data,
            nodes,
        })
    }

    /// An image block.
    pub fn image(src: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("src".into(), Value::String(src.into()));
        Self::Block(Block {
            kind: BlockKind::Image,
            data,
            nodes: Vec::new(),
        })
    }

    /// A link inline.
    pub fn link(href: impl Into<String>, nodes: Vec<Node>) -> Self {
        let mut data = Map::new();
        data.insert("href".into(), Value::String(href.into()));
        Self::Inline(Inline {
            kind: InlineKind::Link,
            data,
            nodes,
        })
    }

    /// A plain text node with a single unmarked run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::marked(text, Vec::new())
    }

    /// A text node with a single run carrying `marks` (first mark innermost).
    pub fn marked(text: impl Into<String>, marks: Vec<MarkKind>) -> Self {
        Self::Text(Text {
            leaves: vec![Leaf {
                text: text.into(),
                marks: marks.into_iter().map(|kind| Mark { kind }).collect(),
            }],
        })
    }
}

/// A block-level element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Block {
    /// String value from the block's data map.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// An inline element wrapping other inlines and text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Inline {
    #[serde(rename = "type")]
    pub kind: InlineKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Inline {
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// A text node made of one or more runs.
///
/// Two encodings are found in stored documents: a `leaves` array, and a
/// flat node with `text` and `marks`. Both decode to `leaves`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "EncodedText")]
pub struct Text {
    pub leaves: Vec<Leaf>,
}

/// A run of text sharing one set of marks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<Mark>,
}

/// Formatting applied to a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
}

#[derive(Deserialize)]
struct EncodedText {
    #[serde(default)]
    leaves: Option<Vec<Leaf>>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    marks: Vec<Mark>,
}

impl From<EncodedText> for Text {
    fn from(encoded: EncodedText) -> Self {
        let leaves = match (encoded.leaves, encoded.text) {
            (Some(leaves), _) => leaves,
            (None, Some(text)) => vec![Leaf {
                text,
                marks: encoded.marks,
            }],
            (None, None) => Vec::new(),
        };
        Self { leaves }
    }
}

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

macro_rules! string_kind {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $tag:literal $(| $alias:literal)*),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A kind this build does not render; its wrapper is dropped.
            Other(String),
        }

        impl $name {
            /// The tag written into stored documents.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Other(tag) => tag,
                }
            }
        }

        impl From<String> for $name {
            fn from(tag: String) -> Self {
                match tag.as_str() {
                    $($tag $(| $alias)* => Self::$variant,)+
                    _ => Self::Other(tag),
                }
            }
        }

        impl From<$name> for String {
            fn from(kind: $name) -> String {
                kind.as_str().to_string()
            }
        }
    };
}

string_kind! {
    /// Block element kinds.
    BlockKind {
        Paragraph => "paragraph",
        BlockQuote => "block-quote" | "blockquote",
        Image => "image",
        ListItem => "list-item",
        NumberedList => "numbered-list",
        BulletedList => "bulleted-list",
        HeadingOne => "heading-one",
        HeadingTwo => "heading-two",
        HeadingThree => "heading-three",
    }
}

string_kind! {
    /// Inline element kinds.
    InlineKind {
        Link => "link",
    }
}

string_kind! {
    /// Mark kinds.
    MarkKind {
        Bold => "bold",
        Italic => "italic",
        Underlined => "underlined" | "underline",
    }
}
