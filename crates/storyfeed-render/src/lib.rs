//! Rich-content rendering for storyfeed.
//!
//! A story body is stored as an encoded document tree. Rendering turns it
//! into HTML that is safe to inline into a page:
//!
//! ```text
//! encoded JSON ──decode──▶ DocumentTree ──serialize──▶ HTML ──sanitize──▶ SafeHtml
//! ```
//!
//! # Components
//!
//! - [`DocumentTree`] / [`Node`] -- closed node model with an explicit
//!   `Other` arm for kinds this build does not know
//! - [`serialize`] -- fixed rule table from nodes to HTML fragments
//! - [`Sanitizer`] -- allow-list filter driven by a pluggable [`DomProvider`]
//! - [`Renderer`] -- decode + serialize + sanitize in one call
//!
//! # Design Rules
//!
//! 1. Unknown block, inline, and mark kinds drop their wrapper and keep
//!    their children.
//! 2. Rendering holds no mutable state; one `Renderer` may serve any number
//!    of threads.
//! 3. The sanitizer never inspects its execution environment. The DOM it
//!    walks comes from the provider it was built with.
//! 4. A body that fails to decode renders as empty HTML, never as an error.

pub mod document;
pub mod dom;
pub mod error;
pub mod escape;
pub mod renderer;
pub mod sanitizer;
pub mod serializer;

pub use document::{
    Block, BlockKind, DocumentTree, Inline, InlineKind, Leaf, Mark, MarkKind, Node, Text,
};
pub use dom::{DomNode, DomProvider, HeadlessDom};
pub use error::{RenderError, RenderResult};
pub use renderer::Renderer;
pub use sanitizer::{AllowList, SafeHtml, Sanitizer};
pub use serializer::serialize;
