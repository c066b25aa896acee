//! The storyfeed request pipeline.
//!
//! ```text
//! handle --resolve--> bucket URL --fetch (concurrent)--> raw JSON
//!        --migrate--> StoryFile + SettingsFile --assemble--> Feed | StoryView
//! ```
//!
//! [`AggregationPipeline`] owns the resolver, the fetcher, and a shared
//! [`Renderer`](storyfeed_render::Renderer). It is cheap to clone and holds
//! no per-request state.

pub mod error;
pub mod pipeline;
pub mod view;

pub use error::{ErrorClass, PipelineError, PipelineResult};
pub use pipeline::{AggregationPipeline, Loaded, Stage};
pub use view::{AuthorView, Seo, StoryView};
