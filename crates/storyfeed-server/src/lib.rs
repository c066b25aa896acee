//! HTTP server for storyfeed.
//!
//! Serves each user's public stories as an RSS feed and as sanitized,
//! page-ready story views, resolving handles and reading buckets on every
//! request.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{http_pipeline, StoryfeedServer};
pub use state::AppState;
