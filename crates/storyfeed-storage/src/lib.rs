//! Read access to a user's storage bucket.
//!
//! A bucket is a plain HTTP prefix. Two resources under it matter here:
//! `publicStories.json` and `settings.json`. The [`ContentFetcher`] fetches
//! both concurrently and hands back their raw JSON, or `None` for a resource
//! that does not exist yet.
//!
//! # Storage Backends
//!
//! All backends implement the [`StorageFetch`] trait:
//!
//! - [`HttpStorage`] -- `reqwest` GET against the bucket
//! - [`InMemoryStorage`] -- URL-keyed responses for tests and embedding
//!
//! # Design Rules
//!
//! 1. 200 is content, 404 is absence, anything else fails the request.
//! 2. Both fetches complete before the fetcher returns.
//! 3. Payloads are not interpreted beyond JSON parsing. A body that does not
//!    parse counts as absent.

pub mod error;
pub mod fetcher;
pub mod http;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use fetcher::{resource_url, ContentFetcher, Fetched, Resource};
pub use http::HttpStorage;
pub use memory::InMemoryStorage;
pub use traits::{FetchResponse, StorageFetch};
