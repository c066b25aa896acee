//! Handle resolution for storyfeed.
//!
//! A handle (`alice.id`) is looked up against a naming service to obtain the
//! user's public [`Profile`](storyfeed_types::Profile). The profile maps each
//! application origin to the storage bucket that application writes to; the
//! [`HandleResolver`] picks the bucket registered for this application.
//!
//! # Lookup Backends
//!
//! All backends implement the [`IdentityLookup`] trait:
//!
//! - [`HttpIdentityLookup`] -- queries a naming service over HTTP
//! - [`InMemoryIdentityLookup`] -- fixed profiles, for tests and embedding
//!
//! # Design Rules
//!
//! 1. "Name not found" is an answer, not a failure: it maps to
//!    [`NotFoundReason::UnknownHandle`].
//! 2. Lookups are never retried or cached here.
//! 3. A profile without a bucket for the origin is
//!    [`NotFoundReason::AppNotRegistered`].

pub mod error;
pub mod http;
pub mod memory;
pub mod resolver;
pub mod traits;

pub use error::{IdentityError, IdentityResult, NotFoundReason, ResolveError};
pub use http::HttpIdentityLookup;
pub use memory::InMemoryIdentityLookup;
pub use resolver::{HandleResolver, Resolved};
pub use traits::IdentityLookup;
