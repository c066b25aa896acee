//! Domain records for storyfeed.
//!
//! Every value here is request-scoped: it is decoded from a user's storage
//! bucket (or from the naming service) for one request and dropped after.
//! Nothing in this crate performs I/O.
//!
//! # Key Types
//!
//! - [`StoryRecord`] / [`StoryFile`] -- the public stories collection
//! - [`SettingsFile`] -- site-level settings (name, description, colours)
//! - [`Profile`] -- identity profile mapping app origins to bucket URLs
//! - [`Timestamp`] -- epoch-millisecond instant tolerant of legacy encodings

pub mod error;
pub mod profile;
pub mod settings;
pub mod story;
pub mod timestamp;

pub use error::TypeError;
pub use profile::{Profile, ProfileImage};
pub use settings::{SettingsFile, SETTINGS_KIND};
pub use story::{StoryFile, StoryRecord, STORIES_KIND};
pub use timestamp::Timestamp;

/// Schema version written by this build for both bucket resources.
pub const CURRENT_VERSION: &str = "1.0.0";
