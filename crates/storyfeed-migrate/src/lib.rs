//! Schema migration for the JSON resources in a user's bucket.
//!
//! Clients have written `publicStories.json` and `settings.json` in several
//! shapes over time. This crate turns any of them into the canonical shape
//! from `storyfeed-types`.
//!
//! Each resource has an ordered table of [`MigrationStep`]s. A step pairs a
//! detection predicate with a transform; the table is walked in order and a
//! step runs only when its predicate matches, until the payload is canonical.
//! Steps only add or rename fields. They never drop a story and never touch
//! a story's `content`.
//!
//! Migration is total: absent input yields the canonical empty value and an
//! unrecognisable payload yields whatever fields could be recovered plus
//! defaults. Nothing here performs I/O.

pub mod settings;
pub mod stories;
pub mod table;

pub use settings::{migrate_settings, SETTINGS_STEPS};
pub use stories::{migrate_stories, migrate_stories_with_report, STORY_STEPS};
pub use table::{MigrationReport, MigrationStep};
