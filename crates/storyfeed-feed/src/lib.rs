//! Feed model and RSS 2.0 serialization.
//!
//! [`Feed`] and [`FeedItem`] describe a channel independent of the output
//! format; [`Feed::rss2`] writes the RSS 2.0 document. Item descriptions
//! are carried verbatim in CDATA sections, so consumers receive exactly the
//! stored body.

pub mod error;
pub mod model;
pub mod rss;
pub mod xml;

pub use error::{FeedError, FeedResult};
pub use model::{Author, Enclosure, Feed, FeedItem, RSS_DOCS_URL};
pub use rss::CONTENT_TYPE;
