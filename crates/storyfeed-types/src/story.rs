use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::timestamp::Timestamp;
use crate::CURRENT_VERSION;

/// `kind` tag carried by a canonical stories collection.
pub const STORIES_KIND: &str = "Stories";

/// One published story as stored in the user's bucket.
///
/// `content` is the encoded document tree exactly as the editor wrote it; it
/// is never re-encoded. Fields this build does not know about are kept in
/// `extra` and written back untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoryRecord {
    /// Create a record with only the required fields populated.
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            excerpt: String::new(),
            cover_image_url: None,
            meta_title: None,
            meta_description: None,
            created_at,
            updated_at: None,
            slug: None,
            extra: Map::new(),
        }
    }

    /// Builder-style setter for the encoded body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Title used for SEO metadata: `metaTitle` when set, else the title.
    pub fn seo_title(&self) -> &str {
        self.meta_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }

    /// Description used for SEO metadata: `metaDescription` when set, else
    /// the excerpt.
    pub fn seo_description(&self) -> &str {
        self.meta_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.excerpt)
    }
}

/// The public stories collection (`publicStories.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryFile {
    pub kind: String,
    pub version: String,
    pub stories: Vec<StoryRecord>,
}

impl StoryFile {
    /// A canonical, empty collection.
    pub fn empty() -> Self {
        Self::from_stories(Vec::new())
    }

    /// Wrap records in a canonical collection at the current version.
    pub fn from_stories(stories: Vec<StoryRecord>) -> Self {
        Self {
            kind: STORIES_KIND.to_string(),
            version: CURRENT_VERSION.to_string(),
            stories,
        }
    }

    /// Look up a story by id.
    pub fn find(&self, id: &str) -> Option<&StoryRecord> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

impl Default for StoryFile {
    fn default() -> Self {
        Self::empty()
    }
}

// Older editors wrote `null` for fields they never filled in.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Legacy clients wrote numeric ids.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a non-empty string or number id, got {other}"
        ))),
    }
}
