use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Public identity profile published by the naming service.
///
/// Only `apps` matters to the pipeline: it maps an application origin (for
/// example `https://app.example.io`) to the base URL of the bucket that
/// application writes to for this user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub apps: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image: Vec<ProfileImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An image attached to a profile (avatar, cover).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content_url: String,
}

impl Profile {
    /// Bucket URL registered for `origin`.
    ///
    /// Origins are compared without a trailing slash, so `https://a.io` and
    /// `https://a.io/` name the same application. Empty URLs count as absent.
    pub fn bucket_for(&self, origin: &str) -> Option<&str> {
        let wanted = origin.trim_end_matches('/');
        self.apps
            .iter()
            .find(|(key, _)| key.trim_end_matches('/') == wanted)
            .map(|(_, url)| url.as_str())
            .filter(|url| !url.trim().is_empty())
    }

    /// Register a bucket for an origin.
    pub fn with_app(mut self, origin: impl Into<String>, bucket_url: impl Into<String>) -> Self {
        self.apps.insert(origin.into(), bucket_url.into());
        self
    }

    /// URL of the image named `avatar`, or the first image.
    pub fn avatar_url(&self) -> Option<&str> {
        self.image
            .iter()
            .find(|img| img.name.as_deref() == Some("avatar"))
            .or_else(|| self.image.first())
            .map(|img| img.content_url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bucket_lookup_ignores_trailing_slash() {
        let profile = Profile::default().with_app("https://app.io", "https://hub/u1/");
        assert_eq!(profile.bucket_for("https://app.io"), Some("https://hub/u1/"));
        assert_eq!(profile.bucket_for("https://app.io/"), Some("https://hub/u1/"));
        assert_eq!(profile.bucket_for("https://other.io"), None);
    }

    #[test]
    fn blank_bucket_counts_as_missing() {
        let profile = Profile::default().with_app("https://app.io", "  ");
        assert_eq!(profile.bucket_for("https://app.io"), None);
    }

    #[test]
    fn decodes_naming_service_profile() {
        let profile: Profile = serde_json::from_value(json!({
            "@type": "Person",
            "@context": "http://schema.org",
            "name": "Alice",
            "image": [{ "@type": "ImageObject", "name": "avatar", "contentUrl": "https://img/a.png" }],
            "apps": { "https://app.io": "https://hub/u1/" }
        }))
        .unwrap();
        assert_eq!(profile.name.as_deref(), Some("Alice"));
        assert_eq!(profile.avatar_url(), Some("https://img/a.png"));
        assert_eq!(profile.extra.get("@type"), Some(&json!("Person")));
    }

    #[test]
    fn profile_without_apps_decodes() {
        let profile: Profile = serde_json::from_value(json!({ "name": "Bob" })).unwrap();
        assert!(profile.apps.is_empty());
        assert!(profile.avatar_url().is_none());
    }
}
