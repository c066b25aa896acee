use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CURRENT_VERSION;

/// `kind` tag carried by a canonical settings object.
pub const SETTINGS_KIND: &str = "Settings";

/// Site-level settings (`settings.json`).
///
/// Every field is optional: a user who never opened the settings editor has
/// no file at all and gets [`SettingsFile::empty`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsFile {
    pub kind: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_logo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsFile {
    /// Canonical defaults.
    pub fn empty() -> Self {
        Self {
            kind: SETTINGS_KIND.to_string(),
            version: CURRENT_VERSION.to_string(),
            site_name: None,
            site_description: None,
            site_color: None,
            site_logo: None,
            extra: Map::new(),
        }
    }

    /// Site name, ignoring blank values.
    pub fn display_name(&self) -> Option<&str> {
        self.site_name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Site description, ignoring blank values.
    pub fn display_description(&self) -> Option<&str> {
        self.site_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_settings_are_canonical() {
        let s = SettingsFile::empty();
        assert_eq!(s.kind, SETTINGS_KIND);
        assert_eq!(s.version, CURRENT_VERSION);
        assert!(s.display_name().is_none());
        assert!(s.display_description().is_none());
    }

    #[test]
    fn blank_name_is_ignored() {
        let mut s = SettingsFile::empty();
        s.site_name = Some("   ".into());
        assert!(s.display_name().is_none());
        s.site_name = Some("Alice's Blog".into());
        assert_eq!(s.display_name(), Some("Alice's Blog"));
    }

    #[test]
    fn serializes_camel_case_without_nulls() {
        let mut s = SettingsFile::empty();
        s.site_description = Some("Notes".into());
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(
            v,
            json!({ "kind": "Settings", "version": "1.0.0", "siteDescription": "Notes" })
        );
    }

    #[test]
    fn keeps_unknown_fields() {
        let s: SettingsFile = serde_json::from_value(json!({
            "kind": "Settings",
            "version": "1.0.0",
            "siteUrl": "https://alice.example"
        }))
        .unwrap();
        assert_eq!(s.extra.get("siteUrl"), Some(&json!("https://alice.example")));
    }
}
