use serde_json::{json, Map, Value};
use storyfeed_types::{SettingsFile, CURRENT_VERSION, SETTINGS_KIND};

use crate::table::{run_steps, MigrationReport, MigrationStep};

/// Ordered migration table for `settings.json`.
pub const SETTINGS_STEPS: &[MigrationStep] = &[MigrationStep {
    name: "stamp-unversioned",
    detect: is_unversioned_object,
    transform: stamp_unversioned,
}];

/// Migrate a raw settings payload to the canonical settings object.
///
/// `None` (the resource was absent) yields the defaults.
pub fn migrate_settings(raw: Option<Value>) -> SettingsFile {
    let Some(raw) = raw else {
        return SettingsFile::empty();
    };

    let mut report = MigrationReport::default();
    let migrated = run_steps(raw, SETTINGS_STEPS, &mut report);

    let Value::Object(mut map) = migrated else {
        tracing::warn!("settings payload is not an object, using defaults");
        return SettingsFile::empty();
    };
    if report.unrecognized {
        tracing::warn!("settings payload has an unrecognized version, decoding best-effort");
    }
    map.insert("kind".into(), json!(SETTINGS_KIND));
    map.insert("version".into(), json!(CURRENT_VERSION));

    match serde_json::from_value::<SettingsFile>(Value::Object(map.clone())) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "settings failed to decode, keeping recognizable fields");
            salvage(map)
        }
    }
}

fn is_unversioned_object(value: &Value) -> bool {
    value.as_object().is_some_and(|o| !o.contains_key("version"))
}

fn stamp_unversioned(mut value: Value) -> Value {
    if let Some(root) = value.as_object_mut() {
        root.insert("kind".into(), json!(SETTINGS_KIND));
        root.insert("version".into(), json!(CURRENT_VERSION));
    }
    value
}

// Field-by-field recovery: string fields that hold something else are
// dropped, everything unknown goes to `extra`.
fn salvage(mut map: Map<String, Value>) -> SettingsFile {
    let mut take = |key: &str| match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };
    let mut settings = SettingsFile::empty();
    settings.site_name = take("siteName");
    settings.site_description = take("siteDescription");
    settings.site_color = take("siteColor");
    settings.site_logo = take("siteLogo");
    map.remove("kind");
    map.remove("version");
    settings.extra = map;
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_is_defaults() {
        assert_eq!(migrate_settings(None), SettingsFile::empty());
    }

    #[test]
    fn unversioned_site_name() {
        let settings = migrate_settings(Some(json!({ "siteName": "Alice's Blog" })));
        assert_eq!(settings.display_name(), Some("Alice's Blog"));
        assert_eq!(settings.version, CURRENT_VERSION);
        assert_eq!(settings.kind, SETTINGS_KIND);
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn unknown_fields_survive() {
        let settings = migrate_settings(Some(json!({ "siteName": "a", "theme": { "dark": true } })));
        assert_eq!(settings.extra.get("theme"), Some(&json!({ "dark": true })));
    }

    #[test]
    fn wrongly_typed_field_is_salvaged() {
        let settings = migrate_settings(Some(json!({
            "siteName": 12,
            "siteDescription": "still here",
            "hideCover": true
        })));
        assert_eq!(settings.site_name, None);
        assert_eq!(settings.display_description(), Some("still here"));
        assert_eq!(settings.extra.get("hideCover"), Some(&json!(true)));
        assert!(!settings.extra.contains_key("kind"));
    }

    #[test]
    fn non_objects_are_defaults() {
        for raw in [json!(null), json!([1, 2]), json!("x"), json!(0)] {
            assert_eq!(migrate_settings(Some(raw)), SettingsFile::empty());
        }
    }

    #[test]
    fn future_version_keeps_fields() {
        let settings = migrate_settings(Some(json!({
            "kind": "Settings",
            "version": "3.1.0",
            "siteName": "Next"
        })));
        assert_eq!(settings.version, CURRENT_VERSION);
        assert_eq!(settings.display_name(), Some("Next"));
    }

    proptest! {
        #[test]
        fn migration_is_idempotent(
            name in proptest::option::of("[a-zA-Z' ]{0,16}"),
            description in proptest::option::of("[a-zA-Z ]{0,24}"),
            versioned in any::<bool>(),
        ) {
            let mut raw = Map::new();
            if let Some(n) = name {
                raw.insert("siteName".into(), json!(n));
            }
            if let Some(d) = description {
                raw.insert("siteDescription".into(), json!(d));
            }
            if versioned {
                raw.insert("version".into(), json!(CURRENT_VERSION));
                raw.insert("kind".into(), json!(SETTINGS_KIND));
            }
            let once = migrate_settings(Some(Value::Object(raw)));
            let twice = migrate_settings(Some(serde_json::to_value(&once).unwrap()));
            prop_assert_eq!(twice, once);
        }
    }
}
