use serde_json::{json, Value};
use storyfeed_types::{StoryFile, StoryRecord, CURRENT_VERSION, STORIES_KIND};

use crate::table::{rename_field, run_steps, MigrationReport, MigrationStep};

/// Ordered migration table for `publicStories.json`.
pub const STORY_STEPS: &[MigrationStep] = &[
    MigrationStep {
        name: "wrap-bare-array",
        detect: Value::is_array,
        transform: wrap_bare_array,
    },
    MigrationStep {
        name: "stamp-unversioned",
        detect: is_unversioned_object,
        transform: stamp_unversioned,
    },
];

/// Migrate a raw stories payload to the canonical collection.
///
/// `None` (the resource was absent) yields the empty collection.
pub fn migrate_stories(raw: Option<Value>) -> StoryFile {
    migrate_stories_with_report(raw).0
}

/// Like [`migrate_stories`], also returning what the run did.
pub fn migrate_stories_with_report(raw: Option<Value>) -> (StoryFile, MigrationReport) {
    let mut report = MigrationReport::default();
    let Some(raw) = raw else {
        return (StoryFile::empty(), report);
    };

    let migrated = run_steps(raw, STORY_STEPS, &mut report);
    if report.unrecognized {
        let version = migrated
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or("<none>");
        tracing::warn!(version, "stories payload has an unrecognized shape, decoding best-effort");
    }

    let records = match migrated {
        Value::Object(mut map) => match map.remove("stories") {
            Some(Value::Array(records)) => records,
            Some(other) => {
                tracing::warn!(found = json_type(&other), "`stories` is not an array, ignoring");
                Vec::new()
            }
            None => Vec::new(),
        },
        other => {
            tracing::warn!(found = json_type(&other), "stories payload is not an object, ignoring");
            Vec::new()
        }
    };

    let mut stories = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<StoryRecord>(record) {
            Ok(story) if !story.id.is_empty() => stories.push(story),
            Ok(_) => {
                tracing::warn!(index, "story record has an empty id, skipping");
                report.skipped_records += 1;
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "story record failed to decode, skipping");
                report.skipped_records += 1;
            }
        }
    }

    (StoryFile::from_stories(stories), report)
}

fn wrap_bare_array(value: Value) -> Value {
    json!({ "stories": value })
}

fn is_unversioned_object(value: &Value) -> bool {
    value.as_object().is_some_and(|o| !o.contains_key("version"))
}

fn stamp_unversioned(mut value: Value) -> Value {
    let Some(root) = value.as_object_mut() else {
        return value;
    };
    if let Some(Value::Array(records)) = root.get_mut("stories") {
        for record in records.iter_mut().filter_map(Value::as_object_mut) {
            rename_field(record, "_id", "id");
            rename_field(record, "coverImage", "coverImageUrl");
            if record.get("excerpt").map_or(true, Value::is_null) {
                record.insert("excerpt".into(), Value::String(String::new()));
            }
        }
    }
    root.insert("kind".into(), json!(STORIES_KIND));
    root.insert("version".into(), json!(CURRENT_VERSION));
    value
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
