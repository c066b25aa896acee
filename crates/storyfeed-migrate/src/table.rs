use serde_json::Value;
use storyfeed_types::CURRENT_VERSION;

/// One entry in a migration table.
#[derive(Clone, Copy)]
pub struct MigrationStep {
    /// Stable name, used in logs and reports.
    pub name: &'static str,
    /// Does this payload need the step?
    pub detect: fn(&Value) -> bool,
    /// Rewrite the payload. Must be additive or renaming only.
    pub transform: fn(Value) -> Value,
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep").field("name", &self.name).finish()
    }
}

/// What a migration run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Steps applied, in order.
    pub applied: Vec<&'static str>,
    /// The payload never reached the canonical shape and was decoded
    /// best-effort.
    pub unrecognized: bool,
    /// Story records that could not be decoded and were left out.
    pub skipped_records: usize,
}

/// Canonical-shape predicate shared by both resources.
pub fn is_current(value: &Value) -> bool {
    value.get("version").and_then(Value::as_str) == Some(CURRENT_VERSION)
}

/// Walk `steps` in order over `value`.
///
/// Stops as soon as the payload is canonical. Returns the final payload and
/// the names of the steps that ran.
pub fn run_steps(
    mut value: Value,
    steps: &[MigrationStep],
    report: &mut MigrationReport,
) -> Value {
    for step in steps {
        if is_current(&value) {
            break;
        }
        if (step.detect)(&value) {
            tracing::debug!(step = step.name, "applying migration step");
            value = (step.transform)(value);
            report.applied.push(step.name);
        }
    }
    if !is_current(&value) {
        report.unrecognized = true;
    }
    value
}

/// Move `from` to `to` inside `object` unless `to` is already set.
pub(crate) fn rename_field(object: &mut serde_json::Map<String, Value>, from: &str, to: &str) {
    if object.contains_key(to) {
        return;
    }
    if let Some(v) = object.remove(from) {
        object.insert(to.to_string(), v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_marker(mut v: Value) -> Value {
        if let Some(obj) = v.as_object_mut() {
            obj.insert("version".into(), json!(CURRENT_VERSION));
        }
        v
    }

    fn never(_: &Value) -> bool {
        false
    }

    fn always(_: &Value) -> bool {
        true
    }

    fn identity(v: Value) -> Value {
        v
    }

    fn clobber(_: Value) -> Value {
        Value::Null
    }

    const STEPS: &[MigrationStep] = &[
        MigrationStep {
            name: "never",
            detect: never,
            transform: identity,
        },
        MigrationStep {
            name: "stamp",
            detect: Value::is_object,
            transform: add_marker,
        },
        MigrationStep {
            name: "after-canonical",
            detect: always,
            transform: clobber,
        },
    ];

    #[test]
    fn runs_matching_steps_until_canonical() {
        let mut report = MigrationReport::default();
        let out = run_steps(json!({}), STEPS, &mut report);
        assert!(is_current(&out));
        assert_eq!(report.applied, vec!["stamp"]);
        assert!(!report.unrecognized);
    }

    #[test]
    fn canonical_input_runs_nothing() {
        let mut report = MigrationReport::default();
        let input = json!({ "version": CURRENT_VERSION });
        let out = run_steps(input.clone(), STEPS, &mut report);
        assert_eq!(out, input);
        assert!(report.applied.is_empty());
    }

    #[test]
    fn unmatched_input_is_flagged() {
        let mut report = MigrationReport::default();
        let steps = &STEPS[..2];
        let out = run_steps(json!(42), steps, &mut report);
        assert_eq!(out, json!(42));
        assert!(report.unrecognized);
    }

    #[test]
    fn rename_respects_existing_target() {
        let mut obj = json!({ "a": 1, "b": 2 }).as_object().cloned().unwrap();
        rename_field(&mut obj, "a", "b");
        assert_eq!(obj.get("a"), Some(&json!(1)));
        assert_eq!(obj.get("b"), Some(&json!(2)));

        rename_field(&mut obj, "a", "c");
        assert!(obj.get("a").is_none());
        assert_eq!(obj.get("c"), Some(&json!(1)));
    }

    #[test]
    fn step_debug_shows_name() {
        assert!(format!("{:?}", STEPS[1]).contains("stamp"));
    }
}
