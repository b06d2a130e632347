//! Versioned migration chain for stored user hub settings.
//!
//! Each [`Migration`] is a pure transform on the raw JSON record with a target
//! schema version. A step runs only when the record's `schemaVersion` is
//! strictly below its target; afterwards `schemaVersion` is set to the target.
//! Versions are floats so minor steps (1.0 -> 1.1) sit alongside major ones.

use hub_core::JsonMap;
use serde_json::Value;

/// Version a record is treated as when it carries no `schemaVersion`.
pub const INITIAL_SCHEMA_VERSION: f64 = 1.0;

/// Version produced by the last step of [`MIGRATIONS`].
pub const CURRENT_SCHEMA_VERSION: f64 = 1.1;

const SCHEMA_VERSION_KEY: &str = "schemaVersion";

/// One step of the chain.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Schema version the record has after this step.
    pub target: f64,
    pub name: &'static str,
    pub apply: fn(JsonMap) -> JsonMap,
}

/// All steps, in ascending target order.
pub const MIGRATIONS: &[Migration] = &[Migration {
    target: 1.1,
    name: "fold preview into features",
    apply: fold_preview_into_features,
}];

/// The record's schema version, defaulting to [`INITIAL_SCHEMA_VERSION`].
#[must_use]
pub fn schema_version(record: &JsonMap) -> f64 {
    record
        .get(SCHEMA_VERSION_KEY)
        .and_then(Value::as_f64)
        .unwrap_or(INITIAL_SCHEMA_VERSION)
}

/// Run [`MIGRATIONS`] over a copy of `record`.
#[must_use]
pub fn apply_migrations(record: &JsonMap) -> JsonMap {
    apply_chain(MIGRATIONS, record)
}

/// Run an arbitrary chain over a copy of `record`.
#[must_use]
pub fn apply_chain(chain: &[Migration], record: &JsonMap) -> JsonMap {
    let mut current = record.clone();
    for step in chain {
        let version = schema_version(&current);
        if version < step.target {
            tracing::debug!(from = version, to = step.target, step = step.name, "migrating hub settings");
            current = (step.apply)(current);
            current.insert(SCHEMA_VERSION_KEY.into(), step.target.into());
        }
    }
    current
}

/// 1.1: the legacy `preview` map becomes `features`.
///
/// `preview.workspace` carries over only when it was explicitly present and no
/// `features` map exists yet. `preview` is removed either way.
fn fold_preview_into_features(mut record: JsonMap) -> JsonMap {
    let preview = record.remove("preview");
    if !record.contains_key("features") {
        let mut features = JsonMap::new();
        if let Some(workspace) = preview.as_ref().and_then(|p| p.get("workspace")) {
            features.insert("workspace".into(), workspace.clone());
        }
        record.insert("features".into(), Value::Object(features));
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[rstest]
    #[case::preview_true(
        json!({ "schemaVersion": 1.0, "preview": { "workspace": true } }),
        json!({ "schemaVersion": 1.1, "features": { "workspace": true } })
    )]
    #[case::preview_false(
        json!({ "schemaVersion": 1.0, "preview": { "workspace": false } }),
        json!({ "schemaVersion": 1.1, "features": { "workspace": false } })
    )]
    #[case::preview_without_workspace(
        json!({ "schemaVersion": 1.0, "preview": { "other": true } }),
        json!({ "schemaVersion": 1.1, "features": {} })
    )]
    #[case::no_preview(
        json!({ "schemaVersion": 1.0 }),
        json!({ "schemaVersion": 1.1, "features": {} })
    )]
    #[case::features_already_present(
        json!({ "schemaVersion": 1.0, "preview": { "workspace": true }, "features": { "a": true } }),
        json!({ "schemaVersion": 1.1, "features": { "a": true } })
    )]
    #[case::missing_version_treated_as_initial(
        json!({ "preview": { "workspace": true } }),
        json!({ "schemaVersion": 1.1, "features": { "workspace": true } })
    )]
    #[case::already_current(
        json!({ "schemaVersion": 1.1, "preview": { "workspace": true } }),
        json!({ "schemaVersion": 1.1, "preview": { "workspace": true } })
    )]
    fn fold_preview_cases(#[case] input: Value, #[case] expected: Value) {
        assert_eq!(Value::Object(apply_migrations(&record(input))), expected);
    }

    #[test]
    fn running_twice_is_a_no_op_the_second_time() {
        let input = record(json!({
            "schemaVersion": 1.0,
            "username": "casey",
            "preview": { "workspace": true }
        }));
        let once = apply_migrations(&input);
        let twice = apply_migrations(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = record(json!({ "schemaVersion": 1.0, "preview": { "workspace": true } }));
        let before = input.clone();
        let _ = apply_migrations(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn steps_run_in_order_and_only_below_target() {
        fn mark_a(mut r: JsonMap) -> JsonMap {
            r.insert("a".into(), json!(true));
            r
        }
        fn mark_b(mut r: JsonMap) -> JsonMap {
            let saw_a = r.contains_key("a");
            r.insert("b_saw_a".into(), json!(saw_a));
            r
        }
        let chain = [
            Migration { target: 1.5, name: "a", apply: mark_a },
            Migration { target: 2.0, name: "b", apply: mark_b },
        ];

        let from_start = apply_chain(&chain, &record(json!({ "schemaVersion": 1.0 })));
        assert_eq!(from_start["b_saw_a"], json!(true));
        assert_eq!(schema_version(&from_start), 2.0);

        let from_middle = apply_chain(&chain, &record(json!({ "schemaVersion": 1.5 })));
        assert!(!from_middle.contains_key("a"));
        assert_eq!(from_middle["b_saw_a"], json!(false));
    }

    #[test]
    fn chain_ends_at_current_version() {
        let last = MIGRATIONS.last().map(|m| m.target);
        assert_eq!(last, Some(CURRENT_SCHEMA_VERSION));
        assert!(MIGRATIONS.windows(2).all(|w| w[0].target < w[1].target));
    }
}
