//! User hub settings: the typed current shape, defaults, and flag derivation.
//!
//! Settings are stored as a JSON resource and may have been written by an older
//! client. They are migrated as a raw JSON object (see [`migrations`]) and only
//! then parsed into [`UserHubSettings`], so fields this version does not know
//! about survive a read-modify-write cycle.

pub mod migrations;

use chrono::{DateTime, SubsecRound, Utc};
use hub_core::JsonMap;
use hub_core::feature_flags::{FeatureFlags, feature_flag_name};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::ContextError;

pub use migrations::{
    CURRENT_SCHEMA_VERSION, INITIAL_SCHEMA_VERSION, MIGRATIONS, Migration, apply_migrations,
};

/// Dismissed notice ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notices {
    #[serde(default)]
    pub dismissed: Vec<String>,
}

/// Current-shape user hub settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserHubSettings {
    pub schema_version: f64,
    #[serde(default)]
    pub username: String,
    #[serde(default = "stamp_now", with = "chrono::serde::ts_milliseconds")]
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub notices: Notices,
    /// Opt-in features. Anything other than a literal `true` reads as `false`.
    #[serde(default, deserialize_with = "feature_map")]
    pub features: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl UserHubSettings {
    /// Default settings for a user with nothing stored yet.
    #[must_use]
    pub fn fresh(username: &str) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            username: username.to_string(),
            updated: stamp_now(),
            notices: Notices::default(),
            features: BTreeMap::new(),
            history: None,
            extra: JsonMap::new(),
        }
    }

    /// The raw record a brand-new user starts from, before migration.
    #[must_use]
    pub fn fresh_record(username: &str) -> JsonMap {
        let mut record = JsonMap::new();
        record.insert("schemaVersion".into(), INITIAL_SCHEMA_VERSION.into());
        record.insert("username".into(), username.into());
        record.insert("updated".into(), stamp_now().timestamp_millis().into());
        record
    }

    /// Migrate a stored record to the current schema and parse it.
    ///
    /// The input is not modified.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Serialization` if the migrated record does not
    /// match the current shape.
    pub fn from_record(record: &JsonMap) -> Result<Self, ContextError> {
        let migrated = apply_migrations(record);
        Ok(serde_json::from_value(serde_json::Value::Object(migrated))?)
    }

    /// Serialize back to a raw record.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Serialization` if the settings do not serialize
    /// to a JSON object.
    pub fn to_record(&self) -> Result<JsonMap, ContextError> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(ContextError::Serialization(format!(
                "settings serialized to non-object: {other}"
            ))),
        }
    }

    /// Run already-typed settings through the chain (e.g. caller-supplied
    /// settings carrying an older `schema_version`).
    ///
    /// # Errors
    ///
    /// See [`from_record`](Self::from_record) and [`to_record`](Self::to_record).
    pub fn migrated(&self) -> Result<Self, ContextError> {
        Self::from_record(&self.to_record()?)
    }
}

/// Current time at the millisecond precision settings are stored with.
#[must_use]
pub fn stamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Fold a settings feature map into the flag map.
///
/// `true` sets `hub:feature:<key>`; `false` removes it. Flags for keys not in
/// the map are left alone, so overrides from elsewhere survive.
pub fn apply_feature_flags(features: &BTreeMap<String, bool>, flags: &mut FeatureFlags) {
    for (key, enabled) in features {
        let name = feature_flag_name(key);
        if *enabled {
            flags.insert(name, true);
        } else {
            flags.remove(&name);
        }
    }
}

fn feature_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value == serde_json::Value::Bool(true)))
        .collect())
}
