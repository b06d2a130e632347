//! Feature-flag map and the `hub:feature:<name>` namespace.

use std::collections::BTreeMap;

/// Prefix for flags derived from user hub settings.
pub const FEATURE_FLAG_PREFIX: &str = "hub:feature:";

/// Flag name to enabled.
pub type FeatureFlags = BTreeMap<String, bool>;

/// Namespaced flag name for a feature key (`workspace` -> `hub:feature:workspace`).
#[must_use]
pub fn feature_flag_name(feature: &str) -> String {
    format!("{FEATURE_FLAG_PREFIX}{feature}")
}

/// Whether a flag is present and set.
#[must_use]
pub fn is_enabled(flags: &FeatureFlags, name: &str) -> bool {
    flags.get(name).copied().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_feature_keys() {
        assert_eq!(feature_flag_name("workspace"), "hub:feature:workspace");
    }

    #[test]
    fn missing_flags_are_disabled() {
        let mut flags = FeatureFlags::new();
        assert!(!is_enabled(&flags, "hub:feature:workspace"));
        flags.insert("hub:feature:workspace".into(), true);
        assert!(is_enabled(&flags, "hub:feature:workspace"));
    }
}
