use serde::{Deserialize, Serialize};

use crate::JsonMap;

/// Organization (portal) profile as returned by `portals/self`.
///
/// Only the fields the context reasons about are typed; everything else is kept
/// in `extra` so a serialize/deserialize cycle never drops data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalProfile {
    /// Organization ID.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Subdomain key of an Online org (`<url_key>.maps.arcgis.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_hostname: Option<String>,
    /// `true` for on-premises Enterprise portals.
    #[serde(default)]
    pub is_portal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_properties: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl PortalProfile {
    /// Whether the organization has Hub Premium enabled
    /// (`portalProperties.hub.enabled`).
    #[must_use]
    pub fn hub_premium_enabled(&self) -> bool {
        self.portal_properties
            .as_ref()
            .and_then(|p| p.pointer("/hub/enabled"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_portal_self_and_keeps_unknown_fields() {
        let json = r#"{
            "id": "org_abc",
            "name": "City of Example",
            "urlKey": "example",
            "customBaseUrl": "maps.arcgis.com",
            "isPortal": false,
            "portalProperties": { "hub": { "enabled": true } },
            "subscriptionInfo": { "type": "In House" }
        }"#;
        let profile: PortalProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "org_abc");
        assert_eq!(profile.url_key.as_deref(), Some("example"));
        assert!(profile.hub_premium_enabled());
        assert!(profile.extra.contains_key("subscriptionInfo"));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["subscriptionInfo"]["type"], "In House");
        assert_eq!(back["urlKey"], "example");
    }

    #[test]
    fn hub_premium_defaults_to_false() {
        assert!(!PortalProfile::default().hub_premium_enabled());
    }
}
