use serde::{Deserialize, Serialize};

use crate::JsonMap;

/// One side of a trust relationship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedOrgEndpoint {
    #[serde(default)]
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Trusted-organization relationship record (`portals/self/trustedOrgs`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedOrg {
    #[serde(default)]
    pub from: TrustedOrgEndpoint,
    #[serde(default)]
    pub to: TrustedOrgEndpoint,
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Project trusted-org records onto the ids of the organizations they trust.
#[must_use]
pub fn trusted_org_ids(orgs: &[TrustedOrg]) -> Vec<String> {
    orgs.iter().map(|o| o.to.org_id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn projects_target_org_ids() {
        let json = r#"[
            { "from": { "orgId": "home" }, "to": { "orgId": "partner_a", "name": "A" } },
            { "from": { "orgId": "home" }, "to": { "orgId": "partner_b" }, "enabled": true }
        ]"#;
        let orgs: Vec<TrustedOrg> = serde_json::from_str(json).unwrap();
        assert_eq!(trusted_org_ids(&orgs), vec!["partner_a", "partner_b"]);
        assert_eq!(orgs[1].extra["enabled"], true);
    }

    #[test]
    fn empty_list_projects_to_empty() {
        assert!(trusted_org_ids(&[]).is_empty());
    }
}
