use serde::{Deserialize, Serialize};

use crate::JsonMap;

const ORG_ADMIN_ROLE: &str = "org_admin";

/// Signed-in user's profile as returned by `community/users/<username>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Organization the user belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Role name (`org_admin`, `org_publisher`, `org_user`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub privileges: Vec<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl UserProfile {
    #[must_use]
    pub fn is_org_admin(&self) -> bool {
        self.role.as_deref() == Some(ORG_ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_and_detects_admin() {
        let json = r#"{
            "username": "casey",
            "fullName": "Casey Example",
            "orgId": "org_abc",
            "role": "org_admin",
            "privileges": ["portal:admin:viewUsers"],
            "groups": []
        }"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "casey");
        assert!(user.is_org_admin());
        assert_eq!(user.privileges, ["portal:admin:viewUsers"]);
        assert!(user.extra.contains_key("groups"));
    }

    #[test]
    fn non_admin_roles() {
        let user = UserProfile {
            role: Some("org_user".into()),
            ..Default::default()
        };
        assert!(!user.is_org_admin());
        assert!(!UserProfile::default().is_org_admin());
    }
}
