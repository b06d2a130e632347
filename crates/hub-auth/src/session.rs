use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// A signed-in identity: primary bearer token plus the portal it is valid against.
///
/// Produced by whatever sign-in flow the host application runs, consumed by the
/// context manager. Token refresh is the session owner's concern; this type
/// only reports expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub username: String,
    /// Primary bearer token.
    pub token: String,
    pub token_expires: DateTime<Utc>,
    /// Sharing API endpoint (e.g. `https://org.maps.arcgis.com/sharing/rest`).
    pub portal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ssl: bool,
}

impl UserSession {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        token: impl Into<String>,
        token_expires: DateTime<Utc>,
        portal: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            token_expires,
            portal: portal.into(),
            client_id: None,
            refresh_token: None,
            refresh_token_expires: None,
            ssl: true,
        }
    }

    /// Organization URL for this session's portal endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Core` if the portal endpoint is not an http(s) URL.
    pub fn org_url(&self) -> Result<String, AuthError> {
        Ok(hub_core::urls::org_url_from_portal_endpoint(&self.portal)?)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.token_expires <= Utc::now()
    }

    /// Primary token for requests against the session's portal.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` once `token_expires` has passed.
    #[allow(clippy::unused_async)]
    pub async fn get_token(&self) -> Result<String, AuthError> {
        if self.is_expired() {
            tracing::warn!(
                username = %self.username,
                expires_at = %self.token_expires,
                "session token expired",
            );
            return Err(AuthError::TokenExpired {
                username: self.username.clone(),
            });
        }
        Ok(self.token.clone())
    }

    /// Serialize to the JSON string embedded in serialized contexts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionFormat` if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, AuthError> {
        serde_json::to_string(self).map_err(|e| AuthError::SessionFormat(e.to_string()))
    }

    /// Rebuild a session from [`to_json`](Self::to_json) output.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionFormat` if the JSON is malformed or missing fields.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        serde_json::from_str(json).map_err(|e| AuthError::SessionFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_session(token_expires: DateTime<Utc>) -> UserSession {
        UserSession::new(
            "casey",
            "primary-token",
            token_expires,
            "https://org.mapsqa.arcgis.com/sharing/rest",
        )
    }

    #[test]
    fn org_url_strips_sharing_suffix() {
        let session = make_session(Utc::now() + chrono::TimeDelta::hours(1));
        assert_eq!(session.org_url().unwrap(), "https://org.mapsqa.arcgis.com");
    }

    #[test]
    fn org_url_rejects_garbage_portal() {
        let mut session = make_session(Utc::now() + chrono::TimeDelta::hours(1));
        session.portal = "not a url".into();
        assert!(matches!(session.org_url(), Err(AuthError::Core(_))));
    }

    #[test]
    fn not_expired_when_far_future() {
        let session = make_session(Utc::now() + chrono::TimeDelta::hours(1));
        assert!(!session.is_expired());
    }

    #[test]
    fn is_expired_when_past() {
        let session = make_session(Utc::now() - chrono::TimeDelta::seconds(10));
        assert!(session.is_expired());
    }

    #[tokio::test]
    async fn get_token_returns_primary_token() {
        let session = make_session(Utc::now() + chrono::TimeDelta::hours(1));
        assert_eq!(session.get_token().await.unwrap(), "primary-token");
    }

    #[tokio::test]
    async fn get_token_fails_once_expired() {
        let session = make_session(Utc::now() - chrono::TimeDelta::minutes(5));
        let err = session.get_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired { ref username } if username == "casey"));
    }

    #[test]
    fn json_round_trip() {
        let mut session = make_session(Utc::now() + chrono::TimeDelta::hours(2));
        session.client_id = Some("client123".into());
        let json = session.to_json().unwrap();
        assert!(json.contains("\"tokenExpires\""));
        let restored = UserSession::from_json(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn from_json_reports_missing_fields() {
        let err = UserSession::from_json(r#"{"username":"casey"}"#).unwrap_err();
        assert!(matches!(err, AuthError::SessionFormat(_)));
    }
}
