//! Application resource configs and the tokens exchanged for them.

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Application name the session's own primary token is recorded under.
pub const SELF_APP: &str = "self";

/// Application that owns the user's hub and site settings resources.
pub const HUB_APP: &str = "hubforarcgis";

/// An application to exchange the primary token for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfig {
    /// Application name used for lookups (e.g. `hubforarcgis`).
    pub app: String,
    /// OAuth client id registered for the application.
    pub client_id: String,
}

impl ResourceConfig {
    #[must_use]
    pub fn new(app: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            client_id: client_id.into(),
        }
    }

    /// Check that both fields are present.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the app name or client id is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.app.trim().is_empty() {
            return Err(CoreError::Validation("resource config app is empty".into()));
        }
        if self.client_id.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "resource config '{}' has an empty client id",
                self.app
            )));
        }
        Ok(())
    }
}

/// Application-scoped bearer token obtained by exchanging the primary token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResourceToken {
    pub app: String,
    pub client_id: String,
    pub token: String,
}

impl UserResourceToken {
    /// Tag a token with the config it was exchanged for.
    #[must_use]
    pub fn for_config(config: &ResourceConfig, token: impl Into<String>) -> Self {
        Self {
            app: config.app.clone(),
            client_id: config.client_id.clone(),
            token: token.into(),
        }
    }
}

/// Look up the token for an application. Later entries take precedence.
#[must_use]
pub fn token_for<'a>(tokens: &'a [UserResourceToken], app: &str) -> Option<&'a str> {
    tokens
        .iter()
        .rev()
        .find(|t| t.app == app)
        .map(|t| t.token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(app: &str, token: &str) -> UserResourceToken {
        UserResourceToken {
            app: app.into(),
            client_id: format!("{app}-client"),
            token: token.into(),
        }
    }

    #[test]
    fn last_entry_wins() {
        let tokens = vec![
            token(HUB_APP, "old"),
            token(SELF_APP, "primary"),
            token(HUB_APP, "new"),
        ];
        assert_eq!(token_for(&tokens, HUB_APP), Some("new"));
        assert_eq!(token_for(&tokens, SELF_APP), Some("primary"));
        assert_eq!(token_for(&tokens, "missing"), None);
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let value = serde_json::to_value(token(HUB_APP, "abc")).unwrap();
        assert_eq!(value["app"], "hubforarcgis");
        assert_eq!(value["clientId"], "hubforarcgis-client");
        assert_eq!(value["token"], "abc");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert!(ResourceConfig::new(HUB_APP, "abc123").validate().is_ok());
        assert!(ResourceConfig::new(" ", "abc123").validate().is_err());
        let err = ResourceConfig::new(HUB_APP, "").validate().unwrap_err();
        assert!(err.to_string().contains("hubforarcgis"));
    }
}
