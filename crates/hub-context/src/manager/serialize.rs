//! Opaque context tokens.
//!
//! A token is the codec-encoded JSON of [`SerializedContext`]. Field names are
//! stable: tokens outlive application versions in client storage.

use std::sync::Arc;

use hub_auth::{UserSession, codec};
use hub_core::{
    FeatureFlags, JsonMap, PortalProfile, ResourceConfig, ServiceStatusMap, TrustedOrg,
    UserProfile, UserResourceToken,
};
use hub_portal::PortalApi;
use serde::{Deserialize, Serialize};

use super::ContextManager;
use crate::error::ContextError;
use crate::options::ManagerOptions;
use crate::settings::UserHubSettings;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedContext {
    portal_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_status: Option<ServiceStatusMap>,
    /// Caller flags only; hub settings are folded back in on restore.
    #[serde(default)]
    feature_flags: FeatureFlags,
    #[serde(default)]
    properties: JsonMap,
    #[serde(default)]
    resource_configs: Vec<ResourceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trusted_org_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trusted_orgs: Option<Vec<TrustedOrg>>,

    // Present only while a session is valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_resource_tokens: Option<Vec<UserResourceToken>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    portal: Option<PortalProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_user: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_hub_settings: Option<UserHubSettings>,
    /// The session's own JSON, as produced by [`UserSession::to_json`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session: Option<String>,
}

impl ContextManager {
    /// Encode the manager's state as an opaque token.
    ///
    /// Identity data is included only while the session is unexpired.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Serialization` or `ContextError::Auth` if the
    /// state cannot be written as JSON.
    pub fn serialize(&self) -> Result<String, ContextError> {
        let state = &self.state;
        let mut saved = SerializedContext {
            portal_url: state.portal_url.clone(),
            service_status: state.service_status.clone(),
            feature_flags: state.base_feature_flags.clone(),
            properties: state.properties.clone(),
            resource_configs: state.resource_configs.clone(),
            trusted_org_ids: state.trusted_org_ids.clone(),
            trusted_orgs: state.trusted_orgs.clone(),
            ..SerializedContext::default()
        };

        if let Some(session) = state.authentication.as_ref().filter(|s| !s.is_expired()) {
            saved.user_resource_tokens = state.user_resource_tokens.clone();
            saved.portal = state.portal.clone();
            saved.current_user = state.current_user.clone();
            saved.user_hub_settings = state.user_hub_settings.clone();
            saved.session = Some(session.to_json()?);
        }

        Ok(codec::encode(&serde_json::to_string(&saved)?))
    }

    /// Rebuild a manager from [`serialize`](Self::serialize) output.
    ///
    /// An expired embedded session is dropped along with all identity data,
    /// yielding an anonymous manager. When every identity field is present
    /// in the token, no network calls are made.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Auth` for an undecodable token or malformed
    /// embedded session, `ContextError::Serialization` for malformed JSON, or
    /// any initialization failure.
    pub async fn deserialize(token: &str, api: Arc<dyn PortalApi>) -> Result<Self, ContextError> {
        let saved: SerializedContext = serde_json::from_str(&codec::decode(token)?)?;

        let mut options = ManagerOptions {
            portal_url: Some(saved.portal_url),
            service_status: saved.service_status,
            feature_flags: Some(saved.feature_flags),
            properties: Some(saved.properties),
            resource_configs: Some(saved.resource_configs),
            trusted_org_ids: saved.trusted_org_ids,
            trusted_orgs: saved.trusted_orgs,
            ..ManagerOptions::default()
        };

        if let Some(raw) = saved.session.as_deref() {
            let session = UserSession::from_json(raw)?;
            if session.is_expired() {
                tracing::debug!(
                    username = %session.username,
                    expired_at = %session.token_expires,
                    "dropping expired session from serialized context"
                );
            } else {
                options.user_resource_tokens = saved.user_resource_tokens;
                options.portal = saved.portal;
                options.current_user = saved.current_user;
                options.user_hub_settings = saved.user_hub_settings;
                options.authentication = Some(session);
            }
        }

        Self::create(options, api).await
    }
}

/// Decoded JSON of a token, for inspection.
///
/// # Errors
///
/// Returns `ContextError::Auth` for an undecodable token and
/// `ContextError::Serialization` if the payload is not JSON.
pub fn decode_token(token: &str) -> Result<serde_json::Value, ContextError> {
    Ok(serde_json::from_str(&codec::decode(token)?)?)
}
