//! `reqwest` implementation of [`PortalApi`].

use async_trait::async_trait;
use hub_auth::UserSession;
use hub_core::{PortalProfile, TrustedOrg, UserProfile, urls::sharing_api_url};
use reqwest::header::CONTENT_TYPE;

use crate::error::PortalError;
use crate::http::{encode_pairs, read_json, read_typed};
use crate::{PortalApi, UserResource, merge_resource};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrustedOrgsResponse {
    #[serde(default)]
    trusted_orgs: Vec<TrustedOrg>,
}

#[derive(serde::Deserialize)]
struct ExchangeResponse {
    token: String,
}

/// HTTP client for the portal sharing REST API.
#[derive(Clone)]
pub struct PortalClient {
    http: reqwest::Client,
}

impl Default for PortalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalClient {
    /// Create a new portal client with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("hubctx/0.1")
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("reqwest client should build"),
        }
    }

    async fn get_json(&self, url: &str, token: &str) -> Result<serde_json::Value, PortalError> {
        let url = format!("{url}?{}", encode_pairs(&[("f", "json"), ("token", token)]));
        read_json(self.http.get(&url).send().await?).await
    }

    async fn post_form(
        &self,
        url: &str,
        pairs: &[(&str, &str)],
    ) -> Result<reqwest::Response, PortalError> {
        Ok(self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode_pairs(pairs))
            .send()
            .await?)
    }
}

#[async_trait]
impl PortalApi for PortalClient {
    async fn fetch_org_profile(&self, session: &UserSession) -> Result<PortalProfile, PortalError> {
        let url = format!("{}/portals/self", session.portal.trim_end_matches('/'));
        tracing::debug!(%url, "fetching organization profile");
        let value = self.get_json(&url, &session.token).await?;
        serde_json::from_value(value).map_err(|e| PortalError::Parse(format!("portal self: {e}")))
    }

    async fn fetch_current_user(
        &self,
        username: &str,
        session: &UserSession,
    ) -> Result<UserProfile, PortalError> {
        let url = format!(
            "{}/community/users/{}",
            session.portal.trim_end_matches('/'),
            urlencoding::encode(username)
        );
        tracing::debug!(%url, "fetching current user");
        let value = self.get_json(&url, &session.token).await?;
        serde_json::from_value(value).map_err(|e| PortalError::Parse(format!("user: {e}")))
    }

    async fn fetch_trusted_orgs(
        &self,
        portal_url: &str,
        session: &UserSession,
    ) -> Result<Vec<TrustedOrg>, PortalError> {
        let url = format!("{}/portals/self/trustedOrgs", sharing_api_url(portal_url));
        let value = self.get_json(&url, &session.token).await?;
        let parsed: TrustedOrgsResponse = serde_json::from_value(value)
            .map_err(|e| PortalError::Parse(format!("trusted orgs: {e}")))?;
        Ok(parsed.trusted_orgs)
    }

    async fn exchange_token(
        &self,
        primary_token: &str,
        client_id: &str,
        authority_url: &str,
    ) -> Result<String, PortalError> {
        let url = format!("{}/oauth2/exchangeToken", authority_url.trim_end_matches('/'));
        let resp = self
            .post_form(
                &url,
                &[("f", "json"), ("client_id", client_id), ("token", primary_token)],
            )
            .await?;
        let parsed: ExchangeResponse = read_typed(resp).await?;
        Ok(parsed.token)
    }

    async fn get_user_resource(
        &self,
        username: &str,
        key: &str,
        portal_url: &str,
        token: &str,
    ) -> Result<Option<serde_json::Value>, PortalError> {
        let url = format!(
            "{}/community/users/{}/resources/{}",
            sharing_api_url(portal_url),
            urlencoding::encode(username),
            urlencoding::encode(key)
        );
        match self.get_json(&url, token).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn set_user_resource(
        &self,
        resource: &UserResource,
        username: &str,
        portal_url: &str,
        token: &str,
        replace: bool,
    ) -> Result<(), PortalError> {
        let data = if replace {
            resource.data.clone()
        } else {
            let existing = self
                .get_user_resource(username, &resource.key, portal_url, token)
                .await?;
            merge_resource(existing, &resource.data)
        };
        let text = serde_json::to_string(&data).map_err(|e| PortalError::Parse(e.to_string()))?;

        let url = format!(
            "{}/community/users/{}/addResource",
            sharing_api_url(portal_url),
            urlencoding::encode(username)
        );
        let resp = self
            .post_form(
                &url,
                &[
                    ("f", "json"),
                    ("key", resource.key.as_str()),
                    ("text", text.as_str()),
                    ("access", "userappprivate"),
                    ("token", token),
                ],
            )
            .await?;
        let value = read_json(resp).await?;
        if value.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            return Err(PortalError::Parse(format!(
                "addResource for '{}' reported failure",
                resource.key
            )));
        }
        Ok(())
    }
}
