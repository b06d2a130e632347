//! # hub-portal
//!
//! Portal REST collaborators consumed by the hub context:
//! - organization profile (`portals/self`)
//! - current user profile (`community/users/<username>`)
//! - trusted organizations (`portals/self/trustedOrgs`)
//! - primary -> application token exchange (`oauth2/exchangeToken`)
//! - user-scoped application resources (`community/users/<username>/resources`)
//!
//! [`PortalApi`] is the seam the context manager depends on; [`PortalClient`]
//! implements it over `reqwest`.

mod client;
mod error;
mod http;

pub use client::PortalClient;
pub use error::PortalError;

use async_trait::async_trait;
use hub_auth::UserSession;
use hub_core::{PortalProfile, TrustedOrg, UserProfile};
use serde::{Deserialize, Serialize};

/// A user-scoped JSON blob stored under a fixed key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResource {
    pub key: String,
    pub data: serde_json::Value,
}

/// Network collaborators the context manager relies on.
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Fetch the signed-in organization's profile.
    async fn fetch_org_profile(&self, session: &UserSession) -> Result<PortalProfile, PortalError>;

    /// Fetch a user's profile.
    async fn fetch_current_user(
        &self,
        username: &str,
        session: &UserSession,
    ) -> Result<UserProfile, PortalError>;

    /// Fetch the organizations trusted by the signed-in organization.
    async fn fetch_trusted_orgs(
        &self,
        portal_url: &str,
        session: &UserSession,
    ) -> Result<Vec<TrustedOrg>, PortalError>;

    /// Exchange the primary token for an application-scoped token.
    async fn exchange_token(
        &self,
        primary_token: &str,
        client_id: &str,
        authority_url: &str,
    ) -> Result<String, PortalError>;

    /// Read a user resource. `Ok(None)` when nothing is stored under `key`.
    async fn get_user_resource(
        &self,
        username: &str,
        key: &str,
        portal_url: &str,
        token: &str,
    ) -> Result<Option<serde_json::Value>, PortalError>;

    /// Write a user resource. Without `replace`, the new object is merged over
    /// whatever is already stored.
    async fn set_user_resource(
        &self,
        resource: &UserResource,
        username: &str,
        portal_url: &str,
        token: &str,
        replace: bool,
    ) -> Result<(), PortalError>;
}

/// Shallow-merge `incoming` over `existing` when both are objects; otherwise
/// `incoming` wins outright.
#[must_use]
pub fn merge_resource(existing: Option<serde_json::Value>, incoming: &serde_json::Value) -> serde_json::Value {
    match (existing, incoming) {
        (Some(serde_json::Value::Object(mut base)), serde_json::Value::Object(update)) => {
            for (key, value) in update {
                base.insert(key.clone(), value.clone());
            }
            serde_json::Value::Object(base)
        }
        _ => incoming.clone(),
    }
}
