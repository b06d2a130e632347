//! Immutable view of a manager's state.
//!
//! A [`ContextSnapshot`] is built by the manager after every state transition
//! and handed out as `Arc<ContextSnapshot>`. Holding on to an old one is safe;
//! it just stops reflecting the manager.

use hub_auth::UserSession;
use hub_config::LogLevel;
use hub_core::resource_token::token_for;
use hub_core::urls::{PlatformEnvironment, sharing_api_url};
use hub_core::{
    FeatureFlags, JsonMap, PortalProfile, ServiceStatusMap, TrustedOrg, UserProfile,
    UserResourceToken,
};
use serde::Serialize;
use std::fmt;

use crate::manager::ManagerState;
use crate::settings::UserHubSettings;

/// Hub product tier of the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HubLicense {
    HubBasic,
    HubPremium,
    EnterpriseSites,
}

impl HubLicense {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HubBasic => "hub-basic",
            Self::HubPremium => "hub-premium",
            Self::EnterpriseSites => "enterprise-sites",
        }
    }
}

impl fmt::Display for HubLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portal endpoint plus the session, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Sharing API URL.
    pub portal: String,
    pub authentication: Option<UserSession>,
}

/// Request options for hub APIs.
#[derive(Debug, Clone, PartialEq)]
pub struct HubRequestOptions {
    pub portal: String,
    pub authentication: Option<UserSession>,
    /// `None` on enterprise.
    pub hub_api_url: Option<String>,
    pub is_portal: bool,
    pub portal_self: Option<PortalProfile>,
}

/// Request options that require a signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRequestOptions {
    pub portal: String,
    pub authentication: UserSession,
}

/// Printable, token-free digest of a snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub id: u64,
    pub portal_url: String,
    pub environment: PlatformEnvironment,
    pub is_portal: bool,
    pub hub_url: Option<String>,
    pub is_authenticated: bool,
    pub username: Option<String>,
    pub org_id: Option<String>,
    pub org_name: Option<String>,
    pub is_org_admin: bool,
    pub is_alpha_org: bool,
    pub hub_license: HubLicense,
    pub service_status: ServiceStatusMap,
    pub feature_flags: FeatureFlags,
    pub trusted_org_ids: Vec<String>,
    /// Applications holding a resource token (tokens themselves are omitted).
    pub resource_apps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ContextSnapshot {
    id: u64,
    portal_url: String,
    environment: PlatformEnvironment,
    is_portal: bool,
    log_level: LogLevel,
    session: Option<UserSession>,
    portal: Option<PortalProfile>,
    current_user: Option<UserProfile>,
    properties: JsonMap,
    service_status: ServiceStatusMap,
    feature_flags: FeatureFlags,
    alpha_orgs: Vec<String>,
    trusted_org_ids: Vec<String>,
    trusted_orgs: Vec<TrustedOrg>,
    user_resource_tokens: Vec<UserResourceToken>,
    user_hub_settings: Option<UserHubSettings>,
}

impl ContextSnapshot {
    pub(crate) fn build(id: u64, state: &ManagerState) -> Self {
        let environment = PlatformEnvironment::from_portal_url(&state.portal_url);
        let is_portal = state
            .portal
            .as_ref()
            .map_or(environment == PlatformEnvironment::Enterprise, |p| p.is_portal);
        let trusted_orgs = state.trusted_orgs.clone().unwrap_or_default();
        let trusted_org_ids = state
            .trusted_org_ids
            .clone()
            .unwrap_or_else(|| hub_core::trusted_org::trusted_org_ids(&trusted_orgs));

        Self {
            id,
            portal_url: state.portal_url.clone(),
            environment,
            is_portal,
            log_level: state.log_level,
            session: state.authentication.clone(),
            portal: state.portal.clone(),
            current_user: state.current_user.clone(),
            properties: state.properties.clone(),
            service_status: state.service_status.clone().unwrap_or_default(),
            feature_flags: state.feature_flags.clone(),
            alpha_orgs: state.alpha_orgs.clone(),
            trusted_org_ids,
            trusted_orgs,
            user_resource_tokens: state.user_resource_tokens.clone().unwrap_or_default(),
            user_hub_settings: state.user_hub_settings.clone(),
        }
    }

    /// Identifier of the manager that built this snapshot.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Organization URL (no sharing API suffix).
    #[must_use]
    pub fn portal_url(&self) -> &str {
        &self.portal_url
    }

    #[must_use]
    pub fn sharing_api_url(&self) -> String {
        sharing_api_url(&self.portal_url)
    }

    #[must_use]
    pub const fn environment(&self) -> PlatformEnvironment {
        self.environment
    }

    /// Whether the organization is an on-premises Enterprise portal.
    #[must_use]
    pub const fn is_portal(&self) -> bool {
        self.is_portal
    }

    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Hub platform URL. `None` on enterprise.
    #[must_use]
    pub fn hub_url(&self) -> Option<&'static str> {
        if self.is_portal {
            None
        } else {
            self.environment.hub_url()
        }
    }

    #[must_use]
    pub fn hub_search_service_url(&self) -> String {
        match self.hub_url() {
            Some(hub) => format!("{hub}/api/search/v1"),
            None => format!("{}/apps/sites/api/search/v1", self.portal_url),
        }
    }

    /// Discussions are not available on enterprise.
    #[must_use]
    pub fn discussions_service_url(&self) -> Option<String> {
        self.hub_url().map(|hub| format!("{hub}/api/discussions/v1"))
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub const fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    /// Organization profile.
    #[must_use]
    pub const fn portal(&self) -> Option<&PortalProfile> {
        self.portal.as_ref()
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&UserProfile> {
        self.current_user.as_ref()
    }

    #[must_use]
    pub fn org_id(&self) -> Option<&str> {
        self.portal
            .as_ref()
            .map(|p| p.id.as_str())
            .filter(|id| !id.is_empty())
            .or_else(|| self.current_user.as_ref().and_then(|u| u.org_id.as_deref()))
    }

    #[must_use]
    pub fn is_org_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(UserProfile::is_org_admin)
    }

    #[must_use]
    pub fn is_alpha_org(&self) -> bool {
        self.org_id()
            .is_some_and(|id| self.alpha_orgs.iter().any(|alpha| alpha == id))
    }

    #[must_use]
    pub fn hub_license(&self) -> HubLicense {
        if self.is_portal {
            HubLicense::EnterpriseSites
        } else if self.portal.as_ref().is_some_and(PortalProfile::hub_premium_enabled) {
            HubLicense::HubPremium
        } else {
            HubLicense::HubBasic
        }
    }

    #[must_use]
    pub const fn service_status(&self) -> &ServiceStatusMap {
        &self.service_status
    }

    #[must_use]
    pub const fn feature_flags(&self) -> &FeatureFlags {
        &self.feature_flags
    }

    #[must_use]
    pub fn is_feature_enabled(&self, name: &str) -> bool {
        hub_core::feature_flags::is_enabled(&self.feature_flags, name)
    }

    #[must_use]
    pub const fn properties(&self) -> &JsonMap {
        &self.properties
    }

    #[must_use]
    pub fn trusted_org_ids(&self) -> &[String] {
        &self.trusted_org_ids
    }

    #[must_use]
    pub fn trusted_orgs(&self) -> &[TrustedOrg] {
        &self.trusted_orgs
    }

    #[must_use]
    pub fn user_resource_tokens(&self) -> &[UserResourceToken] {
        &self.user_resource_tokens
    }

    /// Token for `app`; the most recently added entry wins.
    #[must_use]
    pub fn token_for(&self, app: &str) -> Option<&str> {
        token_for(&self.user_resource_tokens, app)
    }

    #[must_use]
    pub const fn user_hub_settings(&self) -> Option<&UserHubSettings> {
        self.user_hub_settings.as_ref()
    }

    #[must_use]
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            portal: self.sharing_api_url(),
            authentication: self.session.clone(),
        }
    }

    #[must_use]
    pub fn hub_request_options(&self) -> HubRequestOptions {
        HubRequestOptions {
            portal: self.sharing_api_url(),
            authentication: self.session.clone(),
            hub_api_url: self.hub_url().map(String::from),
            is_portal: self.is_portal,
            portal_self: self.portal.clone(),
        }
    }

    /// `Some` only when signed in.
    #[must_use]
    pub fn user_request_options(&self) -> Option<UserRequestOptions> {
        self.session.as_ref().map(|session| UserRequestOptions {
            portal: self.sharing_api_url(),
            authentication: session.clone(),
        })
    }

    #[must_use]
    pub fn summary(&self) -> SnapshotSummary {
        let mut resource_apps: Vec<String> = self
            .user_resource_tokens
            .iter()
            .map(|t| t.app.clone())
            .collect();
        resource_apps.sort();
        resource_apps.dedup();
        SnapshotSummary {
            id: self.id,
            portal_url: self.portal_url.clone(),
            environment: self.environment,
            is_portal: self.is_portal,
            hub_url: self.hub_url().map(String::from),
            is_authenticated: self.is_authenticated(),
            username: self.session.as_ref().map(|s| s.username.clone()),
            org_id: self.org_id().map(String::from),
            org_name: self.portal.as_ref().map(|p| p.name.clone()),
            is_org_admin: self.is_org_admin(),
            is_alpha_org: self.is_alpha_org(),
            hub_license: self.hub_license(),
            service_status: self.service_status.clone(),
            feature_flags: self.feature_flags.clone(),
            trusted_org_ids: self.trusted_org_ids.clone(),
            resource_apps,
        }
    }
}
