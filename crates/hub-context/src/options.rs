//! Inputs for [`ContextManager::create`](crate::ContextManager::create).
//!
//! Every field is optional; an absent value is fetched or defaulted during
//! initialization.

use hub_auth::UserSession;
use hub_config::{ContextConfig, LogLevel};
use hub_core::{
    FeatureFlags, JsonMap, PortalProfile, ResourceConfig, ServiceStatusMap, TrustedOrg,
    UserProfile, UserResourceToken,
};

use crate::settings::UserHubSettings;

/// Organizations that always get alpha features, in addition to any configured.
pub const DEFAULT_ALPHA_ORGS: &[&str] = &["Xj56SBi2udA78cC9", "bkrWlSKcjUDFDtgw"];

#[derive(Debug, Clone, Default)]
pub struct ManagerOptions {
    /// Signed-in identity. When set, the organization URL comes from its portal
    /// endpoint and `portal_url` is ignored.
    pub authentication: Option<UserSession>,
    pub portal_url: Option<String>,
    pub portal: Option<PortalProfile>,
    pub current_user: Option<UserProfile>,
    pub properties: Option<JsonMap>,
    pub log_level: Option<LogLevel>,
    pub service_status: Option<ServiceStatusMap>,
    pub feature_flags: Option<FeatureFlags>,
    /// Extra alpha orgs, merged with [`DEFAULT_ALPHA_ORGS`].
    pub alpha_orgs: Option<Vec<String>>,
    pub trusted_org_ids: Option<Vec<String>>,
    pub trusted_orgs: Option<Vec<TrustedOrg>>,
    /// Applications to exchange the primary token for.
    pub resource_configs: Option<Vec<ResourceConfig>>,
    pub user_resource_tokens: Option<Vec<UserResourceToken>>,
    pub user_hub_settings: Option<UserHubSettings>,
}

impl ManagerOptions {
    /// Seed options from loaded configuration.
    #[must_use]
    pub fn from_config(config: &ContextConfig) -> Self {
        Self {
            portal_url: Some(config.portal.url.clone()),
            log_level: Some(config.logging.level),
            alpha_orgs: (!config.portal.alpha_orgs.is_empty()).then(|| config.portal.alpha_orgs.clone()),
            resource_configs: (!config.resources.is_empty()).then(|| config.resources.clone()),
            feature_flags: (!config.features.is_empty()).then(|| config.features.clone()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_authentication(mut self, session: UserSession) -> Self {
        self.authentication = Some(session);
        self
    }
}

/// [`DEFAULT_ALPHA_ORGS`] followed by `extra`, without duplicates.
#[must_use]
pub fn merged_alpha_orgs(extra: &[String]) -> Vec<String> {
    let mut orgs: Vec<String> = DEFAULT_ALPHA_ORGS.iter().map(|id| (*id).to_string()).collect();
    for id in extra {
        if !orgs.contains(id) {
            orgs.push(id.clone());
        }
    }
    orgs
}
