//! The context lifecycle manager.
//!
//! A [`ContextManager`] owns its [`ManagerState`] exclusively and replaces its
//! [`ContextSnapshot`] wholesale after every transition. Every mutating call
//! returns the new snapshot; [`ContextManager::context`] always returns the
//! current one.

mod initialize;
mod serialize;


pub use serialize::decode_token;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use hub_auth::UserSession;
use hub_config::LogLevel;
use hub_core::urls::{DEFAULT_PORTAL_URL, portal_base_from_org_url};
use hub_core::{
    FeatureFlags, JsonMap, PortalProfile, ResourceConfig, ServiceStatusMap, TrustedOrg,
    UserProfile, UserResourceToken,
};
use hub_portal::{PortalApi, PortalClient};

use crate::error::ContextError;
use crate::options::{ManagerOptions, merged_alpha_orgs};
use crate::settings::{UserHubSettings, apply_feature_flags, stamp_now};
use crate::snapshot::ContextSnapshot;
use crate::user_resources::AppResources;

static LAST_MANAGER_ID: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp, bumped past the last id handed out in this process.
fn next_manager_id() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let (Ok(prev) | Err(prev)) =
        LAST_MANAGER_ID.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
            Some(now.max(prev + 1))
        });
    now.max(prev + 1)
}

/// Private fields a snapshot is built from. `None` means "not known yet".
#[derive(Debug, Clone, Default)]
pub(crate) struct ManagerState {
    pub portal_url: String,
    pub authentication: Option<UserSession>,
    pub portal: Option<PortalProfile>,
    pub current_user: Option<UserProfile>,
    pub properties: JsonMap,
    pub log_level: LogLevel,
    pub service_status: Option<ServiceStatusMap>,
    /// Flags supplied by the caller or config, before hub settings are folded in.
    pub base_feature_flags: FeatureFlags,
    pub feature_flags: FeatureFlags,
    pub alpha_orgs: Vec<String>,
    pub trusted_org_ids: Option<Vec<String>>,
    pub trusted_orgs: Option<Vec<TrustedOrg>>,
    pub resource_configs: Vec<ResourceConfig>,
    pub user_resource_tokens: Option<Vec<UserResourceToken>>,
    pub user_hub_settings: Option<UserHubSettings>,
}

impl ManagerState {
    fn from_options(options: ManagerOptions) -> Result<Self, ContextError> {
        let portal_url = match &options.authentication {
            Some(session) => session.org_url()?,
            None => options
                .portal_url
                .as_deref()
                .unwrap_or(DEFAULT_PORTAL_URL)
                .trim_end_matches('/')
                .to_string(),
        };
        Ok(Self {
            portal_url,
            authentication: options.authentication,
            portal: options.portal,
            current_user: options.current_user,
            properties: options.properties.unwrap_or_default(),
            log_level: options.log_level.unwrap_or_default(),
            service_status: options.service_status,
            base_feature_flags: options.feature_flags.clone().unwrap_or_default(),
            feature_flags: options.feature_flags.unwrap_or_default(),
            alpha_orgs: merged_alpha_orgs(&options.alpha_orgs.unwrap_or_default()),
            trusted_org_ids: options.trusted_org_ids,
            trusted_orgs: options.trusted_orgs,
            resource_configs: options.resource_configs.unwrap_or_default(),
            user_resource_tokens: options.user_resource_tokens,
            user_hub_settings: options.user_hub_settings,
        })
    }

    fn tokens(&self) -> &[UserResourceToken] {
        self.user_resource_tokens.as_deref().unwrap_or_default()
    }

    /// Drop everything that belongs to the signed-in identity, including
    /// flags folded in from its hub settings.
    fn clear_identity(&mut self) {
        self.feature_flags.clone_from(&self.base_feature_flags);
        self.authentication = None;
        self.portal = None;
        self.current_user = None;
        self.user_resource_tokens = None;
        self.user_hub_settings = None;
    }
}

pub struct ContextManager {
    id: u64,
    api: Arc<dyn PortalApi>,
    state: ManagerState,
    context: Arc<ContextSnapshot>,
}

impl std::fmt::Debug for ContextManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextManager")
            .field("id", &self.id)
            .field("portal_url", &self.state.portal_url)
            .field("authenticated", &self.state.authentication.is_some())
            .finish_non_exhaustive()
    }
}

impl ContextManager {
    /// Build a manager and run initialization.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any required fetch (organization profile,
    /// current user) or of the session's primary token. Optional data
    /// (trusted orgs, token exchange, hub settings) never fails construction.
    pub async fn create(options: ManagerOptions, api: Arc<dyn PortalApi>) -> Result<Self, ContextError> {
        let id = next_manager_id();
        let state = ManagerState::from_options(options)?;
        tracing::debug!(
            id,
            portal_url = %state.portal_url,
            authenticated = state.authentication.is_some(),
            "creating context manager"
        );
        let state = initialize::initialize(api.as_ref(), state).await?;
        let context = Arc::new(ContextSnapshot::build(id, &state));
        Ok(Self {
            id,
            api,
            state,
            context,
        })
    }

    /// [`create`](Self::create) against the live portal.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn create_with_client(options: ManagerOptions) -> Result<Self, ContextError> {
        Self::create(options, Arc::new(PortalClient::new())).await
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The current snapshot.
    #[must_use]
    pub fn context(&self) -> Arc<ContextSnapshot> {
        Arc::clone(&self.context)
    }

    fn install(&mut self, state: ManagerState) -> Arc<ContextSnapshot> {
        self.state = state;
        self.context = Arc::new(ContextSnapshot::build(self.id, &self.state));
        self.context()
    }

    /// Sign in as `session` and re-run initialization in place.
    ///
    /// The previous identity's data is dropped first. If initialization fails
    /// the manager keeps its previous state and snapshot.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn set_authentication(&mut self, session: UserSession) -> Result<Arc<ContextSnapshot>, ContextError> {
        let mut next = self.state.clone();
        let portal_url = session.org_url()?;
        if portal_url != next.portal_url {
            next.service_status = None;
        }
        next.clear_identity();
        next.trusted_orgs = None;
        next.trusted_org_ids = None;
        next.portal_url = portal_url;
        next.authentication = Some(session);

        tracing::debug!(id = self.id, portal_url = %next.portal_url, "setting authentication");
        let next = initialize::initialize(self.api.as_ref(), next).await?;
        Ok(self.install(next))
    }

    /// Sign out. No network access.
    ///
    /// Online organizations fall back to their bare platform URL; enterprise
    /// URLs are kept.
    pub fn clear_authentication(&mut self) -> Arc<ContextSnapshot> {
        let mut next = self.state.clone();
        if !self.context.is_portal() {
            next.portal_url = portal_base_from_org_url(&next.portal_url);
        }
        next.clear_identity();
        tracing::debug!(id = self.id, portal_url = %next.portal_url, "cleared authentication");
        self.install(next)
    }

    fn resources<'a>(&'a self, operation: &'static str) -> Result<AppResources<'a>, ContextError> {
        let session = self
            .state
            .authentication
            .as_ref()
            .ok_or(ContextError::Unauthenticated { operation })?;
        Ok(AppResources {
            api: self.api.as_ref(),
            username: &session.username,
            portal_url: &self.state.portal_url,
            tokens: self.state.tokens(),
        })
    }

    /// Persist hub settings, then re-derive feature flags from them.
    ///
    /// # Errors
    ///
    /// `ContextError::Unauthenticated` without a session (checked before any
    /// network access); otherwise the write's failure, including a missing
    /// `hubforarcgis` token.
    pub async fn update_user_hub_settings(
        &mut self,
        settings: UserHubSettings,
    ) -> Result<Arc<ContextSnapshot>, ContextError> {
        let resources = self.resources("update_user_hub_settings")?;
        let mut settings = settings.migrated()?;
        settings.updated = stamp_now();
        resources.store_user_hub_settings(&settings).await?;

        let mut next = self.state.clone();
        apply_feature_flags(&settings.features, &mut next.feature_flags);
        next.user_hub_settings = Some(settings);
        Ok(self.install(next))
    }

    /// Stored site settings. `None` when nothing is stored or the hub token
    /// is missing.
    ///
    /// # Errors
    ///
    /// `ContextError::Unauthenticated` without a session; portal failures.
    pub async fn fetch_user_site_settings(&self) -> Result<Option<JsonMap>, ContextError> {
        self.resources("fetch_user_site_settings")?
            .fetch_user_site_settings()
            .await
    }

    /// Merge `settings` over the stored site settings.
    ///
    /// # Errors
    ///
    /// `ContextError::Unauthenticated` without a session; missing hub token
    /// or portal failures.
    pub async fn update_user_site_settings(&self, settings: JsonMap) -> Result<(), ContextError> {
        self.resources("update_user_site_settings")?
            .update_user_site_settings(settings)
            .await
    }
}
