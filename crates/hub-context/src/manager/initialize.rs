//! Concurrent initialization fetch.
//!
//! Each fetch is included only if its field is still unknown, and resolves to
//! a [`FetchOutcome`] naming the field it fills. Results are written back by
//! variant, so completion order and which fetches were included do not matter.

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use hub_core::resource_token::{HUB_APP, SELF_APP, token_for};
use hub_core::trusted_org::trusted_org_ids;
use hub_core::{PortalProfile, ServiceStatusMap, TrustedOrg, UserProfile, UserResourceToken};
use hub_portal::PortalApi;

use super::ManagerState;
use crate::error::ContextError;
use crate::fail_safe::or_fallback;
use crate::service_status::fetch_service_status;
use crate::settings::{UserHubSettings, apply_feature_flags};
use crate::token_exchange::exchange_all;
use crate::user_resources::AppResources;

enum FetchOutcome {
    ServiceStatus(ServiceStatusMap),
    Portal(PortalProfile),
    CurrentUser(UserProfile),
    TrustedOrgs(Vec<TrustedOrg>),
    ResourceTokens(Vec<UserResourceToken>),
}

type Fetch<'a> = BoxFuture<'a, Result<FetchOutcome, ContextError>>;

/// Fill in every unknown field of `state`.
///
/// Works on an owned state and hands it back only on success, so a failed
/// initialization leaves the caller's state untouched.
pub(super) async fn initialize(
    api: &dyn PortalApi,
    mut state: ManagerState,
) -> Result<ManagerState, ContextError> {
    let fetches = plan_fetches(api, &mut state).await?;
    tracing::debug!(fetches = fetches.len(), "running initialization fetches");

    for outcome in try_join_all(fetches).await? {
        match outcome {
            FetchOutcome::ServiceStatus(status) => state.service_status = Some(status),
            FetchOutcome::Portal(profile) => state.portal = Some(profile),
            FetchOutcome::CurrentUser(user) => state.current_user = Some(user),
            FetchOutcome::TrustedOrgs(orgs) => {
                state.trusted_org_ids = Some(trusted_org_ids(&orgs));
                state.trusted_orgs = Some(orgs);
            }
            FetchOutcome::ResourceTokens(tokens) => state
                .user_resource_tokens
                .get_or_insert_with(Vec::new)
                .extend(tokens),
        }
    }

    load_user_hub_settings(api, &mut state).await?;
    Ok(state)
}

/// Build the fetch list. The session's primary token is obtained first and
/// recorded as the `self` resource token.
async fn plan_fetches<'a>(
    api: &'a dyn PortalApi,
    state: &mut ManagerState,
) -> Result<Vec<Fetch<'a>>, ContextError> {
    let mut fetches: Vec<Fetch<'a>> = Vec::new();

    if state.service_status.is_none() {
        let portal_url = state.portal_url.clone();
        fetches.push(
            async move {
                let status = fetch_service_status(&portal_url).await?;
                Ok::<_, ContextError>(FetchOutcome::ServiceStatus(status))
            }
            .boxed(),
        );
    }

    let Some(session) = state.authentication.clone() else {
        return Ok(fetches);
    };

    let had_exchanged_tokens = state.tokens().iter().any(|t| t.app != SELF_APP);
    let primary = session.get_token().await?;
    let tokens = state.user_resource_tokens.get_or_insert_with(Vec::new);
    tokens.retain(|t| t.app != SELF_APP);
    tokens.push(UserResourceToken {
        app: SELF_APP.to_string(),
        client_id: session.client_id.clone().unwrap_or_default(),
        token: primary.clone(),
    });

    if state.portal.is_none() {
        let session = session.clone();
        fetches.push(
            async move {
                let profile = api.fetch_org_profile(&session).await?;
                Ok::<_, ContextError>(FetchOutcome::Portal(profile))
            }
            .boxed(),
        );
    }

    if state.current_user.is_none() {
        let session = session.clone();
        fetches.push(
            async move {
                let user = api.fetch_current_user(&session.username, &session).await?;
                Ok::<_, ContextError>(FetchOutcome::CurrentUser(user))
            }
            .boxed(),
        );
    }

    if state.trusted_orgs.is_none() {
        let session = session.clone();
        let portal_url = state.portal_url.clone();
        fetches.push(
            async move {
                let orgs = or_fallback(
                    api.fetch_trusted_orgs(&portal_url, &session),
                    Vec::new(),
                    "trusted orgs",
                )
                .await;
                Ok::<_, ContextError>(FetchOutcome::TrustedOrgs(orgs))
            }
            .boxed(),
        );
    }

    if !state.resource_configs.is_empty() && !had_exchanged_tokens {
        let configs = state.resource_configs.clone();
        let authority_url = session.portal.clone();
        fetches.push(
            async move {
                let tokens = exchange_all(api, &configs, &primary, &authority_url).await;
                Ok::<_, ContextError>(FetchOutcome::ResourceTokens(tokens))
            }
            .boxed(),
        );
    }

    Ok(fetches)
}

/// Fetch (or take the pre-supplied) hub settings, migrate them, and fold their
/// features into the flag map. Needs a session and a `hubforarcgis` token.
async fn load_user_hub_settings(api: &dyn PortalApi, state: &mut ManagerState) -> Result<(), ContextError> {
    let Some(username) = state.authentication.as_ref().map(|s| s.username.clone()) else {
        return Ok(());
    };
    if token_for(state.tokens(), HUB_APP).is_none() {
        tracing::debug!("no hub resource token; skipping user hub settings");
        return Ok(());
    }

    let settings = match state.user_hub_settings.take() {
        Some(supplied) => supplied.migrated()?,
        None => {
            let resources = AppResources {
                api,
                username: &username,
                portal_url: &state.portal_url,
                tokens: state.tokens(),
            };
            or_fallback(
                resources.fetch_user_hub_settings(),
                UserHubSettings::fresh(&username),
                "user hub settings",
            )
            .await
        }
    };

    apply_feature_flags(&settings.features, &mut state.feature_flags);
    state.user_hub_settings = Some(settings);
    Ok(())
}
