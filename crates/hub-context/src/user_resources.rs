//! User-scoped settings resources owned by the hub application.
//!
//! Both kinds of settings live under fixed keys and are read/written with the
//! `hubforarcgis` resource token. A missing token is a silent "nothing stored"
//! on read and an error on write.

use hub_core::resource_token::{HUB_APP, token_for};
use hub_core::{JsonMap, UserResourceToken};
use hub_portal::{PortalApi, PortalError, UserResource};
use serde_json::Value;

use crate::error::ContextError;
use crate::settings::UserHubSettings;

/// Resource key for user hub settings.
pub const HUB_SETTINGS_KEY: &str = "hub-settings.json";

/// Resource key for user site settings.
pub const SITE_SETTINGS_KEY: &str = "hub-site-settings.json";

/// Resource access for one user, keyed by application token.
pub struct AppResources<'a> {
    pub api: &'a dyn PortalApi,
    pub username: &'a str,
    pub portal_url: &'a str,
    pub tokens: &'a [UserResourceToken],
}

impl AppResources<'_> {
    /// Read `key` with `app`'s token. `Ok(None)` without a token.
    ///
    /// # Errors
    ///
    /// Propagates portal failures.
    pub async fn get(&self, app: &str, key: &str) -> Result<Option<Value>, PortalError> {
        let Some(token) = token_for(self.tokens, app) else {
            tracing::debug!(app, key, "no resource token; treating resource as absent");
            return Ok(None);
        };
        self.api
            .get_user_resource(self.username, key, self.portal_url, token)
            .await
    }

    /// Write `resource` with `app`'s token.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::MissingResourceToken` when `app` has no token,
    /// otherwise propagates portal failures.
    pub async fn set(&self, app: &str, resource: &UserResource, replace: bool) -> Result<(), PortalError> {
        let token = token_for(self.tokens, app).ok_or_else(|| PortalError::MissingResourceToken {
            app: app.to_string(),
        })?;
        self.api
            .set_user_resource(resource, self.username, self.portal_url, token, replace)
            .await
    }

    /// Stored hub settings migrated to the current schema. A user with nothing
    /// stored gets fresh settings.
    ///
    /// # Errors
    ///
    /// Propagates portal failures; `ContextError::Serialization` when the
    /// stored value is not a settings object.
    pub async fn fetch_user_hub_settings(&self) -> Result<UserHubSettings, ContextError> {
        let record = match self.get(HUB_APP, HUB_SETTINGS_KEY).await? {
            None | Some(Value::Null) => UserHubSettings::fresh_record(self.username),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ContextError::Serialization(format!(
                    "{HUB_SETTINGS_KEY} is not an object: {other}"
                )));
            }
        };
        UserHubSettings::from_record(&record)
    }

    /// Overwrite stored hub settings.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn store_user_hub_settings(&self, settings: &UserHubSettings) -> Result<(), ContextError> {
        let resource = UserResource {
            key: HUB_SETTINGS_KEY.to_string(),
            data: Value::Object(settings.to_record()?),
        };
        Ok(self.set(HUB_APP, &resource, true).await?)
    }

    /// Stored site settings, unmigrated.
    ///
    /// # Errors
    ///
    /// Propagates portal failures.
    pub async fn fetch_user_site_settings(&self) -> Result<Option<JsonMap>, ContextError> {
        match self.get(HUB_APP, SITE_SETTINGS_KEY).await? {
            Some(Value::Object(map)) => Ok(Some(map)),
            None | Some(Value::Null) => Ok(None),
            Some(other) => Err(ContextError::Serialization(format!(
                "{SITE_SETTINGS_KEY} is not an object: {other}"
            ))),
        }
    }

    /// Merge `settings` over the stored site settings.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn update_user_site_settings(&self, settings: JsonMap) -> Result<(), ContextError> {
        let resource = UserResource {
            key: SITE_SETTINGS_KEY.to_string(),
            data: Value::Object(settings),
        };
        Ok(self.set(HUB_APP, &resource, false).await?)
    }
}
