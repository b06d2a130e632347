pub mod decode;
pub mod inspect;
pub mod serialize;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hub_auth::UserSession;
use hub_config::ContextConfig;
use hub_context::{ContextManager, ManagerOptions};
use hub_portal::{PortalApi, PortalClient};

use crate::cli::{GlobalFlags, SourceArgs};

/// Build a manager from a token, a session file, or config alone.
pub async fn build_manager(
    source: &SourceArgs,
    flags: &GlobalFlags,
    config: &ContextConfig,
) -> anyhow::Result<ContextManager> {
    if let Some(token) = &source.token {
        return ContextManager::deserialize(token.trim(), shared_client())
            .await
            .context("failed to restore context from token");
    }

    let mut options = ManagerOptions::from_config(config);
    if let Some(url) = &flags.portal_url {
        options.portal_url = Some(url.clone());
    }
    if let Some(path) = &source.session {
        options = options.with_authentication(read_session(path)?);
    }

    ContextManager::create(options, shared_client())
        .await
        .context("failed to initialize context")
}

fn shared_client() -> Arc<dyn PortalApi> {
    Arc::new(PortalClient::new())
}

fn read_session(path: &Path) -> anyhow::Result<UserSession> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session file {}", path.display()))?;
    UserSession::from_json(&json).with_context(|| format!("invalid session file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    #[test]
    fn reads_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = UserSession::new(
            "casey",
            "token",
            Utc::now() + TimeDelta::hours(1),
            "https://org.maps.arcgis.com/sharing/rest",
        );
        std::fs::write(&path, session.to_json().unwrap()).unwrap();

        assert_eq!(read_session(&path).unwrap(), session);
    }

    #[test]
    fn missing_session_file_names_the_path() {
        let err = read_session(Path::new("/nonexistent/session.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/session.json"));
    }
}
