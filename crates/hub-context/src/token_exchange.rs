//! Concurrent primary -> application token exchange.

use futures::future::join_all;
use hub_core::{ResourceConfig, UserResourceToken};
use hub_portal::PortalApi;

use crate::fail_safe::with_fallback;

/// Exchange `primary_token` for one token per config, concurrently.
///
/// Each exchange is fail-safe: a failed exchange is logged and omitted, never
/// failing the batch. Every returned token is tagged with the config it came
/// from; callers must not rely on ordering.
pub async fn exchange_all(
    api: &dyn PortalApi,
    configs: &[ResourceConfig],
    primary_token: &str,
    authority_url: &str,
) -> Vec<UserResourceToken> {
    let exchange = with_fallback(
        |config: ResourceConfig| async move {
            api.exchange_token(primary_token, &config.client_id, authority_url)
                .await
                .map(|token| Some(UserResourceToken::for_config(&config, token)))
        },
        None,
    )
    .labeled("token exchange");

    let results = join_all(configs.iter().cloned().map(|config| exchange.call(config))).await;
    let tokens: Vec<UserResourceToken> = results.into_iter().flatten().collect();
    tracing::debug!(
        requested = configs.len(),
        exchanged = tokens.len(),
        "resource token exchange finished"
    );
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::FakePortal;

    #[tokio::test]
    async fn partial_failure_keeps_the_rest() {
        let portal = FakePortal::new().failing_exchange_for("client-b");
        let configs = vec![
            ResourceConfig::new("app-a", "client-a"),
            ResourceConfig::new("app-b", "client-b"),
            ResourceConfig::new("app-c", "client-c"),
        ];

        let mut tokens = exchange_all(&portal, &configs, "primary", "https://www.arcgis.com/sharing/rest").await;
        tokens.sort_by(|a, b| a.app.cmp(&b.app));

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].app, "app-a");
        assert_eq!(tokens[0].client_id, "client-a");
        assert_eq!(tokens[0].token, "primary:client-a");
        assert_eq!(tokens[1].app, "app-c");
        assert_eq!(tokens[1].client_id, "client-c");
        assert_eq!(portal.calls("exchange_token"), 3);
    }

    #[tokio::test]
    async fn empty_configs_make_no_calls() {
        let portal = FakePortal::new();
        let tokens = exchange_all(&portal, &[], "primary", "https://www.arcgis.com/sharing/rest").await;
        assert!(tokens.is_empty());
        assert_eq!(portal.calls("exchange_token"), 0);
    }

    #[tokio::test]
    async fn all_failing_yields_empty_list() {
        let portal = FakePortal::new()
            .failing_exchange_for("client-a")
            .failing_exchange_for("client-b");
        let configs = vec![
            ResourceConfig::new("app-a", "client-a"),
            ResourceConfig::new("app-b", "client-b"),
        ];
        let tokens = exchange_all(&portal, &configs, "primary", "https://www.arcgis.com/sharing/rest").await;
        assert!(tokens.is_empty());
    }
}
