pub(crate) mod helpers {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeDelta, Utc};
    use hub_auth::UserSession;
    use hub_core::trusted_org::TrustedOrgEndpoint;
    use hub_core::{PortalProfile, TrustedOrg, UserProfile};
    use hub_portal::{PortalApi, PortalError, UserResource, merge_resource};
    use serde_json::Value;

    pub const QA_PORTAL: &str = "https://org.mapsqa.arcgis.com/sharing/rest";

    /// Session against [`QA_PORTAL`] expiring `expires_in` from now.
    pub fn session(expires_in: TimeDelta) -> UserSession {
        UserSession::new("casey", "primary-token", Utc::now() + expires_in, QA_PORTAL)
    }

    /// In-memory `PortalApi` that records every call.
    pub struct FakePortal {
        calls: Mutex<HashMap<&'static str, usize>>,
        tokens_seen: Mutex<HashMap<&'static str, String>>,
        failing_ops: HashSet<&'static str>,
        failing_clients: HashSet<String>,
        profile: PortalProfile,
        trusted: Vec<TrustedOrg>,
        resources: Mutex<HashMap<String, Value>>,
    }

    impl FakePortal {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(HashMap::new()),
                tokens_seen: Mutex::new(HashMap::new()),
                failing_ops: HashSet::new(),
                failing_clients: HashSet::new(),
                profile: PortalProfile {
                    id: "org_abc".into(),
                    name: "City of Example".into(),
                    url_key: Some("org".into()),
                    ..Default::default()
                },
                trusted: vec![TrustedOrg {
                    from: TrustedOrgEndpoint {
                        org_id: "org_abc".into(),
                        ..Default::default()
                    },
                    to: TrustedOrgEndpoint {
                        org_id: "partner_org".into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }],
                resources: Mutex::new(HashMap::new()),
            }
        }

        /// Make every call to `op` fail.
        pub fn failing(mut self, op: &'static str) -> Self {
            self.failing_ops.insert(op);
            self
        }

        /// Make token exchange fail for one client id.
        pub fn failing_exchange_for(mut self, client_id: &str) -> Self {
            self.failing_clients.insert(client_id.to_string());
            self
        }

        pub fn with_profile(mut self, profile: PortalProfile) -> Self {
            self.profile = profile;
            self
        }

        pub fn with_resource(self, key: &str, data: Value) -> Self {
            self.resources.lock().unwrap().insert(key.to_string(), data);
            self
        }

        pub fn calls(&self, op: &str) -> usize {
            self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }

        pub fn resource(&self, key: &str) -> Option<Value> {
            self.resources.lock().unwrap().get(key).cloned()
        }

        /// Token passed on the most recent call to `op`.
        pub fn last_token(&self, op: &str) -> Option<String> {
            self.tokens_seen.lock().unwrap().get(op).cloned()
        }

        fn record(&self, op: &'static str, token: &str) -> Result<(), PortalError> {
            *self.calls.lock().unwrap().entry(op).or_default() += 1;
            self.tokens_seen
                .lock()
                .unwrap()
                .insert(op, token.to_string());
            if self.failing_ops.contains(op) {
                return Err(PortalError::Remote {
                    code: 498,
                    message: format!("{op}: Invalid token."),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PortalApi for FakePortal {
        async fn fetch_org_profile(&self, session: &UserSession) -> Result<PortalProfile, PortalError> {
            self.record("fetch_org_profile", &session.token)?;
            Ok(self.profile.clone())
        }

        async fn fetch_current_user(
            &self,
            username: &str,
            session: &UserSession,
        ) -> Result<UserProfile, PortalError> {
            self.record("fetch_current_user", &session.token)?;
            Ok(UserProfile {
                username: username.to_string(),
                org_id: Some(self.profile.id.clone()),
                role: Some("org_admin".into()),
                ..Default::default()
            })
        }

        async fn fetch_trusted_orgs(
            &self,
            _portal_url: &str,
            session: &UserSession,
        ) -> Result<Vec<TrustedOrg>, PortalError> {
            self.record("fetch_trusted_orgs", &session.token)?;
            Ok(self.trusted.clone())
        }

        async fn exchange_token(
            &self,
            primary_token: &str,
            client_id: &str,
            _authority_url: &str,
        ) -> Result<String, PortalError> {
            self.record("exchange_token", primary_token)?;
            if self.failing_clients.contains(client_id) {
                return Err(PortalError::Api {
                    status: 400,
                    message: format!("client {client_id} not registered"),
                });
            }
            Ok(format!("{primary_token}:{client_id}"))
        }

        async fn get_user_resource(
            &self,
            _username: &str,
            key: &str,
            _portal_url: &str,
            token: &str,
        ) -> Result<Option<Value>, PortalError> {
            self.record("get_user_resource", token)?;
            Ok(self.resource(key))
        }

        async fn set_user_resource(
            &self,
            resource: &UserResource,
            _username: &str,
            _portal_url: &str,
            token: &str,
            replace: bool,
        ) -> Result<(), PortalError> {
            self.record("set_user_resource", token)?;
            let mut store = self.resources.lock().unwrap();
            let data = if replace {
                resource.data.clone()
            } else {
                merge_resource(store.get(&resource.key).cloned(), &resource.data)
            };
            store.insert(resource.key.clone(), data);
            Ok(())
        }
    }
}
