//! Organization URL and alpha-org configuration.

use serde::{Deserialize, Serialize};

use hub_core::urls::DEFAULT_PORTAL_URL;

fn default_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortalConfig {
    /// Organization URL used for anonymous contexts.
    #[serde(default = "default_url")]
    pub url: String,

    /// Extra organization ids treated as alpha orgs, merged with the built-in list.
    #[serde(default)]
    pub alpha_orgs: Vec<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            alpha_orgs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_arcgis_online() {
        let config = PortalConfig::default();
        assert_eq!(config.url, "https://www.arcgis.com");
        assert!(config.alpha_orgs.is_empty());
    }

    #[test]
    fn alpha_orgs_deserialize_with_default_url() {
        use figment::{
            Figment,
            providers::{Format, Toml},
        };
        let config: PortalConfig = Figment::from(Toml::string(r#"alpha_orgs = ["org_a"]"#))
            .extract()
            .unwrap();
        assert_eq!(config.url, DEFAULT_PORTAL_URL);
        assert_eq!(config.alpha_orgs, ["org_a"]);
    }
}
