//! Portal and platform URL helpers.
//!
//! An organization URL is either an ArcGIS Online org (`https://<key>.maps.arcgis.com`,
//! `https://<key>.mapsqa.arcgis.com`, `https://<key>.mapsdevext.arcgis.com`, or one
//! of the bare platform hosts) or an on-premises Enterprise portal, which is any
//! host outside `arcgis.com`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Organization URL used when nothing else is known.
pub const DEFAULT_PORTAL_URL: &str = "https://www.arcgis.com";

/// Path appended to an organization URL to reach the sharing REST API.
pub const SHARING_API_SUFFIX: &str = "/sharing/rest";

const ONLINE_DOMAIN: &str = "arcgis.com";

// ---------------------------------------------------------------------------
// PlatformEnvironment
// ---------------------------------------------------------------------------

/// Deployment environment an organization URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformEnvironment {
    Devext,
    Qaext,
    Production,
    Enterprise,
}

impl PlatformEnvironment {
    /// Classify an organization URL.
    #[must_use]
    pub fn from_portal_url(url: &str) -> Self {
        if is_enterprise_url(url) {
            return Self::Enterprise;
        }
        let host = host_of(url);
        if host.contains("devext") {
            Self::Devext
        } else if host.contains("qaext") || host.contains("mapsqa") {
            Self::Qaext
        } else {
            Self::Production
        }
    }

    /// Return the string representation used in serialized snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Devext => "devext",
            Self::Qaext => "qaext",
            Self::Production => "production",
            Self::Enterprise => "enterprise",
        }
    }

    /// Bare platform URL for the environment. Enterprise has none.
    #[must_use]
    pub const fn platform_base_url(self) -> Option<&'static str> {
        match self {
            Self::Devext => Some("https://devext.arcgis.com"),
            Self::Qaext => Some("https://qaext.arcgis.com"),
            Self::Production => Some(DEFAULT_PORTAL_URL),
            Self::Enterprise => None,
        }
    }

    /// Hub platform URL for the environment. Enterprise has none.
    #[must_use]
    pub const fn hub_url(self) -> Option<&'static str> {
        match self {
            Self::Devext => Some("https://hubdev.arcgis.com"),
            Self::Qaext => Some("https://hubqa.arcgis.com"),
            Self::Production => Some("https://hub.arcgis.com"),
            Self::Enterprise => None,
        }
    }
}

impl fmt::Display for PlatformEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether the URL points at an on-premises (Enterprise) portal.
#[must_use]
pub fn is_enterprise_url(url: &str) -> bool {
    let host = host_of(url);
    !(host == ONLINE_DOMAIN || host.ends_with(".arcgis.com"))
}

/// Sharing REST API URL for an organization URL.
#[must_use]
pub fn sharing_api_url(portal_url: &str) -> String {
    format!("{}{SHARING_API_SUFFIX}", portal_url.trim_end_matches('/'))
}

/// Organization URL for a session's portal endpoint (sharing API suffix stripped).
///
/// # Errors
///
/// Returns `CoreError::InvalidUrl` if the endpoint is not an http(s) URL.
pub fn org_url_from_portal_endpoint(endpoint: &str) -> Result<String, CoreError> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(CoreError::InvalidUrl(endpoint.to_string()));
    }
    let lower = trimmed.to_ascii_lowercase();
    let org = lower
        .rfind("/sharing")
        .map_or(trimmed, |idx| &trimmed[..idx]);
    if host_of(org).is_empty() {
        return Err(CoreError::InvalidUrl(endpoint.to_string()));
    }
    Ok(org.to_string())
}

/// Bare platform URL for a (possibly org-specific) Online URL.
///
/// Enterprise URLs come back unchanged since there is no separate base to
/// fall back to.
#[must_use]
pub fn portal_base_from_org_url(org_url: &str) -> String {
    PlatformEnvironment::from_portal_url(org_url)
        .platform_base_url()
        .map_or_else(|| org_url.trim_end_matches('/').to_string(), String::from)
}

/// Lowercased host portion of a URL, without scheme, port or path.
fn host_of(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split(['/', ':', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.arcgis.com", PlatformEnvironment::Production)]
    #[case("https://myorg.maps.arcgis.com", PlatformEnvironment::Production)]
    #[case("https://org.mapsqa.arcgis.com", PlatformEnvironment::Qaext)]
    #[case("https://qaext.arcgis.com", PlatformEnvironment::Qaext)]
    #[case("https://org.mapsdevext.arcgis.com", PlatformEnvironment::Devext)]
    #[case("https://devext.arcgis.com", PlatformEnvironment::Devext)]
    #[case("https://gis.city.gov/portal", PlatformEnvironment::Enterprise)]
    #[case("https://arcgis.com.example.org/portal", PlatformEnvironment::Enterprise)]
    fn classifies_environment(#[case] url: &str, #[case] expected: PlatformEnvironment) {
        assert_eq!(PlatformEnvironment::from_portal_url(url), expected);
    }

    #[rstest]
    #[case("https://org.mapsqa.arcgis.com", "https://qaext.arcgis.com")]
    #[case("https://org.mapsdevext.arcgis.com", "https://devext.arcgis.com")]
    #[case("https://org.maps.arcgis.com", "https://www.arcgis.com")]
    #[case("https://gis.city.gov/portal/", "https://gis.city.gov/portal")]
    fn portal_base_from_org(#[case] org_url: &str, #[case] expected: &str) {
        assert_eq!(portal_base_from_org_url(org_url), expected);
    }

    #[test]
    fn org_url_strips_sharing_suffix() {
        assert_eq!(
            org_url_from_portal_endpoint("https://org.maps.arcgis.com/sharing/rest").unwrap(),
            "https://org.maps.arcgis.com"
        );
        assert_eq!(
            org_url_from_portal_endpoint("https://gis.city.gov/portal/sharing/rest/").unwrap(),
            "https://gis.city.gov/portal"
        );
        assert_eq!(
            org_url_from_portal_endpoint("https://gis.city.gov/portal").unwrap(),
            "https://gis.city.gov/portal"
        );
    }

    #[test]
    fn org_url_rejects_non_http() {
        assert!(matches!(
            org_url_from_portal_endpoint("ftp://nope/sharing/rest"),
            Err(CoreError::InvalidUrl(_))
        ));
        assert!(org_url_from_portal_endpoint("https:///sharing/rest").is_err());
    }

    #[test]
    fn sharing_api_url_appends_suffix_once() {
        assert_eq!(
            sharing_api_url("https://www.arcgis.com/"),
            "https://www.arcgis.com/sharing/rest"
        );
    }

    #[test]
    fn hub_url_absent_for_enterprise() {
        assert_eq!(PlatformEnvironment::Enterprise.hub_url(), None);
        assert_eq!(
            PlatformEnvironment::Qaext.hub_url(),
            Some("https://hubqa.arcgis.com")
        );
    }
}
