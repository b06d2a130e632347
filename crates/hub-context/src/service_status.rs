//! Subsystem availability table.
//!
//! There is no status endpoint to call: the table is picked from the
//! organization URL alone. The lookup stays async so callers already treat it
//! as a fetch.

use hub_core::urls::is_enterprise_url;
use hub_core::{ServiceStatus, ServiceStatusMap};

use crate::error::ContextError;

const SUBSYSTEMS: [&str; 5] = ["portal", "discussions", "hub-search", "domains", "hub-downloads"];

/// Every subsystem online.
#[must_use]
pub fn online_status() -> ServiceStatusMap {
    SUBSYSTEMS
        .iter()
        .map(|name| ((*name).to_string(), ServiceStatus::Online))
        .collect()
}

/// Enterprise portals only have the portal itself.
#[must_use]
pub fn enterprise_status() -> ServiceStatusMap {
    SUBSYSTEMS
        .iter()
        .map(|name| {
            let status = if *name == "portal" {
                ServiceStatus::Online
            } else {
                ServiceStatus::NotAvailable
            };
            ((*name).to_string(), status)
        })
        .collect()
}

/// Service status for an organization.
///
/// # Errors
///
/// Currently infallible; the signature leaves room for a real status call.
#[allow(clippy::unused_async)]
pub async fn fetch_service_status(portal_url: &str) -> Result<ServiceStatusMap, ContextError> {
    let status = if is_enterprise_url(portal_url) {
        enterprise_status()
    } else {
        online_status()
    };
    Ok(status)
}
