//! # hub-core
//!
//! Core types shared by every hub context crate.
//!
//! This crate provides the plain data model the context manager reasons about:
//! - Organization (portal) profile and signed-in user profile
//! - Trusted-organization relationship records
//! - Resource configs and exchanged per-application resource tokens
//! - Service-status map and feature-flag map
//! - Portal/platform URL classification helpers
//! - Cross-cutting error types

pub mod errors;
pub mod feature_flags;
pub mod portal;
pub mod resource_token;
pub mod service_status;
pub mod trusted_org;
pub mod urls;
pub mod user;

pub use errors::CoreError;
pub use feature_flags::FeatureFlags;
pub use portal::PortalProfile;
pub use resource_token::{ResourceConfig, UserResourceToken};
pub use service_status::{ServiceStatus, ServiceStatusMap};
pub use trusted_org::TrustedOrg;
pub use user::UserProfile;

/// Free-form JSON object used for pass-through property bags.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
