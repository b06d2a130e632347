//! # hub-context
//!
//! Answers "who is signed in, to which organization, with which capabilities"
//! for a hub application.
//!
//! [`ContextManager`] owns the mutable state and builds an immutable
//! [`ContextSnapshot`] after every state transition. Construction fans out the
//! organization, user, trusted-org, service-status and token-exchange fetches
//! concurrently, then derives feature flags from the user's (migrated) hub
//! settings. Managers serialize to an opaque token that can be restored later;
//! an expired embedded session is dropped on restore.

pub mod error;
pub mod fail_safe;
pub mod manager;
pub mod options;
pub mod service_status;
pub mod settings;
pub mod snapshot;
pub mod token_exchange;
pub mod user_resources;

#[cfg(test)]
mod test_support;

pub use error::ContextError;
pub use manager::ContextManager;
pub use options::ManagerOptions;
pub use settings::UserHubSettings;
pub use snapshot::ContextSnapshot;
