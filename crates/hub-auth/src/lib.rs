//! # hub-auth
//!
//! Identity session handling for the hub context.
//!
//! Provides the signed-in [`UserSession`] (primary bearer token, expiry, portal
//! endpoint, JSON serialization) and the unicode-safe base64 [`codec`] used to
//! move serialized context across storage boundaries.

pub mod codec;
pub mod error;
pub mod session;

pub use error::AuthError;
pub use session::UserSession;
