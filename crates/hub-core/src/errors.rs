//! Cross-cutting error types for the hub context crates.
//!
//! Domain-specific errors (`AuthError`, `PortalError`, `ContextError`) live in
//! their respective crates; this one covers failures in the shared data model.

use thiserror::Error;

/// Errors that can be raised while interpreting core data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A URL could not be interpreted as a portal or sharing API URL.
    #[error("Invalid portal URL: {0}")]
    InvalidUrl(String),

    /// Data failed validation (shape, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
