//! Portal error types.

use thiserror::Error;

/// Errors that can occur when talking to the portal REST API.
#[derive(Debug, Error)]
pub enum PortalError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Portal returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the portal.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Portal returned HTTP 200 with an `{"error": {...}}` envelope.
    #[error("portal error ({code}): {message}")]
    Remote {
        /// Error code from the envelope.
        code: i64,
        /// Error message from the envelope.
        message: String,
    },

    /// Failed to parse a portal response.
    #[error("parse error: {0}")]
    Parse(String),

    /// A user resource operation needs an application token that was never exchanged.
    #[error("no resource token for application '{app}'")]
    MissingResourceToken {
        /// Application whose token is missing.
        app: String,
    },
}

impl PortalError {
    /// Whether the portal reported the requested thing does not exist.
    ///
    /// The portal answers a missing user resource with code 400 and a
    /// "does not exist" message; other 400s are real failures.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Remote { code: 404, .. } | Self::Api { status: 404, .. } => true,
            Self::Remote { code: 400, message } => {
                message.to_ascii_lowercase().contains("does not exist")
            }
            _ => false,
        }
    }
}
