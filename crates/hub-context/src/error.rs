use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    /// An operation that needs a signed-in identity was called on an anonymous context.
    #[error("{operation} requires an authenticated context; sign in first")]
    Unauthenticated { operation: &'static str },

    #[error(transparent)]
    Auth(#[from] hub_auth::AuthError),

    #[error(transparent)]
    Portal(#[from] hub_portal::PortalError),

    #[error(transparent)]
    Core(#[from] hub_core::CoreError),

    /// Serialized context or settings JSON could not be produced or parsed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ContextError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
