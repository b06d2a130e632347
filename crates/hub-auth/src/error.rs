use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session token for '{username}' expired; sign in again")]
    TokenExpired { username: String },

    #[error("invalid session: {0}")]
    SessionFormat(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Core(#[from] hub_core::CoreError),
}
