//! Reversible text <-> transport-safe ASCII token encoding.
//!
//! Text is encoded as UTF-8 and then standard base64, so any Unicode string
//! (including astral-plane characters) survives the trip.

use base64::Engine as _;

use crate::error::AuthError;

/// Encode text as a base64 ASCII token.
#[must_use]
pub fn encode(text: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(text.as_bytes())
}

/// Decode a token produced by [`encode`].
///
/// # Errors
///
/// Returns `AuthError::Codec` if the token is not valid base64 or does not
/// decode to UTF-8.
pub fn decode(token: &str) -> Result<String, AuthError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(token.trim())
        .map_err(|e| AuthError::Codec(format!("base64 decode failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AuthError::Codec(format!("not UTF-8: {e}")))
}
