//! Shared HTTP response helpers for portal calls.
//!
//! The portal reports many failures as an `{"error": {...}}` envelope with
//! HTTP 200; [`read_json`] turns those into [`PortalError::Remote`].

use serde::de::DeserializeOwned;

use crate::error::PortalError;

/// Check an HTTP response status. Non-success becomes [`PortalError::Api`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, PortalError> {
    if !resp.status().is_success() {
        return Err(PortalError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Read a JSON body, surfacing an error envelope as [`PortalError::Remote`].
pub async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value, PortalError> {
    let resp = check_response(resp).await?;
    let value: serde_json::Value = resp.json().await?;
    envelope_error(&value).map_or(Ok(value), Err)
}

/// Read a JSON body into `T`.
pub async fn read_typed<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, PortalError> {
    let value = read_json(resp).await?;
    serde_json::from_value(value).map_err(|e| PortalError::Parse(e.to_string()))
}

/// URL-encode `key=value` pairs for query strings and form bodies.
pub fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn envelope_error(value: &serde_json::Value) -> Option<PortalError> {
    let error = value.get("error")?;
    Some(PortalError::Remote {
        code: error
            .get("code")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or_default(),
        message: error
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown portal error")
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_api_error() {
        let resp = mock_response(500, "boom");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, PortalError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(200, "{}");
        assert!(check_response(resp).await.is_ok());
    }

    #[tokio::test]
    async fn read_json_surfaces_error_envelope() {
        let resp = mock_response(
            200,
            r#"{"error":{"code":498,"message":"Invalid token.","details":[]}}"#,
        );
        let err = read_json(resp).await.unwrap_err();
        assert!(matches!(err, PortalError::Remote { code: 498, .. }));
        assert!(err.to_string().contains("Invalid token."));
    }

    #[tokio::test]
    async fn read_typed_parses_body() {
        #[derive(serde::Deserialize)]
        struct Token {
            token: String,
        }
        let resp = mock_response(200, r#"{"token":"abc"}"#);
        let token: Token = read_typed(resp).await.unwrap();
        assert_eq!(token.token, "abc");
    }

    #[tokio::test]
    async fn read_typed_reports_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Token {
            token: String,
        }
        let resp = mock_response(200, r#"{"nope":1}"#);
        let err = read_typed::<Token>(resp).await.unwrap_err();
        assert!(matches!(err, PortalError::Parse(_)));
    }

    #[test]
    fn encode_pairs_escapes_values() {
        assert_eq!(
            encode_pairs(&[("f", "json"), ("text", "{\"a\":1 }")]),
            "f=json&text=%7B%22a%22%3A1%20%7D"
        );
    }
}
