//! OAuth challenge responses for MCP resource servers.
//!
//! Builds `WWW-Authenticate` headers as described by
//! [RFC 6750 §3](https://datatracker.ietf.org/doc/html/rfc6750#section-3) and
//! [RFC 9728 §5.1](https://datatracker.ietf.org/doc/html/rfc9728#name-www-authenticate-response),
//! and the JSON-RPC error body MCP clients expect alongside them.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::{
    HeaderValue, StatusCode,
    header::{CONTENT_TYPE, InvalidHeaderValue, WWW_AUTHENTICATE},
};
use serde::Serialize;

/// JSON-RPC `Invalid Request` error code.
pub const INVALID_REQUEST: i64 = -32600;

/// Message carried by the JSON-RPC error in every 401 challenge.
pub const UNAUTHORIZED_MESSAGE: &str = "Missing or invalid OAuth authorization";

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Configuration for an MCP endpoint acting as an OAuth resource server.
#[derive(Clone, Debug)]
pub struct ResourceServerConfig {
    /// URL to the Protected Resource Metadata document (RFC 9728).
    ///
    /// Included as `resource_metadata="..."` in `WWW-Authenticate` headers.
    pub resource_metadata_url: String,
    /// Protection space advertised as `realm="..."`.
    pub realm: Option<String>,
    /// Scopes advertised as `scope="..."` in 401 challenges.
    pub default_scope: Option<String>,
}

/// JSON-RPC error object.
#[derive(Clone, Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC error response envelope.
///
/// `id` is `null` because the server answers before reading the request body.
#[derive(Clone, Debug, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Option<serde_json::Value>,
    pub error: JsonRpcError,
}

impl JsonRpcErrorResponse {
    /// An `Invalid Request` error with no request id.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: None,
            error: JsonRpcError {
                code: INVALID_REQUEST,
                message: message.into(),
            },
        }
    }
}

/// Build a `WWW-Authenticate` header value for a 401 Unauthorized response.
///
/// Format: `Bearer [realm="<realm>", ]resource_metadata="<url>"[, scope="<scopes>"]`
pub fn www_authenticate_401(
    config: &ResourceServerConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut params = Vec::with_capacity(3);
    if let Some(ref realm) = config.realm {
        params.push(format!("realm=\"{realm}\""));
    }
    params.push(format!(
        "resource_metadata=\"{}\"",
        config.resource_metadata_url
    ));
    if let Some(ref scope) = config.default_scope {
        params.push(format!("scope=\"{scope}\""));
    }
    HeaderValue::from_str(&format!("Bearer {}", params.join(", ")))
}

/// Build the 401 response sent to unauthenticated MCP requests.
///
/// The body is a JSON-RPC `Invalid Request` error. With a config, the
/// response also carries the `WWW-Authenticate` challenge.
pub fn unauthorized_response(config: Option<&ResourceServerConfig>) -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(JsonRpcErrorResponse::invalid_request(UNAUTHORIZED_MESSAGE)),
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
    if let Some(config) = config {
        match www_authenticate_401(config) {
            Ok(value) => {
                headers.insert(WWW_AUTHENTICATE, value);
            }
            Err(err) => tracing::warn!(
                url = %config.resource_metadata_url,
                "cannot encode WWW-Authenticate challenge: {err}"
            ),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResourceServerConfig {
        ResourceServerConfig {
            resource_metadata_url:
                "http://127.0.0.1:9999/.well-known/oauth-protected-resource/mcp".into(),
            realm: Some("mcp-server".into()),
            default_scope: None,
        }
    }

    #[test]
    fn challenge_lists_realm_before_metadata() {
        let value = www_authenticate_401(&config()).unwrap();
        assert_eq!(
            value,
            "Bearer realm=\"mcp-server\", resource_metadata=\"http://127.0.0.1:9999/.well-known/oauth-protected-resource/mcp\""
        );
    }

    #[test]
    fn challenge_without_realm_appends_scope() {
        let config = ResourceServerConfig {
            realm: None,
            default_scope: Some("mcp:tools".into()),
            ..config()
        };
        let value = www_authenticate_401(&config).unwrap();
        assert_eq!(
            value,
            "Bearer resource_metadata=\"http://127.0.0.1:9999/.well-known/oauth-protected-resource/mcp\", scope=\"mcp:tools\""
        );
    }

    #[test]
    fn challenge_rejects_control_characters() {
        let config = ResourceServerConfig {
            resource_metadata_url: "http://bad\n".into(),
            ..config()
        };
        assert!(www_authenticate_401(&config).is_err());
    }

    #[test]
    fn json_rpc_body_is_compact_and_ordered() {
        let body =
            serde_json::to_string(&JsonRpcErrorResponse::invalid_request(UNAUTHORIZED_MESSAGE))
                .unwrap();
        assert_eq!(
            body,
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32600,"message":"Missing or invalid OAuth authorization"}}"#
        );
    }

    #[test]
    fn unauthorized_response_sets_headers() {
        let response = unauthorized_response(Some(&config()));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON_UTF8);
        assert!(response.headers().contains_key(WWW_AUTHENTICATE));
    }
}
