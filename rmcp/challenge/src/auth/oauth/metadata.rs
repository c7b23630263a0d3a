//! OAuth 2.0 Protected Resource Metadata (RFC 9728).
//!
//! MCP clients that receive a `401` follow `resource_metadata` to this
//! document to find the authorization server(s) for the resource. This module
//! provides the metadata type and an axum router that serves it at the
//! well-known endpoint.
//!
//! ```rust,ignore
//! use rmcp_challenge::auth::oauth::{
//!     AuthorizationServer, ProtectedResourceMetadata, metadata_router,
//! };
//!
//! let metadata = ProtectedResourceMetadata {
//!     resource: "http://127.0.0.1:8765/mcp".into(),
//!     authorization_servers: vec![AuthorizationServer::new("https://auth.example.com")],
//!     scopes_supported: None,
//!     bearer_methods_supported: None,
//!     resource_documentation: None,
//! };
//!
//! let app = axum::Router::new().merge(metadata_router(metadata, "/mcp"));
//! ```

use axum::{
    Json,
    response::IntoResponse,
    routing::{MethodRouter, get},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Root well-known location of the metadata document.
pub const WELL_KNOWN_PATH: &str = "/.well-known/oauth-protected-resource";

/// An authorization server entry, published as an object with its issuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationServer {
    pub issuer: String,
}

impl AuthorizationServer {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }
}

/// OAuth 2.0 Protected Resource Metadata ([RFC 9728](https://datatracker.ietf.org/doc/html/rfc9728)).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtectedResourceMetadata {
    /// The resource identifier: canonical URI of the MCP endpoint.
    pub resource: String,

    /// Authorization server(s) that can issue tokens for this resource.
    pub authorization_servers: Vec<AuthorizationServer>,

    /// Scopes supported by this resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes_supported: Option<Vec<String>>,

    /// Bearer token methods supported (e.g., `["header"]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_methods_supported: Option<Vec<String>>,

    /// URL of the resource documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_documentation: Option<String>,
}

/// Well-known path for a resource served at `resource_path`.
///
/// RFC 9728 §3.1 inserts the well-known segment between the host and the
/// resource path, so `/mcp` maps to `/.well-known/oauth-protected-resource/mcp`.
pub fn well_known_path(resource_path: &str) -> String {
    match resource_path.trim_end_matches('/') {
        "" => WELL_KNOWN_PATH.to_string(),
        path if path.starts_with('/') => format!("{WELL_KNOWN_PATH}{path}"),
        path => format!("{WELL_KNOWN_PATH}/{path}"),
    }
}

/// Create an axum [`Router`](axum::Router) that serves the metadata at
/// [`WELL_KNOWN_PATH`] and at the path-inserted location for `resource_path`.
///
/// Only `GET` is answered; `HEAD` and every other method on these paths get
/// an empty `404`, the same as any unknown route.
pub fn metadata_router(metadata: ProtectedResourceMetadata, resource_path: &str) -> axum::Router {
    let metadata = Arc::new(metadata);
    let mut router = axum::Router::new().route(WELL_KNOWN_PATH, serve_metadata(metadata.clone()));

    let inserted = well_known_path(resource_path);
    if inserted != WELL_KNOWN_PATH {
        router = router.route(&inserted, serve_metadata(metadata));
    }
    router
}

fn serve_metadata(metadata: Arc<ProtectedResourceMetadata>) -> MethodRouter {
    get(move || {
        let metadata = metadata.clone();
        async move { Json(metadata.as_ref().clone()).into_response() }
    })
    .head(|| async { StatusCode::NOT_FOUND })
    .fallback(|| async { StatusCode::NOT_FOUND })
}
