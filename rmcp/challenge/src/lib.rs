//! # rmcp-challenge
//!
//! OAuth resource-server plumbing for MCP endpoints served with
//! [axum](https://docs.rs/axum).
//!
//! ## Challenges
//!
//! [`auth::AuthLayer`] runs an [`auth::Authenticator`] in front of the MCP
//! service. Rejected requests get a `401` with a JSON-RPC error body and, when
//! a [`auth::oauth::ResourceServerConfig`] is attached, a `WWW-Authenticate`
//! header pointing clients at the Protected Resource Metadata document.
//!
//! ```rust,ignore
//! use rmcp_challenge::auth::{AuthLayer, BearerAuth};
//! use rmcp_challenge::auth::oauth::{ResourceServerConfig, metadata_router};
//!
//! let rs_config = ResourceServerConfig {
//!     resource_metadata_url:
//!         "http://127.0.0.1:8765/.well-known/oauth-protected-resource/mcp".into(),
//!     realm: Some("mcp-server".into()),
//!     default_scope: None,
//! };
//!
//! let app = axum::Router::new()
//!     .route("/mcp", axum::routing::post(handler))
//!     .layer(AuthLayer::new(BearerAuth::new(MyValidator)).with_resource_server(rs_config))
//!     .merge(metadata_router(metadata, "/mcp"));
//! ```

pub use axum;

pub mod auth;
