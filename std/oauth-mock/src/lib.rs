//! Loopback MCP server that answers every call with an OAuth challenge.
//!
//! Mimics a hosted MCP API that requires OAuth so a client's discovery flow
//! can be watched end to end:
//! - `POST /mcp` (and anything under `/mcp/`): `401` with
//!   `WWW-Authenticate: Bearer realm="mcp-server", resource_metadata="<url>"`
//!   and a JSON-RPC `-32600` error body
//! - `GET /.well-known/oauth-protected-resource[/mcp]`: Protected Resource
//!   Metadata naming a fake authorization server
//!
//! Everything else is an empty `404`, including any request whose target
//! carries a query string. No tokens are ever issued or accepted.

mod error;

pub use error::Error;

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
};
use rmcp_challenge::auth::{
    AuthLayer, BearerAuth, Validator,
    oauth::{
        AuthorizationServer, ProtectedResourceMetadata, ResourceServerConfig, metadata_router,
        well_known_path,
    },
};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;

/// Port used when none is given on the command line.
pub const DEFAULT_PORT: u16 = 8765;

/// Path of the challenged MCP endpoint.
pub const MCP_PATH: &str = "/mcp";

const REALM: &str = "mcp-server";
const ISSUER: &str = "https://auth.example.com";

/// Everything the responses are derived from.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub port: u16,
    pub realm: String,
    pub issuer: String,
}

impl MockConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            realm: REALM.into(),
            issuer: ISSUER.into(),
        }
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", Ipv4Addr::LOCALHOST, self.port)
    }

    /// Canonical URI of the MCP endpoint, published as `resource`.
    pub fn resource_url(&self) -> String {
        format!("{}{MCP_PATH}", self.base_url())
    }

    /// Where the challenge sends clients for metadata.
    pub fn resource_metadata_url(&self) -> String {
        format!("{}{}", self.base_url(), well_known_path(MCP_PATH))
    }

    pub fn metadata(&self) -> ProtectedResourceMetadata {
        ProtectedResourceMetadata {
            resource: self.resource_url(),
            authorization_servers: vec![AuthorizationServer::new(self.issuer.clone())],
            scopes_supported: None,
            bearer_methods_supported: None,
            resource_documentation: None,
        }
    }

    pub fn resource_server(&self) -> ResourceServerConfig {
        ResourceServerConfig {
            resource_metadata_url: self.resource_metadata_url(),
            realm: Some(self.realm.clone()),
            default_scope: None,
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

/// Validator that turns every presented token away.
#[derive(Clone, Debug)]
struct RejectAll;

impl Validator for RejectAll {
    type Claims = ();
    type Error = &'static str;

    async fn validate(&self, _credential: &str) -> Result<(), &'static str> {
        Err("this server issues no tokens")
    }
}

/// Build the mock's HTTP surface.
pub fn router(config: &MockConfig) -> Router {
    // The inner handler is unreachable: `RejectAll` never yields claims.
    let mcp = post(not_found)
        .route_layer(
            AuthLayer::new(BearerAuth::new(RejectAll))
                .with_resource_server(config.resource_server()),
        )
        .fallback(not_found);

    Router::new()
        .route(MCP_PATH, mcp.clone())
        .route("/mcp/", mcp.clone())
        .route("/mcp/{*rest}", mcp)
        .merge(metadata_router(config.metadata(), MCP_PATH))
        .fallback(not_found)
        .layer(middleware::from_fn(reject_query))
        .layer(middleware::from_fn(log_request))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Routes match the whole request target, so `/mcp?x=1` is not `/mcp`.
async fn reject_query(request: Request, next: Next) -> Response {
    if request.uri().query().is_some() {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    tracing::info!(%method, %uri, status = response.status().as_u16(), "request");
    response
}

/// A bound, not yet running, mock server.
pub struct MockServer {
    listener: TcpListener,
    config: MockConfig,
}

impl MockServer {
    /// Bind `127.0.0.1:<port>`. Port `0` lets the OS choose; the derived URLs
    /// always use the port actually bound.
    pub async fn bind(port: u16) -> Result<Self, Error> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        let config = MockConfig::new(listener.local_addr()?.port());
        Ok(Self { listener, config })
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then release the socket.
    pub async fn run<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(&self.config);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
