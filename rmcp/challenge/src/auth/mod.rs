//! Authentication middleware for MCP endpoints.
//!
//! Provides a tower middleware that validates incoming requests using a
//! user-defined [`Authenticator`] trait. On success, the authenticated
//! claims are inserted into HTTP extensions and the request reaches the
//! inner service. On failure the middleware answers with
//! [`unauthorized_response`](oauth::unauthorized_response) and logs why the
//! request was rejected.
//!
//! When configured with a [`ResourceServerConfig`](oauth::ResourceServerConfig),
//! the `401` carries a `WWW-Authenticate` challenge with `resource_metadata`,
//! which is what MCP clients follow to start OAuth discovery.
//!
//! # Example
//!
//! ```rust,ignore
//! use rmcp_challenge::auth::{AuthLayer, BearerAuth, Validator};
//! use rmcp_challenge::auth::oauth::ResourceServerConfig;
//!
//! #[derive(Clone)]
//! struct MyValidator;
//!
//! impl Validator for MyValidator {
//!     type Claims = String;
//!     type Error = String;
//!
//!     async fn validate(&self, token: &str) -> Result<String, String> {
//!         // validate token...
//!         Ok("user1".into())
//!     }
//! }
//!
//! let rs_config = ResourceServerConfig {
//!     resource_metadata_url:
//!         "https://mcp.example.com/.well-known/oauth-protected-resource/mcp".into(),
//!     realm: Some("mcp-server".into()),
//!     default_scope: Some("mcp:tools".into()),
//! };
//!
//! let app = axum::Router::new()
//!     .route("/mcp", axum::routing::post(handler))
//!     .layer(AuthLayer::new(BearerAuth::new(MyValidator)).with_resource_server(rs_config));
//! ```

mod bearer;

pub mod oauth;

pub use bearer::BearerAuth;

use futures::future::BoxFuture;
use http::{Request, Response};
use oauth::{ResourceServerConfig, unauthorized_response};
use std::task::{Context, Poll};

/// Trait for validating incoming MCP requests.
///
/// On success, `Claims` is inserted into `http::Extensions`.
pub trait Authenticator: Clone + Send + Sync + 'static {
    /// The claims type produced on successful authentication.
    type Claims: Clone + Send + Sync + 'static;

    /// The error type returned on authentication failure.
    type Error: std::fmt::Display + Send;

    /// Validate the request and return claims, or an error.
    fn authenticate(
        &self,
        parts: &http::request::Parts,
    ) -> impl Future<Output = Result<Self::Claims, Self::Error>> + Send;
}

/// Trait for validating a credential string (e.g., a Bearer token).
///
/// Wrap an implementation in [`BearerAuth`], which handles credential
/// extraction from the `Authorization` header.
///
/// ```rust,ignore
/// use rmcp_challenge::auth::Validator;
///
/// #[derive(Clone)]
/// struct RejectAll;
///
/// impl Validator for RejectAll {
///     type Claims = ();
///     type Error = &'static str;
///
///     async fn validate(&self, _credential: &str) -> Result<(), &'static str> {
///         Err("no tokens are accepted")
///     }
/// }
/// ```
pub trait Validator: Clone + Send + Sync + 'static {
    /// The claims type produced on successful validation.
    type Claims: Clone + Send + Sync + 'static;

    /// The error type returned on validation failure.
    type Error: std::fmt::Display + Send;

    /// Validate the credential string and return claims, or an error.
    fn validate(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<Self::Claims, Self::Error>> + Send;
}

/// Tower [`Layer`](tower::Layer) that applies [`AuthService`].
#[derive(Clone)]
pub struct AuthLayer<A> {
    authenticator: A,
    resource_server: Option<ResourceServerConfig>,
}

impl<A> AuthLayer<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            resource_server: None,
        }
    }

    /// Attach OAuth resource server settings.
    ///
    /// When set, 401 responses include a `WWW-Authenticate` header built by
    /// [`www_authenticate_401`](oauth::www_authenticate_401).
    pub fn with_resource_server(mut self, config: ResourceServerConfig) -> Self {
        self.resource_server = Some(config);
        self
    }
}

impl<A, S> tower::Layer<S> for AuthLayer<A>
where
    A: Clone,
{
    type Service = AuthService<A, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            authenticator: self.authenticator.clone(),
            resource_server: self.resource_server.clone(),
            inner,
        }
    }
}

/// Tower service that authenticates requests before forwarding them.
#[derive(Clone)]
pub struct AuthService<A, S> {
    authenticator: A,
    resource_server: Option<ResourceServerConfig>,
    inner: S,
}

impl<A, S, B> tower::Service<Request<B>> for AuthService<A, S>
where
    A: Authenticator,
    S: tower::Service<Request<B>, Response = Response<axum::body::Body>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let resource_server = self.resource_server.clone();
        let mut inner = self.inner.clone();
        // swap to ensure poll_ready state is preserved
        std::mem::swap(&mut self.inner, &mut inner);

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            match authenticator.authenticate(&parts).await {
                Ok(claims) => {
                    let mut req = Request::from_parts(parts, body);
                    req.extensions_mut().insert(claims);
                    inner.call(req).await
                }
                Err(err) => {
                    tracing::info!(
                        method = %parts.method,
                        uri = %parts.uri,
                        reason = %err,
                        "challenging unauthenticated request"
                    );
                    Ok(unauthorized_response(resource_server.as_ref()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::oauth::{ResourceServerConfig, UNAUTHORIZED_MESSAGE};
    use super::{AuthLayer, BearerAuth, Validator};
    use axum::{Extension, Router, body::Body, routing::post};
    use http::{Request, StatusCode, header};
    use tower::ServiceExt;

    #[derive(Clone)]
    struct Secret;

    impl Validator for Secret {
        type Claims = String;
        type Error = &'static str;

        async fn validate(&self, token: &str) -> Result<String, &'static str> {
            if token == "secret" {
                Ok("user1".into())
            } else {
                Err("unknown token")
            }
        }
    }

    fn app(config: Option<ResourceServerConfig>) -> Router {
        let mut layer = AuthLayer::new(BearerAuth::new(Secret));
        if let Some(config) = config {
            layer = layer.with_resource_server(config);
        }
        Router::new()
            .route(
                "/mcp",
                post(|Extension(user): Extension<String>| async move { user }),
            )
            .layer(layer)
    }

    fn rs_config() -> ResourceServerConfig {
        ResourceServerConfig {
            resource_metadata_url:
                "http://127.0.0.1:8765/.well-known/oauth-protected-resource/mcp".into(),
            realm: Some("mcp-server".into()),
            default_scope: None,
        }
    }

    fn post_mcp(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/mcp");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn valid_token_reaches_inner_service_with_claims() {
        let response = app(Some(rs_config()))
            .oneshot(post_mcp(Some("secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"user1");
    }

    #[tokio::test]
    async fn missing_token_is_challenged() {
        let response = app(Some(rs_config())).oneshot(post_mcp(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(challenge.starts_with("Bearer realm=\"mcp-server\""));
        assert!(challenge.contains(
            "resource_metadata=\"http://127.0.0.1:8765/.well-known/oauth-protected-resource/mcp\""
        ));
    }

    #[tokio::test]
    async fn rejected_token_gets_json_rpc_error() {
        let response = app(Some(rs_config()))
            .oneshot(post_mcp(Some("nope")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], -32600);
        assert_eq!(value["error"]["message"], UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn no_challenge_header_without_resource_server() {
        let response = app(None).oneshot(post_mcp(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
