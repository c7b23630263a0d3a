//! OAuth resource server support for MCP endpoints.
//!
//! Implements the resource-server side of MCP OAuth discovery:
//!
//! - **Protected Resource Metadata** ([RFC 9728](https://datatracker.ietf.org/doc/html/rfc9728)):
//!   serve `/.well-known/oauth-protected-resource` (and its path-inserted
//!   variant) so MCP clients can discover authorization servers.
//!
//! - **Challenges**: 401 responses with a `WWW-Authenticate` header per
//!   [RFC 6750](https://datatracker.ietf.org/doc/html/rfc6750) and a JSON-RPC
//!   error body.

mod error;
mod metadata;

pub use error::{
    INVALID_REQUEST, JsonRpcError, JsonRpcErrorResponse, ResourceServerConfig,
    UNAUTHORIZED_MESSAGE, unauthorized_response, www_authenticate_401,
};
pub use metadata::{
    AuthorizationServer, ProtectedResourceMetadata, WELL_KNOWN_PATH, metadata_router,
    well_known_path,
};
