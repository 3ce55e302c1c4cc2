//! Controller Download Authentication
//!
//! Decides whether a controller may download an artifact, given the
//! [`TenantSecurityToken`](firmgate_core::TenantSecurityToken) the transport
//! layer built for the request.
//!
//! ## Architecture
//!
//! The resolver holds an ordered list of authentication handlers, each
//! implementing one method:
//!
//! - **Controller token**: `TargetToken`/`Bearer` credential checked against
//!   the controller's own security token
//! - **Gateway token**: `GatewayToken` credential checked against the
//!   tenant-wide gateway token
//! - **Certificate**: client certificate details forwarded by a reverse proxy
//! - **Anonymous**: credential-free download, if the tenant allows it
//!
//! The first handler that authenticates wins. Credentials are read from the
//! `Authorization` header on HTTP and the `Coap-Authorization` header on
//! CoAP, whichever is present.
//!
//! ## Usage
//!
//! ```ignore
//! use firmgate_auth::{AuthenticationResolver, DownloadAuthorizer, ResolverConfig};
//!
//! let store = Arc::new(MemoryStore::new());
//! let resolver = AuthenticationResolver::from_config(&ResolverConfig::from_env()?, store.clone())?;
//! let authorizer = DownloadAuthorizer::new(resolver, store);
//!
//! let token = TenantSecurityToken::new("acme", "dev-42", Some(FileResource::artifact_id(1001)))
//!     .with_headers(request_headers);
//! match authorizer.authorize(&token).await {
//!     DownloadOutcome::Granted { artifact, .. } => stream(artifact),
//!     DownloadOutcome::NotFound(_) => not_found(),
//!     _ => forbidden(),
//! }
//! ```

pub mod config;
pub mod download;
pub mod error;
pub mod handlers;
pub mod resolver;
pub mod types;

pub use config::ResolverConfig;
pub use download::{DownloadAuthorizer, DownloadOutcome};
pub use error::{AuthError, Result};
pub use resolver::{AuthenticationHandler, AuthenticationResolver, AuthenticationResolverBuilder};
pub use types::{AuthDecision, AuthKind, AuthenticatedController, DenyReason, HandlerOutcome};
