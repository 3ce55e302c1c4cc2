//! Error types for the authentication resolver

use thiserror::Error;

use firmgate_store::StoreError;

use crate::types::AuthKind;

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Reasons an authentication handler rejects a request
///
/// These are expected outcomes, not programming errors. The resolver turns
/// them into a denied decision.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Credential header is not `<scheme> <token>`
    #[error("Invalid credential format: {0}")]
    InvalidFormat(String),

    /// Presented token does not match the stored secret
    #[error("Presented token does not match")]
    TokenMismatch,

    /// Tenant has no authentication settings
    #[error("Unknown tenant: {0}")]
    UnknownTenant(String),

    /// Controller has no security token on record
    #[error("No security token for controller {controller_id} of tenant {tenant}")]
    UnknownController { tenant: String, controller_id: String },

    /// Authentication method is switched off for the tenant
    #[error("Authentication method {0} is disabled for this tenant")]
    MethodDisabled(AuthKind),

    /// Certificate common name differs from the controller id
    #[error("Certificate common name {0} does not match controller id")]
    CertificateMismatch(String),

    /// No presented issuer hash is trusted by the tenant
    #[error("Certificate issuer is not trusted")]
    UntrustedIssuer,

    /// Storage lookup failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Resolver configuration is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}
