//! Per-tenant authentication settings and controller credentials

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::Result;

/// Authentication settings of one tenant
///
/// Each authentication method is switched on or off per tenant. Secrets are
/// tenant scoped: a gateway token or trusted issuer of one tenant means
/// nothing for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantAuthConfig {
    /// Controllers may authenticate with their own security token
    #[serde(default = "default_true")]
    pub controller_token_enabled: bool,

    /// Gateways may authenticate with the tenant-wide gateway token
    #[serde(default)]
    pub gateway_token_enabled: bool,

    /// The tenant-wide gateway token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_token: Option<String>,

    /// Controllers may authenticate with a client certificate checked by a
    /// TLS-terminating reverse proxy
    #[serde(default)]
    pub certificate_auth_enabled: bool,

    /// Issuer hashes accepted for certificate authentication
    #[serde(default)]
    pub trusted_issuer_hashes: Vec<String>,

    /// Artifacts may be downloaded without credentials
    #[serde(default)]
    pub anonymous_download_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TenantAuthConfig {
    fn default() -> Self {
        Self {
            controller_token_enabled: true,
            gateway_token_enabled: false,
            gateway_token: None,
            certificate_auth_enabled: false,
            trusted_issuer_hashes: Vec::new(),
            anonymous_download_enabled: false,
        }
    }
}

impl TenantAuthConfig {
    /// Create the default settings: controller tokens only
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable gateway token authentication with the given token
    pub fn with_gateway_token(mut self, token: impl Into<String>) -> Self {
        self.gateway_token_enabled = true;
        self.gateway_token = Some(token.into());
        self
    }

    /// Enable certificate authentication trusting the given issuer hash
    pub fn with_trusted_issuer(mut self, issuer_hash: impl Into<String>) -> Self {
        self.certificate_auth_enabled = true;
        self.trusted_issuer_hashes.push(issuer_hash.into());
        self
    }

    /// Enable or disable anonymous downloads
    pub fn with_anonymous_download(mut self, enabled: bool) -> Self {
        self.anonymous_download_enabled = enabled;
        self
    }

    /// Enable or disable controller token authentication
    pub fn with_controller_token(mut self, enabled: bool) -> Self {
        self.controller_token_enabled = enabled;
        self
    }

    /// Whether `hash` is one of the trusted issuer hashes (ignoring hex case)
    pub fn trusts_issuer(&self, hash: &str) -> bool {
        self.trusted_issuer_hashes
            .iter()
            .any(|trusted| trusted.eq_ignore_ascii_case(hash.trim()))
    }
}

/// Tenant settings and controller credential backend
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait TenantStore: Send + Sync + Debug {
    /// Authentication settings of a tenant, `None` if the tenant is unknown
    async fn tenant_auth_config(&self, tenant: &str) -> Result<Option<TenantAuthConfig>>;

    /// Security token of a controller, `None` if the controller is unknown
    /// or has no token
    async fn controller_token(&self, tenant: &str, controller_id: &str) -> Result<Option<String>>;
}
