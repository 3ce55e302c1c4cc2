//! Client Certificate Handler
//!
//! Authenticates controllers whose TLS client certificate was verified by a
//! reverse proxy in front of the server. The proxy forwards the certificate
//! common name and the hashes of the issuer chain as request headers. The
//! common name must equal the controller id and at least one issuer hash
//! must be trusted by the tenant.
//!
//! These headers are only trustworthy if the proxy strips them from inbound
//! requests.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use firmgate_core::TenantSecurityToken;
use firmgate_store::TenantStore;

use super::tenant_config;
use crate::config::ResolverConfig;
use crate::error::{AuthError, Result};
use crate::resolver::AuthenticationHandler;
use crate::types::{AuthKind, AuthenticatedController, HandlerOutcome};

/// Reverse-proxy client certificate handler
pub struct CertificateHandler {
    store: Arc<dyn TenantStore>,
    cn_header: String,
    issuer_hash_prefix: String,
    max_issuer_hashes: usize,
}

impl CertificateHandler {
    /// Create a handler reading the default `X-Ssl-*` headers
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self::from_config(store, &ResolverConfig::default())
    }

    /// Create a handler reading the headers named in `config`
    pub fn from_config(store: Arc<dyn TenantStore>, config: &ResolverConfig) -> Self {
        Self {
            store,
            cn_header: config.client_cn_header.clone(),
            issuer_hash_prefix: config.issuer_hash_header_prefix.clone(),
            max_issuer_hashes: config.max_issuer_hash_headers,
        }
    }
}

#[async_trait]
impl AuthenticationHandler for CertificateHandler {
    fn kind(&self) -> AuthKind {
        AuthKind::Certificate
    }

    fn description(&self) -> &str {
        "client certificate handler"
    }

    async fn authenticate(&self, token: &TenantSecurityToken) -> Result<HandlerOutcome> {
        let Some(common_name) = token.header(&self.cn_header).map(str::trim) else {
            return Ok(HandlerOutcome::NotApplicable);
        };

        debug!(
            tenant = %token.tenant(),
            controller_id = %token.controller_id(),
            common_name = %common_name,
            "Checking client certificate"
        );

        let config = tenant_config(self.store.as_ref(), token).await?;
        if !config.certificate_auth_enabled {
            return Err(AuthError::MethodDisabled(self.kind()));
        }

        if common_name != token.controller_id() {
            return Err(AuthError::CertificateMismatch(common_name.to_string()));
        }

        // Numbered from 1; only the first `max_issuer_hashes` are read.
        let trusted = (1..=self.max_issuer_hashes)
            .filter_map(|i| token.header(&format!("{}{}", self.issuer_hash_prefix, i)))
            .any(|hash| config.trusts_issuer(hash));
        if !trusted {
            return Err(AuthError::UntrustedIssuer);
        }

        Ok(HandlerOutcome::Authenticated(AuthenticatedController::from_token(
            token,
            self.kind(),
            None,
        )))
    }
}
