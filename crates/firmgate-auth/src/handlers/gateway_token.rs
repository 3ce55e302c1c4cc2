//! Gateway Token Handler
//!
//! Authenticates with the tenant-wide gateway token, presented as
//! `Authorization: GatewayToken <token>`. A gateway downloads on behalf of
//! the controllers behind it, so the token is not bound to one controller.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use firmgate_core::TenantSecurityToken;
use firmgate_store::TenantStore;

use super::{find_credential, secrets_match, tenant_config};
use crate::error::{AuthError, Result};
use crate::resolver::AuthenticationHandler;
use crate::types::{AuthKind, AuthenticatedController, HandlerOutcome};

/// Tenant-wide gateway token handler
pub struct GatewayTokenHandler {
    store: Arc<dyn TenantStore>,
    scheme: String,
}

impl GatewayTokenHandler {
    /// Create a handler accepting the `GatewayToken` scheme
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self::with_scheme(store, "GatewayToken")
    }

    pub fn with_scheme(store: Arc<dyn TenantStore>, scheme: impl Into<String>) -> Self {
        Self {
            store,
            scheme: scheme.into(),
        }
    }
}

#[async_trait]
impl AuthenticationHandler for GatewayTokenHandler {
    fn kind(&self) -> AuthKind {
        AuthKind::GatewayToken
    }

    fn description(&self) -> &str {
        "gateway token handler"
    }

    async fn authenticate(&self, token: &TenantSecurityToken) -> Result<HandlerOutcome> {
        let Some((transport, presented)) = find_credential(token, &[self.scheme.as_str()])? else {
            return Ok(HandlerOutcome::NotApplicable);
        };

        debug!(tenant = %token.tenant(), transport = %transport, "Checking gateway token");

        let config = tenant_config(self.store.as_ref(), token).await?;
        let stored = match (config.gateway_token_enabled, config.gateway_token) {
            (true, Some(stored)) if !stored.is_empty() => stored,
            _ => return Err(AuthError::MethodDisabled(self.kind())),
        };

        if !secrets_match(presented, &stored) {
            return Err(AuthError::TokenMismatch);
        }

        Ok(HandlerOutcome::Authenticated(AuthenticatedController::from_token(
            token,
            self.kind(),
            Some(transport),
        )))
    }
}
