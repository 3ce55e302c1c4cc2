//! Controller Security Token Handler
//!
//! Authenticates a controller by the security token the server issued to it
//! individually, presented as `Authorization: TargetToken <token>` (or the
//! CoAP equivalent).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use firmgate_core::TenantSecurityToken;
use firmgate_store::TenantStore;

use super::{find_credential, secrets_match, tenant_config};
use crate::error::{AuthError, Result};
use crate::resolver::AuthenticationHandler;
use crate::types::{AuthKind, AuthenticatedController, HandlerOutcome};

/// Per-controller security token handler
pub struct ControllerTokenHandler {
    store: Arc<dyn TenantStore>,
    schemes: Vec<String>,
}

impl ControllerTokenHandler {
    /// Create a handler accepting the `TargetToken` and `Bearer` schemes
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self::with_schemes(store, vec!["TargetToken".to_string(), "Bearer".to_string()])
    }

    /// Create a handler accepting the given schemes
    pub fn with_schemes(store: Arc<dyn TenantStore>, schemes: Vec<String>) -> Self {
        Self { store, schemes }
    }
}

#[async_trait]
impl AuthenticationHandler for ControllerTokenHandler {
    fn kind(&self) -> AuthKind {
        AuthKind::ControllerToken
    }

    fn description(&self) -> &str {
        "controller security token handler"
    }

    async fn authenticate(&self, token: &TenantSecurityToken) -> Result<HandlerOutcome> {
        let Some((transport, presented)) = find_credential(token, &self.schemes)? else {
            return Ok(HandlerOutcome::NotApplicable);
        };

        debug!(
            tenant = %token.tenant(),
            controller_id = %token.controller_id(),
            transport = %transport,
            "Checking controller security token"
        );

        let config = tenant_config(self.store.as_ref(), token).await?;
        if !config.controller_token_enabled {
            return Err(AuthError::MethodDisabled(self.kind()));
        }

        let stored = self
            .store
            .controller_token(token.tenant(), token.controller_id())
            .await?
            .ok_or_else(|| AuthError::UnknownController {
                tenant: token.tenant().to_string(),
                controller_id: token.controller_id().to_string(),
            })?;

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
