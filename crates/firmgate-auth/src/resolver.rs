//! Authentication resolver - tries handlers in priority order

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use firmgate_core::TenantSecurityToken;
use firmgate_store::TenantStore;

use crate::config::ResolverConfig;
use crate::error::{AuthError, Result};
use crate::handlers::{
    AnonymousDownloadHandler, CertificateHandler, ControllerTokenHandler, GatewayTokenHandler,
};
use crate::types::{AuthDecision, AuthKind, DenyReason, HandlerOutcome};

/// Trait for authentication handlers
///
/// Each handler implements one authentication method and decides whether
/// a security token satisfies it.
#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    /// The method this handler implements
    fn kind(&self) -> AuthKind;

    /// Try to authenticate a security token
    ///
    /// # Returns
    /// * `Ok(HandlerOutcome::Authenticated)` - The token satisfies this method
    /// * `Ok(HandlerOutcome::NotApplicable)` - Nothing in the token concerns this method
    /// * `Err(AuthError)` - The token tried this method and failed
    async fn authenticate(&self, token: &TenantSecurityToken) -> Result<HandlerOutcome>;

    /// Get a description of this handler (for logging)
    fn description(&self) -> &str {
        "authentication handler"
    }
}

/// Authentication resolver
///
/// Holds an ordered list of handlers. [`resolve`](Self::resolve) asks them in
/// order and authorizes on the first one that authenticates. A handler
/// rejection does not stop the search, so a failing token can still fall
/// through to anonymous download if the tenant allows it. Storage failures
/// stop the search and deny.
pub struct AuthenticationResolver {
    handlers: Vec<Arc<dyn AuthenticationHandler>>,
}

impl AuthenticationResolver {
    /// Create a resolver with no handlers; it denies everything
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Create a resolver with the handlers and order given by `config`
    pub fn from_config(config: &ResolverConfig, store: Arc<dyn TenantStore>) -> Result<Self> {
        config.validate()?;

        let mut resolver = Self::new();
        for kind in &config.order {
            match kind {
                AuthKind::ControllerToken => resolver.register_handler(ControllerTokenHandler::with_schemes(
                    store.clone(),
                    config.controller_token_schemes.clone(),
                )),
                AuthKind::GatewayToken => resolver.register_handler(GatewayTokenHandler::with_scheme(
                    store.clone(),
                    config.gateway_token_scheme.clone(),
                )),
                AuthKind::Certificate => {
                    resolver.register_handler(CertificateHandler::from_config(store.clone(), config))
                }
                AuthKind::Anonymous => resolver.register_handler(AnonymousDownloadHandler::new(store.clone())),
            }
        }
        Ok(resolver)
    }

    /// Append a handler at the lowest priority
    pub fn register_handler<H: AuthenticationHandler + 'static>(&mut self, handler: H) {
        info!(
            kind = %handler.kind(),
            description = handler.description(),
            priority = self.handlers.len(),
            "Registered authentication handler"
        );
        self.handlers.push(Arc::new(handler));
    }

    /// Check if a handler is registered for a method
    pub fn has_handler(&self, kind: AuthKind) -> bool {
        self.handlers.iter().any(|h| h.kind() == kind)
    }

    /// Registered methods, highest priority first
    pub fn handler_kinds(&self) -> Vec<AuthKind> {
        self.handlers.iter().map(|h| h.kind()).collect()
    }

    /// Decide whether a security token is authorized
    ///
    /// Never fails: every problem becomes a [`DenyReason`].
    pub async fn resolve(&self, token: &TenantSecurityToken) -> AuthDecision {
        if !token.has_identity() {
            warn!(
                tenant = %token.tenant(),
                controller_id = %token.controller_id(),
                "Denied security token without tenant or controller id"
            );
            return AuthDecision::Denied(DenyReason::MalformedToken);
        }

        let mut last_rejection = None;

        for handler in &self.handlers {
            let kind = handler.kind();
            match handler.authenticate(token).await {
                Ok(HandlerOutcome::Authenticated(controller)) => {
                    info!(
                        tenant = %controller.tenant,
                        controller_id = %controller.controller_id,
                        kind = %kind,
                        resource = ?controller.file_resource,
                        "Controller authenticated"
                    );
                    return AuthDecision::Authorized(controller);
                }
                Ok(HandlerOutcome::NotApplicable) => {
                    debug!(kind = %kind, "Authentication handler not applicable");
                }
                Err(AuthError::Store(e)) => {
                    warn!(
                        tenant = %token.tenant(),
                        controller_id = %token.controller_id(),
                        kind = %kind,
                        error = %e,
                        "Storage failure during authentication"
                    );
                    return AuthDecision::Denied(DenyReason::StoreUnavailable(e.to_string()));
                }
                Err(e) => {
                    debug!(kind = %kind, error = %e, "Authentication handler rejected token");
                    last_rejection = Some(DenyReason::Rejected {
                        kind,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let reason = last_rejection.unwrap_or(DenyReason::NoCredentials);
        warn!(
            tenant = %token.tenant(),
            controller_id = %token.controller_id(),
            reason = %reason,
            "Controller authentication denied"
        );
        AuthDecision::Denied(reason)
    }
}

impl Default for AuthenticationResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a resolver by hand, in priority order
///
/// The first handler added is asked first. Use
/// [`AuthenticationResolver::from_config`] to take the order from configuration.
pub struct AuthenticationResolverBuilder {
    resolver: AuthenticationResolver,
}

impl AuthenticationResolverBuilder {
    /// Start with no handlers
    pub fn new() -> Self {
        Self {
            resolver: AuthenticationResolver::new(),
        }
    }

    /// Add a handler below those already added
    pub fn with_handler<H: AuthenticationHandler + 'static>(mut self, handler: H) -> Self {
        self.resolver.register_handler(handler);
        self
    }

    /// Finish; handlers keep the order they were added in
    pub fn build(self) -> AuthenticationResolver {
        self.resolver
    }
}

impl Default for AuthenticationResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthenticatedController;
    use firmgate_store::StoreError;

    struct FixedHandler {
        kind: AuthKind,
        outcome: Result<HandlerOutcome>,
    }

    impl FixedHandler {
        fn accepting(kind: AuthKind) -> Self {
            let token = TenantSecurityToken::new("acme", "dev-42", None);
            Self {
                kind,
                outcome: Ok(HandlerOutcome::Authenticated(AuthenticatedController::from_token(
                    &token, kind, None,
                ))),
            }
        }

        fn skipping(kind: AuthKind) -> Self {
            Self {
                kind,
                outcome: Ok(HandlerOutcome::NotApplicable),
            }
        }

        fn rejecting(kind: AuthKind, err: AuthError) -> Self {
            Self {
                kind,
                outcome: Err(err),
            }
        }
    }

    #[async_trait]
    impl AuthenticationHandler for FixedHandler {
        fn kind(&self) -> AuthKind {
            self.kind
        }

        async fn authenticate(&self, _token: &TenantSecurityToken) -> Result<HandlerOutcome> {
            self.outcome.clone()
        }
    }

    fn token() -> TenantSecurityToken {
        TenantSecurityToken::new("acme", "dev-42", None)
    }

    #[tokio::test]
    async fn test_empty_resolver_denies() {
        let resolver = AuthenticationResolver::new();
        assert_eq!(
            resolver.resolve(&token()).await,
            AuthDecision::Denied(DenyReason::NoCredentials)
        );
    }

    #[tokio::test]
    async fn test_first_authenticating_handler_wins() {
        let resolver = AuthenticationResolverBuilder::new()
            .with_handler(FixedHandler::skipping(AuthKind::ControllerToken))
            .with_handler(FixedHandler::accepting(AuthKind::GatewayToken))
            .with_handler(FixedHandler::accepting(AuthKind::Anonymous))
            .build();

        let decision = resolver.resolve(&token()).await;
        assert_eq!(decision.controller().map(|c| c.kind), Some(AuthKind::GatewayToken));
    }

    #[tokio::test]
    async fn test_rejection_falls_through() {
        let resolver = AuthenticationResolverBuilder::new()
            .with_handler(FixedHandler::rejecting(AuthKind::ControllerToken, AuthError::TokenMismatch))
            .with_handler(FixedHandler::accepting(AuthKind::Anonymous))
            .build();

        let decision = resolver.resolve(&token()).await;
        assert_eq!(decision.controller().map(|c| c.kind), Some(AuthKind::Anonymous));
    }

    #[tokio::test]
    async fn test_last_rejection_reported() {
        let resolver = AuthenticationResolverBuilder::new()
            .with_handler(FixedHandler::rejecting(AuthKind::ControllerToken, AuthError::TokenMismatch))
            .with_handler(FixedHandler::skipping(AuthKind::Anonymous))
            .build();

        assert_eq!(
            resolver.resolve(&token()).await,
            AuthDecision::Denied(DenyReason::Rejected {
                kind: AuthKind::ControllerToken,
                reason: AuthError::TokenMismatch.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_store_failure_fails_closed() {
        let resolver = AuthenticationResolverBuilder::new()
            .with_handler(FixedHandler::rejecting(
                AuthKind::ControllerToken,
                AuthError::Store(StoreError::Backend("down".into())),
            ))
            .with_handler(FixedHandler::accepting(AuthKind::Anonymous))
            .build();

        let decision = resolver.resolve(&token()).await;
        assert!(matches!(decision, AuthDecision::Denied(DenyReason::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_blank_identity_denied_before_handlers() {
        let resolver = AuthenticationResolverBuilder::new()
            .with_handler(FixedHandler::accepting(AuthKind::Anonymous))
            .build();

        let blank = TenantSecurityToken::new("acme", "", None);
        assert_eq!(
            resolver.resolve(&blank).await,
            AuthDecision::Denied(DenyReason::MalformedToken)
        );
    }

    #[test]
    fn test_from_config_follows_order() {
        let store: Arc<dyn TenantStore> = Arc::new(firmgate_store::MemoryStore::new());
        let config = ResolverConfig {
            order: vec![AuthKind::Anonymous, AuthKind::Certificate],
            ..ResolverConfig::default()
        };

        let resolver = AuthenticationResolver::from_config(&config, store).unwrap();
        assert_eq!(resolver.handler_kinds(), vec![AuthKind::Anonymous, AuthKind::Certificate]);
        assert!(!resolver.has_handler(AuthKind::ControllerToken));
    }

    #[test]
    fn test_from_config_rejects_empty_order() {
        let store: Arc<dyn TenantStore> = Arc::new(firmgate_store::MemoryStore::new());
        let config = ResolverConfig {
            order: Vec::new(),
            ..ResolverConfig::default()
        };

        assert!(matches!(
            AuthenticationResolver::from_config(&config, store),
            Err(AuthError::Config(_))
        ));
    }
}
