//! Anonymous Download Handler
//!
//! Lets any controller download artifacts of a tenant that has opted into
//! anonymous downloads. Only applies to requests that name a file.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use firmgate_core::TenantSecurityToken;
use firmgate_store::TenantStore;

use super::tenant_config;
use crate::error::Result;
use crate::resolver::AuthenticationHandler;
use crate::types::{AuthKind, AuthenticatedController, HandlerOutcome};

/// Tenant policy handler for credential-free downloads
pub struct AnonymousDownloadHandler {
    store: Arc<dyn TenantStore>,
}

impl AnonymousDownloadHandler {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthenticationHandler for AnonymousDownloadHandler {
    fn kind(&self) -> AuthKind {
        AuthKind::Anonymous
    }

    fn description(&self) -> &str {
        "anonymous download handler"
    }

    async fn authenticate(&self, token: &TenantSecurityToken) -> Result<HandlerOutcome> {
        let Some(resource) = token.file_resource() else {
            return Ok(HandlerOutcome::NotApplicable);
        };

        let config = tenant_config(self.store.as_ref(), token).await?;
        if !config.anonymous_download_enabled {
            return Ok(HandlerOutcome::NotApplicable);
        }

        debug!(tenant = %token.tenant(), resource = %resource, "Anonymous download allowed by tenant");

        Ok(HandlerOutcome::Authenticated(AuthenticatedController::from_token(
            token,
            self.kind(),
            None,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use firmgate_core::FileResource;
    use firmgate_store::{MemoryStore, TenantAuthConfig};

    fn store(anonymous: bool) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .set_tenant_config("acme", TenantAuthConfig::new().with_anonymous_download(anonymous))
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_enabled_with_resource() {
        let handler = AnonymousDownloadHandler::new(store(true));
        let token = TenantSecurityToken::new("acme", "dev-42", Some(FileResource::sha1("deadbeef")));

        let outcome = handler.authenticate(&token).await.unwrap();
        match outcome {
            HandlerOutcome::Authenticated(controller) => {
                assert_eq!(controller.kind, AuthKind::Anonymous);
                assert_eq!(controller.transport, None);
                assert_eq!(controller.file_resource, Some(FileResource::sha1("deadbeef")));
            }
            HandlerOutcome::NotApplicable => panic!("Expected anonymous authentication"),
        }
    }

    #[tokio::test]
    async fn test_requires_resource() {
        let handler = AnonymousDownloadHandler::new(store(true));
        let token = TenantSecurityToken::new("acme", "dev-42", None);
        assert_eq!(handler.authenticate(&token).await.unwrap(), HandlerOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_disabled_by_tenant() {
        let handler = AnonymousDownloadHandler::new(store(false));
        let token = TenantSecurityToken::new("acme", "dev-42", Some(FileResource::artifact_id(1)));
        assert_eq!(handler.authenticate(&token).await.unwrap(), HandlerOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_unknown_tenant() {
        let handler = AnonymousDownloadHandler::new(store(true));
        let token = TenantSecurityToken::new("globex", "dev-42", Some(FileResource::artifact_id(1)));
        assert_eq!(
            handler.authenticate(&token).await,
            Err(AuthError::UnknownTenant("globex".into()))
        );
    }
}
