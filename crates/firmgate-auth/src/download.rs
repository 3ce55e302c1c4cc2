//! Download authorization: authentication followed by artifact lookup

use std::sync::Arc;
use tracing::{info, warn};

use firmgate_core::{FileResource, TenantSecurityToken};
use firmgate_store::{Artifact, ArtifactStore, StoreError};

use crate::resolver::AuthenticationResolver;
use crate::types::{AuthDecision, AuthenticatedController, DenyReason};

/// Result of a download request
///
/// Authentication failure and a missing artifact are separate outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Authenticated and the artifact exists
    Granted {
        controller: AuthenticatedController,
        artifact: Artifact,
    },
    /// Authentication failed
    Denied(DenyReason),
    /// Authenticated, but no artifact matches the requested file
    NotFound(FileResource),
    /// Authenticated, but the request named no file
    NoArtifactRequested(AuthenticatedController),
    /// Authenticated, but the lookup failed for another reason
    LookupFailed(StoreError),
}

impl DownloadOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, DownloadOutcome::Granted { .. })
    }
}

/// Authenticates download requests and resolves the requested artifact
pub struct DownloadAuthorizer {
    resolver: AuthenticationResolver,
    artifacts: Arc<dyn ArtifactStore>,
}

impl DownloadAuthorizer {
    pub fn new(resolver: AuthenticationResolver, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { resolver, artifacts }
    }

    /// The resolver used for authentication
    pub fn resolver(&self) -> &AuthenticationResolver {
        &self.resolver
    }

    /// Authenticate the request, then resolve its file resource
    pub async fn authorize(&self, token: &TenantSecurityToken) -> DownloadOutcome {
        let controller = match self.resolver.resolve(token).await {
            AuthDecision::Authorized(controller) => controller,
            AuthDecision::Denied(reason) => return DownloadOutcome::Denied(reason),
        };

        let Some(resource) = controller.file_resource.clone() else {
            return DownloadOutcome::NoArtifactRequested(controller);
        };

        match self.artifacts.resolve(&controller.tenant, &resource).await {
            Ok(artifact) => {
                info!(
                    tenant = %controller.tenant,
                    controller_id = %controller.controller_id,
                    artifact_id = artifact.id,
                    lookup = %resource.lookup_kind(),
                    kind = %controller.kind,
                    "Download granted"
                );
                DownloadOutcome::Granted { controller, artifact }
            }
            Err(StoreError::NotFound(_)) => {
                info!(
                    tenant = %controller.tenant,
                    controller_id = %controller.controller_id,
                    lookup = %resource.lookup_kind(),
                    resource = %resource,
                    "Requested artifact not found"
                );
                DownloadOutcome::NotFound(resource)
            }
            Err(e) => {
                warn!(
                    tenant = %controller.tenant,
                    lookup = %resource.lookup_kind(),
                    resource = %resource,
                    error = %e,
                    "Artifact lookup failed"
                );
                DownloadOutcome::LookupFailed(e)
            }
        }
    }
}
