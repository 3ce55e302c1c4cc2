//! In-memory storage backend
//!
//! Default storage implementation using in-memory maps.
//! Suitable for development and single-instance deployments.
//! Data is lost on restart.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use tracing::info;

use crate::artifact::{Artifact, ArtifactStore};
use crate::tenant::{TenantAuthConfig, TenantStore};
use crate::{Result, StoreError};

/// In-memory artifact and tenant store
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: RwLock<BTreeMap<u64, Artifact>>,
    tenants: RwLock<HashMap<String, TenantAuthConfig>>,
    controller_tokens: RwLock<HashMap<(String, String), String>>,
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("store lock poisoned".into())
}

impl MemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Artifacts
    // =========================================================================

    /// Add an artifact; ids are unique across tenants
    pub fn add_artifact(&self, artifact: Artifact) -> Result<()> {
        let mut artifacts = self.artifacts.write().map_err(poisoned)?;
        if artifacts.contains_key(&artifact.id) {
            return Err(StoreError::AlreadyExists(artifact.id));
        }
        info!(
            id = artifact.id,
            tenant = %artifact.tenant,
            filename = %artifact.filename,
            "Adding artifact"
        );
        artifacts.insert(artifact.id, artifact);
        Ok(())
    }

    /// Remove an artifact
    pub fn remove_artifact(&self, id: u64) -> Result<bool> {
        let mut artifacts = self.artifacts.write().map_err(poisoned)?;
        let removed = artifacts.remove(&id).is_some();
        if removed {
            info!(id, "Removed artifact");
        }
        Ok(removed)
    }

    // =========================================================================
    // Tenants and controllers
    // =========================================================================

    /// Create or replace the authentication settings of a tenant
    pub fn set_tenant_config(&self, tenant: impl Into<String>, config: TenantAuthConfig) -> Result<()> {
        let tenant = tenant.into();
        let mut tenants = self.tenants.write().map_err(poisoned)?;
        info!(
            tenant = %tenant,
            gateway_token = config.gateway_token_enabled,
            certificate = config.certificate_auth_enabled,
            anonymous_download = config.anonymous_download_enabled,
            "Setting tenant authentication config"
        );
        tenants.insert(tenant, config);
        Ok(())
    }

    /// Set the security token of a controller
    pub fn set_controller_token(
        &self,
        tenant: impl Into<String>,
        controller_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<()> {
        let key = (tenant.into(), controller_id.into());
        let mut tokens = self.controller_tokens.write().map_err(poisoned)?;
        info!(tenant = %key.0, controller_id = %key.1, "Setting controller security token");
        tokens.insert(key, token.into());
        Ok(())
    }

    /// Remove the security token of a controller
    pub fn revoke_controller_token(&self, tenant: &str, controller_id: &str) -> Result<bool> {
        let mut tokens = self.controller_tokens.write().map_err(poisoned)?;
        let removed = tokens
            .remove(&(tenant.to_string(), controller_id.to_string()))
            .is_some();
        if removed {
            info!(tenant = %tenant, controller_id = %controller_id, "Revoked controller security token");
        }
        Ok(removed)
    }

    fn find_all<F>(&self, tenant: &str, predicate: F) -> Result<Vec<Artifact>>
    where
        F: Fn(&Artifact) -> bool,
    {
        let artifacts = self.artifacts.read().map_err(poisoned)?;
        Ok(artifacts
            .values()
            .filter(|a| a.tenant == tenant && predicate(*a))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn find_by_sha1(&self, tenant: &str, sha1: &str) -> Result<Option<Artifact>> {
        // Identical content may be uploaded more than once; any copy will do.
        let matches = self.find_all(tenant, |a| a.sha1.eq_ignore_ascii_case(sha1))?;
        Ok(matches.into_iter().next())
    }

    async fn find_by_filename(&self, tenant: &str, filename: &str) -> Result<Option<Artifact>> {
        let mut matches = self.find_all(tenant, |a| a.filename == filename)?;
        if matches.len() > 1 {
            return Err(StoreError::Ambiguous(format!(
                "{} artifacts named {}",
                matches.len(),
                filename
            )));
        }
        Ok(matches.pop())
    }

    async fn find_by_id(&self, tenant: &str, id: u64) -> Result<Option<Artifact>> {
        let artifacts = self.artifacts.read().map_err(poisoned)?;
        Ok(artifacts.get(&id).filter(|a| a.tenant == tenant).cloned())
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn tenant_auth_config(&self, tenant: &str) -> Result<Option<TenantAuthConfig>> {
        let tenants = self.tenants.read().map_err(poisoned)?;
        Ok(tenants.get(tenant).cloned())
    }

    async fn controller_token(&self, tenant: &str, controller_id: &str) -> Result<Option<String>> {
        let tokens = self.controller_tokens.read().map_err(poisoned)?;
        Ok(tokens
            .get(&(tenant.to_string(), controller_id.to_string()))
            .cloned())
    }
}
