//! Stored artifacts and the lookup contract

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use firmgate_core::FileResource;

use crate::{Result, StoreError};

/// A downloadable artifact as recorded by the management server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Artifact id, unique across tenants
    pub id: u64,
    /// Owning tenant
    pub tenant: String,
    /// SHA-1 of the content, lower-case hex
    pub sha1: String,
    pub filename: String,
    /// Content length in bytes
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Create a new artifact record stamped with the current time
    pub fn new(
        id: u64,
        tenant: impl Into<String>,
        sha1: impl Into<String>,
        filename: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id,
            tenant: tenant.into(),
            sha1: sha1.into(),
            filename: filename.into(),
            size,
            created_at: Utc::now(),
        }
    }
}

/// Artifact lookup backend
///
/// All lookups are tenant scoped: an artifact of another tenant is reported
/// as absent, never returned. Implementations must be thread-safe.
#[async_trait]
pub trait ArtifactStore: Send + Sync + Debug {
    /// Find an artifact by SHA-1 hash (compared ignoring hex case)
    async fn find_by_sha1(&self, tenant: &str, sha1: &str) -> Result<Option<Artifact>>;

    /// Find an artifact by filename
    ///
    /// Fails with [`StoreError::Ambiguous`] if more than one artifact of the
    /// tenant carries the name.
    async fn find_by_filename(&self, tenant: &str, filename: &str) -> Result<Option<Artifact>>;

    /// Find an artifact by id
    async fn find_by_id(&self, tenant: &str, id: u64) -> Result<Option<Artifact>>;

    /// Resolve a file resource to exactly one artifact
    ///
    /// Dispatches on the single lookup field the resource carries.
    ///
    /// # Returns
    /// * `Ok(Artifact)` - The matching artifact
    /// * `Err(StoreError::NotFound)` - If nothing matches
    async fn resolve(&self, tenant: &str, resource: &FileResource) -> Result<Artifact> {
        let found = match resource {
            FileResource::Sha1(sha1) => self.find_by_sha1(tenant, sha1).await?,
            FileResource::Filename(filename) => self.find_by_filename(tenant, filename).await?,
            FileResource::ArtifactId(id) => self.find_by_id(tenant, *id).await?,
        };

        found.ok_or_else(|| StoreError::NotFound(resource.to_string()))
    }
}
