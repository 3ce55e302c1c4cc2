//! Storage contracts for download authentication
//!
//! This crate provides trait-based abstractions for the two lookups the
//! authentication step needs:
//!
//! - [`ArtifactStore`]: resolve a [`FileResource`](firmgate_core::FileResource)
//!   to exactly one stored artifact
//! - [`TenantStore`]: per-tenant authentication settings and per-controller
//!   security tokens
//!
//! [`MemoryStore`] implements both and is the default backend for
//! development, tests and single-instance deployments.

pub mod artifact;
pub mod memory;
pub mod tenant;

pub use artifact::{Artifact, ArtifactStore};
pub use memory::MemoryStore;
pub use tenant::{TenantAuthConfig, TenantStore};

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Artifact lookup is ambiguous: {0}")]
    Ambiguous(String),

    #[error("Artifact already exists: {0}")]
    AlreadyExists(u64),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
