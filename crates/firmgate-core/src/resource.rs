//! Artifact descriptor naming the file a controller wants to download

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// The file a controller asks for, addressed by exactly one lookup strategy
///
/// The lookup can differ per request: by SHA-1 hash, by filename, or by the
/// numeric artifact id. Being an enum, a descriptor with no field or with
/// several fields cannot be built; the wire decoder rejects such input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FileResourceRepr", into = "FileResourceRepr")]
pub enum FileResource {
    /// Lookup by SHA-1 content hash
    Sha1(String),
    /// Lookup by filename
    Filename(String),
    /// Lookup by artifact id
    ArtifactId(u64),
}

/// Which lookup strategy a descriptor uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Sha1,
    Filename,
    ArtifactId,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Sha1 => write!(f, "sha1"),
            LookupKind::Filename => write!(f, "filename"),
            LookupKind::ArtifactId => write!(f, "artifactId"),
        }
    }
}

impl FileResource {
    /// Create a file resource for a SHA-1 lookup
    pub fn sha1(sha1: impl Into<String>) -> Self {
        FileResource::Sha1(sha1.into())
    }

    /// Create a file resource for a filename lookup
    pub fn filename(filename: impl Into<String>) -> Self {
        FileResource::Filename(filename.into())
    }

    /// Create a file resource for an artifact id lookup
    pub fn artifact_id(artifact_id: u64) -> Self {
        FileResource::ArtifactId(artifact_id)
    }

    /// SHA-1 hash, if this is a SHA-1 lookup
    pub fn sha1_hash(&self) -> Option<&str> {
        match self {
            FileResource::Sha1(sha1) => Some(sha1),
            _ => None,
        }
    }

    /// Filename, if this is a filename lookup
    pub fn file_name(&self) -> Option<&str> {
        match self {
            FileResource::Filename(filename) => Some(filename),
            _ => None,
        }
    }

    /// Artifact id, if this is an artifact id lookup
    pub fn id(&self) -> Option<u64> {
        match self {
            FileResource::ArtifactId(id) => Some(*id),
            _ => None,
        }
    }

    /// The lookup strategy this descriptor uses
    pub fn lookup_kind(&self) -> LookupKind {
        match self {
            FileResource::Sha1(_) => LookupKind::Sha1,
            FileResource::Filename(_) => LookupKind::Filename,
            FileResource::ArtifactId(_) => LookupKind::ArtifactId,
        }
    }
}

impl fmt::Display for FileResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileResource::Sha1(sha1) => write!(f, "sha1={}", sha1),
            FileResource::Filename(filename) => write!(f, "filename={}", filename),
            FileResource::ArtifactId(id) => write!(f, "artifactId={}", id),
        }
    }
}

/// Wire shape: three optional members, exactly one of which must be present
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResourceRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha1: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact_id: Option<u64>,
}

impl TryFrom<FileResourceRepr> for FileResource {
    type Error = CoreError;

    fn try_from(repr: FileResourceRepr) -> Result<Self, Self::Error> {
        match (repr.sha1, repr.filename, repr.artifact_id) {
            (Some(sha1), None, None) => Ok(FileResource::Sha1(sha1)),
            (None, Some(filename), None) => Ok(FileResource::Filename(filename)),
            (None, None, Some(id)) => Ok(FileResource::ArtifactId(id)),
            (None, None, None) => Err(CoreError::EmptyFileResource),
            (sha1, filename, id) => {
                let populated =
                    usize::from(sha1.is_some()) + usize::from(filename.is_some()) + usize::from(id.is_some());
                Err(CoreError::AmbiguousFileResource(populated))
            }
        }
    }
}

impl From<FileResource> for FileResourceRepr {
    fn from(resource: FileResource) -> Self {
        match resource {
            FileResource::Sha1(sha1) => FileResourceRepr {
                sha1: Some(sha1),
                ..Default::default()
            },
            FileResource::Filename(filename) => FileResourceRepr {
                filename: Some(filename),
                ..Default::default()
            },
            FileResource::ArtifactId(id) => FileResourceRepr {
                artifact_id: Some(id),
                ..Default::default()
            },
        }
    }
}
