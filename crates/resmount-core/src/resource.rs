//! Located resources returned by providers.

use std::fmt;
use std::path::{Path, PathBuf};

/// A resource located by a provider's `get`.
///
/// Carries no open handle. Callers that need the contents open a stream
/// against [`Resource::local_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Backed by a real filesystem path.
    Local(LocalResource),
}

impl Resource {
    /// Canonical path-like text for this resource.
    pub fn path_string(&self) -> String {
        match self {
            Resource::Local(local) => local.path.to_string_lossy().into_owned(),
        }
    }

    /// Real filesystem location, if the resource has one.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Resource::Local(local) => Some(local.path()),
        }
    }

    pub fn as_local(&self) -> Option<&LocalResource> {
        match self {
            Resource::Local(local) => Some(local),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Local(local) => write!(f, "{}", local.path.display()),
        }
    }
}

impl AsRef<Path> for Resource {
    fn as_ref(&self) -> &Path {
        match self {
            Resource::Local(local) => local.path(),
        }
    }
}

impl From<LocalResource> for Resource {
    fn from(local: LocalResource) -> Self {
        Resource::Local(local)
    }
}

/// A resource that owns a resolved real filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalResource {
    path: PathBuf,
}

impl LocalResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for LocalResource {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
