//! Filesystem provider.
//!
//! Backs a mount with a real directory tree, with path security
//! to prevent escaping the root directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{ResourceError, ResourceResult};
use crate::path::VirtualPath;
use crate::payload::Payload;
use crate::provider::{Provider, SystemRef};
use crate::query::Query;
use crate::resource::{LocalResource, Resource};

/// Filesystem provider.
///
/// All paths are relative to `root`. If `root` is `/srv/data`, then
/// `get("reports/q1.csv")` resolves to `/srv/data/reports/q1.csv`.
///
/// `..` never reaches this far (see [`VirtualPath`]), and symlinks that
/// lead outside the root are rejected when resolved.
#[derive(Debug, Clone)]
pub struct FilesystemProvider {
    root: PathBuf,
}

impl FilesystemProvider {
    /// Create a provider rooted at the given directory.
    ///
    /// The root is canonicalized at construction time when it exists, so
    /// containment checks compare like with like (e.g. macOS `/tmp` →
    /// `/private/tmp`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        let root = dunce::canonicalize(&root).unwrap_or(root);
        Self { root }
    }

    /// Get the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a virtual path to a real path under the root.
    ///
    /// The nearest part of the target that exists on disk is canonicalized
    /// and must stay under the canonical root.
    pub fn fullpath(&self, path: &VirtualPath) -> ResourceResult<PathBuf> {
        let full = self.root.join(path.to_relative_path());
        if !path.is_root() {
            ensure_contained(&self.root, &full, path)?;
        }
        Ok(full)
    }
}

/// Check that `full`, a path under `root`, does not lead outside it.
///
/// Walks up to the nearest ancestor present on disk (a dangling link counts
/// as present) and canonicalizes it. Anything that resolves outside the
/// canonical root, or cannot be resolved at all, is an invalid path. If not
/// even the root exists the check passes and the I/O itself fails later.
pub(crate) fn ensure_contained(
    root: &Path,
    full: &Path,
    path: &VirtualPath,
) -> ResourceResult<()> {
    let Some(existing) = full
        .ancestors()
        .take_while(|p| p.starts_with(root))
        .find(|p| p.symlink_metadata().is_ok())
    else {
        return Ok(());
    };

    let real = match dunce::canonicalize(existing) {
        Ok(real) => real,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResourceError::invalid_path(format!(
                "{} passes through dangling link {}",
                path,
                existing.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let canonical_root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    if !real.starts_with(&canonical_root) {
        return Err(ResourceError::invalid_path(format!(
            "{} resolves to {}, outside {}",
            path,
            real.display(),
            canonical_root.display()
        )));
    }
    Ok(())
}

#[async_trait]
impl Provider for FilesystemProvider {
    fn kind(&self) -> &'static str {
        "filesystem"
    }

    async fn get(
        &self,
        path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<Option<Resource>> {
        let full_path = self.fullpath(path)?;
        Ok(Some(LocalResource::new(full_path).into()))
    }

    async fn list(
        &self,
        path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<Option<Vec<Resource>>> {
        let full_path = self.fullpath(path)?;
        let mut dir = fs::read_dir(&full_path).await?;

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            entries.push(entry.path());
        }
        entries.sort();

        Ok(Some(
            entries
                .into_iter()
                .map(|p| Resource::from(LocalResource::new(p)))
                .collect(),
        ))
    }

    async fn set(
        &self,
        path: &VirtualPath,
        data: Payload,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<()> {
        let full_path = self.fullpath(path)?;

        // Creates or truncates; a missing parent is left to fail.
        match data {
            Payload::Text(text) => fs::write(&full_path, text.as_bytes()).await?,
            Payload::Binary(bytes) => fs::write(&full_path, &bytes).await?,
            other => return Err(ResourceError::unsupported_type(other.kind())),
        }
        Ok(())
    }

    async fn exists(
        &self,
        path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<bool> {
        let full_path = self.fullpath(path)?;
        Ok(fs::try_exists(&full_path).await?)
    }

    async fn remove(
        &self,
        path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<()> {
        let full_path = self.fullpath(path)?;
        fs::remove_file(&full_path).await?;
        Ok(())
    }
}
