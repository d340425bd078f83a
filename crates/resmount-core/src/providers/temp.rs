//! Ephemeral temporary-directory provider.
//!
//! The store directory lives exactly as long as the provider. Contents are
//! written through streams opened against resources from `get`, not
//! through `set`.

use async_trait::async_trait;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::fs;
use tokio::sync::RwLock;

use super::filesystem::ensure_contained;
use crate::constants::DEFAULT_TEMP_PREFIX;
use crate::error::{ResourceError, ResourceResult};
use crate::path::VirtualPath;
use crate::payload::Payload;
use crate::provider::{Provider, SystemRef};
use crate::query::Query;
use crate::resource::{LocalResource, Resource};

/// Provider backed by a private temporary directory.
///
/// Operations hold the read side of the store lock while they run and
/// [`close`](Provider::close) takes the write side, so the directory is
/// never deleted out from under an in-flight call. After `close` every
/// operation fails with [`ResourceError::InvalidState`].
#[derive(Debug)]
pub struct TempProvider {
    store: RwLock<Option<TempDir>>,
}

impl TempProvider {
    /// Create a provider with a freshly made store directory.
    pub fn new() -> ResourceResult<Self> {
        Self::with_affixes(None, None)
    }

    /// Create a provider whose store directory name uses the given
    /// prefix and suffix.
    pub fn with_affixes(prefix: Option<&str>, suffix: Option<&str>) -> ResourceResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix.unwrap_or(DEFAULT_TEMP_PREFIX))
            .suffix(suffix.unwrap_or(""))
            .tempdir()?;
        tracing::debug!(store = %dir.path().display(), "created ephemeral store");
        Ok(Self {
            store: RwLock::new(Some(dir)),
        })
    }

    /// Location of the live store, `None` once closed.
    pub async fn store_path(&self) -> Option<PathBuf> {
        self.store.read().await.as_ref().map(|dir| dir.path().to_path_buf())
    }

    pub async fn is_closed(&self) -> bool {
        self.store.read().await.is_none()
    }
}

fn store_of<'a>(store: &'a Option<TempDir>) -> ResourceResult<&'a TempDir> {
    store
        .as_ref()
        .ok_or_else(|| ResourceError::invalid_state("temp provider is closed"))
}

/// Real location of `path` inside the store, refusing links that lead out.
fn resolve(dir: &TempDir, path: &VirtualPath) -> ResourceResult<PathBuf> {
    let full = dir.path().join(path.to_relative_path());
    if !path.is_root() {
        ensure_contained(dir.path(), &full, path)?;
    }
    Ok(full)
}

#[async_trait]
impl Provider for TempProvider {
    fn kind(&self) -> &'static str {
        "temp"
    }

    async fn get(
        &self,
        path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<Option<Resource>> {
        let guard = self.store.read().await;
        let dir = store_of(&guard)?;
        Ok(Some(LocalResource::new(resolve(dir, path)?).into()))
    }

    async fn list(
        &self,
        _path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<Option<Vec<Resource>>> {
        let guard = self.store.read().await;
        store_of(&guard)?;
        // Ephemeral contents are not enumerated.
        Ok(Some(Vec::new()))
    }

    async fn set(
        &self,
        path: &VirtualPath,
        data: Payload,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<()> {
        let guard = self.store.read().await;
        store_of(&guard)?;
        Err(ResourceError::unsupported(format!(
            "set {} ({}) on temp store: write through the path from get",
            path,
            data.kind()
        )))
    }

    async fn exists(
        &self,
        path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<bool> {
        let guard = self.store.read().await;
        let dir = store_of(&guard)?;
        Ok(fs::try_exists(resolve(dir, path)?).await?)
    }

    async fn remove(
        &self,
        path: &VirtualPath,
        _query: &Query,
        _system: SystemRef<'_>,
    ) -> ResourceResult<()> {
        let guard = self.store.read().await;
        let dir = store_of(&guard)?;
        fs::remove_file(resolve(dir, path)?).await?;
        Ok(())
    }

    async fn close(&self) -> ResourceResult<()> {
        let mut guard = self.store.write().await;
        if let Some(dir) = guard.take() {
            let path = dir.path().to_path_buf();
            dir.close()?;
            tracing::info!(store = %path.display(), "closed ephemeral store");
        }
        Ok(())
    }
}
