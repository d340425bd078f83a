//! Resource system with longest-prefix routing.
//!
//! Routes resource operations to the provider mounted at the most specific
//! prefix of the requested path.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::constants::DEFAULT_MAX_DELEGATION_DEPTH;
use crate::error::{ResourceError, ResourceResult};
use crate::path::VirtualPath;
use crate::payload::Payload;
use crate::provider::{Provider, SystemRef};
use crate::query::Query;
use crate::resource::Resource;

/// Information about a mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfo {
    /// The mount prefix (e.g., "/data").
    pub prefix: VirtualPath,
    /// Backend kind reported by the provider.
    pub kind: &'static str,
}

struct MountEntry {
    prefix: VirtualPath,
    provider: Arc<dyn Provider>,
}

/// A provider selected for a path, with the path relative to its mount.
struct Route {
    prefix: VirtualPath,
    provider: Arc<dyn Provider>,
    relative: VirtualPath,
}

/// Routes resource operations to mounted providers.
///
/// Mounts are matched by longest whole-segment prefix. If `/mnt` and
/// `/mnt/project` are both mounted, `/mnt/project/src/main.rs` goes to the
/// `/mnt/project` provider as `src/main.rs`.
///
/// The registry lock is only held while picking a route, never across a
/// provider call, so providers may call back into the system and mounts may
/// change while operations are in flight.
pub struct ResourceSystem {
    /// Mount entries in registration order.
    mounts: RwLock<Vec<MountEntry>>,
    max_depth: usize,
}

impl std::fmt::Debug for ResourceSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSystem")
            .field("mounts", &"<locked>")
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Default for ResourceSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSystem {
    /// Create an empty resource system.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DELEGATION_DEPTH)
    }

    /// Create an empty resource system allowing at most `max_depth`
    /// delegation hops per operation.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            mounts: RwLock::new(Vec::new()),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Mount a provider at the given prefix.
    ///
    /// Fails with [`ResourceError::Conflict`] if the prefix is already taken.
    pub async fn mount(&self, prefix: &str, provider: impl Provider + 'static) -> ResourceResult<()> {
        self.mount_arc(prefix, Arc::new(provider)).await
    }

    /// Mount a provider (already wrapped in Arc) at the given prefix.
    pub async fn mount_arc(&self, prefix: &str, provider: Arc<dyn Provider>) -> ResourceResult<()> {
        let prefix = VirtualPath::parse(prefix)?;
        let mut mounts = self.mounts.write().await;

        if mounts.iter().any(|entry| entry.prefix == prefix) {
            return Err(ResourceError::conflict(prefix.to_string()));
        }

        tracing::info!(prefix = %prefix, kind = provider.kind(), "mounted provider");
        mounts.push(MountEntry { prefix, provider });
        Ok(())
    }

    /// Unmount the provider at the given prefix and hand it back.
    ///
    /// The provider is not closed; the caller decides when to dispose of it.
    /// Fails with [`ResourceError::NotFound`] if nothing is mounted there.
    pub async fn unmount(&self, prefix: &str) -> ResourceResult<Arc<dyn Provider>> {
        let prefix = VirtualPath::parse(prefix)?;
        let mut mounts = self.mounts.write().await;

        let index = mounts
            .iter()
            .position(|entry| entry.prefix == prefix)
            .ok_or_else(|| ResourceError::not_found(prefix.to_string()))?;

        let entry = mounts.remove(index);
        tracing::info!(prefix = %entry.prefix, kind = entry.provider.kind(), "unmounted provider");
        Ok(entry.provider)
    }

    /// List all current mounts in registration order.
    pub async fn mounts(&self) -> Vec<MountInfo> {
        let mounts = self.mounts.read().await;
        mounts
            .iter()
            .map(|entry| MountInfo {
                prefix: entry.prefix.clone(),
                kind: entry.provider.kind(),
            })
            .collect()
    }

    /// Unmount everything and close each provider.
    ///
    /// Every provider is closed even if an earlier one fails; the first
    /// failure is returned.
    pub async fn shutdown(&self) -> ResourceResult<()> {
        let entries: Vec<MountEntry> = {
            let mut mounts = self.mounts.write().await;
            mounts.drain(..).collect()
        };

        let mut first_err = None;
        for entry in entries {
            if let Err(e) = entry.provider.close().await {
                tracing::warn!(prefix = %entry.prefix, error = %e, "failed to close provider");
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Locate the resource at `path`. `None` if no mount covers it.
    pub async fn get(&self, path: &str, query: &Query) -> ResourceResult<Option<Resource>> {
        let path = VirtualPath::parse(path)?;
        self.route_get(&path, query, 0).await
    }

    /// List the resources under `path`. `None` if no mount covers it.
    pub async fn list(&self, path: &str, query: &Query) -> ResourceResult<Option<Vec<Resource>>> {
        let path = VirtualPath::parse(path)?;
        self.route_list(&path, query, 0).await
    }

    /// Write `data` at `path`.
    pub async fn set(
        &self,
        path: &str,
        data: impl Into<Payload>,
        query: &Query,
    ) -> ResourceResult<()> {
        let path = VirtualPath::parse(path)?;
        self.route_set(&path, data.into(), query, 0).await
    }

    /// Check whether `path` exists. An unmounted path simply doesn't.
    pub async fn exists(&self, path: &str, query: &Query) -> ResourceResult<bool> {
        let path = VirtualPath::parse(path)?;
        self.route_exists(&path, query, 0).await
    }

    /// Remove the resource at `path`.
    pub async fn remove(&self, path: &str, query: &Query) -> ResourceResult<()> {
        let path = VirtualPath::parse(path)?;
        self.route_remove(&path, query, 0).await
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Find the mount for a path.
    ///
    /// Returns `Ok(None)` when nothing is mounted over it, and a
    /// [`ResourceError::Cycle`] once `depth` passes the bound.
    async fn resolve(&self, path: &VirtualPath, depth: usize) -> ResourceResult<Option<Route>> {
        if depth > self.max_depth {
            return Err(ResourceError::Cycle {
                path: path.to_string(),
                depth,
            });
        }

        let mounts = self.mounts.read().await;

        // Strictly longer wins, so among equal lengths the first registered stays.
        let mut best: Option<&MountEntry> = None;
        for entry in mounts.iter() {
            if path.starts_with(&entry.prefix)
                && best.is_none_or(|b| entry.prefix.depth() > b.prefix.depth())
            {
                best = Some(entry);
            }
        }

        Ok(best.and_then(|entry| {
            let relative = path.strip_prefix(&entry.prefix)?;
            tracing::debug!(
                path = %path,
                prefix = %entry.prefix,
                relative = %relative,
                depth,
                "routed"
            );
            Some(Route {
                prefix: entry.prefix.clone(),
                provider: Arc::clone(&entry.provider),
                relative,
            })
        }))
    }

    pub(crate) async fn route_get(
        &self,
        path: &VirtualPath,
        query: &Query,
        depth: usize,
    ) -> ResourceResult<Option<Resource>> {
        match self.resolve(path, depth).await? {
            Some(route) => {
                route
                    .provider
                    .get(&route.relative, query, SystemRef::new(self, depth))
                    .await
            }
            None => Ok(None),
        }
    }

    pub(crate) async fn route_list(
        &self,
        path: &VirtualPath,
        query: &Query,
        depth: usize,
    ) -> ResourceResult<Option<Vec<Resource>>> {
        match self.resolve(path, depth).await? {
            Some(route) => {
                route
                    .provider
                    .list(&route.relative, query, SystemRef::new(self, depth))
                    .await
            }
            None => Ok(None),
        }
    }

    pub(crate) async fn route_set(
        &self,
        path: &VirtualPath,
        data: Payload,
        query: &Query,
        depth: usize,
    ) -> ResourceResult<()> {
        let route = self
            .resolve(path, depth)
            .await?
            .ok_or_else(|| ResourceError::not_found(format!("no mount for {path}")))?;
        tracing::debug!(prefix = %route.prefix, kind = data.kind(), bytes = ?data.byte_len(), "set");
        route
            .provider
            .set(&route.relative, data, query, SystemRef::new(self, depth))
            .await
    }

    pub(crate) async fn route_exists(
        &self,
        path: &VirtualPath,
        query: &Query,
        depth: usize,
    ) -> ResourceResult<bool> {
        match self.resolve(path, depth).await? {
            Some(route) => {
                route
                    .provider
                    .exists(&route.relative, query, SystemRef::new(self, depth))
                    .await
            }
            None => Ok(false),
        }
    }

    pub(crate) async fn route_remove(
        &self,
        path: &VirtualPath,
        query: &Query,
        depth: usize,
    ) -> ResourceResult<()> {
        let route = self
            .resolve(path, depth)
            .await?
            .ok_or_else(|| ResourceError::not_found(format!("no mount for {path}")))?;
        tracing::debug!(prefix = %route.prefix, "remove");
        route
            .provider
            .remove(&route.relative, query, SystemRef::new(self, depth))
            .await
    }
}
