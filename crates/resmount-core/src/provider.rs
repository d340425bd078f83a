//! Provider trait implemented by every storage backend.
//!
//! Paths handed to a provider are already stripped of the mount prefix,
//! so they are relative to the provider's own root. The [`SystemRef`]
//! argument lets a provider re-enter the owning [`ResourceSystem`]; the
//! router tracks how deep such re-entry has gone and refuses to go past
//! its bound.

use async_trait::async_trait;

use crate::error::ResourceResult;
use crate::path::VirtualPath;
use crate::payload::Payload;
use crate::query::Query;
use crate::resource::Resource;
use crate::system::ResourceSystem;

/// Storage backend contract.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short backend name (e.g. `"filesystem"`), used in mount listings and logs.
    fn kind(&self) -> &'static str;

    /// Locate a resource. `None` means not found.
    async fn get(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<Option<Resource>>;

    /// Enumerate a directory-like resource. `None` means not found.
    async fn list(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<Option<Vec<Resource>>>;

    /// Write a payload at `path`.
    async fn set(
        &self,
        path: &VirtualPath,
        data: Payload,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<()>;

    async fn exists(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<bool>;

    async fn remove(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<()>;

    /// Release any storage the provider owns. Must be idempotent.
    async fn close(&self) -> ResourceResult<()> {
        Ok(())
    }
}

/// Handle back into the routing system, passed to every provider call.
///
/// Each call made through it counts as one more delegation hop. The
/// underlying [`ResourceSystem`] is not reachable from here, so every
/// re-entry is counted against the bound.
#[derive(Clone, Copy)]
pub struct SystemRef<'a> {
    system: &'a ResourceSystem,
    depth: usize,
}

impl<'a> SystemRef<'a> {
    pub(crate) fn new(system: &'a ResourceSystem, depth: usize) -> Self {
        Self { system, depth }
    }

    /// Delegation hops taken to reach the current provider call.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub async fn get(&self, path: &VirtualPath, query: &Query) -> ResourceResult<Option<Resource>> {
        self.system.route_get(path, query, self.depth + 1).await
    }

    pub async fn list(
        &self,
        path: &VirtualPath,
        query: &Query,
    ) -> ResourceResult<Option<Vec<Resource>>> {
        self.system.route_list(path, query, self.depth + 1).await
    }

    pub async fn set(&self, path: &VirtualPath, data: Payload, query: &Query) -> ResourceResult<()> {
        self.system.route_set(path, data, query, self.depth + 1).await
    }

    pub async fn exists(&self, path: &VirtualPath, query: &Query) -> ResourceResult<bool> {
        self.system.route_exists(path, query, self.depth + 1).await
    }

    pub async fn remove(&self, path: &VirtualPath, query: &Query) -> ResourceResult<()> {
        self.system.route_remove(path, query, self.depth + 1).await
    }
}

impl std::fmt::Debug for SystemRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemRef")
            .field("depth", &self.depth)
            .finish()
    }
}
