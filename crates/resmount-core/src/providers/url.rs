//! Delegating mount.
//!
//! Rewrites paths under a fixed prefix and routes them back through the
//! owning resource system, so one mount can alias another region of the
//! same tree.

use async_trait::async_trait;

use crate::error::ResourceResult;
use crate::path::VirtualPath;
use crate::payload::Payload;
use crate::provider::{Provider, SystemRef};
use crate::query::Query;
use crate::resource::Resource;

/// Alias provider with no storage of its own.
///
/// Mounted at `/a` with prefix `/alias`, a request for `/a/x.txt` is
/// re-dispatched as `/alias/x.txt` with the same query.
#[derive(Debug, Clone)]
pub struct UrlProvider {
    prefix: VirtualPath,
}

impl UrlProvider {
    pub fn new(prefix: VirtualPath) -> Self {
        Self { prefix }
    }

    /// Parse the prefix from text.
    pub fn parse(prefix: &str) -> ResourceResult<Self> {
        Ok(Self::new(VirtualPath::parse(prefix)?))
    }

    pub fn prefix(&self) -> &VirtualPath {
        &self.prefix
    }

    /// The rewritten path in the owning system.
    pub fn fullpath(&self, path: &VirtualPath) -> VirtualPath {
        self.prefix.join(path)
    }
}

#[async_trait]
impl Provider for UrlProvider {
    fn kind(&self) -> &'static str {
        "url"
    }

    async fn get(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<Option<Resource>> {
        system.get(&self.fullpath(path), query).await
    }

    async fn list(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<Option<Vec<Resource>>> {
        system.list(&self.fullpath(path), query).await
    }

    async fn set(
        &self,
        path: &VirtualPath,
        data: Payload,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<()> {
        system.set(&self.fullpath(path), data, query).await
    }

    async fn exists(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<bool> {
        system.exists(&self.fullpath(path), query).await
    }

    async fn remove(
        &self,
        path: &VirtualPath,
        query: &Query,
        system: SystemRef<'_>,
    ) -> ResourceResult<()> {
        system.remove(&self.fullpath(path), query).await
    }
}
