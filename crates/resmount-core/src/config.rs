//! RON mount-table configuration.
//!
//! ```ron
//! (
//!     max_delegation_depth: Some(8),
//!     mounts: [
//!         (prefix: "/data", provider: Filesystem(root: "~/srv/data")),
//!         (prefix: "/scratch", provider: Temp(prefix: Some("rm-"), suffix: None)),
//!         (prefix: "/docs", provider: Url(prefix: "/data/docs")),
//!     ],
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_MAX_DELEGATION_DEPTH};
use crate::error::{ResourceError, ResourceResult};
use crate::provider::Provider;
use crate::providers::{FilesystemProvider, TempProvider, UrlProvider};
use crate::system::ResourceSystem;

/// Embedded default mount table: the working directory at `/` and a
/// scratch store at `/scratch`.
pub const DEFAULT_MOUNTS: &str = include_str!("../../../assets/defaults/mounts.ron");

/// Top-level configuration for a [`ResourceSystem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Delegation hop bound (defaults to [`DEFAULT_MAX_DELEGATION_DEPTH`]).
    #[serde(default)]
    pub max_delegation_depth: Option<usize>,

    /// Mounts, registered in order.
    #[serde(default)]
    pub mounts: Vec<MountSpec>,
}

/// One mount entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    pub prefix: String,
    pub provider: ProviderSpec,
}

/// Which backend to mount, and how to build it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderSpec {
    /// Real directory tree. `~` and `$VAR` in the root are expanded.
    Filesystem { root: String },
    /// Ephemeral store with optional name affixes.
    Temp {
        #[serde(default)]
        prefix: Option<String>,
        #[serde(default)]
        suffix: Option<String>,
    },
    /// Alias into another region of the same system.
    Url { prefix: String },
}

impl ProviderSpec {
    /// Construct the provider this entry describes.
    pub fn build(&self) -> ResourceResult<Arc<dyn Provider>> {
        let provider: Arc<dyn Provider> = match self {
            ProviderSpec::Filesystem { root } => {
                let expanded = shellexpand::full(root)
                    .map_err(|e| ResourceError::config(format!("root {root}: {e}")))?;
                Arc::new(FilesystemProvider::new(PathBuf::from(expanded.into_owned())))
            }
            ProviderSpec::Temp { prefix, suffix } => Arc::new(TempProvider::with_affixes(
                prefix.as_deref(),
                suffix.as_deref(),
            )?),
            ProviderSpec::Url { prefix } => Arc::new(UrlProvider::parse(prefix)?),
        };
        Ok(provider)
    }
}

impl SystemConfig {
    /// Parse a RON document.
    pub fn from_ron(text: &str) -> ResourceResult<Self> {
        ron::from_str(text).map_err(|e| ResourceError::config(format!("RON syntax error: {e}")))
    }

    /// Read and parse a RON file.
    pub fn load(path: impl AsRef<Path>) -> ResourceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ResourceError::config(format!("{}: {e}", path.display())))?;
        Self::from_ron(&text)
    }

    /// Config file to use when none is given explicitly: `$RESMOUNT_CONFIG`,
    /// else `mounts.ron` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load the config named explicitly, else the default path if it
    /// exists, else the embedded [`DEFAULT_MOUNTS`].
    pub fn discover(explicit: Option<&Path>) -> ResourceResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no mount table found, using defaults");
            Self::from_ron(DEFAULT_MOUNTS)
        }
    }

    /// Build a resource system with every configured mount registered.
    ///
    /// Providers already built are closed if a later mount fails.
    pub async fn build(&self) -> ResourceResult<ResourceSystem> {
        let system = ResourceSystem::with_max_depth(
            self.max_delegation_depth.unwrap_or(DEFAULT_MAX_DELEGATION_DEPTH),
        );

        for spec in &self.mounts {
            let mounted = match spec.provider.build() {
                Ok(provider) => system.mount_arc(&spec.prefix, provider).await,
                Err(e) => Err(e),
            };
            if let Err(e) = mounted {
                if let Err(close_err) = system.shutdown().await {
                    tracing::warn!(error = %close_err, "cleanup after failed mount");
                }
                return Err(e);
            }
        }

        Ok(system)
    }
}
