//! # resmount-core
//!
//! Path-addressed resource routing over pluggable storage providers.
//!
//! A [`ResourceSystem`] owns a table of mount prefixes, each backed by a
//! [`Provider`]. Every operation (`get`, `list`, `set`, `exists`, `remove`)
//! is routed to the provider at the longest matching prefix, with the
//! prefix stripped from the path.
//!
//! Built-in providers:
//!
//! - [`FilesystemProvider`] - a real directory tree (with path security)
//! - [`TempProvider`] - a private ephemeral directory, disposed with `close`
//! - [`UrlProvider`] - an alias that re-dispatches into the same system
//!
//! ## Design Decisions
//!
//! - **Longest-prefix routing** on whole path segments: `/data` never
//!   captures `/database`.
//! - **Reject duplicate mounts**: mounting an occupied prefix is a
//!   [`ResourceError::Conflict`], never a silent replacement.
//! - **Bounded delegation**: providers re-enter the system through
//!   [`SystemRef`], which counts hops; past the bound routing fails with
//!   [`ResourceError::Cycle`].

pub mod config;
pub mod constants;
mod error;
mod path;
mod payload;
mod provider;
pub mod providers;
mod query;
mod resource;
mod system;

pub use config::{MountSpec, ProviderSpec, SystemConfig};
pub use error::{ResourceError, ResourceResult};
pub use path::VirtualPath;
pub use payload::Payload;
pub use provider::{Provider, SystemRef};
pub use providers::{FilesystemProvider, TempProvider, UrlProvider};
pub use query::{Query, split_target};
pub use resource::{LocalResource, Resource};
pub use system::{MountInfo, ResourceSystem};
