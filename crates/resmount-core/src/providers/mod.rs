//! Storage providers.
//!
//! Providers implement [`Provider`](crate::Provider) for different storage types.

mod filesystem;
mod temp;
mod url;

pub use filesystem::FilesystemProvider;
pub use temp::TempProvider;
pub use url::UrlProvider;
