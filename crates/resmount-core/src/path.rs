//! Normalized virtual paths.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ResourceError, ResourceResult};

/// A normalized, root-relative POSIX-style path.
///
/// `.` and empty segments are dropped and `..` is resolved against the
/// preceding segment during parsing. A `..` with nothing left to pop is an
/// error, so a `VirtualPath` never refers to anything above the root it
/// is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    /// The root path (`/`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and normalize a path string. A leading `/` is optional.
    pub fn parse(path: &str) -> ResourceResult<Self> {
        let mut segments: Vec<String> = Vec::new();

        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    if segments.pop().is_none() {
                        return Err(ResourceError::invalid_path(format!(
                            "{path} escapes the root"
                        )));
                    }
                }
                s if s.contains('\0') || s.contains('\\') => {
                    return Err(ResourceError::invalid_path(format!(
                        "{path}: illegal character in segment"
                    )));
                }
                s => segments.push(s.to_string()),
            }
        }

        Ok(Self { segments })
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Append a path below this one.
    ///
    /// `other` is already normalized, so the result stays under `self`.
    pub fn join(&self, other: &VirtualPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// True if `prefix` is a whole-segment prefix of this path.
    ///
    /// `/data` is a prefix of `/data/x` but not of `/database`.
    pub fn starts_with(&self, prefix: &VirtualPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments.iter().zip(&prefix.segments).all(|(a, b)| a == b)
    }

    /// Remove a whole-segment prefix, returning the remainder.
    pub fn strip_prefix(&self, prefix: &VirtualPath) -> Option<Self> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self {
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// Last segment.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Relative filesystem form, with no leading separator.
    ///
    /// Joining this onto a root directory never replaces the root, unlike
    /// joining an absolute path would.
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("/")
        } else {
            for segment in &self.segments {
                write!(f, "/{segment}")?;
            }
            Ok(())
        }
    }
}

impl FromStr for VirtualPath {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
