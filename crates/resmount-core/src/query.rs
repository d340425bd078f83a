//! Query parameters carried alongside a path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque string-keyed parameters passed unchanged through every call.
///
/// Providers read the keys they understand and ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a=1&b=2`. A bare key maps to an empty value.
    pub fn parse(text: &str) -> Self {
        let params = text
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();
        Self(params)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Split `"/a/b?x=1"` into the path text and its query.
pub fn split_target(target: &str) -> (&str, Query) {
    match target.split_once('?') {
        Some((path, query)) => (path, Query::parse(query)),
        None => (target, Query::new()),
    }
}
