//! Data handed to `set`.

/// A write payload. Backends pick their write mode from the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
    /// Structured data with no canonical byte form. No file-backed
    /// provider accepts it.
    Structured(serde_json::Value),
}

impl Payload {
    /// Short name of the payload kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Binary(_) => "binary",
            Payload::Structured(_) => "structured",
        }
    }

    pub fn byte_len(&self) -> Option<usize> {
        match self {
            Payload::Text(s) => Some(s.len()),
            Payload::Binary(b) => Some(b.len()),
            Payload::Structured(_) => None,
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self {
        Payload::Binary(b)
    }
}

impl From<&[u8]> for Payload {
    fn from(b: &[u8]) -> Self {
        Payload::Binary(b.to_vec())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(v: serde_json::Value) -> Self {
        Payload::Structured(v)
    }
}
