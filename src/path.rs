//! Dot-notation key paths
//!
//! A `KeyPath` is the user-supplied dedup key (`user.address.city`) split
//! into its literal object-key segments. It is parsed once at startup and
//! reused for every record in the stream.

use crate::resolve::{resolve, ResolveError};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Segment separator for dot-notation keys
pub const SEPARATOR: char = '.';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyPathError {
    #[error("key is required")]
    Empty,
}

/// A non-empty, ordered list of object keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Split a dot-notation key into segments.
    ///
    /// Empty segments (`a..b`) are kept as literal `""` keys.
    pub fn parse(key: &str) -> Result<Self, KeyPathError> {
        if key.is_empty() {
            return Err(KeyPathError::Empty);
        }

        let segments = key.split(SEPARATOR).map(str::to_string).collect();
        Ok(KeyPath { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve this path against a document, producing its canonical key
    pub fn resolve(&self, doc: &Map<String, Value>) -> Result<String, ResolveError> {
        resolve(&self.segments, doc)
    }
}

impl FromStr for KeyPath {
    type Err = KeyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPath::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment() {
        let path = KeyPath::parse("id").unwrap();
        assert_eq!(path.segments(), ["id"]);
        assert_eq!(path.len(), 1);
        assert!(!path.is_empty());
    }

    #[test]
    fn test_nested_segments() {
        let path: KeyPath = "user.address.city".parse().unwrap();
        assert_eq!(path.segments(), ["user", "address", "city"]);
        assert_eq!(path.to_string(), "user.address.city");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert_eq!(KeyPath::parse(""), Err(KeyPathError::Empty));
    }

    #[test]
    fn test_empty_segments_kept() {
        let path = KeyPath::parse("a..b").unwrap();
        assert_eq!(path.segments(), ["a", "", "b"]);
        assert_eq!(path.to_string(), "a..b");
    }
}
