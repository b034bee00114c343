//! Dotted access paths into the mock tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MockError, MockResult};

/// An ordered sequence of attribute names leading from the root of a
/// mock tree to one node, written `"current.buffer.name"`.
///
/// The synthetic segment `"()"` addresses the result slot of an
/// unconfigured invocation, so chains that pass through a call remain
/// addressable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MockPath {
    segments: Vec<String>,
}

impl MockPath {
    /// Parse a dotted path. Every segment must be non-empty.
    pub fn parse(path: &str) -> MockResult<Self> {
        if path.is_empty() {
            return Err(MockError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if let Some(pos) = segments.iter().position(String::is_empty) {
            return Err(MockError::InvalidPath {
                path: path.to_string(),
                reason: format!("segment {} is empty", pos + 1),
            });
        }
        Ok(Self { segments })
    }

    /// Build a path from pre-split segments.
    pub fn from_segments(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The segments in root-to-leaf order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments. Parsed paths never are.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// A new path with one more segment appended.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }
}

impl fmt::Display for MockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for MockPath {
    type Err = MockError;

    fn from_str(s: &str) -> MockResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_dotted_path() {
        let path = MockPath::parse("current.buffer.name").unwrap();
        assert_eq!(path.segments(), ["current", "buffer", "name"]);
        assert_eq!(path.to_string(), "current.buffer.name");
    }

    #[test]
    fn test_parse_single_segment() {
        let path = MockPath::parse("command").unwrap();
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_call_result_segment_is_ordinary() {
        let path = MockPath::parse("eval.()").unwrap();
        assert_eq!(path.segments(), ["eval", "()"]);
    }

    #[test]
    fn test_rejects_empty_path() {
        assert!(MockPath::parse("").is_err());
    }

    #[test]
    fn test_rejects_empty_segment() {
        assert!(MockPath::parse("current..name").is_err());
        assert!(MockPath::parse(".current").is_err());
        assert!(MockPath::parse("current.").is_err());
    }

    #[test]
    fn test_child_appends() {
        let path = MockPath::parse("current").unwrap().child("buffer");
        assert_eq!(path.to_string(), "current.buffer");
    }
}
