//! A module containing a way of representing the **location** of a value within a JSON
//! document.

use std::fmt::{Display, Formatter};

use serde_json::Value;

/// A document-independent way of referring to a location inside a JSON value.  A `Path` is a
/// sequence of segments, each of which is either an object key or (when the parent is an
/// array) a decimal index.  It is written and parsed as a JSON pointer (e.g. `/pools/0/rolls`).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Creates a path from a given [`Vec`] of segments
    #[inline]
    fn from_vec(segments: Vec<String>) -> Path {
        Path { segments }
    }

    /// Creates a path that refers to the root of any document.
    #[inline]
    pub fn root() -> Path {
        Self::from_vec(vec![])
    }

    /// Parses a JSON pointer.  The empty string and `/` both refer to the root; `~1` and `~0`
    /// are unescaped to `/` and `~`.
    pub fn parse(pointer: &str) -> Path {
        let trimmed = pointer.strip_prefix('/').unwrap_or(pointer);
        if trimmed.is_empty() {
            return Path::root();
        }
        Path::from_vec(
            trimmed
                .split('/')
                .map(|s| s.replace("~1", "/").replace("~0", "~"))
                .collect(),
        )
    }

    /// Returns `true` if this path refers to the root of any document
    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pushes a new segment onto the path, moving it one level down the document.
    #[inline]
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Removes and returns the last segment, or `None` if the path is the root.
    #[inline]
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Returns a copy of this path extended by one segment
    pub fn join(&self, segment: impl Into<String>) -> Path {
        let mut p = self.clone();
        p.push(segment);
        p
    }

    /// Splits off the last segment, returning the path of the parent and the segment.
    pub fn split_last(&self) -> Option<(Path, &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((Path::from_vec(parent.to_vec()), last.as_str()))
    }

    /// Walks this path down from the given root, returning the value it points at.
    pub fn resolve_mut<'v>(&self, root: &'v mut Value) -> Option<&'v mut Value> {
        let mut node = root;
        for segment in &self.segments {
            node = match node {
                Value::Object(map) => map.get_mut(segment.as_str())?,
                Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for s in &self.segments {
            write!(f, "/{}", s.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}
