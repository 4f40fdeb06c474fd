//! Instance paths for locating values inside a validated document.
//!
//! This module provides [`InstancePath`] and [`PathSegment`]. A path is the
//! sequence of object keys and array indices walked from the document root to
//! the value that failed validation.

use std::fmt::{self, Display};

/// A single step in an [`InstancePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key (e.g. `server`, `name`)
    Key(String),
    /// An array index (e.g. `[0]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => write!(f, "{}", name),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// The location of a value relative to the document root.
///
/// Paths are immutable; `push_key` and `push_index` return extended copies so
/// sibling branches of a schema can share a common prefix.
///
/// # Example
///
/// ```rust
/// use schemagate::InstancePath;
///
/// let path = InstancePath::root()
///     .push_key("server")
///     .push_key("networks")
///     .push_index(0);
///
/// assert_eq!(path.to_string(), "server.networks[0]");
/// assert_eq!(path.first().map(|s| s.to_string()), Some("server".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// Creates an empty path, pointing at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from an explicit list of segments.
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Returns a new path with an object key appended.
    pub fn push_key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Returns a new path with an array index appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this path points at the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// The segment closest to the root.
    ///
    /// Query parameters arrive as `{name: [values..]}`, so the first segment
    /// is the parameter name and anything after it is a list index.
    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    /// The segment closest to the failing value.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Renders the path as an RFC 6901 JSON pointer (`/server/networks/0`).
    pub fn to_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push('/');
            match segment {
                PathSegment::Key(name) => {
                    pointer.push_str(&name.replace('~', "~0").replace('/', "~1"))
                }
                PathSegment::Index(idx) => pointer.push_str(&idx.to_string()),
            }
        }
        pointer
    }
}

impl Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path() {
        let path = InstancePath::root();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.first(), None);
        assert_eq!(path.last(), None);
        assert_eq!(path.to_string(), "");
        assert_eq!(path.to_pointer(), "");
    }

    #[test]
    fn test_first_and_last_differ_for_query_shape() {
        let path = InstancePath::root().push_key("limit").push_index(0);
        assert_eq!(path.first(), Some(&PathSegment::key("limit")));
        assert_eq!(path.last(), Some(&PathSegment::index(0)));
    }

    #[test]
    fn test_display_mixes_keys_and_indices() {
        let path = InstancePath::root()
            .push_key("server")
            .push_key("block_device_mapping_v2")
            .push_index(3)
            .push_key("uuid");
        assert_eq!(path.to_string(), "server.block_device_mapping_v2[3].uuid");
    }

    #[test]
    fn test_push_leaves_original_untouched() {
        let base = InstancePath::root().push_key("metadata");
        let a = base.push_key("a");
        let b = base.push_key("b");

        assert_eq!(base.len(), 1);
        assert_eq!(a.to_string(), "metadata.a");
        assert_eq!(b.to_string(), "metadata.b");
    }

    #[test]
    fn test_pointer_escapes_reserved_characters() {
        let path = InstancePath::root().push_key("a/b").push_key("c~d").push_index(2);
        assert_eq!(path.to_pointer(), "/a~1b/c~0d/2");
    }

    #[test]
    fn test_segment_display() {
        assert_eq!(PathSegment::key("name").to_string(), "name");
        assert_eq!(PathSegment::index(7).to_string(), "7");
    }

    #[test]
    fn test_from_segments() {
        let path = InstancePath::from_segments(vec![PathSegment::key("x"), PathSegment::index(1)]);
        assert_eq!(path.to_string(), "x[1]");
    }
}
