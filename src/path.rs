//! Paths into documents and references between them.
//!
//! Two flavours of path live here:
//!
//! - [`JsonPath`] addresses a concrete location in a document (`makes[1].models`)
//!   and is what every [`SchemaError`](crate::SchemaError) reports.
//! - [`RefPath`] is the dotted reference grammar used as a foreign-key target
//!   (`makes.[].models.[].modelId`), where `[]` stands for "every element of
//!   this array".

use std::convert::Infallible;
use std::fmt::{self, Display};
use std::str::FromStr;

/// A segment of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object field (e.g. `makes`)
    Field(String),
    /// An array position (e.g. `[0]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }

    /// Returns the field name if this is a field segment.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            PathSegment::Field(name) => Some(name),
            PathSegment::Index(_) => None,
        }
    }
}

/// A concrete path to a value inside a document.
///
/// Paths are immutable: the `push_*` methods return a new path.
///
/// # Example
///
/// ```rust
/// use keycheck::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("makes")
///     .push_index(1)
///     .push_field("makeId");
///
/// assert_eq!(path.to_string(), "makes[1].makeId");
/// assert_eq!(path.sibling("name").to_string(), "makes[1].name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from an ordered list of segments.
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns the path of a field that shares this path's parent.
    ///
    /// On the root path this is just `name`.
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        self.parent().unwrap_or_default().push_field(name)
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the segments as a slice.
    pub fn as_slice(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the parent path, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        self.segments.split_last().map(|(_, rest)| Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i > 0 => write!(f, ".{}", name)?,
                PathSegment::Field(name) => write!(f, "{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// The wildcard token of the reference grammar.
pub const EACH_TOKEN: &str = "[]";

/// A segment of a [`RefPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefSegment {
    /// A named object field.
    Field(String),
    /// Every element of the array at this position (`[]`).
    Each,
}

/// How a reference path can be resolved, based on its wildcard count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape {
    /// Zero or one wildcard; resolvable without extra context.
    Simple,
    /// Exactly two wildcards; needs a parent correlation to pick the outer element.
    Correlated,
    /// Three or more wildcards; never resolvable.
    Unsupported,
}

/// A dotted reference path such as `makes.[].makeId`.
///
/// Parsing splits on `.`; a segment equal to `[]` is a wildcard and anything
/// else is a field name. There is no escaping, so field names containing `.`
/// cannot be referenced.
///
/// # Example
///
/// ```rust
/// use keycheck::{PathShape, RefPath, RefSegment};
///
/// let path = RefPath::parse("makes.[].models.[].modelId");
/// assert_eq!(path.wildcard_count(), 2);
/// assert_eq!(path.shape(), PathShape::Correlated);
/// assert_eq!(path.last_field(), Some("modelId"));
/// assert_eq!(path.segments()[1], RefSegment::Each);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefPath {
    raw: String,
    segments: Vec<RefSegment>,
}

impl RefPath {
    /// Parses a dotted reference path.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('.')
            .map(|chunk| {
                if chunk == EACH_TOKEN {
                    RefSegment::Each
                } else {
                    RefSegment::Field(chunk.to_string())
                }
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// Returns the path exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[RefSegment] {
        &self.segments
    }

    /// Returns the number of `[]` segments.
    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, RefSegment::Each))
            .count()
    }

    /// Classifies the path by how many wildcards it contains.
    pub fn shape(&self) -> PathShape {
        match self.wildcard_count() {
            0 | 1 => PathShape::Simple,
            2 => PathShape::Correlated,
            _ => PathShape::Unsupported,
        }
    }

    /// Returns the final segment's field name, if the path ends on a field.
    pub fn last_field(&self) -> Option<&str> {
        match self.segments.last() {
            Some(RefSegment::Field(name)) => Some(name),
            _ => None,
        }
    }

    /// Converts the path into a concrete data path with every wildcard at index 0.
    ///
    /// Schema descriptions describe all array elements with one element node,
    /// so index 0 stands in for any element when probing them.
    pub fn to_probe_path(&self) -> JsonPath {
        JsonPath::from_segments(self.segments.iter().map(|segment| match segment {
            RefSegment::Field(name) => PathSegment::Field(name.clone()),
            RefSegment::Each => PathSegment::Index(0),
        }))
    }
}

impl FromStr for RefPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Display for RefPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_empty() {
        let path = JsonPath::root();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
        assert!(path.parent().is_none());
    }

    #[test]
    fn test_display_mixes_fields_and_indices() {
        let path = JsonPath::root()
            .push_field("items")
            .push_index(0)
            .push_field("otherItems")
            .push_index(3);
        assert_eq!(path.to_string(), "items[0].otherItems[3]");
        assert_eq!(JsonPath::root().push_index(2).to_string(), "[2]");
    }

    #[test]
    fn test_sibling_replaces_last_segment() {
        let path = JsonPath::root()
            .push_field("vehicles")
            .push_index(4)
            .push_field("modelId");
        assert_eq!(path.sibling("makeId").to_string(), "vehicles[4].makeId");
        assert_eq!(JsonPath::root().sibling("makeId").to_string(), "makeId");
    }

    #[test]
    fn test_parent_and_last() {
        let path = JsonPath::root().push_field("makes").push_index(1);
        assert_eq!(path.last(), Some(&PathSegment::Index(1)));
        assert_eq!(path.parent().unwrap().to_string(), "makes");
    }

    #[test]
    fn test_parse_simple_reference() {
        let path = RefPath::parse("makes.[].makeId");
        assert_eq!(
            path.segments(),
            &[
                RefSegment::Field("makes".to_string()),
                RefSegment::Each,
                RefSegment::Field("makeId".to_string()),
            ]
        );
        assert_eq!(path.shape(), PathShape::Simple);
        assert_eq!(path.to_string(), "makes.[].makeId");
    }

    #[test]
    fn test_parse_root_array_reference() {
        let path = RefPath::parse("[].parentId");
        assert_eq!(path.segments()[0], RefSegment::Each);
        assert_eq!(path.wildcard_count(), 1);
    }

    #[test]
    fn test_shape_by_wildcard_count() {
        assert_eq!(RefPath::parse("code").shape(), PathShape::Simple);
        assert_eq!(RefPath::parse("a.[].b.[].c").shape(), PathShape::Correlated);
        assert_eq!(
            RefPath::parse("a.[].b.[].c.[].d").shape(),
            PathShape::Unsupported
        );
    }

    #[test]
    fn test_brackets_inside_a_name_are_not_wildcards() {
        let path = RefPath::parse("tags[].name");
        assert_eq!(path.wildcard_count(), 0);
        assert_eq!(path.segments()[0], RefSegment::Field("tags[]".to_string()));
    }

    #[test]
    fn test_last_field() {
        assert_eq!(RefPath::parse("makes.[].makeId").last_field(), Some("makeId"));
        assert_eq!(RefPath::parse("makes.[]").last_field(), None);
    }

    #[test]
    fn test_probe_path_uses_index_zero() {
        let probe = RefPath::parse("vehicles.[].makeId").to_probe_path();
        assert_eq!(probe.to_string(), "vehicles[0].makeId");
    }

    #[test]
    fn test_from_str() {
        let path: RefPath = "makes.[].makeId".parse().unwrap();
        assert_eq!(path.as_str(), "makes.[].makeId");
    }
}
