//! Walks a schema description along a data path.
//!
//! The description and the document are separate trees; they are correlated
//! only by path segments. A field segment steps into an object's child and
//! an index segment steps into an array's element description (every index
//! lands on the same node). Any shape mismatch is "not found", never a panic.

use indexmap::IndexMap;

use crate::describe::{DescribedKind, SchemaDescription};
use crate::path::{JsonPath, PathSegment};

use super::{ForeignKey, KeyRule};

/// Returns the description node reached by following `path` from `root`.
///
/// An empty path returns `root`.
///
/// # Example
///
/// ```rust
/// use keycheck::keys::locate_node;
/// use keycheck::{Describe, JsonPath, Schema};
///
/// let schema = Schema::object().field(
///     "makes",
///     Schema::array(Schema::object().field("makeId", Schema::string())),
/// );
/// let description = schema.describe();
///
/// let path = JsonPath::root().push_field("makes").push_index(7).push_field("makeId");
/// assert_eq!(locate_node(&description, path.as_slice()).unwrap().type_name(), "string");
///
/// let missing = JsonPath::root().push_field("models");
/// assert!(locate_node(&description, missing.as_slice()).is_none());
/// ```
pub fn locate_node<'d>(
    root: &'d SchemaDescription,
    path: &[PathSegment],
) -> Option<&'d SchemaDescription> {
    let Some((segment, rest)) = path.split_first() else {
        return Some(root);
    };
    let next = match (segment, root.kind()) {
        (PathSegment::Field(name), DescribedKind::Object(children)) => children.get(name)?,
        (PathSegment::Index(_), DescribedKind::Array(Some(element))) => &**element,
        _ => return None,
    };
    locate_node(next, rest)
}

/// Returns the rule called `rule_name` on the node at `path`.
pub fn find_rule_on_field<'d>(
    root: &'d SchemaDescription,
    path: &JsonPath,
    rule_name: &str,
) -> Option<&'d KeyRule> {
    locate_node(root, path.as_slice())?.rule(rule_name)
}

/// Returns the foreign key declared on the field at `path`.
pub fn find_foreign_key<'d>(root: &'d SchemaDescription, path: &JsonPath) -> Option<&'d ForeignKey> {
    find_rule_on_field(root, path, "fk").and_then(KeyRule::as_foreign_key)
}

/// Returns the element fields of the array-of-objects node at `path`.
///
/// `None` when the node is missing, is not an array, or its element is not
/// an object.
pub fn locate_array_element_node<'d>(
    root: &'d SchemaDescription,
    path: &JsonPath,
) -> Option<&'d IndexMap<String, SchemaDescription>> {
    locate_node(root, path.as_slice())?.element()?.children()
}
