//! Decides whether a value occurs at a reference path in a document.

use serde_json::Value;

use crate::path::RefSegment;

/// Selects one element of the outer array of a two-wildcard path.
///
/// The first element whose `field` equals `value` is the only one searched.
/// A `value` of `None` (the anchor field is absent from the record) selects
/// no element, so elements that also lack `field` are never matched.
#[derive(Debug, Clone, Copy)]
pub struct ParentCorrelation<'a> {
    pub field: &'a str,
    pub value: Option<&'a Value>,
}

/// Returns true if `target` occurs at `segments` below `node`.
///
/// The walk is depth first:
///
/// - with no segments left, `node` must equal `target` exactly (so `0`, `""`
///   and `false` are matchable values);
/// - a missing node, a field segment on a non-object, or a wildcard on a
///   non-array never matches;
/// - a wildcard followed later by another wildcard uses `correlation` to pick
///   a single element and consumes it; without a correlation it matches
///   nothing;
/// - the last wildcard tries every element and stops at the first match.
///
/// # Example
///
/// ```rust
/// use keycheck::keys::exists;
/// use keycheck::RefPath;
/// use serde_json::json;
///
/// let data = json!({"makes": [{"makeId": "ford"}, {"makeId": "mazda"}]});
/// let path = RefPath::parse("makes.[].makeId");
///
/// assert!(exists(&json!("mazda"), Some(&data), path.segments(), None));
/// assert!(!exists(&json!("nissan"), Some(&data), path.segments(), None));
/// ```
pub fn exists(
    target: &Value,
    node: Option<&Value>,
    segments: &[RefSegment],
    correlation: Option<ParentCorrelation<'_>>,
) -> bool {
    let Some(node) = node else {
        return false;
    };
    let Some((segment, rest)) = segments.split_first() else {
        return node == target;
    };

    match segment {
        RefSegment::Field(name) => exists(target, node.get(name.as_str()), rest, correlation),
        RefSegment::Each => {
            let Some(elements) = node.as_array() else {
                return false;
            };
            if rest.contains(&RefSegment::Each) {
                let Some(ParentCorrelation { field, value: Some(value) }) = correlation else {
                    return false;
                };
                elements
                    .iter()
                    .find(|element| element.get(field) == Some(value))
                    .is_some_and(|element| exists(target, Some(element), rest, None))
            } else {
                elements
                    .iter()
                    .any(|element| exists(target, Some(element), rest, correlation))
            }
        }
    }
}
