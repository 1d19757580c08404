//! Primary-key extraction and the `uniqueOnPks` rule.

use indexmap::IndexMap;
use serde_json::Value;

use crate::describe::SchemaDescription;
use crate::error::{CompositeKey, IntegrityError};
use crate::validation::{ValidationContext, ValidationState};

use super::schema_locator::locate_array_element_node;

/// Returns the names of the element fields marked with `pk`, in declaration order.
///
/// Array-typed fields are never key fields.
pub fn primary_key_fields(element: &IndexMap<String, SchemaDescription>) -> Vec<&str> {
    element
        .iter()
        .filter(|(_, field)| !field.is_array() && field.has_rule("pk"))
        .map(|(name, _)| name.as_str())
        .collect()
}

/// Returns the first composite key that repeats an earlier element's key.
///
/// Elements are compared on `fields` only; a field an element lacks counts
/// as absent, and two elements lacking the same fields collide.
///
/// # Example
///
/// ```rust
/// use keycheck::keys::find_duplicate;
/// use serde_json::json;
///
/// let items = vec![json!({"key": "1"}), json!({"key": "2"}), json!({"key": "2"})];
/// let duplicate = find_duplicate(&items, &["key"]).unwrap();
/// assert_eq!(duplicate.to_string(), r#"{"key":"2"}"#);
/// ```
pub fn find_duplicate(items: &[Value], fields: &[&str]) -> Option<CompositeKey> {
    let mut seen: Vec<Vec<Option<&Value>>> = Vec::with_capacity(items.len());
    for item in items {
        let key: Vec<Option<&Value>> = fields.iter().map(|field| item.get(*field)).collect();
        if seen.contains(&key) {
            return Some(CompositeKey::new(
                fields
                    .iter()
                    .zip(key)
                    .map(|(field, value)| (field.to_string(), value.cloned()))
                    .collect(),
            ));
        }
        seen.push(key);
    }
    None
}

/// Checks that no two elements of the array `value` share a primary key.
///
/// The array's own schema node is found from the validation path; its
/// element must be an object with at least one `pk` field.
///
/// Paths in the errors use [`JsonPath`](crate::JsonPath) display, with
/// indices in brackets (`items[0].otherItems`), not dot-joined indices
/// (`items.0.otherItems`). The array at the root prints as an empty path.
pub fn check_unique_on_pks(
    value: &Value,
    state: &ValidationState<'_>,
    context: &ValidationContext<'_>,
) -> Result<(), IntegrityError> {
    let description = context.description().ok_or(IntegrityError::NoContext)?;
    let path = state.path();

    let element = locate_array_element_node(description, path).ok_or_else(|| {
        IntegrityError::BadSchema {
            path: path.to_string(),
        }
    })?;
    let fields = primary_key_fields(element);
    if fields.is_empty() {
        return Err(IntegrityError::NoPrimaryKeys {
            path: path.to_string(),
        });
    }

    let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
    match find_duplicate(items, &fields) {
        Some(keys) => Err(IntegrityError::DuplicateValue {
            path: path.to_string(),
            keys,
        }),
        None => Ok(()),
    }
}
