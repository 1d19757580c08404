//! The `fk` rule.

use serde_json::Value;

use crate::error::IntegrityError;
use crate::path::{JsonPath, PathShape, RefPath};
use crate::validation::{ValidationContext, ValidationState};

use super::schema_locator::find_foreign_key;
use super::value_locator::{exists, ParentCorrelation};
use super::{FkOptions, ForeignKey};

/// Checks that `value` occurs at the foreign key's target path in the full document.
///
/// Configuration problems (missing context, unsupported path shape, an
/// unresolvable parent field) are reported before the document is searched.
///
/// # Example
///
/// ```rust
/// use keycheck::keys::{check_foreign_key, FkOptions, ForeignKey};
/// use keycheck::{IntegrityError, Schema, ValidationContext, ValidationState};
/// use serde_json::json;
///
/// let schema = Schema::object();
/// let data = json!({"makes": [{"makeId": "ford"}]});
/// let context = ValidationContext::new().with_data(&data).with_schema(&schema);
/// let fk = ForeignKey::new("makes.[].makeId", FkOptions::new());
///
/// let state = ValidationState::root();
/// assert!(check_foreign_key(&json!("ford"), &state, &context, &fk).is_ok());
/// assert!(matches!(
///     check_foreign_key(&json!("fnord"), &state, &context, &fk),
///     Err(IntegrityError::FkNotFound { .. })
/// ));
/// ```
pub fn check_foreign_key(
    value: &Value,
    state: &ValidationState<'_>,
    context: &ValidationContext<'_>,
    fk: &ForeignKey,
) -> Result<(), IntegrityError> {
    let data = context.data().ok_or(IntegrityError::NoContextData)?;
    if !context.has_schema() {
        return Err(IntegrityError::NoContextSchema);
    }

    let path = fk.path();
    let parent = ParentField::from_options(fk.options());
    match path.shape() {
        PathShape::Unsupported => {
            return Err(IntegrityError::ThreeArrays {
                path: path.to_string(),
            })
        }
        PathShape::Correlated if parent.is_none() => {
            return Err(IntegrityError::TwoArrays {
                path: path.to_string(),
            })
        }
        _ => {}
    }

    let anchor = match parent {
        Some(parent) => Some(resolve_anchor(&parent, state, context).ok_or_else(|| {
            IntegrityError::ParentFieldNotFound {
                path: path.to_string(),
                parent_field: parent.label(),
            }
        })?),
        None => None,
    };
    let correlation = anchor.as_ref().map(|anchor| ParentCorrelation {
        field: &anchor.lookup_field,
        value: anchor.value,
    });

    if exists(value, Some(data), path.segments(), correlation) {
        Ok(())
    } else {
        Err(IntegrityError::FkNotFound {
            value: value.clone(),
            path: path.to_string(),
        })
    }
}

/// The sibling field a two-wildcard foreign key correlates through.
enum ParentField {
    /// A field of the same record, located next to the validated field.
    Name(String),
    /// A full reference path from the document root.
    Path(RefPath),
}

impl ParentField {
    fn from_options(options: &FkOptions) -> Option<Self> {
        match (&options.parent_field_name, &options.parent_field_path) {
            (Some(name), _) => Some(ParentField::Name(name.clone())),
            (None, Some(path)) => Some(ParentField::Path(RefPath::parse(path))),
            (None, None) => None,
        }
    }

    /// Name of the sibling field inside its record.
    fn field_name(&self) -> Option<&str> {
        match self {
            ParentField::Name(name) => Some(name),
            ParentField::Path(path) => path.last_field(),
        }
    }

    /// Where the sibling's description sits, relative to the schema root.
    fn schema_path(&self, state: &ValidationState<'_>) -> JsonPath {
        match self {
            ParentField::Name(name) => state.path().sibling(name.as_str()),
            ParentField::Path(path) => path.to_probe_path(),
        }
    }

    fn label(&self) -> String {
        match self {
            ParentField::Name(name) => name.clone(),
            ParentField::Path(path) => path.to_string(),
        }
    }
}

/// The resolved parent correlation of a two-wildcard foreign key.
struct Anchor<'v> {
    /// Field of the outer array's elements that identifies the parent.
    lookup_field: String,
    /// The sibling field's value in the record being validated.
    value: Option<&'v Value>,
}

/// Resolves which outer element a correlated foreign key must search.
///
/// The sibling field's own `fk` rule names the lookup field (the last field
/// of its target path); the sibling's value comes from the nearest record
/// enclosing the validated value. `None` if the sibling has no usable `fk`.
fn resolve_anchor<'v>(
    parent: &ParentField,
    state: &ValidationState<'v>,
    context: &ValidationContext<'_>,
) -> Option<Anchor<'v>> {
    let field_name = parent.field_name()?;
    let sibling_fk = find_foreign_key(context.description()?, &parent.schema_path(state))?;
    let lookup_field = sibling_fk.path().last_field()?.to_string();

    let value = state
        .enclosing_record()
        .and_then(|record| record.get(field_name));

    Some(Anchor {
        lookup_field,
        value,
    })
}
