//! Runs the key rules attached to a schema node.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::keys::{check_foreign_key, check_unique_on_pks, KeyRule};
use crate::validation::{ValidationContext, ValidationState};

/// Runs every attached rule against `value`, appending failures to `errors`.
///
/// `pk` does nothing here; it is only read by `uniqueOnPks` on the
/// enclosing array.
pub(crate) fn apply_key_rules(
    rules: &[KeyRule],
    value: &Value,
    state: &ValidationState<'_>,
    context: &ValidationContext<'_>,
    errors: &mut Vec<SchemaError>,
) {
    for rule in rules {
        let outcome = match rule {
            KeyRule::ForeignKey(fk) => check_foreign_key(value, state, context, fk),
            KeyRule::UniqueOnPks => check_unique_on_pks(value, state, context),
            KeyRule::PrimaryKey => Ok(()),
        };
        if let Err(error) = outcome {
            errors.push(error.into_schema_error(state.path().clone()));
        }
    }
}

/// Turns accumulated errors into a validation result.
pub(crate) fn finish<T>(output: T, errors: Vec<SchemaError>) -> Validation<T, SchemaErrors> {
    match SchemaErrors::try_from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(output),
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
