//! Array schema validation.
//!
//! [`ArraySchema`] validates each item against an item schema, applies
//! length constraints, and can require the items to be unique on their
//! primary-key fields.

use serde_json::Value;
use stillwater::Validation;

use crate::describe::{Describe, SchemaDescription};
use crate::error::{SchemaError, SchemaErrors};
use crate::keys::KeyRule;
use crate::validation::{ValidationContext, ValidationState};

use super::rules::{apply_key_rules, finish, value_type_name};
use super::traits::SchemaLike;

enum ArrayConstraint {
    MinLength { min: usize, message: Option<String> },
    MaxLength { max: usize, message: Option<String> },
}

/// A schema for validating arrays.
///
/// Validation runs in a fixed order: type check, length constraints, items,
/// then key rules. Errors from every step are accumulated.
///
/// # Example
///
/// ```rust
/// use keycheck::{Schema, SchemaLike, ValidationContext};
/// use serde_json::json;
///
/// let schema = Schema::object().field(
///     "items",
///     Schema::array(
///         Schema::object()
///             .field("key", Schema::string().pk())
///             .field("name", Schema::string()),
///     )
///     .unique_on_pks(),
/// );
///
/// let data = json!({"items": [
///     {"key": "1", "name": "a"},
///     {"key": "1", "name": "b"},
/// ]});
/// let context = ValidationContext::new().with_data(&data).with_schema(&schema);
/// let errors = schema.validate_in(&data, &context).into_result().unwrap_err();
/// assert_eq!(errors.first().code, "duplicateValue");
/// ```
pub struct ArraySchema<S> {
    item_schema: S,
    constraints: Vec<ArrayConstraint>,
    rules: Vec<KeyRule>,
    type_error_message: Option<String>,
}

impl<S: SchemaLike> ArraySchema<S> {
    pub fn new(item_schema: S) -> Self {
        Self {
            item_schema,
            constraints: Vec::new(),
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    /// The array must have at least `min` items.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MinLength { min, message: None });
        self
    }

    /// The array must have at most `max` items.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MaxLength { max, message: None });
        self
    }

    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Requires no two items to share the same values on their `pk` fields.
    ///
    /// The items must be objects with at least one field marked
    /// [`pk`](crate::StringSchema::pk). The check reads the schema from the
    /// validation context, so it only runs in a pass started with
    /// [`validate_in`](SchemaLike::validate_in) or an equivalent context.
    pub fn unique_on_pks(mut self) -> Self {
        self.rules.push(KeyRule::UniqueOnPks);
        self
    }

    /// Sets a custom error message for the most recent length constraint,
    /// or the type error message when there is none yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(ArrayConstraint::MinLength { message: m, .. })
            | Some(ArrayConstraint::MaxLength { message: m, .. }) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }
}

impl<S: SchemaLike> Describe for ArraySchema<S> {
    fn describe(&self) -> SchemaDescription {
        SchemaDescription::array(self.item_schema.describe()).with_rules(self.rules.iter().cloned())
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    type Output = Vec<Value>;

    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Vec<Value>, SchemaErrors> {
        let path = state.path();
        let Some(arr) = value.as_array() else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| "expected array".to_string());
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(path.clone(), message)
                    .with_code("invalid_type")
                    .with_got(value_type_name(value))
                    .with_expected("array"),
            ));
        };

        let mut errors = Vec::new();

        for constraint in &self.constraints {
            match constraint {
                ArrayConstraint::MinLength { min, message } if arr.len() < *min => {
                    let msg = message.clone().unwrap_or_else(|| {
                        format!("array must have at least {} items, got {}", min, arr.len())
                    });
                    errors.push(
                        SchemaError::new(path.clone(), msg)
                            .with_code("min_length")
                            .with_expected(format!("at least {} items", min))
                            .with_got(format!("{} items", arr.len())),
                    );
                }
                ArrayConstraint::MaxLength { max, message } if arr.len() > *max => {
                    let msg = message.clone().unwrap_or_else(|| {
                        format!("array must have at most {} items, got {}", max, arr.len())
                    });
                    errors.push(
                        SchemaError::new(path.clone(), msg)
                            .with_code("max_length")
                            .with_expected(format!("at most {} items", max))
                            .with_got(format!("{} items", arr.len())),
                    );
                }
                _ => {}
            }
        }

        let mut validated_items = Vec::with_capacity(arr.len());
        for (index, item) in arr.iter().enumerate() {
            let item_state = state.push_index(value, index);
            match self
                .item_schema
                .validate_to_value_with_context(item, &item_state, context)
            {
                Validation::Success(v) => validated_items.push(v),
                Validation::Failure(e) => errors.extend(e),
            }
        }

        apply_key_rules(&self.rules, value, state, context, &mut errors);

        finish(validated_items, errors)
    }

    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, state, context)
            .map(Value::Array)
    }
}
