//! Traits for schema polymorphism.
//!
//! [`SchemaLike`] lets different schema types be nested inside objects and
//! arrays and validated through one entry point, with the validation state
//! and context threaded through every level.

use serde_json::Value;
use stillwater::Validation;

use crate::describe::Describe;
use crate::error::SchemaErrors;
use crate::path::JsonPath;
use crate::validation::{ValidationContext, ValidationState};

/// A schema that can validate JSON values.
///
/// Implementors only provide [`validate_with_context`](Self::validate_with_context)
/// and [`validate_to_value_with_context`](Self::validate_to_value_with_context);
/// the other entry points build a state and context for them.
///
/// # Example
///
/// ```rust
/// use keycheck::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::integer().positive());
///
/// let result = schema.validate(&json!({"name": "Ada", "age": 36}), &JsonPath::root());
/// assert!(result.is_success());
/// ```
pub trait SchemaLike: Describe {
    /// The output type produced by successful validation.
    type Output;

    /// Validates the node at `state` as part of the pass described by `context`.
    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Self::Output, SchemaErrors>;

    /// Like `validate_with_context`, with the output converted to a `Value`.
    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors>;

    /// Validates a value at `path` without a document or schema in context.
    ///
    /// Key rules that need the context report a configuration error.
    fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Self::Output, SchemaErrors> {
        let context = ValidationContext::new();
        self.validate_with_context(value, &ValidationState::at(path.clone()), &context)
    }

    /// Validates a value at `path` and returns the result as a `Value`.
    fn validate_to_value(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        let context = ValidationContext::new();
        self.validate_to_value_with_context(value, &ValidationState::at(path.clone()), &context)
    }

    /// Validates `value` as the root of a pass that uses `context`.
    fn validate_in(
        &self,
        value: &Value,
        context: &ValidationContext<'_>,
    ) -> Validation<Self::Output, SchemaErrors> {
        self.validate_with_context(value, &ValidationState::root(), context)
    }
}

/// Adapts any `SchemaLike` to produce `Value` output so schemas of different
/// output types can be stored side by side.
pub(crate) struct SchemaWrapper<S>(pub(crate) S);

impl<S: SchemaLike> Describe for SchemaWrapper<S> {
    fn describe(&self) -> crate::describe::SchemaDescription {
        self.0.describe()
    }
}

impl<S: SchemaLike> SchemaLike for SchemaWrapper<S> {
    type Output = Value;

    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        self.0.validate_to_value_with_context(value, state, context)
    }

    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        self.0.validate_to_value_with_context(value, state, context)
    }
}
