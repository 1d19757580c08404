//! Object schema validation.
//!
//! [`ObjectSchema`] describes a record: its named fields, which of them are
//! required, and whether unknown properties are allowed. Fields are kept in
//! declaration order, which is also the order primary-key fields are read in.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::describe::{Describe, SchemaDescription};
use crate::error::{SchemaError, SchemaErrors};
use crate::validation::{ValidationContext, ValidationState};

use super::rules::{finish, value_type_name};
use super::traits::{SchemaLike, SchemaWrapper};

struct FieldDef {
    schema: Box<dyn SchemaLike<Output = Value>>,
    required: bool,
}

/// A schema for validating JSON objects.
///
/// Field errors are accumulated, and every field is validated with the
/// object itself recorded as its parent so that key rules can reach
/// sibling fields.
///
/// # Example
///
/// ```rust
/// use keycheck::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("makeId", Schema::string().min_len(1))
///     .optional("name", Schema::string())
///     .additional_properties(false);
///
/// assert!(schema.validate(&json!({"makeId": "ford"}), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!({"makeId": "ford", "x": 1}), &JsonPath::root()).is_failure());
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
    allow_additional: bool,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            allow_additional: true,
            type_error_message: None,
        }
    }

    /// Adds a required field.
    pub fn field<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.insert(name.into(), schema, true)
    }

    /// Adds a field that may be absent.
    pub fn optional<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.insert(name.into(), schema, false)
    }

    /// Allows (the default) or rejects properties with no field definition.
    ///
    /// Allowed unknown properties are copied to the output unvalidated.
    pub fn additional_properties(mut self, allow: bool) -> Self {
        self.allow_additional = allow;
        self
    }

    /// Sets the message used when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    fn insert<S>(mut self, name: String, schema: S, required: bool) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name,
            FieldDef {
                schema: Box::new(SchemaWrapper(schema)),
                required,
            },
        );
        self
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Describe for ObjectSchema {
    fn describe(&self) -> SchemaDescription {
        SchemaDescription::object(
            self.fields
                .iter()
                .map(|(name, def)| (name.clone(), def.schema.describe()))
                .collect(),
        )
    }
}

impl SchemaLike for ObjectSchema {
    type Output = Map<String, Value>;

    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Map<String, Value>, SchemaErrors> {
        let path = state.path();
        let Some(obj) = value.as_object() else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| "expected object".to_string());
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(path.clone(), message)
                    .with_code("invalid_type")
                    .with_got(value_type_name(value))
                    .with_expected("object"),
            ));
        };

        let mut errors = Vec::new();
        let mut validated = Map::new();

        for (name, def) in &self.fields {
            match obj.get(name) {
                Some(field_value) => {
                    let field_state = state.push_field(value, name.as_str());
                    match def
                        .schema
                        .validate_with_context(field_value, &field_state, context)
                    {
                        Validation::Success(v) => {
                            validated.insert(name.clone(), v);
                        }
                        Validation::Failure(e) => errors.extend(e),
                    }
                }
                None if def.required => errors.push(
                    SchemaError::new(
                        path.push_field(name.as_str()),
                        format!("required field '{}' is missing", name),
                    )
                    .with_code("required")
                    .with_expected("value"),
                ),
                None => {}
            }
        }

        for (key, extra) in obj {
            if self.fields.contains_key(key) {
                continue;
            }
            if self.allow_additional {
                validated.insert(key.clone(), extra.clone());
            } else {
                errors.push(
                    SchemaError::new(path.push_field(key.as_str()), format!("unknown field '{}'", key))
                        .with_code("additional_property"),
                );
            }
        }

        finish(validated, errors)
    }

    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, state, context)
            .map(Value::Object)
    }
}
