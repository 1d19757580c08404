//! Failures reported by the foreign-key and primary-key rules.

use std::fmt::{self, Display};

use serde_json::{json, Map, Value};

use crate::path::JsonPath;

use super::SchemaError;

/// Whether a failure is about the rule setup or about the document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    /// The schema or the context cannot be evaluated against the document.
    Configuration,
    /// The document violates a declared integrity constraint.
    Data,
}

/// The primary-key values of one array element, in key-field order.
///
/// A field the element does not have is kept as `None`, which is distinct
/// from an explicit `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeKey {
    fields: Vec<(String, Option<Value>)>,
}

impl CompositeKey {
    /// Creates a key from `(field, value)` pairs.
    pub fn new(fields: Vec<(String, Option<Value>)>) -> Self {
        Self { fields }
    }

    /// Returns the `(field, value)` pairs.
    pub fn fields(&self) -> &[(String, Option<Value>)] {
        &self.fields
    }

    /// Returns the value of one key field, if the element had it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Renders the key as a JSON object; absent fields are left out.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .filter_map(|(name, value)| value.clone().map(|v| (name.clone(), v)))
            .collect();
        Value::Object(map)
    }
}

impl Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// A failed foreign-key or primary-key rule.
///
/// Every variant maps to one error code; [`IntegrityError::into_schema_error`]
/// places it at a path in the validation report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegrityError {
    #[error("The data to look for FK references in must be supplied in the validation context")]
    NoContextData,

    #[error("The schema being validated must be supplied in the validation context")]
    NoContextSchema,

    #[error("\"{path}\" contains two or more array elements, but no parent field option is supplied")]
    TwoArrays { path: String },

    #[error("\"{path}\" contains three or more array elements and there is no mechanism to locate the right FK item")]
    ThreeArrays { path: String },

    #[error("parent field {parent_field} could not be found from path {path} or did not have a foreign key attribute")]
    ParentFieldNotFound { path: String, parent_field: String },

    #[error("\"{}\" could not be found as a reference to \"{path}\"", display_value(.value))]
    FkNotFound { value: Value, path: String },

    #[error("The schema being validated must be supplied in the validation context")]
    NoContext,

    #[error("The schema being validated does not have primary keys on the child object at path \"{path}\"")]
    NoPrimaryKeys { path: String },

    #[error("The schema being validated does not have a child object at path \"{path}\"")]
    BadSchema { path: String },

    #[error("There is a duplicate value at path {path} for keys {keys}")]
    DuplicateValue { path: String, keys: CompositeKey },
}

impl IntegrityError {
    /// Returns the machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            IntegrityError::NoContextData => "noContextData",
            IntegrityError::NoContextSchema => "noContextSchema",
            IntegrityError::TwoArrays { .. } => "twoArrays",
            IntegrityError::ThreeArrays { .. } => "threeArrays",
            IntegrityError::ParentFieldNotFound { .. } => "parentFieldNotFound",
            IntegrityError::FkNotFound { .. } => "fkNotFound",
            IntegrityError::NoContext => "noContext",
            IntegrityError::NoPrimaryKeys { .. } => "noPrimaryKeys",
            IntegrityError::BadSchema { .. } => "badSchema",
            IntegrityError::DuplicateValue { .. } => "duplicateValue",
        }
    }

    /// Returns whether the failure concerns configuration or data.
    pub fn tier(&self) -> ErrorTier {
        match self {
            IntegrityError::FkNotFound { .. } | IntegrityError::DuplicateValue { .. } => {
                ErrorTier::Data
            }
            _ => ErrorTier::Configuration,
        }
    }

    /// Returns the structured detail data for this failure.
    pub fn details(&self) -> Map<String, Value> {
        let details = match self {
            IntegrityError::NoContextData
            | IntegrityError::NoContextSchema
            | IntegrityError::NoContext => json!({}),
            IntegrityError::TwoArrays { path }
            | IntegrityError::ThreeArrays { path }
            | IntegrityError::NoPrimaryKeys { path }
            | IntegrityError::BadSchema { path } => json!({ "path": path }),
            IntegrityError::ParentFieldNotFound { path, parent_field } => {
                json!({ "path": path, "parentField": parent_field })
            }
            IntegrityError::FkNotFound { value, path } => json!({ "value": value, "path": path }),
            IntegrityError::DuplicateValue { path, keys } => {
                json!({ "path": path, "keys": keys.to_json() })
            }
        };
        match details {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Converts this failure into a [`SchemaError`] reported at `path`.
    pub fn into_schema_error(self, path: JsonPath) -> SchemaError {
        let mut error = SchemaError::new(path, self.to_string())
            .with_code(self.code())
            .with_details(self.details());
        if let IntegrityError::FkNotFound { value, .. } = &self {
            error = error.with_got(display_value(value));
        }
        error
    }
}

/// Formats a scalar the way it reads in a message: strings without quotes.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
