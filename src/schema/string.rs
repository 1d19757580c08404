//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! length and pattern constraints, optionally acting as a foreign key or a
//! primary-key component.

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::describe::{Describe, SchemaDescription, ScalarKind};
use crate::error::{SchemaError, SchemaErrors};
use crate::keys::{FkOptions, ForeignKey, KeyRule};
use crate::path::JsonPath;
use crate::validation::{ValidationContext, ValidationState};

use super::rules::{apply_key_rules, finish, value_type_name};
use super::traits::SchemaLike;

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
}

/// A schema for validating string values.
///
/// Constraint violations are accumulated. Key rules run after the
/// constraints, against the full document in the validation context.
///
/// # Example
///
/// ```rust
/// use keycheck::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string()
///     .min_len(3)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// assert!(schema.validate(&json!("ford"), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!("AB"), &JsonPath::root()).is_failure());
/// ```
#[derive(Clone)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    rules: Vec<KeyRule>,
    type_error_message: Option<String>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    /// Adds a minimum length constraint (in Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint (in Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Requires the value to occur at the reference path `path` in the full document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keycheck::{Schema, SchemaLike, ValidationContext};
    /// use serde_json::json;
    ///
    /// let model = Schema::object().field("makeId", Schema::string().fk("makes.[].makeId"));
    /// let schema = Schema::object()
    ///     .field("makes", Schema::array(Schema::object().field("makeId", Schema::string())))
    ///     .field("models", Schema::array(model));
    ///
    /// let data = json!({"makes": [{"makeId": "ford"}], "models": [{"makeId": "fnord"}]});
    /// let context = ValidationContext::new().with_data(&data).with_schema(&schema);
    ///
    /// let errors = schema.validate_in(&data, &context).into_result().unwrap_err();
    /// assert_eq!(errors.first().code, "fkNotFound");
    /// assert_eq!(errors.first().path.to_string(), "models[0].makeId");
    /// ```
    pub fn fk(self, path: &str) -> Self {
        self.fk_with(path, FkOptions::new())
    }

    /// Like [`fk`](Self::fk), with parent-correlation options for two-wildcard paths.
    pub fn fk_with(mut self, path: &str, options: FkOptions) -> Self {
        self.rules
            .push(KeyRule::ForeignKey(ForeignKey::new(path, options)));
        self
    }

    /// Marks this field as part of its record's primary key.
    pub fn pk(mut self) -> Self {
        self.rules.push(KeyRule::PrimaryKey);
        self
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message
    /// (used when the value is not a string).
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(StringConstraint::MinLength { message: m, .. })
            | Some(StringConstraint::MaxLength { message: m, .. })
            | Some(StringConstraint::Pattern { message: m, .. }) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Describe for StringSchema {
    fn describe(&self) -> SchemaDescription {
        SchemaDescription::scalar(ScalarKind::String).with_rules(self.rules.iter().cloned())
    }
}

impl SchemaLike for StringSchema {
    type Output = String;

    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<String, SchemaErrors> {
        let path = state.path();
        let Some(s) = value.as_str() else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| "expected string".to_string());
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(path.clone(), message)
                    .with_code("invalid_type")
                    .with_got(value_type_name(value))
                    .with_expected("string"),
            ));
        };

        let mut errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, s, path))
            .collect();
        apply_key_rules(&self.rules, value, state, context, &mut errors);

        finish(s.to_string(), errors)
    }

    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, state, context)
            .map(Value::String)
    }
}

/// Checks a single constraint and returns an error if it fails.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    path: &JsonPath,
) -> Option<SchemaError> {
    match constraint {
        StringConstraint::MinLength { min, message } => {
            let len = value.chars().count();
            (len < *min).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at least {}, got {}", min, len));
                SchemaError::new(path.clone(), msg)
                    .with_code("min_length")
                    .with_expected(format!("at least {} characters", min))
                    .with_got(format!("{} characters", len))
            })
        }
        StringConstraint::MaxLength { max, message } => {
            let len = value.chars().count();
            (len > *max).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at most {}, got {}", max, len));
                SchemaError::new(path.clone(), msg)
                    .with_code("max_length")
                    .with_expected(format!("at most {} characters", max))
                    .with_got(format!("{} characters", len))
            })
        }
        StringConstraint::Pattern {
            regex,
            pattern_str,
            message,
        } => (!regex.is_match(value)).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must match pattern '{}'", pattern_str));
            SchemaError::new(path.clone(), msg)
                .with_code("pattern")
                .with_expected(format!("string matching '{}'", pattern_str))
                .with_got(value.to_string())
        }),
    }
}
