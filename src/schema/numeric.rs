//! Numeric schema validation.
//!
//! [`IntegerSchema`] covers numeric identifiers and rejects floats.
//! [`NumberSchema`] accepts any JSON number, for keys such as rates or
//! measurements. Numeric keys are compared by JSON equality, so `0` is an
//! ordinary key and `1` never matches `1.0`.

use serde_json::Value;
use std::ops::RangeInclusive;
use stillwater::Validation;

use crate::describe::{Describe, ScalarKind, SchemaDescription};
use crate::error::{SchemaError, SchemaErrors};
use crate::keys::{FkOptions, ForeignKey, KeyRule};
use crate::path::JsonPath;
use crate::validation::{ValidationContext, ValidationState};

use super::rules::{apply_key_rules, finish, value_type_name};
use super::traits::SchemaLike;

#[derive(Clone)]
enum IntegerConstraint {
    Min { value: i64, message: Option<String> },
    Max { value: i64, message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
}

/// A schema for validating integer values.
///
/// # Example
///
/// ```rust
/// use keycheck::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::integer().non_negative().pk();
///
/// assert!(schema.validate(&json!(0), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!(-1), &JsonPath::root()).is_failure());
/// assert!(schema.validate(&json!(1.5), &JsonPath::root()).is_failure());
/// ```
#[derive(Clone)]
pub struct IntegerSchema {
    constraints: Vec<IntegerConstraint>,
    rules: Vec<KeyRule>,
    type_error_message: Option<String>,
}

impl IntegerSchema {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    /// The integer must be at least `value`.
    pub fn min(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// The integer must be at most `value`.
    pub fn max(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Shorthand for `.min(start).max(end)`.
    pub fn range(self, range: RangeInclusive<i64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    pub fn positive(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::Positive { message: None });
        self
    }

    pub fn non_negative(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::NonNegative { message: None });
        self
    }

    /// Requires the value to occur at the reference path `path` in the full document.
    pub fn fk(self, path: &str) -> Self {
        self.fk_with(path, FkOptions::new())
    }

    /// Like [`fk`](Self::fk), with parent-correlation options.
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

    /// Sets a custom error message for the most recent constraint, or the
    /// type error message when there is none yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(IntegerConstraint::Min { message: m, .. })
            | Some(IntegerConstraint::Max { message: m, .. })
            | Some(IntegerConstraint::Positive { message: m })
            | Some(IntegerConstraint::NonNegative { message: m }) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    fn type_error(&self, path: &JsonPath, default: &str, code: &str, got: String) -> SchemaErrors {
        let message = self
            .type_error_message
            .clone()
            .unwrap_or_else(|| default.to_string());
        SchemaErrors::single(
            SchemaError::new(path.clone(), message)
                .with_code(code)
                .with_got(got)
                .with_expected("integer"),
        )
    }
}

impl Default for IntegerSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Describe for IntegerSchema {
    fn describe(&self) -> SchemaDescription {
        SchemaDescription::scalar(ScalarKind::Integer).with_rules(self.rules.iter().cloned())
    }
}

impl SchemaLike for IntegerSchema {
    type Output = i64;

    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<i64, SchemaErrors> {
        let path = state.path();
        let n = match value {
            Value::Number(num) => match num.as_i64() {
                Some(n) => n,
                None if num.is_u64() => {
                    return Validation::Failure(self.type_error(
                        path,
                        "integer value too large for i64",
                        "overflow",
                        num.to_string(),
                    ))
                }
                None => {
                    return Validation::Failure(self.type_error(
                        path,
                        "expected integer, got float",
                        "invalid_type",
                        "float".to_string(),
                    ))
                }
            },
            _ => {
                return Validation::Failure(self.type_error(
                    path,
                    "expected integer",
                    "invalid_type",
                    value_type_name(value).to_string(),
                ))
            }
        };

        let mut errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, n, path))
            .collect();
        apply_key_rules(&self.rules, value, state, context, &mut errors);

        finish(n, errors)
    }

    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, state, context)
            .map(|n| Value::Number(n.into()))
    }
}

fn check_constraint(
    constraint: &IntegerConstraint,
    value: i64,
    path: &JsonPath,
) -> Option<SchemaError> {
    let (failed, message, default, code, expected) = match constraint {
        IntegerConstraint::Min { value: min, message } => (
            value < *min,
            message,
            format!("must be at least {}, got {}", min, value),
            "min_value",
            format!("at least {}", min),
        ),
        IntegerConstraint::Max { value: max, message } => (
            value > *max,
            message,
            format!("must be at most {}, got {}", max, value),
            "max_value",
            format!("at most {}", max),
        ),
        IntegerConstraint::Positive { message } => (
            value <= 0,
            message,
            format!("must be positive, got {}", value),
            "positive",
            "value > 0".to_string(),
        ),
        IntegerConstraint::NonNegative { message } => (
            value < 0,
            message,
            format!("must be non-negative, got {}", value),
            "non_negative",
            "value >= 0".to_string(),
        ),
    };

    failed.then(|| {
        SchemaError::new(path.clone(), message.clone().unwrap_or(default))
            .with_code(code)
            .with_expected(expected)
            .with_got(value.to_string())
    })
}

#[derive(Clone)]
enum NumberConstraint {
    Min { value: f64, message: Option<String> },
    Max { value: f64, message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
}

/// A schema for validating any JSON number, integral or not.
///
/// Key rules see the number exactly as written in the document, so a `pk`
/// on `1.5` collides only with another `1.5`.
///
/// # Example
///
/// ```rust
/// use keycheck::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::number().range(0.0..=1.0);
///
/// assert!(schema.validate(&json!(0.25), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!(1), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!(1.5), &JsonPath::root()).is_failure());
/// ```
#[derive(Clone)]
pub struct NumberSchema {
    constraints: Vec<NumberConstraint>,
    rules: Vec<KeyRule>,
    type_error_message: Option<String>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    pub fn min(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Min {
            value,
            message: None,
        });
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Shorthand for `.min(start).max(end)`.
    pub fn range(self, range: RangeInclusive<f64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    pub fn positive(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::Positive { message: None });
        self
    }

    pub fn non_negative(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::NonNegative { message: None });
        self
    }

    /// Requires the value to occur at the reference path `path` in the full document.
    pub fn fk(self, path: &str) -> Self {
        self.fk_with(path, FkOptions::new())
    }

    /// Like [`fk`](Self::fk), with parent-correlation options.
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

    /// Sets a custom error message for the most recent constraint, or the
    /// type error message when there is none yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(NumberConstraint::Min { message: m, .. })
            | Some(NumberConstraint::Max { message: m, .. })
            | Some(NumberConstraint::Positive { message: m })
            | Some(NumberConstraint::NonNegative { message: m }) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Describe for NumberSchema {
    fn describe(&self) -> SchemaDescription {
        SchemaDescription::scalar(ScalarKind::Number).with_rules(self.rules.iter().cloned())
    }
}

impl SchemaLike for NumberSchema {
    type Output = f64;

    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<f64, SchemaErrors> {
        let path = state.path();
        let Some(n) = value.as_f64() else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| "expected number".to_string());
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(path.clone(), message)
                    .with_code("invalid_type")
                    .with_got(value_type_name(value))
                    .with_expected("number"),
            ));
        };

        let mut errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_number_constraint(c, n, path))
            .collect();
        apply_key_rules(&self.rules, value, state, context, &mut errors);

        finish(n, errors)
    }

    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        // keep the number as written; 1 and 1.0 stay distinct
        self.validate_with_context(value, state, context)
            .map(|_| value.clone())
    }
}

fn check_number_constraint(
    constraint: &NumberConstraint,
    value: f64,
    path: &JsonPath,
) -> Option<SchemaError> {
    let (failed, message, default, code, expected) = match constraint {
        NumberConstraint::Min { value: min, message } => (
            value < *min,
            message,
            format!("must be at least {}, got {}", min, value),
            "min_value",
            format!("at least {}", min),
        ),
        NumberConstraint::Max { value: max, message } => (
            value > *max,
            message,
            format!("must be at most {}, got {}", max, value),
            "max_value",
            format!("at most {}", max),
        ),
        NumberConstraint::Positive { message } => (
            value <= 0.0,
            message,
            format!("must be positive, got {}", value),
            "positive",
            "value > 0".to_string(),
        ),
        NumberConstraint::NonNegative { message } => (
            value < 0.0,
            message,
            format!("must be non-negative, got {}", value),
            "non_negative",
            "value >= 0".to_string(),
        ),
    };

    failed.then(|| {
        SchemaError::new(path.clone(), message.clone().unwrap_or(default))
            .with_code(code)
            .with_expected(expected)
            .with_got(value.to_string())
    })
}
