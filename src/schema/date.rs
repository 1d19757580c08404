//! Date schema validation.
//!
//! A date is written either as a string (RFC 3339, or a bare `YYYY-MM-DD`
//! calendar date taken as midnight UTC) or as an integer count of
//! milliseconds since the Unix epoch.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use stillwater::Validation;

use crate::describe::{Describe, ScalarKind, SchemaDescription};
use crate::error::{SchemaError, SchemaErrors};
use crate::keys::{FkOptions, ForeignKey, KeyRule};
use crate::path::JsonPath;
use crate::validation::{ValidationContext, ValidationState};

use super::rules::{apply_key_rules, finish, value_type_name};
use super::traits::SchemaLike;

#[derive(Clone)]
enum DateConstraint {
    Min {
        value: DateTime<Utc>,
        message: Option<String>,
    },
    Max {
        value: DateTime<Utc>,
        message: Option<String>,
    },
}

/// A schema for validating dates.
///
/// Bounds compare instants, but key rules compare the JSON value as written:
/// `"2020-01-01"` and `"2020-01-01T00:00:00Z"` are different keys.
///
/// # Example
///
/// ```rust
/// use keycheck::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::date().pk();
///
/// assert!(schema.validate(&json!("2021-03-04"), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!("2021-03-04T10:00:00+02:00"), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!(1614816000000_i64), &JsonPath::root()).is_success());
/// assert!(schema.validate(&json!("next tuesday"), &JsonPath::root()).is_failure());
/// ```
#[derive(Clone)]
pub struct DateSchema {
    constraints: Vec<DateConstraint>,
    rules: Vec<KeyRule>,
    type_error_message: Option<String>,
}

impl DateSchema {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    /// The date must not be earlier than `value`.
    pub fn min(mut self, value: DateTime<Utc>) -> Self {
        self.constraints.push(DateConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// The date must not be later than `value`.
    pub fn max(mut self, value: DateTime<Utc>) -> Self {
        self.constraints.push(DateConstraint::Max {
            value,
            message: None,
        });
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
            Some(DateConstraint::Min { message: m, .. })
            | Some(DateConstraint::Max { message: m, .. }) => *m = Some(message.into()),
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
                .with_expected("date"),
        )
    }
}

impl Default for DateSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an RFC 3339 timestamp or a bare calendar date.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

impl Describe for DateSchema {
    fn describe(&self) -> SchemaDescription {
        SchemaDescription::scalar(ScalarKind::Date).with_rules(self.rules.iter().cloned())
    }
}

impl SchemaLike for DateSchema {
    type Output = DateTime<Utc>;

    fn validate_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<DateTime<Utc>, SchemaErrors> {
        let path = state.path();
        let parsed = match value {
            Value::String(s) => parse_date(s).ok_or_else(|| {
                self.type_error(path, "expected a date", "invalid_date", s.clone())
            }),
            Value::Number(num) => num
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .ok_or_else(|| {
                    self.type_error(
                        path,
                        "expected milliseconds since the epoch",
                        "invalid_date",
                        num.to_string(),
                    )
                }),
            _ => Err(self.type_error(
                path,
                "expected date",
                "invalid_type",
                value_type_name(value).to_string(),
            )),
        };
        let date = match parsed {
            Ok(date) => date,
            Err(errors) => return Validation::Failure(errors),
        };

        let mut errors: Vec<SchemaError> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, &date, path))
            .collect();
        apply_key_rules(&self.rules, value, state, context, &mut errors);

        finish(date, errors)
    }

    fn validate_to_value_with_context<'v>(
        &self,
        value: &'v Value,
        state: &ValidationState<'v>,
        context: &ValidationContext<'_>,
    ) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, state, context)
            .map(|_| value.clone())
    }
}

fn check_constraint(
    constraint: &DateConstraint,
    date: &DateTime<Utc>,
    path: &JsonPath,
) -> Option<SchemaError> {
    let (failed, message, default, code, expected) = match constraint {
        DateConstraint::Min { value: min, message } => (
            date < min,
            message,
            format!("must not be before {}", min.to_rfc3339()),
            "min_date",
            format!("on or after {}", min.to_rfc3339()),
        ),
        DateConstraint::Max { value: max, message } => (
            date > max,
            message,
            format!("must not be after {}", max.to_rfc3339()),
            "max_date",
            format!("on or before {}", max.to_rfc3339()),
        ),
    };

    failed.then(|| {
        SchemaError::new(path.clone(), message.clone().unwrap_or(default))
            .with_code(code)
            .with_expected(expected)
            .with_got(date.to_rfc3339())
    })
}
