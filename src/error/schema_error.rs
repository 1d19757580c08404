//! Schema validation error types.
//!
//! This module provides [`SchemaError`] for single validation failures and
//! [`SchemaErrors`] for accumulating multiple errors.

use std::fmt::{self, Display};

use serde_json::{Map, Value};
use stillwater::prelude::*;

use crate::path::JsonPath;

/// A single validation error with full context.
///
/// - **path**: where in the document the error occurred
/// - **message**: human-readable description of the failure
/// - **code**: machine-readable identifier (`fkNotFound`, `min_length`, ...)
/// - **got** / **expected**: optional short descriptions of the mismatch
/// - **details**: structured data for the failure, such as the offending
///   value and the reference path of a foreign key
///
/// # Example
///
/// ```rust
/// use keycheck::{JsonPath, SchemaError};
/// use serde_json::json;
///
/// let error = SchemaError::new(
///     JsonPath::root().push_field("makeId"),
///     "\"nissan\" could not be found as a reference to \"makes.[].makeId\"",
/// )
/// .with_code("fkNotFound")
/// .with_detail("value", json!("nissan"))
/// .with_detail("path", json!("makes.[].makeId"));
///
/// assert_eq!(error.code, "fkNotFound");
/// assert_eq!(error.details["value"], json!("nissan"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// The path to the value that failed validation.
    pub path: JsonPath,
    /// Human-readable error message.
    pub message: String,
    /// The actual value that was received (formatted as string).
    pub got: Option<String>,
    /// Description of what was expected.
    pub expected: Option<String>,
    /// Machine-readable error code.
    pub code: String,
    /// Structured detail data, keyed by name.
    pub details: Map<String, Value>,
}

impl SchemaError {
    /// Creates a new schema error with the given path and message.
    ///
    /// The error code defaults to "validation_error".
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
            details: Map::new(),
        }
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the "got" (actual value) field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Adds one named detail and returns self for chaining.
    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Replaces all details and returns self for chaining.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = details;
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)?;
        } else {
            write!(f, "{}: {}", self.path, self.message)?;
        }

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
};

/// A non-empty collection of schema validation errors.
///
/// `SchemaErrors` wraps a `NonEmptyVec<SchemaError>` so that a failed
/// `Validation` always carries at least one error. It implements `Semigroup`,
/// which is how errors from sibling fields are accumulated.
///
/// ```rust
/// use keycheck::{JsonPath, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let models = SchemaErrors::single(
///     SchemaError::new(JsonPath::root().push_field("models"), "bad model")
/// );
/// let makes = SchemaErrors::single(
///     SchemaError::new(JsonPath::root().push_field("makes"), "bad make")
/// );
///
/// assert_eq!(models.combine(makes).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Creates a `SchemaErrors` containing a single error.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `SchemaErrors` from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<SchemaError>) -> Self {
        Self(errors)
    }

    /// Creates a `SchemaErrors` from a `Vec`, or `None` if the vec is empty.
    pub fn try_from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = errors.next()?;
        Some(errors.fold(Self::single(head), |acc, error| {
            acc.combine(Self::single(error))
        }))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns all errors at the specified path.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors with the specified error code.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<SchemaError>`.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}
