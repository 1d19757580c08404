//! # keycheck
//!
//! Foreign-key and primary-key integrity rules for JSON validation that
//! accumulates all errors instead of stopping at the first.
//!
//! ## Overview
//!
//! Schemas are built with [`Schema`] and validate `serde_json::Value`s into
//! stillwater `Validation`s. On top of the usual type and constraint checks,
//! three rules relate values in different parts of one document:
//!
//! - `fk(path)` on a scalar: the value must occur at the reference path,
//!   e.g. `makes.[].makeId`. A path with two `[]` wildcards names a nested
//!   collection and is correlated through a sibling field with
//!   [`FkOptions`].
//! - `pk()` on an object field: marks the field as part of the record's
//!   composite primary key.
//! - `unique_on_pks()` on an array: no two items may share a primary key.
//!
//! The rules need the whole document and the whole schema, which are passed
//! in a [`ValidationContext`].
//!
//! ## Example
//!
//! ```rust
//! use keycheck::{Schema, SchemaLike, ValidationContext};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field(
//!         "makes",
//!         Schema::array(Schema::object().field("makeId", Schema::string().pk())).unique_on_pks(),
//!     )
//!     .field(
//!         "models",
//!         Schema::array(
//!             Schema::object()
//!                 .field("modelId", Schema::string())
//!                 .field("makeId", Schema::string().fk("makes.[].makeId")),
//!         ),
//!     );
//!
//! let data = json!({
//!     "makes": [{"makeId": "ford"}, {"makeId": "mazda"}],
//!     "models": [
//!         {"modelId": "laser", "makeId": "ford"},
//!         {"modelId": "skyline", "makeId": "nissan"},
//!     ],
//! });
//!
//! let context = ValidationContext::new().with_data(&data).with_schema(&schema);
//! let errors = schema.validate_in(&data, &context).into_result().unwrap_err();
//!
//! assert_eq!(errors.len(), 1);
//! assert_eq!(
//!     errors.first().message,
//!     r#""nissan" could not be found as a reference to "makes.[].makeId""#
//! );
//! ```

pub mod batch;
pub mod describe;
pub mod error;
pub mod keys;
pub mod path;
pub mod schema;
pub mod validation;

pub use describe::{Describe, DescribedKind, ScalarKind, SchemaDescription};
pub use error::{CompositeKey, ErrorTier, IntegrityError, SchemaError, SchemaErrors};
pub use keys::{FkOptions, ForeignKey, KeyRule};
pub use path::{JsonPath, PathSegment, PathShape, RefPath, RefSegment};
pub use schema::{
    ArraySchema, DateSchema, IntegerSchema, NumberSchema, ObjectSchema, Schema, SchemaLike,
    StringSchema,
};
pub use validation::{ValidationContext, ValidationState};

/// Type alias for validation results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
