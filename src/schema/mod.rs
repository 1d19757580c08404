//! Schema definitions for validation.
//!
//! Each schema type validates one kind of JSON value and accumulates all
//! errors rather than stopping at the first. Scalar schemas can carry `fk`
//! and `pk` rules; array schemas can carry `uniqueOnPks`.
//!
//! # Example
//!
//! ```rust
//! use keycheck::{JsonPath, Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! let result = schema.validate(&json!("hello"), &JsonPath::root());
//! assert!(result.is_success());
//! ```

mod array;
mod date;
mod numeric;
mod object;
mod rules;
mod string;
mod traits;

pub use array::ArraySchema;
pub use date::DateSchema;
pub use numeric::{IntegerSchema, NumberSchema};
pub use object::ObjectSchema;
pub use string::StringSchema;
pub use traits::SchemaLike;

/// Entry point for creating validation schemas.
///
/// # Example
///
/// ```rust
/// use keycheck::{FkOptions, Schema};
///
/// let vehicle = Schema::object()
///     .field("makeId", Schema::string().fk("makes.[].makeId"))
///     .field(
///         "modelId",
///         Schema::string().fk_with(
///             "makes.[].models.[].modelId",
///             FkOptions::new().parent_field_name("makeId"),
///         ),
///     );
/// let vehicles = Schema::array(vehicle);
/// ```
pub struct Schema;

impl Schema {
    /// Creates a new string schema.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a new integer schema. Floats are rejected.
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    /// Creates a new number schema accepting integers and decimals.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a new date schema.
    pub fn date() -> DateSchema {
        DateSchema::new()
    }

    /// Creates a new object schema with no fields.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates a new array schema whose items are validated by `item_schema`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keycheck::{JsonPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::array(Schema::integer()).non_empty();
    ///
    /// assert!(schema.validate(&json!([0, 1]), &JsonPath::root()).is_success());
    /// assert!(schema.validate(&json!([]), &JsonPath::root()).is_failure());
    /// ```
    pub fn array<S: SchemaLike>(item_schema: S) -> ArraySchema<S> {
        ArraySchema::new(item_schema)
    }
}
