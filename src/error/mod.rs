//! Error types for validation failures.
//!
//! [`SchemaError`] and [`SchemaErrors`] are what validation returns.
//! [`IntegrityError`] is the typed failure of the key rules before it is
//! placed at a path and folded into a [`SchemaError`].

mod integrity;
mod schema_error;

pub use integrity::{CompositeKey, ErrorTier, IntegrityError};
pub use schema_error::{SchemaError, SchemaErrors};
