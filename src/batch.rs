//! Parallel validation of independent documents.

use rayon::prelude::*;
use serde_json::Value;
use stillwater::Validation;

use crate::error::SchemaErrors;
use crate::schema::SchemaLike;
use crate::validation::ValidationContext;

/// Validates every document against `schema`, each as its own pass.
///
/// Each document gets a fresh [`ValidationContext`] holding that document
/// and `schema`, so foreign keys in one document never resolve against
/// another. Results are returned in input order.
///
/// # Example
///
/// ```rust
/// use keycheck::{batch::validate_documents, Schema};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("people", Schema::array(Schema::object().field("personId", Schema::integer())))
///     .field("friends", Schema::array(Schema::integer().fk("people.[].personId")));
///
/// let documents = vec![
///     json!({"people": [{"personId": 0}], "friends": [0]}),
///     json!({"people": [{"personId": 1}], "friends": [0]}),
/// ];
/// let results = validate_documents(&schema, &documents);
/// assert!(results[0].is_success());
/// assert!(results[1].is_failure());
/// ```
pub fn validate_documents<S>(
    schema: &S,
    documents: &[Value],
) -> Vec<Validation<S::Output, SchemaErrors>>
where
    S: SchemaLike,
    S::Output: Send,
{
    documents
        .par_iter()
        .map(|document| {
            let context = ValidationContext::new()
                .with_data(document)
                .with_schema(schema);
            schema.validate_in(document, &context)
        })
        .collect()
}
