//! Per-pass validation context and per-node validation state.
//!
//! A validation pass threads two things down the schema tree:
//!
//! - [`ValidationContext`]: shared by every node of one pass. It carries the
//!   full document and the full schema the key rules resolve against, and
//!   memoizes the schema description the first time a rule asks for it.
//! - [`ValidationState`]: the position of the node being validated, as its
//!   path and the chain of ancestor values from the root to its parent.

use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;

use crate::describe::{Describe, SchemaDescription};
use crate::path::JsonPath;

/// Shared state for one validation pass.
///
/// The key rules need the whole document (to look up foreign keys) and the
/// whole schema (to discover other fields' rules), even when the value
/// being validated is a sub-document. Neither is required for plain
/// validation; a rule that needs a missing one reports a configuration error.
///
/// # Example
///
/// ```rust
/// use keycheck::{Schema, SchemaLike, ValidationContext};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("makes", Schema::array(Schema::object().field("makeId", Schema::string())))
///     .field("models", Schema::array(
///         Schema::object().field("makeId", Schema::string().fk("makes.[].makeId")),
///     ));
///
/// let data = json!({
///     "makes": [{"makeId": "ford"}],
///     "models": [{"makeId": "ford"}],
/// });
///
/// let context = ValidationContext::new().with_data(&data).with_schema(&schema);
/// assert!(schema.validate_in(&data, &context).is_success());
/// ```
#[derive(Default)]
pub struct ValidationContext<'a> {
    data: Option<&'a Value>,
    schema: Option<&'a dyn Describe>,
    description: OnceLock<SchemaDescription>,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context with neither document nor schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the full document that foreign keys are resolved against.
    pub fn with_data(mut self, data: &'a Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Supplies the full schema whose description the key rules inspect.
    pub fn with_schema(mut self, schema: &'a dyn Describe) -> Self {
        self.schema = Some(schema);
        self.description = OnceLock::new();
        self
    }

    /// Returns the full document, if one was supplied.
    pub fn data(&self) -> Option<&'a Value> {
        self.data
    }

    /// Returns true if a schema was supplied.
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Returns the description of the supplied schema, computing it on first use.
    ///
    /// Returns `None` if no schema was supplied.
    pub fn description(&self) -> Option<&SchemaDescription> {
        let schema = self.schema?;
        Some(self.description.get_or_init(|| schema.describe()))
    }
}

impl fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("has_data", &self.data.is_some())
            .field("has_schema", &self.schema.is_some())
            .field("described", &self.description.get().is_some())
            .finish()
    }
}

/// Where the node being validated sits in the document.
///
/// Like [`JsonPath`], states are immutable: descending returns a new state
/// whose ancestor chain ends with the value that was descended from.
#[derive(Debug, Clone, Default)]
pub struct ValidationState<'v> {
    path: JsonPath,
    ancestors: Vec<&'v Value>,
}

impl<'v> ValidationState<'v> {
    /// Creates the state of the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a state at `path` with no known ancestors.
    pub fn at(path: JsonPath) -> Self {
        Self {
            path,
            ancestors: Vec::new(),
        }
    }

    /// Creates a state from a path and an explicit ancestor chain (root first).
    pub fn with_ancestors(path: JsonPath, ancestors: Vec<&'v Value>) -> Self {
        Self { path, ancestors }
    }

    /// Returns the state of field `name` inside `parent`.
    pub fn push_field(&self, parent: &'v Value, name: impl Into<String>) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(parent);
        Self {
            path: self.path.push_field(name),
            ancestors,
        }
    }

    /// Returns the state of element `index` inside `parent`.
    pub fn push_index(&self, parent: &'v Value, index: usize) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(parent);
        Self {
            path: self.path.push_index(index),
            ancestors,
        }
    }

    /// Returns the path of the current node.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Returns the ancestor chain, root first.
    pub fn ancestors(&self) -> &[&'v Value] {
        &self.ancestors
    }

    /// Returns the immediate parent value.
    pub fn parent(&self) -> Option<&'v Value> {
        self.ancestors.last().copied()
    }

    /// Returns the nearest ancestor that is an object.
    pub fn enclosing_record(&self) -> Option<&'v Value> {
        self.ancestors.iter().rev().copied().find(|v| v.is_object())
    }
}
