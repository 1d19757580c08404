//! Self-descriptions of schemas.
//!
//! A [`SchemaDescription`] mirrors the shape of a schema (objects with named
//! children, arrays with one element description, scalars) together with the
//! key rules attached at each node. Rules on one field use it to inspect the
//! rules declared on another field or array.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::keys::KeyRule;

/// Produces the description of a schema.
///
/// Every schema type implements this; the validation context calls it at
/// most once per pass.
pub trait Describe: Send + Sync {
    /// Describes this schema and everything nested in it.
    fn describe(&self) -> SchemaDescription;
}

/// The kind of scalar a leaf schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Date,
}

impl ScalarKind {
    /// Returns the type name used in the JSON rendering.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Date => "date",
        }
    }
}

/// The shape of a described node.
#[derive(Debug, Clone, PartialEq)]
pub enum DescribedKind {
    /// An object with named child fields, in declaration order.
    Object(IndexMap<String, SchemaDescription>),
    /// An array whose elements are all described by one node.
    Array(Option<Box<SchemaDescription>>),
    /// A leaf value.
    Scalar(ScalarKind),
}

/// A read-only description of a schema node and the key rules attached to it.
///
/// # Example
///
/// ```rust
/// use keycheck::{Describe, DescribedKind, KeyRule, Schema};
///
/// let schema = Schema::array(
///     Schema::object()
///         .field("countryId", Schema::integer().pk())
///         .field("countryName", Schema::string()),
/// )
/// .unique_on_pks();
///
/// let description = schema.describe();
/// assert!(description.has_rule("uniqueOnPks"));
///
/// let element = description.element().unwrap();
/// let country_id = &element.children().unwrap()["countryId"];
/// assert_eq!(country_id.rules(), &[KeyRule::PrimaryKey]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescription {
    kind: DescribedKind,
    rules: Vec<KeyRule>,
}

impl SchemaDescription {
    /// Creates a description with no rules.
    pub fn new(kind: DescribedKind) -> Self {
        Self {
            kind,
            rules: Vec::new(),
        }
    }

    /// Describes an object from its children.
    pub fn object(children: IndexMap<String, SchemaDescription>) -> Self {
        Self::new(DescribedKind::Object(children))
    }

    /// Describes an array from its element description.
    pub fn array(element: SchemaDescription) -> Self {
        Self::new(DescribedKind::Array(Some(Box::new(element))))
    }

    /// Describes a scalar.
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::new(DescribedKind::Scalar(kind))
    }

    /// Attaches rules and returns self for chaining.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = KeyRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Returns the shape of this node.
    pub fn kind(&self) -> &DescribedKind {
        &self.kind
    }

    /// Returns the rules attached to this node.
    pub fn rules(&self) -> &[KeyRule] {
        &self.rules
    }

    /// Returns the first rule called `name`.
    pub fn rule(&self, name: &str) -> Option<&KeyRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    /// Returns true if a rule called `name` is attached.
    pub fn has_rule(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }

    /// Returns the children if this is an object node.
    pub fn children(&self) -> Option<&IndexMap<String, SchemaDescription>> {
        match &self.kind {
            DescribedKind::Object(children) => Some(children),
            _ => None,
        }
    }

    /// Returns the element description if this is an array node that has one.
    pub fn element(&self) -> Option<&SchemaDescription> {
        match &self.kind {
            DescribedKind::Array(element) => element.as_deref(),
            _ => None,
        }
    }

    /// Returns true for array nodes.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, DescribedKind::Array(_))
    }

    /// Returns the type name of this node (`object`, `array`, `string`, ...).
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            DescribedKind::Object(_) => "object",
            DescribedKind::Array(_) => "array",
            DescribedKind::Scalar(kind) => kind.name(),
        }
    }

    /// Renders the description as JSON.
    ///
    /// Objects list their `children`, arrays their `items`, and every node
    /// with rules lists them as `{"name": ..., "arg": ...}`.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), json!(self.type_name()));
        match &self.kind {
            DescribedKind::Object(children) => {
                let children: Map<String, Value> = children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_json()))
                    .collect();
                out.insert("children".to_string(), Value::Object(children));
            }
            DescribedKind::Array(Some(element)) => {
                out.insert("items".to_string(), json!([element.to_json()]));
            }
            DescribedKind::Array(None) | DescribedKind::Scalar(_) => {}
        }
        if !self.rules.is_empty() {
            let rules: Vec<Value> = self.rules.iter().map(KeyRule::to_json).collect();
            out.insert("rules".to_string(), Value::Array(rules));
        }
        Value::Object(out)
    }
}
