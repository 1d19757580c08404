//! Foreign-key and primary-key integrity rules.
//!
//! - [`schema_locator`] walks a [`SchemaDescription`](crate::SchemaDescription)
//!   along a data path and finds the rules attached to the node it reaches.
//! - [`value_locator`] walks a document along a [`RefPath`] to decide whether
//!   a value occurs there.
//! - [`foreign`] is the `fk` rule built on both locators.
//! - [`primary`] extracts primary-key fields and enforces `uniqueOnPks`.

pub mod foreign;
pub mod primary;
pub mod schema_locator;
pub mod value_locator;

use serde_json::{json, Map, Value};

use crate::path::RefPath;

pub use foreign::check_foreign_key;
pub use primary::{check_unique_on_pks, find_duplicate, primary_key_fields};
pub use schema_locator::{find_foreign_key, find_rule_on_field, locate_array_element_node, locate_node};
pub use value_locator::{exists, ParentCorrelation};

/// Options of a foreign-key rule whose target path has two wildcards.
///
/// Both options name the sibling field whose own foreign key selects the
/// outer array element. `parent_field_name` resolves the sibling next to the
/// validated field; `parent_field_path` is a full reference path to it and
/// is needed when validation starts below the document root. If both are
/// set, `parent_field_name` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FkOptions {
    pub parent_field_name: Option<String>,
    pub parent_field_path: Option<String>,
}

impl FkOptions {
    /// Creates options with no parent correlation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Correlates through the sibling field `name`.
    pub fn parent_field_name(mut self, name: impl Into<String>) -> Self {
        self.parent_field_name = Some(name.into());
        self
    }

    /// Correlates through the field at the full reference path `path`.
    pub fn parent_field_path(mut self, path: impl Into<String>) -> Self {
        self.parent_field_path = Some(path.into());
        self
    }

    /// Returns true if either correlation option is set.
    pub fn has_parent(&self) -> bool {
        self.parent_field_name.is_some() || self.parent_field_path.is_some()
    }
}

/// A foreign-key rule: the value must occur at `path` in the full document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    path: RefPath,
    options: FkOptions,
}

impl ForeignKey {
    /// Creates a foreign key targeting the reference path `path`.
    pub fn new(path: &str, options: FkOptions) -> Self {
        Self {
            path: RefPath::parse(path),
            options,
        }
    }

    /// Returns the target reference path.
    pub fn path(&self) -> &RefPath {
        &self.path
    }

    /// Returns the correlation options.
    pub fn options(&self) -> &FkOptions {
        &self.options
    }

    fn to_json(&self) -> Value {
        let mut arg = Map::new();
        arg.insert("path".to_string(), json!(self.path.as_str()));
        if let Some(name) = &self.options.parent_field_name {
            arg.insert("parentFieldName".to_string(), json!(name));
        }
        if let Some(path) = &self.options.parent_field_path {
            arg.insert("parentFieldPath".to_string(), json!(path));
        }
        Value::Object(arg)
    }
}

/// A key rule attached to a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRule {
    /// `fk`: the value must reference a value elsewhere in the document.
    ForeignKey(ForeignKey),
    /// `pk`: marks a scalar field as part of its record's primary key.
    PrimaryKey,
    /// `uniqueOnPks`: no two elements of the array share a primary key.
    UniqueOnPks,
}

impl KeyRule {
    /// Returns the rule's name.
    pub fn name(&self) -> &'static str {
        match self {
            KeyRule::ForeignKey(_) => "fk",
            KeyRule::PrimaryKey => "pk",
            KeyRule::UniqueOnPks => "uniqueOnPks",
        }
    }

    /// Returns the foreign key if this is an `fk` rule.
    pub fn as_foreign_key(&self) -> Option<&ForeignKey> {
        match self {
            KeyRule::ForeignKey(fk) => Some(fk),
            _ => None,
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            KeyRule::ForeignKey(fk) => json!({ "name": self.name(), "arg": fk.to_json() }),
            _ => json!({ "name": self.name() }),
        }
    }
}
