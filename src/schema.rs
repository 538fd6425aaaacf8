//! Schema trees.
//!
//! A [`Schema`] mirrors the shape of the settings being loaded. Leaves are
//! variables, groups map keys to child nodes, and unions list alternative
//! groups that are tried in order.
//!
//! ```
//! use configvar::{boolean, number, string, Group, Schema};
//!
//! let schema: Schema = Group::new()
//!     .field("a", boolean())
//!     .field("b", Group::new()
//!         .field("c", string())
//!         .field("d", number().optional()))
//!     .into();
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use stillwater::Validation;

use crate::result::{failure, success, VarResult};
use crate::variable::{Kind, Variable};

/// A type-erased schema leaf.
///
/// Implemented for every [`Variable`] whose output is `Serialize`; parsed
/// values are converted to JSON so heterogeneous fields can share one tree.
pub trait Field: Send + Sync {
    /// Parse the raw input and convert the value to JSON.
    fn parse_field(&self, input: Option<&str>) -> VarResult<Value>;

    /// Data key set with `from`, if any.
    fn source_key(&self) -> Option<&str>;

    fn type_name(&self) -> String;

    fn description(&self) -> Option<&str>;
}

impl<K> Field for Variable<K>
where
    K: Kind,
    K::Output: Serialize,
{
    fn parse_field(&self, input: Option<&str>) -> VarResult<Value> {
        match self.parse(input) {
            Validation::Success(value) => match serde_json::to_value(&value) {
                Ok(json) => success(json),
                Err(e) => failure(format!("could not be represented: {}", e)),
            },
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }

    fn source_key(&self) -> Option<&str> {
        self.name()
    }

    fn type_name(&self) -> String {
        Variable::type_name(self)
    }

    fn description(&self) -> Option<&str> {
        Variable::description(self)
    }
}

/// A node of the settings schema.
#[derive(Clone)]
pub enum Schema {
    Leaf(Arc<dyn Field>),
    Group(Group),
    /// Alternatives tried in order; the first without issues wins.
    Union(Vec<Group>),
}

impl Schema {
    pub fn leaf<F: Field + 'static>(field: F) -> Self {
        Schema::Leaf(Arc::new(field))
    }

    pub fn union<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Group>,
    {
        Schema::Union(alternatives.into_iter().collect())
    }

    /// Number of leaves, counting every union alternative.
    pub fn leaf_count(&self) -> usize {
        match self {
            Schema::Leaf(_) => 1,
            Schema::Group(group) => group.fields.values().map(Schema::leaf_count).sum(),
            Schema::Union(alternatives) => alternatives
                .iter()
                .flat_map(|g| g.fields.values())
                .map(Schema::leaf_count)
                .sum(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Leaf(field) => match field.source_key() {
                Some(key) => write!(f, "Leaf({} from {:?})", field.type_name(), key),
                None => write!(f, "Leaf({})", field.type_name()),
            },
            Schema::Group(group) => fmt::Debug::fmt(group, f),
            Schema::Union(alternatives) => f.debug_tuple("Union").field(alternatives).finish(),
        }
    }
}

impl<K> From<Variable<K>> for Schema
where
    K: Kind,
    K::Output: Serialize,
{
    fn from(variable: Variable<K>) -> Self {
        Schema::leaf(variable)
    }
}

impl From<Group> for Schema {
    fn from(group: Group) -> Self {
        Schema::Group(group)
    }
}

impl From<Vec<Group>> for Schema {
    fn from(alternatives: Vec<Group>) -> Self {
        Schema::Union(alternatives)
    }
}

/// Keyed children of a schema node, kept in key order.
///
/// Fields are visited by sorted key, not in the order they were declared, so
/// resolution, issue lists and grouped reports all follow key order.
#[derive(Clone, Default)]
pub struct Group {
    fields: BTreeMap<String, Schema>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child node. A later field with the same key replaces the earlier.
    pub fn field(mut self, key: impl Into<String>, node: impl Into<Schema>) -> Self {
        self.fields.insert(key.into(), node.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}
