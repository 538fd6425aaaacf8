//! Settings resolution over a schema tree.
//!
//! [`parse_results`] keeps every leaf's outcome so callers can inspect
//! partial success. [`parse_values`] evaluates every leaf too, but is
//! all-or-nothing: any failing leaf turns the whole call into
//! [`SettingsError::Invalid`] carrying every issue found.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use stillwater::Validation;
use tracing::{debug, trace};

use crate::error::{format_path, PathSegment, SchemaError, SettingsError, VariableIssue, VariableIssues};
use crate::result::VarResult;
use crate::schema::{Field, Group, Schema};
use crate::source::Data;

/// Per-leaf outcomes, shaped like the schema that produced them.
#[derive(Debug, Clone)]
pub enum ResultTree {
    Leaf(VarResult<Value>),
    Group(BTreeMap<String, ResultTree>),
    /// One entry per union alternative, in order.
    Union(Vec<BTreeMap<String, ResultTree>>),
}

impl ResultTree {
    /// Child of a group node.
    pub fn get(&self, key: &str) -> Option<&ResultTree> {
        match self {
            ResultTree::Group(children) => children.get(key),
            _ => None,
        }
    }

    /// Follow a chain of group keys.
    pub fn at(&self, path: &[&str]) -> Option<&ResultTree> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Alternative `index` of a union node.
    pub fn alternative(&self, index: usize) -> Option<&BTreeMap<String, ResultTree>> {
        match self {
            ResultTree::Union(alternatives) => alternatives.get(index),
            _ => None,
        }
    }

    pub fn leaf(&self) -> Option<&VarResult<Value>> {
        match self {
            ResultTree::Leaf(result) => Some(result),
            _ => None,
        }
    }

    /// Whether this subtree would resolve without issues.
    ///
    /// A union succeeds when at least one alternative does.
    pub fn is_success(&self) -> bool {
        match self {
            ResultTree::Leaf(result) => result.is_success(),
            ResultTree::Group(children) => children.values().all(ResultTree::is_success),
            ResultTree::Union(alternatives) => alternatives
                .iter()
                .any(|alt| alt.values().all(ResultTree::is_success)),
        }
    }
}

fn root_key(field: &dyn Field) -> Result<&str, SchemaError> {
    field.source_key().ok_or(SchemaError::UnnamedVariable)
}

fn parse_leaf(field: &dyn Field, key: &str, data: &Data) -> VarResult<Value> {
    let lookup = field.source_key().unwrap_or(key);
    let input = data.get(lookup);
    trace!(key = lookup, present = input.is_some(), "parsing leaf");
    field.parse_field(input)
}

/// Parse every leaf and return the outcomes without failing on bad input.
///
/// A leaf reads the data key set with `from`, or else its key in the
/// enclosing group.
///
/// # Errors
///
/// Only schema misuse is an error: a bare variable root without a name, or
/// a union with no alternatives.
///
/// # Example
///
/// ```
/// use configvar::{boolean, number, parse_results, string, Data, Group};
///
/// let schema = Group::new()
///     .field("a", boolean())
///     .field("b", Group::new()
///         .field("c", string())
///         .field("d", number().optional()))
///     .into();
/// let data = Data::new().with("a", "true");
///
/// let tree = parse_results(&schema, &data).unwrap();
/// assert!(tree.at(&["a"]).unwrap().is_success());
/// assert!(!tree.at(&["b", "c"]).unwrap().is_success());
/// assert!(tree.at(&["b", "d"]).unwrap().is_success());
/// ```
pub fn parse_results(schema: &Schema, data: &Data) -> Result<ResultTree, SchemaError> {
    debug!(leaves = schema.leaf_count(), keys = data.len(), "collecting settings results");
    match schema {
        Schema::Leaf(field) => {
            let key = root_key(field.as_ref())?;
            Ok(ResultTree::Leaf(parse_leaf(field.as_ref(), key, data)))
        }
        other => results_node(other, "", &mut Vec::new(), data),
    }
}

fn results_node(
    schema: &Schema,
    key: &str,
    path: &mut Vec<PathSegment>,
    data: &Data,
) -> Result<ResultTree, SchemaError> {
    match schema {
        Schema::Leaf(field) => Ok(ResultTree::Leaf(parse_leaf(field.as_ref(), key, data))),
        Schema::Group(group) => results_group(group, path, data).map(ResultTree::Group),
        Schema::Union(alternatives) => {
            if alternatives.is_empty() {
                return Err(SchemaError::EmptyUnion {
                    path: format_path(path),
                });
            }
            let mut out = Vec::with_capacity(alternatives.len());
            for (index, group) in alternatives.iter().enumerate() {
                path.push(PathSegment::Index(index));
                let tree = results_group(group, path, data);
                path.pop();
                out.push(tree?);
            }
            Ok(ResultTree::Union(out))
        }
    }
}

fn results_group(
    group: &Group,
    path: &mut Vec<PathSegment>,
    data: &Data,
) -> Result<BTreeMap<String, ResultTree>, SchemaError> {
    let mut out = BTreeMap::new();
    for (key, child) in group.iter() {
        path.push(PathSegment::Key(key.clone()));
        let tree = results_node(child, key, path, data);
        path.pop();
        out.insert(key.clone(), tree?);
    }
    Ok(out)
}

/// Collects values and issues during a single `parse_values` walk.
struct Walker<'a> {
    data: &'a Data,
    path: Vec<PathSegment>,
    issues: Vec<VariableIssue>,
}

impl<'a> Walker<'a> {
    fn new(data: &'a Data) -> Self {
        Self {
            data,
            path: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn leaf(&mut self, field: &dyn Field, key: &str) -> Value {
        match parse_leaf(field, key, self.data) {
            Validation::Success(value) => value,
            Validation::Failure(issues) => {
                self.issues
                    .push(VariableIssue::new(self.path.clone(), issues.to_vec()));
                Value::Null
            }
        }
    }

    fn node(&mut self, schema: &Schema, key: &str) -> Result<Value, SchemaError> {
        match schema {
            Schema::Leaf(field) => Ok(self.leaf(field.as_ref(), key)),
            Schema::Group(group) => self.group(group),
            Schema::Union(alternatives) => self.union(alternatives),
        }
    }

    fn group(&mut self, group: &Group) -> Result<Value, SchemaError> {
        let mut out = Map::new();
        for (key, child) in group.iter() {
            self.path.push(PathSegment::Key(key.clone()));
            let value = self.node(child, key);
            self.path.pop();
            out.insert(key.clone(), value?);
        }
        Ok(Value::Object(out))
    }

    fn union(&mut self, alternatives: &[Group]) -> Result<Value, SchemaError> {
        if alternatives.is_empty() {
            return Err(SchemaError::EmptyUnion {
                path: format_path(&self.path),
            });
        }

        let outer = std::mem::take(&mut self.issues);
        let mut rejected = Vec::new();
        let mut accepted = None;

        for (index, group) in alternatives.iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            let value = self.group(group);
            self.path.pop();
            let value = value?;

            let alt_issues = std::mem::take(&mut self.issues);
            if alt_issues.is_empty() {
                trace!(path = %format_path(&self.path), index, "union alternative accepted");
                accepted = Some(value);
                break;
            }
            rejected.extend(alt_issues);
        }

        self.issues = outer;
        match accepted {
            Some(value) => Ok(value),
            None => {
                self.issues.extend(rejected);
                Ok(Value::Null)
            }
        }
    }
}

/// Parse every leaf and return the assembled value tree, or every issue.
///
/// Groups become JSON objects and absent optional leaves become `null`. A
/// union resolves to its first alternative without issues; if none
/// succeeds, the issues of all alternatives are reported with the
/// alternative index in their path.
///
/// # Errors
///
/// - [`SettingsError::Schema`] for schema misuse
/// - [`SettingsError::Invalid`] when any leaf failed
///
/// # Example
///
/// ```
/// use configvar::{boolean, number, parse_values, string, Data, Group, SettingsError};
///
/// let schema = Group::new()
///     .field("a", boolean())
///     .field("b", Group::new()
///         .field("c", string())
///         .field("d", number().optional()))
///     .into();
///
/// let err = parse_values(&schema, &Data::new().with("a", "t")).unwrap_err();
/// let issues = err.issues().unwrap();
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues.first().path(), "b.c");
/// ```
pub fn parse_values(schema: &Schema, data: &Data) -> Result<Value, SettingsError> {
    debug!(leaves = schema.leaf_count(), keys = data.len(), "resolving settings");
    let mut walker = Walker::new(data);

    let value = match schema {
        Schema::Leaf(field) => {
            let key = root_key(field.as_ref())?;
            walker.path.push(PathSegment::Key(key.to_string()));
            walker.leaf(field.as_ref(), key)
        }
        other => walker.node(other, "")?,
    };

    match VariableIssues::from_vec(walker.issues) {
        None => {
            debug!("settings resolved");
            Ok(value)
        }
        Some(issues) => {
            debug!(issues = issues.len(), "settings failed to resolve");
            Err(SettingsError::Invalid(issues))
        }
    }
}

/// Resolve the schema and deserialize the value tree into `T`.
///
/// # Errors
///
/// Everything [`parse_values`] reports, plus
/// [`SettingsError::Deserialize`] when the tree does not fit `T`.
pub fn parse_settings<T>(schema: &Schema, data: &Data) -> Result<T, SettingsError>
where
    T: DeserializeOwned,
{
    let value = parse_values(schema, data)?;
    deserialize_settings(value)
}

pub(crate) fn deserialize_settings<T: DeserializeOwned>(value: Value) -> Result<T, SettingsError> {
    serde_path_to_error::deserialize(value).map_err(|err| SettingsError::Deserialize {
        path: err.path().to_string(),
        message: err.inner().to_string(),
    })
}
