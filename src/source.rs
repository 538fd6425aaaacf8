//! Flat input data and the `Source` trait.
//!
//! Every producer of raw settings (environment, `.env` text, JSON objects)
//! yields a [`Data`] map. Resolution only ever reads from that map.

use std::collections::{BTreeMap, HashMap};

use crate::env::DataEnv;
use crate::error::SourceError;

/// Flat map from data keys to raw string values.
///
/// A key that is not present is an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Data {
    values: BTreeMap<String, String>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Data::new();
        data.extend(iter);
        data
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Data {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl From<HashMap<String, String>> for Data {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Data {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl IntoIterator for Data {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// A producer of flat data.
///
/// Sources perform I/O through the `DataEnv` trait so they can be tested
/// with `MockEnv`.
///
/// ```ignore
/// impl Source for MySource {
///     fn load(&self, env: &dyn DataEnv) -> Result<Data, SourceError> {
///         let content = env.read_file(&self.path).map_err(|e| SourceError::Io {
///             source_name: self.name().to_string(),
///             message: e.to_string(),
///         })?;
///         parse_content(&content)
///     }
///
///     fn name(&self) -> &str {
///         "my-source"
///     }
/// }
/// ```
pub trait Source: Send + Sync {
    fn load(&self, env: &dyn DataEnv) -> Result<Data, SourceError>;

    /// Human-readable name of this source for error messages.
    fn name(&self) -> &str;
}

/// Merge data maps in order; later maps win on key conflicts.
pub fn merge_data(all: Vec<Data>) -> Data {
    let mut merged = Data::new();
    for data in all {
        merged.extend(data);
    }
    merged
}
