//! Environment variable data source.
//!
//! # Example
//!
//! ```ignore
//! use configvar::{Env, Settings};
//!
//! // Every variable, keys unchanged
//! let settings = Settings::<App>::builder()
//!     .schema(schema)
//!     .source(Env::all())
//!     .build()?;
//!
//! // Only APP_* variables, keyed without the prefix
//! let settings = Settings::<App>::builder()
//!     .schema(schema)
//!     .source(Env::prefix("APP_").strip_prefix())
//!     .build()?;
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::env::DataEnv;
use crate::error::SourceError;
use crate::source::{Data, Source};

/// Snapshot of the process environment as flat data.
///
/// Values are kept as raw strings; the schema's variables do all parsing.
///
/// ```ignore
/// use configvar::Env;
///
/// let source = Env::prefix("APP_")
///     .strip_prefix()
///     .rename("DB_URL", "DATABASE_URL")
///     .exclude("APP_SECRET_KEY");
/// // APP_PORT   -> PORT
/// // APP_DB_URL -> DATABASE_URL
/// ```
#[derive(Debug, Clone)]
pub struct Env {
    prefix: String,
    strip_prefix: bool,
    case_sensitive: bool,
    renames: HashMap<String, String>,
    excluded: HashSet<String>,
}

impl Env {
    /// Load only variables starting with `prefix`.
    ///
    /// Keys keep the prefix unless [`strip_prefix`](Self::strip_prefix) is set.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            strip_prefix: false,
            case_sensitive: true,
            renames: HashMap::new(),
            excluded: HashSet::new(),
        }
    }

    /// Load every environment variable.
    pub fn all() -> Self {
        Self::prefix("")
    }

    /// Drop the prefix from keys, so `APP_PORT` is stored as `PORT`.
    pub fn strip_prefix(mut self) -> Self {
        self.strip_prefix = true;
        self
    }

    /// Match the prefix regardless of case (default: exact case).
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Store the variable with key `from` (after prefix handling) as `to`.
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    /// Skip a variable by its full name.
    pub fn exclude(mut self, var: impl Into<String>) -> Self {
        self.excluded.insert(var.into());
        self
    }

    fn matches_prefix(&self, name: &str) -> bool {
        if self.case_sensitive {
            name.starts_with(&self.prefix)
        } else {
            name.len() >= self.prefix.len()
                && name.is_char_boundary(self.prefix.len())
                && name[..self.prefix.len()].eq_ignore_ascii_case(&self.prefix)
        }
    }

    fn key_for<'a>(&self, name: &'a str) -> &'a str {
        if self.strip_prefix {
            &name[self.prefix.len()..]
        } else {
            name
        }
    }
}

impl Source for Env {
    fn load(&self, env: &dyn DataEnv) -> Result<Data, SourceError> {
        let mut data = Data::new();

        for (name, value) in env.env_vars() {
            if !self.matches_prefix(&name) || self.excluded.contains(&name) {
                continue;
            }
            let key = self.key_for(&name);
            if key.is_empty() {
                continue;
            }
            match self.renames.get(key) {
                Some(renamed) => data.insert(renamed.clone(), value),
                None => data.insert(key, value),
            }
        }

        debug!(source = self.name(), keys = data.len(), "loaded environment");
        Ok(data)
    }

    fn name(&self) -> &str {
        "environment"
    }
}
