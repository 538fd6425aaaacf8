//! Error types for settings resolution.
//!
//! Per-field validation failures are collected into [`VariableIssues`] and
//! integrate with stillwater's `Semigroup`. Everything that is not a field
//! failure (schema misuse, source I/O, deserialization) is a `thiserror` enum.

use std::fmt;

use stillwater::{NonEmptyVec, Semigroup};
use thiserror::Error;

/// One step in the path from the schema root to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key like "database" in "database.host"
    Key(String),
    /// Union alternative index like 0 in "database\[0\].host"
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Render segments as `database[0].host`.
pub fn format_path(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    out
}

/// Every issue found for the field at `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableIssue {
    pub key: Vec<PathSegment>,
    pub issues: Vec<String>,
}

impl VariableIssue {
    pub fn new(key: Vec<PathSegment>, issues: Vec<String>) -> Self {
        Self { key, issues }
    }

    /// Dotted path of the field.
    pub fn path(&self) -> String {
        format_path(&self.key)
    }

    /// Whether the field was simply missing.
    pub fn is_missing(&self) -> bool {
        self.issues.iter().any(|i| i == crate::variable::REQUIRED)
    }
}

impl fmt::Display for VariableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path(), self.issues.join("; "))
    }
}

/// A non-empty collection of field issues from one resolution.
#[derive(Debug, Clone)]
pub struct VariableIssues(pub NonEmptyVec<VariableIssue>);

impl VariableIssues {
    pub fn single(issue: VariableIssue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(issues: Vec<VariableIssue>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    /// Get the first issue (always exists).
    pub fn first(&self) -> &VariableIssue {
        self.0.head()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, kept for API consistency.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableIssue> {
        self.0.iter()
    }

    /// Find the issue for a dotted path such as `"b.c"`.
    pub fn find(&self, path: &str) -> Option<&VariableIssue> {
        self.iter().find(|issue| issue.path() == path)
    }

    pub fn to_vec(&self) -> Vec<VariableIssue> {
        self.0.iter().cloned().collect()
    }
}

impl Semigroup for VariableIssues {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<VariableIssue> for VariableIssues {
    fn from(issue: VariableIssue) -> Self {
        Self::single(issue)
    }
}

impl IntoIterator for VariableIssues {
    type Item = VariableIssue;
    type IntoIter = std::vec::IntoIter<VariableIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for VariableIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings issues ({}):", self.len())?;
        for issue in self.iter() {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

/// The schema itself is malformed. Always a programmer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("a bare variable must be named with `from` before it can be resolved")]
    UnnamedVariable,

    #[error("union at '{path}' has no alternatives")]
    EmptyUnion { path: String },
}

/// A data source failed to produce its values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("{source_name}: file not found: {path}")]
    NotFound { source_name: String, path: String },

    #[error("{source_name}: I/O error: {message}")]
    Io {
        source_name: String,
        message: String,
    },

    #[error("{source_name}: parse error{}: {message}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        source_name: String,
        line: Option<u32>,
        message: String,
    },
}

impl SourceError {
    pub fn source_name(&self) -> &str {
        match self {
            SourceError::NotFound { source_name, .. }
            | SourceError::Io { source_name, .. }
            | SourceError::Parse { source_name, .. } => source_name,
        }
    }
}

fn join_sources(errors: &[SourceError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Everything that can go wrong turning sources and a schema into settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// One or more fields failed validation.
    #[error("{0}")]
    Invalid(VariableIssues),

    #[error("failed to load {} source(s): {}", .0.len(), join_sources(.0))]
    Sources(Vec<SourceError>),

    #[error("no schema provided")]
    NoSchema,

    #[error("could not deserialize settings at '{path}': {message}")]
    Deserialize { path: String, message: String },
}

impl SettingsError {
    /// Field issues, when this is a validation failure.
    pub fn issues(&self) -> Option<&VariableIssues> {
        match self {
            SettingsError::Invalid(issues) => Some(issues),
            _ => None,
        }
    }
}

impl From<VariableIssues> for SettingsError {
    fn from(issues: VariableIssues) -> Self {
        SettingsError::Invalid(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(path: &[PathSegment], message: &str) -> VariableIssue {
        VariableIssue::new(path.to_vec(), vec![message.to_string()])
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&["b".into(), "c".into()]), "b.c");
        assert_eq!(format_path(&["db".into(), PathSegment::Index(1), "host".into()]), "db[1].host");
        assert_eq!(format_path(&[PathSegment::Index(0), "a".into()]), "[0].a");
        assert_eq!(format_path(&[]), "");
    }

    #[test]
    fn test_variable_issue_display() {
        let i = VariableIssue::new(
            vec!["port".into()],
            vec!["must be an integer".into(), "is out of range".into()],
        );
        assert_eq!(i.to_string(), "port: must be an integer; is out of range");
        assert!(!i.is_missing());
        assert!(issue(&["x".into()], "is required").is_missing());
    }

    #[test]
    fn test_variable_issues_combine_and_find() {
        let all = VariableIssues::single(issue(&["a".into()], "is required"))
            .combine(VariableIssues::single(issue(&["b".into(), "c".into()], "bad")));
        assert_eq!(all.len(), 2);
        assert_eq!(all.find("b.c").map(|i| i.issues.clone()), Some(vec!["bad".to_string()]));
        assert!(all.find("c").is_none());
        assert_eq!(all.to_string(), "Settings issues (2):\n  a: is required\n  b.c: bad\n");
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Parse {
            source_name: ".env".into(),
            line: Some(3),
            message: "expected KEY=VALUE".into(),
        };
        assert_eq!(err.to_string(), ".env: parse error at line 3: expected KEY=VALUE");
        assert_eq!(err.source_name(), ".env");

        let settings = SettingsError::Sources(vec![err]);
        assert!(settings.to_string().starts_with("failed to load 1 source(s)"));
    }
}
