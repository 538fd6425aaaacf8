//! Result substrate for variable parsing.
//!
//! Every parse in this crate produces a [`VarResult`], which is stillwater's
//! `Validation` with [`Issues`] as the failure side. Expected validation
//! failures are data, never panics.

use std::fmt;

use stillwater::{NonEmptyVec, Semigroup, Validation};

/// A non-empty, ordered list of issue messages for a single variable.
///
/// Uses `NonEmptyVec` so a failure always explains itself.
#[derive(Debug, Clone)]
pub struct Issues(pub NonEmptyVec<String>);

impl Issues {
    /// Create from a single issue message.
    pub fn single(issue: impl Into<String>) -> Self {
        Self(NonEmptyVec::singleton(issue.into()))
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(issues: Vec<String>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    /// Get the first issue (always exists).
    pub fn first(&self) -> &str {
        self.0.head()
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, kept for API consistency.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over issue messages in order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Copy the messages into a plain vec.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// Prefix every message with `context`.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let context = context.into();
        Self(self.0.map(|issue| format!("{}: {}", context, issue)))
    }
}

impl PartialEq for Issues {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Eq for Issues {}

impl Semigroup for Issues {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<String> for Issues {
    fn from(issue: String) -> Self {
        Self::single(issue)
    }
}

impl From<&str> for Issues {
    fn from(issue: &str) -> Self {
        Self::single(issue)
    }
}

impl IntoIterator for Issues {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().map(String::as_str).collect();
        write!(f, "{}", joined.join("; "))
    }
}

/// The result of parsing one variable.
pub type VarResult<T> = Validation<T, Issues>;

/// Build a successful result.
pub fn success<T>(value: T) -> VarResult<T> {
    Validation::Success(value)
}

/// Build a failed result carrying a single issue.
pub fn failure<T>(issue: impl Into<String>) -> VarResult<T> {
    Validation::Failure(Issues::single(issue))
}

/// Build a failed result from several issues.
///
/// An empty list still fails, with a generic message, so that a failure
/// never arrives without an explanation.
pub fn failure_all<T>(issues: Vec<String>) -> VarResult<T> {
    match Issues::from_vec(issues) {
        Some(issues) => Validation::Failure(issues),
        None => failure("is invalid"),
    }
}

/// Accessors for inspecting a [`VarResult`] without a full match.
pub trait VarResultExt<T> {
    /// Borrow the success value, if any.
    fn value(&self) -> Option<&T>;

    /// Borrow the issues, if this is a failure.
    fn issues(&self) -> Option<&Issues>;

    /// Convert into a std `Result`.
    fn into_result(self) -> Result<T, Issues>;
}

impl<T> VarResultExt<T> for VarResult<T> {
    fn value(&self) -> Option<&T> {
        match self {
            Validation::Success(value) => Some(value),
            Validation::Failure(_) => None,
        }
    }

    fn issues(&self) -> Option<&Issues> {
        match self {
            Validation::Success(_) => None,
            Validation::Failure(issues) => Some(issues),
        }
    }

    fn into_result(self) -> Result<T, Issues> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(issues) => Err(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_failure_are_exclusive() {
        let ok: VarResult<i32> = success(3);
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(&3));
        assert!(ok.issues().is_none());

        let err: VarResult<i32> = failure("is required");
        assert!(err.is_failure());
        assert!(err.value().is_none());
        assert_eq!(err.issues().map(|i| i.first()), Some("is required"));
    }

    #[test]
    fn test_issues_combine_preserves_order() {
        let combined = Issues::single("a").combine(Issues::single("b"));
        assert_eq!(combined.to_vec(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn test_failure_all_never_empty() {
        let err: VarResult<()> = failure_all(vec![]);
        assert_eq!(err.issues().map(|i| i.len()), Some(1));

        let err: VarResult<()> = failure_all(vec!["x".into(), "y".into()]);
        assert_eq!(err.issues().map(|i| i.to_vec()), Some(vec!["x".into(), "y".into()]));
    }

    #[test]
    fn test_issues_display_and_context() {
        let issues = Issues::from_vec(vec!["too short".into(), "bad char".into()]).unwrap();
        assert_eq!(issues.to_string(), "too short; bad char");
        assert_eq!(
            issues.with_context("name").to_vec(),
            vec!["name: too short".to_string(), "name: bad char".to_string()]
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(success(1).into_result(), Ok(1));
        assert_eq!(
            failure::<i32>("nope").into_result(),
            Err(Issues::single("nope"))
        );
    }
}
