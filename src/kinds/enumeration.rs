use std::sync::Arc;

use crate::result::{failure, success, VarResult};
use crate::variable::{Kind, Variable};

/// A closed set of string literals.
///
/// Matching is case sensitive unless [`Variable::insensitive`] is used. The
/// parsed value is always the registered literal, never the input spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    values: Arc<[String]>,
    case_sensitive: bool,
}

impl Enumeration {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn lookup(&self, input: &str) -> Option<&String> {
        if self.case_sensitive {
            self.values.iter().find(|v| v.as_str() == input)
        } else {
            let folded = input.to_lowercase();
            self.values.iter().find(|v| v.to_lowercase() == folded)
        }
    }

    fn allowed(&self) -> String {
        self.values
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl Kind for Enumeration {
    type Output = String;

    fn parse_str(&self, input: &str) -> VarResult<String> {
        match self.lookup(input) {
            Some(canonical) => success(canonical.clone()),
            None => failure(format!("must be one of {}", self.allowed())),
        }
    }

    fn type_name(&self) -> String {
        "enum".to_string()
    }
}

impl Variable<Enumeration> {
    /// Match regardless of case, still returning the registered literal.
    pub fn insensitive(&self) -> Self {
        self.with_kind(Enumeration {
            case_sensitive: false,
            ..self.kind().clone()
        })
    }

    pub fn sensitive(&self) -> Self {
        self.with_kind(Enumeration {
            case_sensitive: true,
            ..self.kind().clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::kinds::enumeration;
    use crate::result::VarResultExt;

    #[test]
    fn test_enum_case_sensitive_by_default() {
        let v = enumeration(["cat", "dog"]);
        assert_eq!(v.parse(Some("cat")).value(), Some(&"cat".to_string()));
        assert!(v.parse(Some("Cat")).is_failure());
    }

    #[test]
    fn test_enum_insensitive_returns_canonical_literal() {
        let v = enumeration(["cat", "Dog"]).insensitive();
        assert_eq!(v.parse(Some("Cat")).value(), Some(&"cat".to_string()));
        assert_eq!(v.parse(Some("DOG")).value(), Some(&"Dog".to_string()));
    }

    #[test]
    fn test_enum_failure_lists_allowed_values() {
        let v = enumeration(["debug", "info", "warn"]);
        assert_eq!(
            v.parse(Some("trace")).issues().map(|i| i.first().to_string()),
            Some(r#"must be one of "debug"/"info"/"warn""#.to_string())
        );
    }

    #[test]
    fn test_insensitive_does_not_touch_receiver() {
        let base = enumeration(["a"]);
        let loose = base.insensitive();
        assert!(base.kind().is_case_sensitive());
        assert!(!loose.kind().is_case_sensitive());
        assert!(loose.sensitive().kind().is_case_sensitive());
    }
}
