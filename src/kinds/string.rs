//! String kind with a conjunction of validators.
//!
//! Every validator runs against the input and every failure is reported,
//! so a value that is both too short and badly formatted gets both issues.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use stillwater::Validation;

use crate::result::{failure, failure_all, success, VarResult};
use crate::variable::{Kind, Variable};

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid regex")
});

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+[^\s]*$").expect("url regex")
});

type Check = Arc<dyn Fn(&str) -> VarResult<()> + Send + Sync>;

/// One rule a string must satisfy.
#[derive(Clone)]
pub enum Validator {
    /// The input must match `regex`.
    Pattern { regex: Regex, message: String },
    /// Arbitrary check; `label` is for diagnostics only.
    Custom { label: String, check: Check },
}

impl Validator {
    /// Pattern validator with the default `must match /.../` message.
    pub fn pattern(regex: Regex) -> Self {
        let message = format!("must match /{}/", regex.as_str());
        Self::Pattern { regex, message }
    }

    pub fn pattern_with_message(regex: Regex, message: impl Into<String>) -> Self {
        Self::Pattern {
            regex,
            message: message.into(),
        }
    }

    pub fn custom<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> VarResult<()> + Send + Sync + 'static,
    {
        Self::Custom {
            label: label.into(),
            check: Arc::new(check),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Validator::Pattern { regex, .. } => regex.as_str(),
            Validator::Custom { label, .. } => label,
        }
    }

    fn check(&self, input: &str) -> Result<(), Vec<String>> {
        match self {
            Validator::Pattern { regex, message } => {
                if regex.is_match(input) {
                    Ok(())
                } else {
                    Err(vec![message.clone()])
                }
            }
            Validator::Custom { check, .. } => match check(input) {
                Validation::Success(()) => Ok(()),
                Validation::Failure(issues) => Err(issues.to_vec()),
            },
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            Validator::Custom { label, .. } => {
                f.debug_struct("Custom").field("label", label).finish()
            }
        }
    }
}

/// Strings, optionally constrained by validators.
#[derive(Debug, Clone, Default)]
pub struct Text {
    validators: Vec<Validator>,
}

impl Text {
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }
}

impl Kind for Text {
    type Output = String;

    fn parse_str(&self, input: &str) -> VarResult<String> {
        let issues: Vec<String> = self
            .validators
            .iter()
            .filter_map(|validator| validator.check(input).err())
            .flatten()
            .collect();
        if issues.is_empty() {
            success(input.to_string())
        } else {
            failure_all(issues)
        }
    }

    fn type_name(&self) -> String {
        "string".to_string()
    }
}

impl Variable<Text> {
    /// Append a validator. The receiver keeps its own list.
    pub fn validator(&self, validator: Validator) -> Self {
        let mut validators = self.kind().validators.clone();
        validators.push(validator);
        self.with_kind(Text { validators })
    }

    /// Require a regex match, reporting `must match /pattern/` otherwise.
    pub fn matches(&self, regex: Regex) -> Self {
        self.validator(Validator::pattern(regex))
    }

    /// Require a regex match, reporting `message` otherwise.
    pub fn pattern(&self, regex: Regex, message: impl Into<String>) -> Self {
        self.validator(Validator::pattern_with_message(regex, message))
    }

    /// Custom check returning its own issues.
    pub fn validate<F>(&self, label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> VarResult<()> + Send + Sync + 'static,
    {
        self.validator(Validator::custom(label, check))
    }

    pub fn min_length(&self, min: usize) -> Self {
        self.validate(format!("min_length({})", min), move |s| {
            if s.chars().count() >= min {
                success(())
            } else {
                failure(format!("must be at least {} characters", min))
            }
        })
    }

    pub fn max_length(&self, max: usize) -> Self {
        self.validate(format!("max_length({})", max), move |s| {
            if s.chars().count() <= max {
                success(())
            } else {
                failure(format!("must be at most {} characters", max))
            }
        })
    }

    pub fn uuid(&self) -> Self {
        self.pattern(UUID.clone(), "must be a valid UUID")
    }

    pub fn email(&self) -> Self {
        self.pattern(EMAIL.clone(), "must be a valid email address")
    }

    pub fn url(&self) -> Self {
        self.pattern(URL.clone(), "must be a valid URL")
    }

    pub fn ipv4(&self) -> Self {
        self.validate("ipv4", |s| match s.parse::<Ipv4Addr>() {
            Ok(_) => success(()),
            Err(_) => failure("must be a valid IPv4 address"),
        })
    }

    pub fn ipv6(&self) -> Self {
        self.validate("ipv6", |s| match s.parse::<Ipv6Addr>() {
            Ok(_) => success(()),
            Err(_) => failure("must be a valid IPv6 address"),
        })
    }
}
