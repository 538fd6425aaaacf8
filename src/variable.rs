//! The `Variable` combinator.
//!
//! A [`Variable`] describes how to derive a typed value from an optional
//! input string. It pairs a [`Kind`] (the parse rule for a present string)
//! with presence rules: required, optional, or defaulted.
//!
//! Variables are immutable. Every combinator borrows the receiver and returns
//! a new variable, so a base variable can be reused for many derived ones:
//!
//! ```
//! use configvar::{integer, VarResultExt};
//!
//! let port = integer().min(1.0).max(65535.0);
//! let with_default = port.default_to(8080);
//! let maybe = port.optional();
//!
//! assert!(port.parse(None).is_failure());
//! assert_eq!(with_default.parse(None).value(), Some(&8080));
//! assert_eq!(maybe.parse(None).value(), Some(&None));
//! ```

use std::fmt;
use std::sync::Arc;

use stillwater::{Semigroup, Validation};

use crate::result::{failure, success, Issues, VarResult};

/// Issue reported when a required variable receives no input.
pub const REQUIRED: &str = "is required";

/// Parse rule for a present input string.
///
/// Implementations only ever see a string that is actually present; absence
/// is handled by [`Variable::parse`].
pub trait Kind: Send + Sync + 'static {
    /// The typed value this kind produces.
    type Output: Clone + Send + Sync + 'static;

    /// Parse and validate a present input.
    fn parse_str(&self, input: &str) -> VarResult<Self::Output>;

    /// Short descriptive tag, e.g. `"number"` or `"string/boolean"`.
    fn type_name(&self) -> String;

    /// Outcome for missing input when the variable has no default, or
    /// `None` when the input is simply required.
    fn absent(&self) -> Option<VarResult<Self::Output>> {
        None
    }

    /// Split into union members. Unions return their own members so that
    /// combining unions never nests them.
    fn into_members(self) -> Vec<Member<Self::Output>>
    where
        Self: Sized,
    {
        vec![Arc::new(self)]
    }
}

/// One alternative of a [`Union`].
pub type Member<T> = Arc<dyn Kind<Output = T>>;

/// An immutable, composable parser for one configuration field.
#[derive(Clone)]
pub struct Variable<K: Kind> {
    kind: K,
    optional: bool,
    default: Option<K::Output>,
    name: Option<String>,
    description: Option<String>,
}

impl<K: Kind> Variable<K> {
    /// Create a required variable with no default.
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            optional: false,
            default: None,
            name: None,
            description: None,
        }
    }

    /// Parse an input that may be absent.
    ///
    /// A present input, even an empty one, always goes through the kind's
    /// parse rule. A missing input yields the default, then whatever the
    /// kind produces for absence (`None` for optional variables), then the
    /// `"is required"` issue.
    pub fn parse(&self, input: Option<&str>) -> VarResult<K::Output> {
        match input {
            Some(raw) => self.kind.parse_str(raw),
            None => {
                if let Some(default) = &self.default {
                    return success(default.clone());
                }
                self.kind.absent().unwrap_or_else(|| failure(REQUIRED))
            }
        }
    }

    /// The parse rule this variable wraps.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_value(&self) -> Option<&K::Output> {
        self.default.as_ref()
    }

    /// Explicit data key set with [`Variable::from`].
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn type_name(&self) -> String {
        self.kind.type_name()
    }
}

impl<K: Kind + Clone> Variable<K> {
    /// Same presence rules and labels, new parse rule.
    pub(crate) fn with_kind(&self, kind: K) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Carry name and description over to a variable of another kind.
    ///
    /// Presence rules are reset because the output type may differ.
    pub(crate) fn rekind<K2: Kind>(&self, kind: K2) -> Variable<K2> {
        Variable {
            kind,
            optional: false,
            default: None,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Accept missing input, producing `None`. Clears any default.
    pub fn optional(&self) -> Variable<Optional<K>> {
        Variable {
            optional: true,
            ..self.rekind(Optional(self.kind.clone()))
        }
    }

    /// Use `value` for missing input. Clears optionality.
    pub fn default_to(&self, value: impl Into<K::Output>) -> Self {
        Self {
            optional: false,
            default: Some(value.into()),
            ..self.clone()
        }
    }

    /// Read this variable from the data key `name` instead of its
    /// structural key in the schema.
    pub fn from(&self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self.clone()
        }
    }

    /// Attach a human readable description.
    pub fn describe(&self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self.clone()
        }
    }

    /// Try this variable first and `other` when it fails.
    ///
    /// The resulting union keeps this variable's name and description and
    /// starts required. Unions on either side are spliced in, never nested.
    pub fn or<O>(&self, other: &Variable<O>) -> Variable<Union<K::Output>>
    where
        O: Kind<Output = K::Output> + Clone,
    {
        let mut members = self.kind.clone().into_members();
        members.extend(other.kind.clone().into_members());
        self.rekind(Union { members })
    }

    /// Map a successful value through a fallible function.
    ///
    /// Failures of this variable pass through untouched. Presence carries
    /// over: a default is transformed once, here, and an optional variable
    /// hands `None` to the transform. A default the transform rejects is
    /// reported, prefixed with `"default"`, whenever the input is missing.
    pub fn transform<U, F>(&self, transform: F) -> Variable<Transformed<K, U>>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(K::Output) -> VarResult<U> + Send + Sync + 'static,
    {
        let transform: TransformFn<K::Output, U> = Arc::new(transform);
        let fallback = match &self.default {
            Some(default) => Some(match transform(default.clone()) {
                Validation::Failure(issues) => Validation::Failure(issues.with_context("default")),
                ok => ok,
            }),
            None => self.kind.absent().map(|result| match result {
                Validation::Success(value) => transform(value),
                Validation::Failure(issues) => Validation::Failure(issues),
            }),
        };
        let (default, absent) = match fallback {
            Some(Validation::Success(value)) if self.default.is_some() => (Some(value), None),
            other => (None, other),
        };

        Variable {
            optional: self.optional,
            default,
            ..self.rekind(Transformed {
                source: self.kind.clone(),
                transform,
                absent,
            })
        }
    }

    /// Map a successful value through an infallible function.
    pub fn map<U, F>(&self, map: F) -> Variable<Transformed<K, U>>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(K::Output) -> U + Send + Sync + 'static,
    {
        self.transform(move |value| success(map(value)))
    }
}

impl<K> fmt::Debug for Variable<K>
where
    K: Kind,
    K::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("type", &self.kind.type_name())
            .field("optional", &self.optional)
            .field("default", &self.default)
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Kind wrapper produced by [`Variable::optional`].
#[derive(Debug, Clone)]
pub struct Optional<K>(K);

impl<K> Optional<K> {
    pub fn inner(&self) -> &K {
        &self.0
    }
}

impl<K: Kind> Kind for Optional<K> {
    type Output = Option<K::Output>;

    fn parse_str(&self, input: &str) -> VarResult<Self::Output> {
        self.0.parse_str(input).map(Some)
    }

    fn type_name(&self) -> String {
        self.0.type_name()
    }

    fn absent(&self) -> Option<VarResult<Self::Output>> {
        match self.0.absent() {
            Some(Validation::Failure(issues)) => Some(Validation::Failure(issues)),
            _ => Some(success(None)),
        }
    }
}

impl<K: Kind + Clone> Variable<Optional<K>> {
    /// Map a present value through a fallible function, keeping `None`.
    ///
    /// Missing input never reaches the transform.
    pub fn transform_some<U, F>(&self, transform: F) -> Variable<Optional<Transformed<K, U>>>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(K::Output) -> VarResult<U> + Send + Sync + 'static,
    {
        let inner = self.rekind(self.kind.0.clone());
        let inner = match &self.default {
            Some(Some(value)) => inner.default_to(value.clone()),
            _ => inner,
        }
        .transform(transform);

        Variable {
            optional: self.optional,
            default: match &self.default {
                Some(None) => Some(None),
                Some(Some(_)) => inner.default.clone().map(Some),
                None => None,
            },
            ..inner.rekind(Optional(inner.kind.clone()))
        }
    }

    /// Map a present value through an infallible function, keeping `None`.
    pub fn map_some<U, F>(&self, map: F) -> Variable<Optional<Transformed<K, U>>>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(K::Output) -> U + Send + Sync + 'static,
    {
        self.transform_some(move |value| success(map(value)))
    }
}

/// Ordered alternatives; the first member that parses wins.
pub struct Union<T> {
    members: Vec<Member<T>>,
}

impl<T> Union<T> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> Clone for Union<T> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Kind for Union<T> {
    type Output = T;

    fn parse_str(&self, input: &str) -> VarResult<T> {
        let mut issues: Option<Issues> = None;
        for member in &self.members {
            match member.parse_str(input) {
                Validation::Success(value) => return success(value),
                Validation::Failure(found) => {
                    issues = Some(match issues {
                        Some(acc) => acc.combine(found),
                        None => found,
                    });
                }
            }
        }
        match issues {
            Some(issues) => Validation::Failure(issues),
            None => failure("has no alternatives"),
        }
    }

    fn type_name(&self) -> String {
        self.members
            .iter()
            .map(|member| member.type_name())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn into_members(self) -> Vec<Member<T>> {
        self.members
    }
}

type TransformFn<T, U> = Arc<dyn Fn(T) -> VarResult<U> + Send + Sync>;

/// Kind produced by [`Variable::transform`] and [`Variable::map`].
pub struct Transformed<K: Kind, U> {
    source: K,
    transform: TransformFn<K::Output, U>,
    absent: Option<VarResult<U>>,
}

impl<K: Kind + Clone, U: Clone> Clone for Transformed<K, U> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            transform: Arc::clone(&self.transform),
            absent: self.absent.clone(),
        }
    }
}

impl<K, U> Kind for Transformed<K, U>
where
    K: Kind,
    U: Clone + Send + Sync + 'static,
{
    type Output = U;

    fn parse_str(&self, input: &str) -> VarResult<U> {
        match self.source.parse_str(input) {
            Validation::Success(value) => (self.transform)(value),
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }

    fn type_name(&self) -> String {
        self.source.type_name()
    }

    fn absent(&self) -> Option<VarResult<U>> {
        self.absent.clone()
    }
}
