//! Number and integer kinds.

use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::result::{failure, success, VarResult};
use crate::variable::{Kind, Variable};

static INTEGER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([+-]?[0-9]+)|0b([01]+)|0x([0-9a-fA-F]+))$").expect("integer literal regex")
});

/// Range message for a value outside `[min, max]`, or None when inside.
fn out_of_bounds<T: PartialOrd + Display>(value: T, min: Option<T>, max: Option<T>) -> Option<String> {
    let below = min.as_ref().is_some_and(|m| value < *m);
    let above = max.as_ref().is_some_and(|m| value > *m);
    if !below && !above {
        return None;
    }
    match (min, max) {
        (Some(min), Some(max)) => Some(format!("must be between {} and {}", min, max)),
        (Some(min), None) => Some(format!("must be greater than or equal to {}", min)),
        (None, Some(max)) => Some(format!("must be less than or equal to {}", max)),
        (None, None) => None,
    }
}

/// Floating point numbers with optional inclusive bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Number {
    min: Option<f64>,
    max: Option<f64>,
}

impl Number {
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

impl Kind for Number {
    type Output = f64;

    fn parse_str(&self, input: &str) -> VarResult<f64> {
        let value = match input.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => return failure("must be a number"),
        };
        match out_of_bounds(value, self.min, self.max) {
            Some(issue) => failure(issue),
            None => success(value),
        }
    }

    fn type_name(&self) -> String {
        "number".to_string()
    }
}

/// Bounds that are NaN or infinite constrain nothing and are ignored.
impl Variable<Number> {
    /// Inclusive lower bound.
    pub fn min(&self, min: f64) -> Self {
        self.with_kind(Number {
            min: finite(min).or(self.kind().min),
            ..self.kind().clone()
        })
    }

    /// Inclusive upper bound.
    pub fn max(&self, max: f64) -> Self {
        self.with_kind(Number {
            max: finite(max).or(self.kind().max),
            ..self.kind().clone()
        })
    }
}

fn finite(bound: f64) -> Option<f64> {
    bound.is_finite().then_some(bound)
}

/// 64-bit signed integers with optional inclusive bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Integer {
    min: Option<i64>,
    max: Option<i64>,
}

impl Integer {
    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    fn literal(input: &str) -> Option<Result<i64, std::num::ParseIntError>> {
        let caps = INTEGER_LITERAL.captures(input)?;
        if let Some(decimal) = caps.get(1) {
            Some(decimal.as_str().parse::<i64>())
        } else if let Some(binary) = caps.get(2) {
            Some(i64::from_str_radix(binary.as_str(), 2))
        } else {
            caps.get(3).map(|hex| i64::from_str_radix(hex.as_str(), 16))
        }
    }
}

impl Kind for Integer {
    type Output = i64;

    fn parse_str(&self, input: &str) -> VarResult<i64> {
        let value = match Self::literal(input.trim()) {
            Some(Ok(value)) => value,
            Some(Err(_)) => return failure("is out of range"),
            None => return failure("must be an integer"),
        };
        match out_of_bounds(value, self.min, self.max) {
            Some(issue) => failure(issue),
            None => success(value),
        }
    }

    fn type_name(&self) -> String {
        "integer".to_string()
    }
}

/// Non-finite bounds are ignored; bounds beyond the `i64` range clamp to
/// `i64::MIN`/`i64::MAX`.
impl Variable<Integer> {
    /// Inclusive lower bound, rounded up to the next integer.
    pub fn min(&self, min: f64) -> Self {
        self.with_kind(Integer {
            min: finite(min).map(|m| m.ceil() as i64).or(self.kind().min),
            ..self.kind().clone()
        })
    }

    /// Inclusive upper bound, rounded down to the previous integer.
    pub fn max(&self, max: f64) -> Self {
        self.with_kind(Integer {
            max: finite(max).map(|m| m.floor() as i64).or(self.kind().max),
            ..self.kind().clone()
        })
    }
}
