//! Typed variable kinds.
//!
//! Each kind supplies the parse rule for one value type. The free functions
//! here are the usual way to start building a variable.

mod boolean;
mod date;
mod enumeration;
mod json;
mod number;
mod string;

pub use boolean::Boolean;
pub use date::{Date, DateObject, Timezone};
pub use enumeration::Enumeration;
pub use json::Json;
pub use number::{Integer, Number};
pub use string::{Text, Validator};

use crate::variable::Variable;

/// A floating point variable.
pub fn number() -> Variable<Number> {
    Variable::new(Number::default())
}

/// An integer variable accepting decimal, `0b` binary and `0x` hex literals.
pub fn integer() -> Variable<Integer> {
    Variable::new(Integer::default())
}

/// A string variable with no validators.
pub fn string() -> Variable<Text> {
    Variable::new(Text::default())
}

/// A boolean variable accepting `true/t/1` and `false/f/0`.
pub fn boolean() -> Variable<Boolean> {
    Variable::new(Boolean)
}

/// A variable restricted to the given literals (case sensitive).
pub fn enumeration<I, S>(values: I) -> Variable<Enumeration>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Variable::new(Enumeration::new(values))
}

/// A variable holding any JSON document.
pub fn json() -> Variable<Json<serde_json::Value>> {
    Variable::new(Json::raw())
}

/// A date/time variable using the default ISO-like formats.
pub fn date() -> Variable<Date> {
    Variable::new(Date::default())
}
