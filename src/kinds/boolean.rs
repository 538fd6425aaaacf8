use once_cell::sync::Lazy;
use regex::Regex;

use crate::result::{failure, success, VarResult};
use crate::variable::Kind;

static BOOLEAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:(true|t|1)|(false|f|0))$").expect("boolean regex"));

/// Booleans spelled `true`, `t`, `1`, `false`, `f` or `0`, in any case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

impl Kind for Boolean {
    type Output = bool;

    fn parse_str(&self, input: &str) -> VarResult<bool> {
        match BOOLEAN.captures(input) {
            Some(caps) => success(caps.get(1).is_some()),
            None => failure("must be a boolean (true/t/1/false/f/0)"),
        }
    }

    fn type_name(&self) -> String {
        "boolean".to_string()
    }
}
