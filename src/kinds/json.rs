//! JSON kind.
//!
//! Parses the input as a JSON document, then hands the parsed value to a
//! post-validator. The default validator accepts any document; a serde
//! adapter is available through [`Variable::deserialize`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::result::{failure, success, VarResult};
use crate::variable::{Kind, Variable};

type PostValidator<T> = Arc<dyn Fn(Value) -> VarResult<T> + Send + Sync>;

/// JSON documents refined by a post-validator.
pub struct Json<T> {
    validator: PostValidator<T>,
}

impl Json<Value> {
    /// Accept any well-formed document as-is.
    pub fn raw() -> Self {
        Self {
            validator: Arc::new(success::<Value>),
        }
    }
}

impl<T> Json<T> {
    pub fn with_validator<F>(validator: F) -> Self
    where
        F: Fn(Value) -> VarResult<T> + Send + Sync + 'static,
    {
        Self {
            validator: Arc::new(validator),
        }
    }
}

impl<T> Clone for Json<T> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Kind for Json<T> {
    type Output = T;

    fn parse_str(&self, input: &str) -> VarResult<T> {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => (self.validator)(value),
            Err(e) => failure(e.to_string()),
        }
    }

    fn type_name(&self) -> String {
        "json".to_string()
    }
}

/// Deserialize `value` into `T`, naming the failing path in the issue.
fn deserialize_value<T: DeserializeOwned>(value: Value) -> VarResult<T> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(typed) => success(typed),
        Err(e) => {
            let path = e.path().to_string();
            if path == "." {
                failure(e.into_inner().to_string())
            } else {
                failure(format!("{}: {}", path, e.into_inner()))
            }
        }
    }
}

impl Variable<Json<Value>> {
    /// Refine the parsed document with a custom validator.
    pub fn with_validator<T, F>(&self, validator: F) -> Variable<Json<T>>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(Value) -> VarResult<T> + Send + Sync + 'static,
    {
        self.rekind(Json::with_validator(validator))
    }

    /// Deserialize the parsed document into `T` with serde.
    pub fn deserialize<T>(&self) -> Variable<Json<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.with_validator(deserialize_value::<T>)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::kinds::json;
    use crate::result::VarResultExt;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    #[test]
    fn test_raw_json_passes_through() {
        let parsed = json().parse(Some(r#"{"a": [1, 2]}"#));
        assert_eq!(parsed.value(), Some(&json!({"a": [1, 2]})));
    }

    #[test]
    fn test_malformed_json_reports_parser_message() {
        let issue = json()
            .parse(Some("{not json"))
            .issues()
            .map(|i| i.first().to_string())
            .unwrap_or_default();
        assert!(issue.contains("line 1"), "{}", issue);
    }

    #[test]
    fn test_post_validator_refines() {
        let list = json().with_validator(|value| match value {
            Value::Array(items) => success(items.len()),
            _ => failure("must be a JSON array"),
        });
        assert_eq!(list.parse(Some("[1,2,3]")).value(), Some(&3));
        assert_eq!(
            list.parse(Some("{}")).issues().map(|i| i.first().to_string()),
            Some("must be a JSON array".to_string())
        );
    }

    #[test]
    fn test_deserialize_adapter() {
        let endpoint = json().deserialize::<Endpoint>();
        assert_eq!(
            endpoint.parse(Some(r#"{"host": "db", "port": 5432}"#)).value(),
            Some(&Endpoint {
                host: "db".to_string(),
                port: 5432
            })
        );

        let issue = endpoint
            .parse(Some(r#"{"host": "db", "port": "x"}"#))
            .issues()
            .map(|i| i.first().to_string())
            .unwrap_or_default();
        assert!(issue.starts_with("port:"), "{}", issue);
    }
}
