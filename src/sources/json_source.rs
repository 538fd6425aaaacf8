//! JSON object data source.
//!
//! ```ignore
//! use configvar::{JsonSource, Settings};
//!
//! let settings = Settings::<App>::builder()
//!     .schema(schema)
//!     .source(JsonSource::file("settings.json").optional())
//!     .build()?;
//! ```

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use super::Content;
use crate::env::DataEnv;
use crate::error::SourceError;
use crate::source::{Data, Source};

/// Flat data taken from the members of a JSON object.
///
/// Strings are stored as-is and other scalars as their JSON text (`true`,
/// `42`). Nested objects and arrays are stored as compact JSON so `json()`
/// variables can parse them. `null` members are treated as absent.
#[derive(Debug, Clone)]
pub struct JsonSource {
    content: Content,
    required: bool,
    name: Option<String>,
}

impl JsonSource {
    /// Load JSON from a file path (required by default).
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            content: Content::File(path.into()),
            required: true,
            name: None,
        }
    }

    pub fn string(content: impl Into<String>) -> Self {
        Self {
            content: Content::String(content.into()),
            required: true,
            name: None,
        }
    }

    /// Mark this source as optional (no error if file missing).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Source for JsonSource {
    fn load(&self, env: &dyn DataEnv) -> Result<Data, SourceError> {
        let Some(content) = self.content.read(env, self.required, self.name())? else {
            return Ok(Data::new());
        };
        let data = parse_json(&content, self.name())?;
        debug!(source = self.name(), keys = data.len(), "loaded JSON");
        Ok(data)
    }

    fn name(&self) -> &str {
        match (&self.name, &self.content) {
            (Some(name), _) => name,
            (None, Content::File(path)) => path.to_str().unwrap_or("<file>"),
            (None, Content::String(_)) => "<string>",
        }
    }
}

fn parse_json(content: &str, source_name: &str) -> Result<Data, SourceError> {
    let document: Value = serde_json::from_str(content).map_err(|e| SourceError::Parse {
        source_name: source_name.to_string(),
        line: Some(e.line() as u32),
        message: e.to_string(),
    })?;

    let Value::Object(members) = document else {
        return Err(SourceError::Parse {
            source_name: source_name.to_string(),
            line: None,
            message: "expected a JSON object at the top level".to_string(),
        });
    };

    Ok(members
        .into_iter()
        .filter_map(|(key, value)| flatten_member(value).map(|text| (key, text)))
        .collect())
}

fn flatten_member(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;

    #[test]
    fn test_json_scalars_and_nested() {
        let source = JsonSource::string(
            r#"{"host": "localhost", "port": 8080, "debug": true, "ratio": 0.5,
                "tags": ["a", "b"], "db": {"pool": 4}, "gone": null}"#,
        );
        let data = source.load(&MockEnv::new()).unwrap();

        assert_eq!(data.get("host"), Some("localhost"));
        assert_eq!(data.get("port"), Some("8080"));
        assert_eq!(data.get("debug"), Some("true"));
        assert_eq!(data.get("ratio"), Some("0.5"));
        assert_eq!(data.get("tags"), Some(r#"["a","b"]"#));
        assert_eq!(data.get("db"), Some(r#"{"pool":4}"#));
        assert!(!data.contains("gone"));
    }

    #[test]
    fn test_json_file_required_and_optional() {
        let env = MockEnv::new().with_file("settings.json", r#"{"a": "1"}"#);
        let data = JsonSource::file("settings.json").load(&env).unwrap();
        assert_eq!(data.get("a"), Some("1"));

        let err = JsonSource::file("missing.json").load(&env).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
        assert!(JsonSource::file("missing.json")
            .optional()
            .load(&env)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_json_syntax_error_has_line() {
        let err = JsonSource::string("{\n\"a\": }")
            .load(&MockEnv::new())
            .unwrap_err();
        match err {
            SourceError::Parse { line, source_name, .. } => {
                assert_eq!(line, Some(2));
                assert_eq!(source_name, "<string>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_requires_object() {
        let err = JsonSource::string("[1, 2]")
            .named("inline")
            .load(&MockEnv::new())
            .unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
        assert_eq!(err.source_name(), "inline");
    }
}
