//! `.env` file data source.
//!
//! # Example
//!
//! ```ignore
//! use configvar::{DotEnv, Env, Settings};
//!
//! let settings = Settings::<App>::builder()
//!     .schema(schema)
//!     .source(DotEnv::file(".env").optional())
//!     .source(Env::all())
//!     .build()?;
//! ```

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::Content;
use crate::env::DataEnv;
use crate::error::SourceError;
use crate::source::{Data, Source};

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:export\s+)?([A-Za-z_][A-Za-z0-9_.-]*)\s*=\s*(.*)$").expect("valid regex")
});

/// `.env` text loaded from a file or a string.
#[derive(Debug, Clone)]
pub struct DotEnv {
    content: Content,
    required: bool,
    name: Option<String>,
}

impl DotEnv {
    /// Load a `.env` file (required by default).
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            content: Content::File(path.into()),
            required: true,
            name: None,
        }
    }

    /// Parse `.env` text held in memory.
    pub fn string(content: impl Into<String>) -> Self {
        Self {
            content: Content::String(content.into()),
            required: true,
            name: None,
        }
    }

    /// A missing file yields no data instead of an error.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set a custom name for this source in error messages.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Source for DotEnv {
    fn load(&self, env: &dyn DataEnv) -> Result<Data, SourceError> {
        let Some(content) = self.content.read(env, self.required, self.name())? else {
            return Ok(Data::new());
        };
        let data = parse_dotenv(&content).map_err(|(line, message)| SourceError::Parse {
            source_name: self.name().to_string(),
            line: Some(line),
            message,
        })?;
        debug!(source = self.name(), keys = data.len(), "loaded .env");
        Ok(data)
    }

    fn name(&self) -> &str {
        match (&self.name, &self.content) {
            (Some(name), _) => name,
            (None, Content::File(path)) => path.to_str().unwrap_or(".env"),
            (None, Content::String(_)) => "<string>",
        }
    }
}

/// Parse `.env` text into flat data.
///
/// - blank lines and lines starting with `#` are skipped
/// - an optional leading `export ` is ignored
/// - `'single'` quoted values are literal
/// - `"double"` quoted values expand `\n`, `\r`, `\t`, `\"` and `\\`
/// - unquoted values are trimmed and lose a trailing ` #` comment
///
/// A later assignment to the same key wins.
///
/// # Errors
///
/// Returns the 1-based line number and a message for the first malformed line.
///
/// ```
/// use configvar::sources::parse_dotenv;
///
/// let data = parse_dotenv("# db\nexport HOST=localhost\nGREETING=\"hi\\nthere\"\n").unwrap();
/// assert_eq!(data.get("HOST"), Some("localhost"));
/// assert_eq!(data.get("GREETING"), Some("hi\nthere"));
/// ```
pub fn parse_dotenv(content: &str) -> Result<Data, (u32, String)> {
    let mut data = Data::new();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index as u32 + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let caps = LINE
            .captures(line)
            .ok_or_else(|| (line_no, "expected KEY=VALUE".to_string()))?;
        let key = &caps[1];
        let value = parse_value(&caps[2]).map_err(|message| (line_no, message))?;
        data.insert(key, value);
    }

    Ok(data)
}

fn parse_value(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    match raw.chars().next() {
        Some('\'') => {
            let (inner, rest) = split_quoted(&raw[1..], '\'')
                .ok_or_else(|| "unterminated single quote".to_string())?;
            check_trailing(rest)?;
            Ok(inner.to_string())
        }
        Some('"') => {
            let (inner, rest) = split_quoted(&raw[1..], '"')
                .ok_or_else(|| "unterminated double quote".to_string())?;
            check_trailing(rest)?;
            Ok(unescape(inner))
        }
        _ => Ok(strip_comment(raw).trim_end().to_string()),
    }
}

/// Split at the closing quote, honoring backslash escapes for double quotes.
fn split_quoted(s: &str, quote: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' && quote == '"' {
            escaped = true;
        } else if c == quote {
            return Some((&s[..i], &s[i + 1..]));
        }
    }
    None
}

fn check_trailing(rest: &str) -> Result<(), String> {
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        Ok(())
    } else {
        Err(format!("unexpected text after closing quote: {}", rest))
    }
}

fn strip_comment(raw: &str) -> &str {
    match raw.find(" #") {
        Some(i) => &raw[..i],
        None => raw,
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;

    #[test]
    fn test_parse_basic_lines() {
        let data = parse_dotenv(
            "\n# comment\nHOST=localhost\nexport PORT = 8080\nEMPTY=\nSPACED=  a b  \n",
        )
        .unwrap();
        assert_eq!(data.get("HOST"), Some("localhost"));
        assert_eq!(data.get("PORT"), Some("8080"));
        assert_eq!(data.get("EMPTY"), Some(""));
        assert_eq!(data.get("SPACED"), Some("a b"));
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_parse_quotes_and_comments() {
        let data = parse_dotenv(concat!(
            "A='x # not a comment'\n",
            "B=\"tab\\there \\\"q\\\"\" # trailing\n",
            "C=value # comment\n",
            "D=a#b\n",
            "E='\\n'\n",
        ))
        .unwrap();
        assert_eq!(data.get("A"), Some("x # not a comment"));
        assert_eq!(data.get("B"), Some("tab\there \"q\""));
        assert_eq!(data.get("C"), Some("value"));
        assert_eq!(data.get("D"), Some("a#b"));
        assert_eq!(data.get("E"), Some("\\n"));
    }

    #[test]
    fn test_parse_later_key_wins() {
        let data = parse_dotenv("A=1\nA=2\n").unwrap();
        assert_eq!(data.get("A"), Some("2"));
    }

    #[test]
    fn test_parse_errors_report_line() {
        assert_eq!(
            parse_dotenv("A=1\nnot a pair\n").unwrap_err(),
            (2, "expected KEY=VALUE".to_string())
        );
        assert_eq!(parse_dotenv("A=\"open\n").unwrap_err().0, 1);
        assert!(parse_dotenv("A='x' y\n").unwrap_err().1.contains("after closing quote"));
        assert_eq!(parse_dotenv("1A=x\n").unwrap_err().0, 1);
    }

    #[test]
    fn test_dotenv_file_with_mock_env() {
        let env = MockEnv::new().with_file(".env", "PORT=8080\n");
        let data = DotEnv::file(".env").load(&env).unwrap();
        assert_eq!(data.get("PORT"), Some("8080"));
    }

    #[test]
    fn test_dotenv_missing_file() {
        let env = MockEnv::new();
        let err = DotEnv::file(".env").load(&env).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));

        let data = DotEnv::file(".env").optional().load(&env).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_dotenv_unreadable_file() {
        let env = MockEnv::new().with_unreadable_file(".env");
        let err = DotEnv::file(".env").optional().load(&env).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn test_dotenv_parse_error_names_source() {
        let err = DotEnv::string("oops")
            .named("defaults")
            .load(&MockEnv::new())
            .unwrap_err();
        assert_eq!(
            err,
            SourceError::Parse {
                source_name: "defaults".into(),
                line: Some(1),
                message: "expected KEY=VALUE".into(),
            }
        );
    }
}
