//! DataEnv trait for testable I/O.
//!
//! Sources never touch the filesystem or the process environment directly;
//! they go through a [`DataEnv`], so tests can substitute [`MockEnv`].

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// File and environment access used by sources.
///
/// # Example
///
/// ```ignore
/// // Production
/// let settings = Settings::<App>::builder()
///     .schema(schema)
///     .source(DotEnv::file(".env"))
///     .build();  // Uses RealEnv
///
/// // Testing
/// let env = MockEnv::new().with_file(".env", "PORT=8080");
/// let settings = Settings::<App>::builder()
///     .schema(schema)
///     .source(DotEnv::file(".env"))
///     .build_with_env(&env);
/// ```
pub trait DataEnv: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` with `ErrorKind::NotFound` for missing files, or
    /// any other I/O failure.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Get an environment variable by name.
    fn get_env(&self, name: &str) -> Option<String>;

    /// All environment variables as (name, value) pairs.
    fn env_vars(&self) -> Vec<(String, String)>;
}

/// Production environment backed by `std::fs` and `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealEnv;

impl RealEnv {
    pub fn new() -> Self {
        Self
    }
}

impl DataEnv for RealEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn get_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn env_vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }
}

#[derive(Debug, Clone)]
enum MockFile {
    Content(String),
    Unreadable,
}

/// In-memory environment for tests.
///
/// ```
/// use configvar::env::{DataEnv, MockEnv};
/// use std::path::Path;
///
/// let env = MockEnv::new()
///     .with_file(".env", "PORT=8080\n")
///     .with_env("APP_DEBUG", "true");
///
/// assert!(env.file_exists(Path::new(".env")));
/// assert_eq!(env.get_env("APP_DEBUG"), Some("true".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    files: HashMap<PathBuf, MockFile>,
    env_vars: HashMap<String, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .insert(path.into(), MockFile::Content(content.into()));
        self
    }

    /// Add a file whose reads fail with "permission denied".
    pub fn with_unreadable_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), MockFile::Unreadable);
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(name.into(), value.into());
        self
    }

    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

impl DataEnv for MockEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        match self.files.get(path) {
            Some(MockFile::Content(content)) => Ok(content.clone()),
            Some(MockFile::Unreadable) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock permission denied: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            )),
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        matches!(self.files.get(path), Some(MockFile::Content(_)))
    }

    fn get_env(&self, name: &str) -> Option<String> {
        self.env_vars.get(name).cloned()
    }

    fn env_vars(&self) -> Vec<(String, String)> {
        self.env_vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_env_file_exists() {
        let env = RealEnv::new();
        assert!(env.file_exists(Path::new("Cargo.toml")));
        assert!(!env.file_exists(Path::new("missing.env")));
    }

    #[test]
    fn test_mock_env_files() {
        let env = MockEnv::new().with_file(".env", "A=1");
        assert!(env.file_exists(Path::new(".env")));
        assert_eq!(env.read_file(Path::new(".env")).unwrap(), "A=1");

        let err = env.read_file(Path::new("other.env")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_env_unreadable_file() {
        let env = MockEnv::new().with_unreadable_file("secret.env");
        assert!(!env.file_exists(Path::new("secret.env")));
        let err = env.read_file(Path::new("secret.env")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_mock_env_vars() {
        let env = MockEnv::new()
            .with_env("APP_HOST", "localhost")
            .with_envs([("APP_PORT", "8080"), ("OTHER", "x")]);

        assert_eq!(env.get_env("APP_HOST"), Some("localhost".to_string()));
        assert_eq!(env.get_env("MISSING"), None);
        assert_eq!(env.env_vars().len(), 3);
    }
}
