//! Data source implementations.
//!
//! This module contains implementations of the `Source` trait for the
//! process environment, `.env` text and JSON objects.

use std::path::Path;

use tracing::warn;

use crate::env::DataEnv;
use crate::error::SourceError;

mod env_source;
pub use env_source::Env;

#[cfg(feature = "dotenv")]
mod dotenv_source;

#[cfg(feature = "dotenv")]
pub use dotenv_source::{parse_dotenv, DotEnv};

#[cfg(feature = "json")]
mod json_source;

#[cfg(feature = "json")]
pub use json_source::JsonSource;

/// Where a file-backed source reads its text from.
#[derive(Debug, Clone)]
pub(crate) enum Content {
    File(std::path::PathBuf),
    String(String),
}

impl Content {
    /// Read the text, or `None` for a missing optional file.
    pub(crate) fn read(
        &self,
        env: &dyn DataEnv,
        required: bool,
        source_name: &str,
    ) -> Result<Option<String>, SourceError> {
        match self {
            Content::String(content) => Ok(Some(content.clone())),
            Content::File(path) => read_file(env, path, required, source_name),
        }
    }
}

fn read_file(
    env: &dyn DataEnv,
    path: &Path,
    required: bool,
    source_name: &str,
) -> Result<Option<String>, SourceError> {
    match env.read_file(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(SourceError::NotFound {
                    source_name: source_name.to_string(),
                    path: path.display().to_string(),
                })
            } else {
                warn!(path = %path.display(), "optional settings file not found, skipping");
                Ok(None)
            }
        }
        Err(e) => Err(SourceError::Io {
            source_name: source_name.to_string(),
            message: e.to_string(),
        }),
    }
}
