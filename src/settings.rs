//! Core Settings type and SettingsBuilder.
//!
//! The builder ties sources and a schema together: load every source, merge
//! their data, resolve the schema, then deserialize into the caller's type.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::env::{DataEnv, RealEnv};
use crate::error::SettingsError;
use crate::resolve::{deserialize_settings, parse_results, parse_values, ResultTree};
use crate::schema::Schema;
use crate::source::{merge_data, Data, Source};

/// Validated settings of type `T`.
///
/// Derefs to `T`, so fields can be read directly.
#[derive(Debug, Clone)]
pub struct Settings<T> {
    inner: T,
}

impl<T> Settings<T> {
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    pub fn get(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn builder() -> SettingsBuilder<T> {
        SettingsBuilder::new()
    }
}

impl<T> std::ops::Deref for Settings<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> AsRef<T> for Settings<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

/// Builder for [`Settings`].
///
/// Sources are applied in the order they are added; later sources override
/// keys from earlier ones. With no sources the schema resolves against
/// empty data.
///
/// # Example
///
/// ```
/// use configvar::{env::MockEnv, integer, string, DotEnv, Env, Group, Settings};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct App {
///     host: String,
///     port: i64,
/// }
///
/// let env = MockEnv::new()
///     .with_file(".env", "HOST=localhost\nPORT=80\n")
///     .with_env("PORT", "8080");
///
/// let settings = Settings::<App>::builder()
///     .schema(Group::new()
///         .field("host", string().from("HOST"))
///         .field("port", integer().from("PORT")))
///     .source(DotEnv::file(".env"))
///     .source(Env::all())
///     .build_with_env(&env)
///     .unwrap();
///
/// assert_eq!(settings.host, "localhost");
/// assert_eq!(settings.port, 8080);
/// ```
pub struct SettingsBuilder<T> {
    schema: Option<Schema>,
    sources: Vec<Box<dyn Source>>,
    _marker: PhantomData<T>,
}

impl<T> Default for SettingsBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SettingsBuilder<T> {
    pub fn new() -> Self {
        Self {
            schema: None,
            sources: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Set the schema to resolve. A later call replaces the earlier schema.
    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a data source.
    pub fn source<S: Source + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Load and merge every source.
    ///
    /// All sources are attempted; their failures are reported together.
    pub fn load_data(&self, env: &dyn DataEnv) -> Result<Data, SettingsError> {
        let mut all_data = Vec::with_capacity(self.sources.len());
        let mut all_errors = Vec::new();

        for source in &self.sources {
            match source.load(env) {
                Ok(data) => all_data.push(data),
                Err(error) => all_errors.push(error),
            }
        }

        if !all_errors.is_empty() {
            debug!(failed = all_errors.len(), "settings sources failed");
            return Err(SettingsError::Sources(all_errors));
        }

        Ok(merge_data(all_data))
    }

    /// Per-field outcomes without failing on invalid values.
    ///
    /// Useful for reporting which settings are set and valid.
    pub fn results_with_env(&self, env: &dyn DataEnv) -> Result<ResultTree, SettingsError> {
        let schema = self.schema.as_ref().ok_or(SettingsError::NoSchema)?;
        let data = self.load_data(env)?;
        Ok(parse_results(schema, &data)?)
    }

    /// Build using the real filesystem and process environment.
    pub fn build(self) -> Result<Settings<T>, SettingsError>
    where
        T: DeserializeOwned,
    {
        self.build_with_env(&RealEnv::new())
    }

    /// Build with an injected environment (use `MockEnv` in tests).
    pub fn build_with_env(self, env: &dyn DataEnv) -> Result<Settings<T>, SettingsError>
    where
        T: DeserializeOwned,
    {
        let schema = self.schema.as_ref().ok_or(SettingsError::NoSchema)?;
        let data = self.load_data(env)?;
        let value = parse_values(schema, &data)?;
        deserialize_settings(value).map(Settings::new)
    }
}
