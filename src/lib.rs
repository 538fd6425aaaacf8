// Allow large error types - settings errors carry full issue lists
#![allow(clippy::result_large_err)]

//! Configvar: composable, strongly typed configuration variables.
//!
//! Configvar turns flat string data (environment variables, `.env` files,
//! JSON objects) into validated, typed settings. Every field is checked and
//! every problem is reported in one pass, using stillwater's error
//! accumulation.
//!
//! # Core Concepts
//!
//! - **Variables**: immutable parsers built from combinators (`optional`,
//!   `default_to`, `or`, `transform`, `from`, `describe`)
//! - **Kinds**: number, integer, string, boolean, enumeration, JSON and date
//! - **Schemas**: nested groups of variables, with union alternatives
//! - **All-or-nothing resolution**: a settings value is produced only when
//!   every field is valid; otherwise every issue is listed with its path
//! - **Testable I/O**: sources read through the `DataEnv` trait
//!
//! # Quick Start
//!
//! ```
//! use configvar::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct App {
//!     host: String,
//!     port: i64,
//!     debug: bool,
//! }
//!
//! let schema = Group::new()
//!     .field("host", string().from("HOST").default_to("localhost"))
//!     .field("port", integer().min(1.0).max(65535.0).from("PORT"))
//!     .field("debug", boolean().from("DEBUG").default_to(false));
//!
//! let env = MockEnv::new().with_env("PORT", "0x1F90");
//! let settings = Settings::<App>::builder()
//!     .schema(schema)
//!     .source(Env::all())
//!     .build_with_env(&env)
//!     .unwrap();
//!
//! assert_eq!(settings.port, 8080);
//! assert_eq!(settings.host, "localhost");
//! ```
//!
//! # Variables
//!
//! Combinators never modify a variable; each returns a new one.
//!
//! ```
//! use configvar::{enumeration, integer, VarResultExt};
//!
//! let level = enumeration(["debug", "info"]).insensitive();
//! let verbosity = level.map(|l: String| if l == "debug" { 2i64 } else { 1 }).or(&integer());
//!
//! assert_eq!(verbosity.parse(Some("DEBUG")).value(), Some(&2));
//! assert_eq!(verbosity.parse(Some("7")).value(), Some(&7));
//! assert_eq!(verbosity.parse(Some("loud")).issues().map(|i| i.len()), Some(2));
//! ```
//!
//! # Module Structure
//!
//! - [`prelude`]: Convenient re-exports for common usage
//! - [`result`]: `VarResult` and `Issues`
//! - [`variable`]: `Variable`, the `Kind` trait and the combinator kinds
//! - [`kinds`]: Typed kinds and their constructors
//! - [`schema`]: `Schema` and `Group` trees
//! - [`resolve`]: `parse_results`, `parse_values`, `parse_settings`
//! - [`settings`]: `Settings` and `SettingsBuilder`
//! - [`source`] / [`sources`]: flat `Data` and its producers
//! - [`mod@env`]: `DataEnv` trait and `MockEnv` for testing
//! - [`error`]: Error types
//! - [`pretty`]: Issue reports for terminals
//!
//! # Stillwater Integration
//!
//! | Type | Usage |
//! |------|-------|
//! | `Validation<T, E>` | Every parse result (`VarResult<T>`) |
//! | `NonEmptyVec<T>` | Guaranteed non-empty issue lists |
//! | `Semigroup` | Combining issues from union members and fields |

pub mod env;
pub mod error;
pub mod kinds;
pub mod prelude;
pub mod pretty;
pub mod resolve;
pub mod result;
pub mod schema;
pub mod settings;
pub mod source;
pub mod sources;
pub mod variable;

pub use env::{DataEnv, MockEnv, RealEnv};
pub use error::{
    format_path, PathSegment, SchemaError, SettingsError, SourceError, VariableIssue,
    VariableIssues,
};
pub use kinds::{
    boolean, date, enumeration, integer, json, number, string, DateObject, Timezone,
};
pub use pretty::{ColorOption, PrettyPrintOptions, SettingsResultExt};
pub use resolve::{parse_results, parse_settings, parse_values, ResultTree};
pub use result::{failure, failure_all, success, Issues, VarResult, VarResultExt};
pub use schema::{Field, Group, Schema};
pub use settings::{Settings, SettingsBuilder};
pub use source::{merge_data, Data, Source};
pub use variable::{Kind, Variable};

pub use sources::Env;

#[cfg(feature = "dotenv")]
pub use sources::DotEnv;

#[cfg(feature = "json")]
pub use sources::JsonSource;

// Re-export stillwater types for convenience
pub use stillwater::{NonEmptyVec, Semigroup, Validation};
