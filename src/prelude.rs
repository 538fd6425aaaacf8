//! Convenient re-exports for common configvar usage.
//!
//! # Quick Start
//!
//! ```
//! use configvar::prelude::*;
//!
//! let schema = Group::new()
//!     .field("url", string().url().from("DATABASE_URL"))
//!     .field("pool", integer().min(1.0).from("DB_POOL").default_to(4));
//!
//! let data = Data::new().with("DATABASE_URL", "postgres://localhost/app");
//! let value = parse_values(&schema.into(), &data).unwrap();
//! assert_eq!(value["pool"], 4);
//! ```
//!
//! # Import Patterns
//!
//! ## Selective Imports
//!
//! ```ignore
//! use configvar::{integer, Group, Settings};
//! use configvar::error::VariableIssues;
//! ```
//!
//! ## Advanced: Custom Kinds
//!
//! ```ignore
//! use configvar::prelude::*;
//! use configvar::variable::Kind;
//! ```

// ============================================================================
// Stillwater re-exports (core functional programming types)
// ============================================================================

/// Result type with error accumulation. Every parse returns one.
pub use stillwater::Validation;

/// Trait for combining values. `Issues` and `VariableIssues` implement it.
pub use stillwater::Semigroup;

/// Guaranteed non-empty collection. Underlying type for issue lists.
pub use stillwater::NonEmptyVec;

// ============================================================================
// Results and errors
// ============================================================================

pub use crate::result::{failure, failure_all, success, Issues, VarResult, VarResultExt};

pub use crate::error::{
    PathSegment, SchemaError, SettingsError, SourceError, VariableIssue, VariableIssues,
};

// ============================================================================
// Variables and kinds
// ============================================================================

pub use crate::variable::{Kind, Variable};

pub use crate::kinds::{
    boolean, date, enumeration, integer, json, number, string, DateObject, Timezone, Validator,
};

// ============================================================================
// Schemas and resolution
// ============================================================================

pub use crate::schema::{Group, Schema};

pub use crate::resolve::{parse_results, parse_settings, parse_values, ResultTree};

pub use crate::settings::{Settings, SettingsBuilder};

// ============================================================================
// Data and sources
// ============================================================================

pub use crate::source::{Data, Source};

pub use crate::sources::Env;

#[cfg(feature = "dotenv")]
pub use crate::sources::DotEnv;

#[cfg(feature = "json")]
pub use crate::sources::JsonSource;

pub use crate::env::{DataEnv, MockEnv, RealEnv};

// ============================================================================
// Pretty printing
// ============================================================================

pub use crate::pretty::{ColorOption, PrettyPrintOptions, SettingsResultExt};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_validation_all_vec_accumulates_issues() {
        let v1: VarResult<i64> = integer().parse(Some("x"));
        let v2: VarResult<i64> = integer().parse(None);
        let v3: VarResult<i64> = integer().parse(Some("1"));

        let result = Validation::all_vec(vec![v1, v2, v3]);
        match result {
            Validation::Failure(issues) => {
                assert_eq!(issues.to_vec(), vec!["must be an integer", "is required"]);
            }
            Validation::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_prelude_semigroup_combine() {
        let combined = Issues::single("a").combine(Issues::single("b"));
        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn test_prelude_nonemptyvec_available() {
        let nev = NonEmptyVec::singleton(42);
        assert_eq!(*nev.head(), 42);
    }

    #[test]
    fn test_prelude_end_to_end() {
        #[derive(Debug, serde::Deserialize)]
        struct App {
            level: String,
        }

        let settings = Settings::<App>::builder()
            .schema(Group::new().field("level", enumeration(["info", "warn"]).from("LEVEL")))
            .source(Env::all())
            .build_with_env(&MockEnv::new().with_env("LEVEL", "warn"))
            .unwrap();
        assert_eq!(settings.level, "warn");
    }
}
