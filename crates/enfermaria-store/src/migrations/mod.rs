//! Migration framework
//!
//! Provides:
//! - Versioned migration list tracked in `schema_version`
//! - Fatal SQL migrations for the base tables
//! - Additive, non-fatal column migrations for later versions

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, ColumnSpec, Migration, MigrationStep};
pub use runner::apply_migrations;

/// Outcome of a schema check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Migrations recorded by this call
    pub applied: Vec<String>,
    /// Column additions that failed and will be retried
    pub warnings: Vec<String>,
}
