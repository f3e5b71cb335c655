//! Error helpers for the store
//!
//! Every failure leaves this crate as a core `EnfError`.

use enfermaria_core::errors::{EnfError, EnfErrorKind};
use std::path::Path;

/// Result type alias using EnfError
pub type Result<T> = std::result::Result<T, EnfError>;

/// The store cannot be opened at `path`
pub fn storage_unavailable(path: &Path, reason: &str) -> EnfError {
    EnfError::new(EnfErrorKind::StorageUnavailable)
        .with_op("store_open")
        .with_entity_id(path.display().to_string())
        .with_message(reason.to_string())
}

/// A migration failed
pub fn migration_error(migration_id: &str, reason: &str) -> EnfError {
    EnfError::new(EnfErrorKind::Persistence)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// A visit id has no row
pub fn visit_not_found(op: &str, id: i64) -> EnfError {
    EnfError::new(EnfErrorKind::NotFound)
        .with_op(op)
        .with_entity_id(id.to_string())
        .with_message("Visit not found")
}

/// Create a persistence error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> EnfError {
    EnfError::new(EnfErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> EnfError {
    EnfError::new(EnfErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Wrap any failure raised while an export is being written
pub fn export_error(path: &Path, source: EnfError) -> EnfError {
    EnfError::new(EnfErrorKind::Export)
        .with_op("export_csv")
        .with_entity_id(path.display().to_string())
        .with_message(source.message().to_string())
        .with_source(source)
}

pub fn from_csv(err: csv::Error) -> EnfError {
    EnfError::new(EnfErrorKind::Io)
        .with_op("csv_write")
        .with_message(err.to_string())
}
