//! Enfermaria Store - SQLite persistence and CSV export
//!
//! Provides:
//! - `Store`: the on-disk database file, its pragmas and versioned migrations
//! - `VisitRepo`: transactional CRUD over visits and their conducts
//! - `CsvExporter`: denormalized, one-hot expanded CSV snapshots

pub mod db;
pub mod errors;
pub mod export;
pub mod migrations;
pub mod repo;

pub use db::Store;
pub use errors::Result;
pub use export::{CsvExporter, ExportFilter, ExportSummary};
pub use migrations::SchemaReport;
pub use repo::VisitRepo;
