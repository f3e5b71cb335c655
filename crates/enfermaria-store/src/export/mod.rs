//! CSV export of visits joined with their conducts

mod csv_export;

pub use csv_export::{header, CsvExporter, ExportFilter, ExportSummary};
