//! Engine-level write commands.
//!
//! Each command runs inside one `log_op_start!`/`log_op_end!` pair stamped
//! with a fresh `RequestId`; failures carry the same id.

use enfermaria_core::core_types::{RequestId, Sensitive};
use enfermaria_core::model::Visit;
use enfermaria_core::{log_op_end, log_op_error, log_op_start};
use enfermaria_store::errors::Result;
use enfermaria_store::{CsvExporter, ExportFilter, ExportSummary, Store, VisitRepo};
use std::path::PathBuf;
use std::time::Instant;

/// Commands that write to the store or the file system.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Insert a new visit with its conducts.
    VisitSave { visit: Visit },
    /// Overwrite a stored visit and replace its conducts.
    VisitUpdate { visit: Visit },
    VisitDelete { id: i64 },
    /// Write a CSV snapshot of the visits matching `filter`.
    Export { path: PathBuf, filter: ExportFilter },
}

impl EngineCommand {
    fn op(&self) -> &'static str {
        match self {
            EngineCommand::VisitSave { .. } => "visit_save",
            EngineCommand::VisitUpdate { .. } => "visit_update",
            EngineCommand::VisitDelete { .. } => "visit_delete",
            EngineCommand::Export { .. } => "export_csv",
        }
    }
}

/// Result of applying an engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommandResult {
    VisitSaved { id: i64 },
    VisitUpdated { id: i64 },
    VisitDeleted { id: i64 },
    Exported(ExportSummary),
}

/// Apply an engine command.
///
/// The store is taken mutably: the engine is the single writer.
///
/// # Errors
///
/// `InvalidInput`, `NotFound` or `Persistence` from the repository, and
/// `Export` from the exporter. Every error carries the call's request id.
pub fn apply_engine_command(cmd: EngineCommand, store: &mut Store) -> Result<EngineCommandResult> {
    let op = cmd.op();
    let request_id = RequestId::new();
    log_op_start!(op, request_id = %request_id);
    let start = Instant::now();

    let result = dispatch(cmd, store).map_err(|e| e.with_request_id(request_id.clone()));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = elapsed, request_id = %request_id);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = elapsed, request_id = %request_id);
        }
    }
    result
}

fn dispatch(cmd: EngineCommand, store: &Store) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::VisitSave { visit } => {
            tracing::debug!(
                badge = visit.badge_number(),
                patient = ?Sensitive::new(&visit.details.identity.name),
                conduct_count = visit.conducts().len(),
                "Saving visit"
            );
            let id = VisitRepo::new(store).save(&visit)?;
            Ok(EngineCommandResult::VisitSaved { id })
        }
        EngineCommand::VisitUpdate { visit } => {
            tracing::debug!(
                visit_id = ?visit.id,
                patient = ?Sensitive::new(&visit.details.identity.name),
                conduct_count = visit.conducts().len(),
                "Updating visit"
            );
            VisitRepo::new(store).update(&visit)?;
            // update() rejects a visit without an id
            Ok(EngineCommandResult::VisitUpdated {
                id: visit.id.unwrap_or_default(),
            })
        }
        EngineCommand::VisitDelete { id } => {
            VisitRepo::new(store).delete(id)?;
            Ok(EngineCommandResult::VisitDeleted { id })
        }
        EngineCommand::Export { path, filter } => {
            let summary = CsvExporter::new(store).export(&path, &filter)?;
            Ok(EngineCommandResult::Exported(summary))
        }
    }
}
