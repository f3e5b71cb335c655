//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for reads. Unlike
//! `apply_engine_command`, it takes a shared store and never writes.

use chrono::{NaiveDate, NaiveDateTime};
use enfermaria_core::core_types::RequestId;
use enfermaria_core::errors::{EnfError, EnfErrorKind};
use enfermaria_core::model::{HistoryPeriod, PatientIdentity, Visit, VisitSummary};
use enfermaria_core::{log_op_end, log_op_error, log_op_start};
use enfermaria_store::errors::Result;
use enfermaria_store::{Store, VisitRepo};
use std::time::Instant;

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// A visit with its conducts.
    VisitGet { id: i64 },
    /// Identification block of the badge's latest visit, for prefill.
    LastIdentity { badge: String },
    /// Visits in a history window ending today, optionally for one badge.
    VisitHistory {
        badge: Option<String>,
        period: HistoryPeriod,
        today: NaiveDate,
    },
    /// Visits between two instants, both included.
    VisitRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
        badge: Option<String>,
    },
}

impl EngineQuery {
    fn op(&self) -> &'static str {
        match self {
            EngineQuery::VisitGet { .. } => "visit_get",
            EngineQuery::LastIdentity { .. } => "visit_last_identity",
            EngineQuery::VisitHistory { .. } => "visit_history",
            EngineQuery::VisitRange { .. } => "visit_range",
        }
    }
}

/// All possible results from `apply_engine_query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineQueryResult {
    Visit(Box<Visit>),
    /// `None` for a badge never seen before
    LastIdentity(Option<PatientIdentity>),
    VisitList(Vec<VisitSummary>),
}

/// Apply a read-only engine query.
///
/// # Errors
///
/// `NotFound` when `VisitGet` names a missing visit, `InvalidInput` for a
/// range that ends before it starts, `Persistence` for SQLite failures.
pub fn apply_engine_query(query: EngineQuery, store: &Store) -> Result<EngineQueryResult> {
    let op = query.op();
    let request_id = RequestId::new();
    log_op_start!(op, request_id = %request_id);
    let start = Instant::now();

    let result = dispatch(query, store).map_err(|e| e.with_request_id(request_id.clone()));

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

fn dispatch(query: EngineQuery, store: &Store) -> Result<EngineQueryResult> {
    let repo = VisitRepo::new(store);
    match query {
        EngineQuery::VisitGet { id } => {
            let visit = repo.get_by_id(id)?.ok_or_else(|| {
                EnfError::new(EnfErrorKind::NotFound)
                    .with_op("visit_get")
                    .with_entity_id(id.to_string())
                    .with_message("Visit not found")
            })?;
            Ok(EngineQueryResult::Visit(Box::new(visit)))
        }
        EngineQuery::LastIdentity { badge } => {
            Ok(EngineQueryResult::LastIdentity(repo.get_last_by_badge(&badge)?))
        }
        EngineQuery::VisitHistory {
            badge,
            period,
            today,
        } => {
            let visits =
                repo.list_by_badge_or_all(badge.as_deref(), period.days_ago(today), today)?;
            Ok(EngineQueryResult::VisitList(visits))
        }
        EngineQuery::VisitRange { start, end, badge } => {
            if end < start {
                return Err(EnfError::new(EnfErrorKind::InvalidInput)
                    .with_op("visit_range")
                    .with_message(format!("Range ends ({}) before it starts ({})", end, start)));
            }
            let visits = repo.list_by_date_time_range(start, end, badge.as_deref())?;
            Ok(EngineQueryResult::VisitList(visits))
        }
    }
}
