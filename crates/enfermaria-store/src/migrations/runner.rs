//! Migration runner
//!
//! Applies pending migrations in order and records each one in
//! `schema_version` with its checksum.

use super::SchemaReport;
use crate::errors::{from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{get_migrations, ColumnSpec, Migration, MigrationStep};
use enfermaria_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::{Connection, OptionalExtension};
use std::time::Instant;

/// Apply all pending migrations to the database
///
/// # Errors
///
/// `Persistence` if an SQL migration fails. Column additions never fail the
/// call; they end up in [`SchemaReport::warnings`].
pub fn apply_migrations(conn: &mut Connection) -> Result<SchemaReport> {
    let start = Instant::now();
    log_op_start!("ensure_schema");

    let result = run_all(conn);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => {
            log_op_end!(
                "ensure_schema",
                duration_ms = duration_ms,
                applied = report.applied.len(),
                warnings = report.warnings.len()
            );
        }
        Err(e) => {
            log_op_error!("ensure_schema", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn run_all(conn: &mut Connection) -> Result<SchemaReport> {
    create_schema_version_table(conn)?;

    let mut report = SchemaReport::default();
    for migration in get_migrations() {
        if is_applied(conn, migration.id)? {
            continue;
        }
        let complete = match &migration.step {
            MigrationStep::Sql(sql) => {
                apply_sql(conn, migration.id, sql)?;
                true
            }
            MigrationStep::AddColumns(columns) => {
                add_columns(conn, migration.id, columns, &mut report.warnings)?
            }
        };
        if complete {
            record(conn, &migration)?;
            tracing::info!(migration_id = migration.id, "Migration applied");
            report.applied.push(migration.id.to_string());
        }
    }
    Ok(report)
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        )",
        [],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

fn is_applied(conn: &Connection, migration_id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM schema_version WHERE migration_id = ?",
            [migration_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}

fn apply_sql(conn: &mut Connection, migration_id: &str, sql: &str) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(sql)
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;
    tx.commit().map_err(from_rusqlite)
}

/// Returns true when every column is present afterwards
fn add_columns(
    conn: &Connection,
    migration_id: &str,
    columns: &[ColumnSpec],
    warnings: &mut Vec<String>,
) -> Result<bool> {
    let mut complete = true;
    for column in columns {
        if column_exists(conn, column.table, column.name)? {
            continue;
        }
        if let Err(e) = conn.execute(&column.alter_sql(), []) {
            let warning = format!(
                "{}: could not add {}.{}: {}",
                migration_id, column.table, column.name, e
            );
            tracing::warn!(
                migration_id = migration_id,
                table = column.table,
                column = column.name,
                error = %e,
                "Column migration failed, continuing"
            );
            warnings.push(warning);
            complete = false;
        }
    }
    Ok(complete)
}

pub(crate) fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(from_rusqlite)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(names.iter().any(|n| n == column))
}

fn record(conn: &Connection, migration: &Migration) -> Result<()> {
    let checksum = compute_checksum(&migration.checksum_source());
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?, ?, ?)",
        rusqlite::params![migration.id, now, checksum],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}
