//! Store handle
//!
//! One open SQLite connection per store file, injected into the repository
//! and the exporter instead of a process-wide path.

use crate::errors::{from_rusqlite, storage_unavailable, Result};
use crate::migrations::{apply_migrations, SchemaReport};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create the store at `path`
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when the parent directory is missing or read-only,
    /// or SQLite refuses the file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        check_parent_dir(path)?;

        let conn = Connection::open(path)
            .map_err(|e| storage_unavailable(path, &e.to_string()))?;
        configure(&conn).map_err(|e| storage_unavailable(path, e.message()))?;

        tracing::debug!(path = %path.display(), "Store opened");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
        configure(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Bring the tables up to the current shape
    ///
    /// Safe on every startup. Column additions that fail are reported in
    /// the returned warnings and retried on the next call.
    ///
    /// # Errors
    ///
    /// `Persistence` if the base tables cannot be created.
    pub fn ensure_schema(&mut self) -> Result<SchemaReport> {
        apply_migrations(&mut self.conn)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn check_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let meta = std::fs::metadata(parent).map_err(|e| {
        storage_unavailable(path, &format!("parent directory unavailable: {}", e))
    })?;
    if !meta.is_dir() {
        return Err(storage_unavailable(path, "parent is not a directory"));
    }
    if meta.permissions().readonly() {
        return Err(storage_unavailable(path, "parent directory is read-only"));
    }
    Ok(())
}

/// Cascade deletes and write-ahead logging
fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    // journal_mode answers with the mode in effect; in-memory stores stay "memory"
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(from_rusqlite)?;
    tracing::debug!(journal_mode = %mode, "Store configured");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enfermaria_core::errors::EnfErrorKind;

    #[test]
    fn test_foreign_keys_enabled() {
        let store = Store::open_in_memory().unwrap();
        let enabled: i64 = store
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_missing_parent_is_unavailable() {
        let dir = std::env::temp_dir().join("enfermaria-missing-parent-dir");
        let _ = std::fs::remove_dir_all(&dir);
        let err = Store::open(dir.join("atendimentos.db")).err().unwrap();
        assert_eq!(err.kind(), EnfErrorKind::StorageUnavailable);
    }
}
