// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and migrations.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::{Path, PathBuf};

use strongbox_core::StrongboxError;
use tracing::debug;

use crate::migrations::run_migrations;

/// A migrated SQLite database with its single async connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database at `path`.
    ///
    /// Schema setup runs on a blocking thread with a short-lived synchronous
    /// connection; afterwards every statement goes through the async one.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, StrongboxError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StrongboxError::storage)?;
        }

        let setup_path = path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StrongboxError> {
            let mut conn =
                rusqlite::Connection::open(&setup_path).map_err(StrongboxError::storage)?;
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.execute_batch(&format!("PRAGMA journal_mode = {journal};"))
                .map_err(StrongboxError::storage)?;
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| StrongboxError::Internal(format!("database setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(StrongboxError::storage)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA synchronous = FULL;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path.display(), wal_mode, "database opened");
        Ok(Self { conn, path })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), StrongboxError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert tokio-rusqlite errors to StrongboxError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> StrongboxError {
    StrongboxError::storage(e)
}
