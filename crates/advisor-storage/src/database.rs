// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;
use std::time::Duration;

use advisor_core::AdvisorError;
use tracing::{debug, info};

use crate::migrations;

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a tokio-rusqlite error into `AdvisorError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AdvisorError {
    AdvisorError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    wal_mode: bool,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply PRAGMAs and
    /// run pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, AdvisorError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(AdvisorError::storage)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| AdvisorError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn, wal_mode };
        db.prepare().await?;
        info!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database with the full schema applied.
    pub async fn open_in_memory() -> Result<Self, AdvisorError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| AdvisorError::Storage {
                source: Box::new(e),
            })?;
        let db = Self {
            conn,
            wal_mode: false,
        };
        db.prepare().await?;
        Ok(db)
    }

    async fn prepare(&self) -> Result<(), AdvisorError> {
        let wal_mode = self.wal_mode;
        self.conn
            .call(move |conn| -> Result<(), AdvisorError> {
                if wal_mode {
                    let mode: String = conn
                        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
                        .map_err(AdvisorError::storage)?;
                    debug!(journal_mode = %mode, "journal mode set");
                    conn.pragma_update(None, "synchronous", "NORMAL")
                        .map_err(AdvisorError::storage)?;
                }
                conn.pragma_update(None, "foreign_keys", "ON")
                    .map_err(AdvisorError::storage)?;
                conn.busy_timeout(BUSY_TIMEOUT)
                    .map_err(AdvisorError::storage)?;
                migrations::run_migrations(conn)
            })
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => AdvisorError::Storage {
                    source: other.to_string().into(),
                },
            })
    }

    /// The shared connection handle. All queries go through its background thread.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Whether the database was opened in WAL journal mode.
    pub fn wal_mode(&self) -> bool {
        self.wal_mode
    }

    /// Flush the WAL into the main database file. No-op outside WAL mode.
    pub async fn checkpoint(&self) -> Result<(), AdvisorError> {
        if !self.wal_mode {
            return Ok(());
        }
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
