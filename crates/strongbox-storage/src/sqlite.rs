// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DurableStore trait.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::params;
use strongbox_core::{DurableStore, StrongboxError};
use tracing::debug;

use crate::database::{map_tr_err, Database};

/// SQLite-backed slot store: one row per slot in the `slots` table.
///
/// `set_many` runs inside a single transaction, so multi-slot writes such as
/// key rotation commit together or not at all.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open or create the database at `path` and run migrations.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, StrongboxError> {
        let db = Database::open(path, wal_mode).await?;
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint the WAL before the process exits.
    pub async fn close(&self) -> Result<(), StrongboxError> {
        self.db.checkpoint().await
    }
}

const UPSERT_SLOT: &str = "INSERT INTO slots (name, value, updated_at)
     VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
     ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

#[async_trait]
impl DurableStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, StrongboxError> {
        let slot = slot.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT value FROM slots WHERE name = ?1")?;
                match stmt.query_row(params![slot], |row| row.get::<_, Vec<u8>>(0)) {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, slot: &str, value: &[u8]) -> Result<(), StrongboxError> {
        let slot_owned = slot.to_string();
        let value = value.to_vec();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(UPSERT_SLOT, params![slot_owned, value])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(slot = %slot, "slot written");
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), StrongboxError> {
        let owned: Vec<(String, Vec<u8>)> = entries
            .iter()
            .map(|(slot, value)| (slot.to_string(), value.to_vec()))
            .collect();
        let count = owned.len();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                for (slot, value) in &owned {
                    tx.execute(UPSERT_SLOT, params![slot, value])?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(count, "slots written in one transaction");
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), StrongboxError> {
        let slot_owned = slot.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM slots WHERE name = ?1", params![slot_owned])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(slot = %slot, "slot removed");
        Ok(())
    }
}
