// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable slot storage for the Strongbox credential vault.
//!
//! Three [`DurableStore`] backends are provided:
//! - [`FileStore`]: one JSON document replaced atomically on every write.
//! - [`SqliteStore`]: WAL-mode SQLite with embedded migrations and a
//!   single-writer connection via `tokio-rusqlite`.
//! - [`MemoryStore`]: process-local, for tests and dry runs.

pub mod database;
pub mod file;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::sync::Arc;

use strongbox_config::model::{StorageBackend, StorageConfig};
use strongbox_core::{DurableStore, StrongboxError};
use tracing::info;

pub use database::Database;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Open the backend selected by `config`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn DurableStore>, StrongboxError> {
    let path = config.resolved_path();
    let store: Arc<dyn DurableStore> = match config.backend {
        StorageBackend::File => Arc::new(FileStore::new(&path)),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&path, config.wal_mode).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!(backend = %config.backend, path = %path.display(), "durable store opened");
    Ok(store)
}
