// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use strongbox_core::StrongboxError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), StrongboxError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(StrongboxError::storage)?;
    for migration in report.applied_migrations() {
        tracing::debug!(version = migration.version(), name = %migration.name(), "applied migration");
    }
    Ok(())
}
