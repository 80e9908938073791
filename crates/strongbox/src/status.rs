// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox status` and `strongbox rotate-key` command implementations.
//!
//! `status` never creates a key: when the key slot is empty it reports an
//! uninitialized vault without unlocking anything.

use std::io::IsTerminal;
use std::sync::Arc;

use serde::Serialize;
use strongbox_config::model::StrongboxConfig;
use strongbox_core::StrongboxError;
use strongbox_vault::{RingAead, SlotNames, VaultSession};
use tracing::info;

use crate::entries::open_vault;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub backend: String,
    pub path: Option<String>,
    pub algorithm: &'static str,
    pub initialized: bool,
    pub records: Option<usize>,
    pub quarantined: Option<usize>,
}

async fn collect_status(config: &StrongboxConfig) -> Result<StatusResponse, StrongboxError> {
    let store = strongbox_storage::open_store(&config.storage).await?;
    let provider = Arc::new(RingAead::new());
    let session = VaultSession::new(store, provider, SlotNames::from(&config.storage));

    let mut status = StatusResponse {
        backend: config.storage.backend.to_string(),
        path: (config.storage.backend != strongbox_config::StorageBackend::Memory)
            .then(|| config.storage.resolved_path().display().to_string()),
        algorithm: session.keys().provider().algorithm(),
        initialized: false,
        records: None,
        quarantined: None,
    };

    if session.keys().load().await?.is_none() {
        return Ok(status);
    }

    let report = session.unlock().await?;
    status.initialized = true;
    status.records = Some(report.loaded);
    status.quarantined = Some(report.warnings.len());
    Ok(status)
}

/// Run the `strongbox status` command.
pub async fn run_status(config: &StrongboxConfig, json: bool, plain: bool) -> Result<(), StrongboxError> {
    let status = collect_status(config).await?;

    if json {
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|e| StrongboxError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    println!();
    println!("  strongbox status");
    println!("  {}", "-".repeat(35));
    println!("    Backend:     {}", status.backend);
    if let Some(path) = &status.path {
        println!("    Location:    {path}");
    }
    println!("    Cipher:      {}", status.algorithm);
    match (status.records, status.quarantined) {
        (Some(records), Some(quarantined)) => {
            println!("    Entries:     {records}");
            if quarantined == 0 {
                println!("    Quarantined: 0");
            } else if use_color {
                use colored::Colorize;
                println!("    Quarantined: {}", quarantined.to_string().yellow());
            } else {
                println!("    Quarantined: {quarantined} [WARN]");
            }
        }
        _ => println!("    State:       not initialized (no key yet)"),
    }
    println!();
    Ok(())
}

/// Run the `strongbox rotate-key` command.
pub async fn run_rotate_key(config: &StrongboxConfig) -> Result<(), StrongboxError> {
    let session = open_vault(config).await?;
    let count = session.records().await?.len();
    session.rotate_key().await?;
    info!(records = count, "rotation complete");
    println!("Vault key rotated; {count} entr{} re-encrypted.", if count == 1 { "y" } else { "ies" });
    Ok(())
}
