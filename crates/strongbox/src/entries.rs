// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox list|show|add|edit|rm|quarantine` command implementations.

use std::io::IsTerminal;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use strongbox_config::model::StrongboxConfig;
use strongbox_core::{NewRecord, RecordId, RecordPatch, SecretRecord, StrongboxError};
use strongbox_vault::{
    generate_password, mask_secret, GeneratorOptions, HydrationReport, RingAead, SlotNames,
    VaultSession,
};

use crate::prompt::read_entry_password;

/// Fields accepted by `add` and `edit`.
#[derive(Debug, Default)]
pub struct EntryArgs {
    pub title: Option<String>,
    pub username: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

/// How the password of an added or edited entry is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    Keep,
    Prompt,
    Generate,
}

/// Open the configured store and unlock the vault, reporting load warnings.
pub async fn open_vault(config: &StrongboxConfig) -> Result<VaultSession, StrongboxError> {
    let store = strongbox_storage::open_store(&config.storage).await?;
    let session = VaultSession::new(
        store,
        Arc::new(RingAead::new()),
        SlotNames::from(&config.storage),
    );
    let report = session.unlock().await?;
    print_warnings(&report);
    Ok(session)
}

fn print_warnings(report: &HydrationReport) {
    if report.is_clean() {
        return;
    }
    let use_color = std::io::stderr().is_terminal();
    for warning in &report.warnings {
        if use_color {
            use colored::Colorize;
            eprintln!("{} {warning}", "warning:".yellow().bold());
        } else {
            eprintln!("warning: {warning}");
        }
    }
    eprintln!(
        "{} record(s) could not be decrypted and were set aside; see `strongbox quarantine`.",
        report.warnings.len()
    );
}

/// Find a record by full id or unique id prefix.
fn resolve_id(records: &[SecretRecord], input: &str) -> Result<RecordId, StrongboxError> {
    if input.is_empty() {
        return Err(StrongboxError::NotFound { id: String::new() });
    }
    if let Some(record) = records.iter().find(|r| r.id.as_str() == input) {
        return Ok(record.id.clone());
    }
    let mut matches = records.iter().filter(|r| r.id.as_str().starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(record), None) => Ok(record.id.clone()),
        (Some(_), Some(_)) => Err(StrongboxError::Config(format!(
            "id prefix `{input}` matches more than one record"
        ))),
        _ => Err(StrongboxError::NotFound {
            id: input.to_string(),
        }),
    }
}

/// Like [`resolve_id`], but an unknown id falls through unchanged so removal
/// stays idempotent. Ambiguous prefixes are still an error.
fn resolve_for_removal(records: &[SecretRecord], input: &str) -> Result<RecordId, StrongboxError> {
    match resolve_id(records, input) {
        Ok(id) => Ok(id),
        Err(StrongboxError::NotFound { .. }) => Ok(RecordId::from(input)),
        Err(e) => Err(e),
    }
}

fn display_secret(value: &str, reveal: bool) -> String {
    if reveal {
        value.to_string()
    } else {
        mask_secret(value)
    }
}

/// Run `strongbox list [QUERY]`.
pub async fn run_list(
    config: &StrongboxConfig,
    query: Option<&str>,
    reveal: bool,
) -> Result<(), StrongboxError> {
    let session = open_vault(config).await?;
    let records = session.search(query.unwrap_or_default()).await?;

    if records.is_empty() {
        println!("No entries.");
        return Ok(());
    }

    let use_color = std::io::stdout().is_terminal();
    for record in &records {
        let title = if use_color {
            use colored::Colorize;
            record.title.bold().to_string()
        } else {
            record.title.clone()
        };
        println!("{title}");
        println!("    id:       {}", record.id);
        println!("    username: {}", record.username);
        println!("    password: {}", display_secret(&record.password, reveal));
        if !record.url.is_empty() {
            println!("    url:      {}", record.url);
        }
    }
    println!();
    println!("{} entr{}", records.len(), if records.len() == 1 { "y" } else { "ies" });
    Ok(())
}

/// Run `strongbox show <ID>`.
pub async fn run_show(config: &StrongboxConfig, id: &str, reveal: bool) -> Result<(), StrongboxError> {
    let session = open_vault(config).await?;
    let records = session.records().await?;
    let id = resolve_id(&records, id)?;
    let record = session
        .get(&id)
        .await?
        .ok_or_else(|| StrongboxError::NotFound { id: id.to_string() })?;

    println!("title:         {}", record.title);
    println!("id:            {}", record.id);
    println!("username:      {}", record.username);
    println!("password:      {}", display_secret(&record.password, reveal));
    println!("url:           {}", record.url);
    println!("notes:         {}", display_secret(&record.notes, reveal));
    println!("last modified: {}", record.last_modified.to_rfc3339());
    Ok(())
}

fn choose_password(
    config: &StrongboxConfig,
    source: PasswordSource,
) -> Result<Option<SecretString>, StrongboxError> {
    match source {
        PasswordSource::Keep => Ok(None),
        PasswordSource::Prompt => read_entry_password().map(Some),
        PasswordSource::Generate => {
            generate_password(&GeneratorOptions::from(&config.generator)).map(Some)
        }
    }
}

/// Run `strongbox add`.
pub async fn run_add(
    config: &StrongboxConfig,
    args: EntryArgs,
    generate: bool,
) -> Result<(), StrongboxError> {
    let title = args
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| StrongboxError::Config("an entry needs a title".to_string()))?;
    let source = if generate {
        PasswordSource::Generate
    } else {
        PasswordSource::Prompt
    };
    let password = choose_password(config, source)?;

    let session = open_vault(config).await?;
    let fields = NewRecord {
        title,
        username: args.username.unwrap_or_default(),
        password: password
            .as_ref()
            .map(|p| p.expose_secret().to_string())
            .unwrap_or_default(),
        url: args.url.unwrap_or_default(),
        notes: args.notes.unwrap_or_default(),
    };
    let record = session.create(&fields).await?;

    println!("Added {} ({})", record.title, record.id);
    if generate {
        println!("Generated password: {}", mask_secret(&record.password));
    }
    Ok(())
}

/// Run `strongbox edit <ID>`.
pub async fn run_edit(
    config: &StrongboxConfig,
    id: &str,
    args: EntryArgs,
    source: PasswordSource,
) -> Result<(), StrongboxError> {
    let password = choose_password(config, source)?;
    let patch = RecordPatch {
        title: args.title,
        username: args.username,
        password: password.as_ref().map(|p| p.expose_secret().to_string()),
        url: args.url,
        notes: args.notes,
    };
    if patch.is_empty() {
        return Err(StrongboxError::Config("nothing to change".to_string()));
    }

    let session = open_vault(config).await?;
    let records = session.records().await?;
    let id = resolve_id(&records, id)?;
    let record = session.update(&id, &patch).await?;
    println!("Updated {} ({})", record.title, record.id);
    Ok(())
}

/// Run `strongbox rm <ID>`. Removing an unknown id is not an error.
pub async fn run_rm(config: &StrongboxConfig, id: &str) -> Result<(), StrongboxError> {
    let session = open_vault(config).await?;
    let records = session.records().await?;
    let id = resolve_for_removal(&records, id)?;
    session.delete(&id).await?;
    println!("Removed {id}");
    Ok(())
}

/// Run `strongbox quarantine [--discard]`.
pub async fn run_quarantine(config: &StrongboxConfig, discard: bool) -> Result<(), StrongboxError> {
    let session = open_vault(config).await?;
    if discard {
        let count = session.discard_quarantined().await?;
        println!("Discarded {count} quarantined record(s).");
        return Ok(());
    }

    let quarantined = session.quarantined().await?;
    if quarantined.is_empty() {
        println!("No quarantined records.");
        return Ok(());
    }
    for entry in &quarantined {
        let id = entry.id.as_ref().map(RecordId::as_str).unwrap_or("<no id>");
        let title = entry.title.as_deref().unwrap_or("<untitled>");
        println!("{id}  {title}");
        println!("    {}", entry.reason);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str) -> SecretRecord {
        SecretRecord::new(RecordId::from(id), &NewRecord::default(), Utc::now())
    }

    #[test]
    fn resolve_prefers_exact_match() {
        let records = vec![record("abc"), record("abcdef")];
        assert_eq!(resolve_id(&records, "abc").unwrap(), RecordId::from("abc"));
    }

    #[test]
    fn resolve_accepts_unique_prefix() {
        let records = vec![record("abc123"), record("def456")];
        assert_eq!(resolve_id(&records, "de").unwrap(), RecordId::from("def456"));
    }

    #[test]
    fn resolve_rejects_ambiguous_and_unknown() {
        let records = vec![record("abc123"), record("abc456")];
        assert!(matches!(
            resolve_id(&records, "abc"),
            Err(StrongboxError::Config(_))
        ));
        assert!(matches!(
            resolve_id(&records, "zzz"),
            Err(StrongboxError::NotFound { .. })
        ));
        assert!(matches!(
            resolve_id(&records, ""),
            Err(StrongboxError::NotFound { .. })
        ));
    }

    #[test]
    fn removal_keeps_unknown_ids_but_rejects_ambiguous_prefixes() {
        let records = vec![record("abc123"), record("abc456")];
        assert_eq!(
            resolve_for_removal(&records, "abc4").unwrap(),
            RecordId::from("abc456")
        );
        assert_eq!(
            resolve_for_removal(&records, "gone").unwrap(),
            RecordId::from("gone")
        );
        assert!(matches!(
            resolve_for_removal(&records, "abc"),
            Err(StrongboxError::Config(_))
        ));
    }

    #[test]
    fn secrets_are_masked_unless_revealed() {
        assert_eq!(display_secret("correct-horse-battery", false), "corr...tery");
        assert_eq!(display_secret("p1", false), "****");
        assert_eq!(display_secret("p1", true), "p1");
    }
}
