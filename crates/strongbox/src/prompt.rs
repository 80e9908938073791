// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry password acquisition via TTY prompt or STRONGBOX_ENTRY_PASSWORD.

use secrecy::{ExposeSecret, SecretString};
use strongbox_core::StrongboxError;

/// The environment variable name for providing an entry password.
pub const ENTRY_PASSWORD_ENV_VAR: &str = "STRONGBOX_ENTRY_PASSWORD";

/// Get the password for a new or edited entry.
///
/// Priority:
/// 1. `STRONGBOX_ENTRY_PASSWORD` environment variable (for scripts)
/// 2. Interactive TTY prompt via `rpassword`, entered twice
pub fn read_entry_password() -> Result<SecretString, StrongboxError> {
    if let Ok(password) = std::env::var(ENTRY_PASSWORD_ENV_VAR) {
        return Ok(SecretString::from(password));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Entry password: ");
        let first = SecretString::from(read_line()?);
        eprint!("Confirm entry password: ");
        let second = SecretString::from(read_line()?);
        if first.expose_secret() != second.expose_secret() {
            return Err(StrongboxError::Config("passwords do not match".to_string()));
        }
        return Ok(first);
    }

    Err(StrongboxError::Config(format!(
        "No entry password provided. Set {ENTRY_PASSWORD_ENV_VAR}, pass --generate, or run interactively."
    )))
}

fn read_line() -> Result<String, StrongboxError> {
    rpassword::read_password()
        .map_err(|e| StrongboxError::Internal(format!("failed to read password: {e}")))
}
