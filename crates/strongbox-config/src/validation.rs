// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as distinct slot names and generator bounds.

use crate::diagnostic::ConfigError;
use crate::model::StrongboxConfig;

/// Shortest password the generator will produce.
pub const MIN_GENERATED_LENGTH: usize = 8;

/// Longest password the generator will produce.
pub const MAX_GENERATED_LENGTH: usize = 64;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &StrongboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let storage = &config.storage;

    if storage.key_slot.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.key_slot must not be empty".to_string(),
        });
    }

    if storage.vault_slot.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.vault_slot must not be empty".to_string(),
        });
    }

    // Sharing a slot would overwrite the key with ciphertext.
    if !storage.key_slot.trim().is_empty() && storage.key_slot == storage.vault_slot {
        errors.push(ConfigError::Validation {
            message: format!(
                "storage.key_slot and storage.vault_slot must differ, both are `{}`",
                storage.key_slot
            ),
        });
    }

    if let Some(path) = &storage.path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.path must not be empty when set".to_string(),
        });
    }

    let generator = &config.generator;
    if !(MIN_GENERATED_LENGTH..=MAX_GENERATED_LENGTH).contains(&generator.length) {
        errors.push(ConfigError::Validation {
            message: format!(
                "generator.length must be between {MIN_GENERATED_LENGTH} and {MAX_GENERATED_LENGTH}, got {}",
                generator.length
            ),
        });
    }

    if !(generator.uppercase || generator.lowercase || generator.numbers || generator.symbols) {
        errors.push(ConfigError::Validation {
            message: "generator must enable at least one of uppercase, lowercase, numbers, symbols"
                .to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = StrongboxConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_key_slot_fails_validation() {
        let mut config = StrongboxConfig::default();
        config.storage.key_slot = " ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "key_slot must not be empty"));
    }

    #[test]
    fn shared_slot_fails_validation() {
        let mut config = StrongboxConfig::default();
        config.storage.vault_slot = config.storage.key_slot.clone();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "must differ"));
    }

    #[test]
    fn generator_length_out_of_range_fails() {
        let mut config = StrongboxConfig::default();
        config.generator.length = 4;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "generator.length"));

        config.generator.length = 65;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "generator.length"));
    }

    #[test]
    fn generator_without_charsets_fails() {
        let mut config = StrongboxConfig::default();
        config.generator.uppercase = false;
        config.generator.lowercase = false;
        config.generator.numbers = false;
        config.generator.symbols = false;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "at least one"));
    }

    #[test]
    fn unknown_log_level_fails() {
        let mut config = StrongboxConfig::default();
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "logging.level"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = StrongboxConfig::default();
        config.storage.vault_slot = String::new();
        config.generator.length = 100;
        config.logging.level = "nope".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
