// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Strongbox configuration system.

use serial_test::serial;
use strongbox_config::diagnostic::ConfigError;
use strongbox_config::model::{StorageBackend, StrongboxConfig};
use strongbox_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_strongbox_config() {
    let toml = r#"
[storage]
backend = "sqlite"
path = "/tmp/strongbox-test.db"
key_slot = "k"
vault_slot = "v"
wal_mode = false

[generator]
length = 32
uppercase = true
lowercase = true
numbers = false
symbols = false
exclude_similar = true

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.path.as_deref(), Some("/tmp/strongbox-test.db"));
    assert_eq!(config.storage.key_slot, "k");
    assert_eq!(config.storage.vault_slot, "v");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.generator.length, 32);
    assert!(!config.generator.numbers);
    assert!(config.generator.exclude_similar);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn unknown_field_in_storage_produces_suggestion() {
    let toml = r#"
[storage]
key_solt = "k"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "key_solt" && suggestion.as_deref() == Some("key_slot")
        )
    });
    assert!(found, "expected key_slot suggestion, got: {errors:?}");
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[sync]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn unknown_backend_is_rejected() {
    let toml = r#"
[storage]
backend = "s3"
"#;
    let errors = load_and_validate_str(toml).expect_err("s3 is not a backend");
    assert!(!errors.is_empty());
}

#[test]
fn wrong_type_is_rejected() {
    let toml = r#"
[generator]
length = "long"
"#;
    assert!(load_and_validate_str(toml).is_err());
}

#[test]
fn validation_runs_after_deserialization() {
    let toml = r#"
[storage]
key_slot = "same"
vault_slot = "same"
"#;
    let errors = load_and_validate_str(toml).expect_err("slots must differ");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("must differ"))));
}

#[test]
fn toml_crate_round_trips_defaults() {
    let rendered = toml::to_string(&StrongboxConfig::default()).unwrap();
    let parsed: StrongboxConfig = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed.storage.vault_slot, "vault-items");
    assert_eq!(parsed.generator.length, 16);
}

#[test]
fn default_path_depends_on_backend() {
    let mut config = StrongboxConfig::default();
    assert!(config.storage.resolved_path().ends_with("vault.json"));
    config.storage.backend = StorageBackend::Sqlite;
    assert!(config.storage.resolved_path().ends_with("vault.db"));
    config.storage.path = Some("/srv/vault.db".to_string());
    assert_eq!(config.storage.resolved_path(), std::path::PathBuf::from("/srv/vault.db"));
}

#[test]
#[serial]
fn env_var_overrides_explicit_file() {
    let dir = std::env::temp_dir().join(format!("strongbox-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("strongbox.toml");
    std::fs::write(&path, "[logging]\nlevel = \"info\"\n").unwrap();

    // SAFETY: test-only env mutation, serialized with #[serial].
    unsafe { std::env::set_var("STRONGBOX_LOGGING_LEVEL", "error") };
    let result = load_and_validate_path(&path);
    unsafe { std::env::remove_var("STRONGBOX_LOGGING_LEVEL") };
    let _ = std::fs::remove_dir_all(&dir);

    let config = result.expect("config should load");
    assert_eq!(config.logging.level, "error");
}
