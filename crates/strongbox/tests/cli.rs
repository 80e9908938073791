// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the `strongbox` binary.
//!
//! Each test points the binary at its own temp directory through environment
//! variables, so tests are independent and order-insensitive.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn vault_path(&self) -> PathBuf {
        self.dir.path().join("data").join("vault.json")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_strongbox"));
        cmd.args(args)
            .current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("share"))
            .env("STRONGBOX_STORAGE_BACKEND", "file")
            .env("STRONGBOX_STORAGE_PATH", self.vault_path())
            .env_remove("STRONGBOX_ENTRY_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().unwrap()
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "strongbox {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn add(&self, title: &str, password: &str, extra: &[&str]) -> String {
        let mut args = vec!["add", "--title", title];
        args.extend_from_slice(extra);
        let output = self
            .command(&args)
            .env("STRONGBOX_ENTRY_PASSWORD", password)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "add failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8(output.stdout).unwrap();
        parse_added_id(&stdout)
    }
}

fn parse_added_id(stdout: &str) -> String {
    let start = stdout.find('(').unwrap() + 1;
    let end = stdout[start..].find(')').unwrap() + start;
    stdout[start..end].to_string()
}

fn status_json(sandbox: &Sandbox) -> serde_json::Value {
    serde_json::from_str(&sandbox.run_ok(&["status", "--json"])).unwrap()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn status_of_fresh_vault_creates_nothing() {
    let sandbox = Sandbox::new();
    let status = status_json(&sandbox);
    assert_eq!(status["initialized"], false);
    assert_eq!(status["backend"], "file");
    assert!(!sandbox.vault_path().exists());
}

#[test]
fn add_list_show_rm_cycle() {
    let sandbox = Sandbox::new();
    let id = sandbox.add(
        "Example",
        "p1",
        &["--username", "a@b.com", "--url", "https://e.com"],
    );

    let on_disk = read(&sandbox.vault_path());
    assert!(!on_disk.contains("a@b.com"));

    let listed = sandbox.run_ok(&["list"]);
    assert!(listed.contains("Example"));
    assert!(listed.contains(&id));
    assert!(listed.contains("password: ****"));

    let revealed = sandbox.run_ok(&["list", "--reveal"]);
    assert!(revealed.contains("password: p1"));

    let shown = sandbox.run_ok(&["show", &id[..8], "--reveal"]);
    assert!(shown.contains("username:      a@b.com"));
    assert!(shown.contains("url:           https://e.com"));

    let status = status_json(&sandbox);
    assert_eq!(status["initialized"], true);
    assert_eq!(status["records"], 1);
    assert_eq!(status["quarantined"], 0);

    sandbox.run_ok(&["rm", &id]);
    assert!(sandbox.run_ok(&["list"]).contains("No entries."));

    // Removing again is not an error.
    sandbox.run_ok(&["rm", &id]);
}

#[test]
fn search_filters_entries() {
    let sandbox = Sandbox::new();
    sandbox.add("GitHub", "pw-one", &["--url", "https://github.com"]);
    sandbox.add("Bank", "pw-two", &["--username", "alice"]);

    let found = sandbox.run_ok(&["list", "ALICE"]);
    assert!(found.contains("Bank"));
    assert!(!found.contains("GitHub"));
    assert!(found.contains("1 entry"));
}

#[test]
fn edit_changes_only_given_fields() {
    let sandbox = Sandbox::new();
    let id = sandbox.add("Mail", "old-password", &["--username", "bob"]);

    let output = sandbox
        .command(&["edit", &id, "--password"])
        .env("STRONGBOX_ENTRY_PASSWORD", "new-password")
        .output()
        .unwrap();
    assert!(output.status.success());

    let shown = sandbox.run_ok(&["show", &id, "--reveal"]);
    assert!(shown.contains("password:      new-password"));
    assert!(shown.contains("username:      bob"));
    assert!(shown.contains("title:         Mail"));
}

#[test]
fn edit_of_unknown_id_fails() {
    let sandbox = Sandbox::new();
    sandbox.add("Only", "pw", &[]);
    let output = sandbox.run(&["edit", "does-not-exist", "--title", "x"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("record not found"));
}

#[test]
fn add_with_generated_password() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_ok(&["add", "--title", "Gen", "--generate"]);
    assert!(output.contains("Generated password:"));
}

#[test]
fn add_without_password_source_fails_cleanly() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["add", "--title", "NoPw"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("STRONGBOX_ENTRY_PASSWORD"));
}

#[test]
fn generate_respects_length_and_classes() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_ok(&["generate", "--length", "24", "--no-symbols"]);
    let password = out.trim_end();
    assert_eq!(password.chars().count(), 24);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));

    let bad = sandbox.run(&["generate", "--length", "4"]);
    assert!(!bad.status.success());
}

#[test]
fn rotate_key_keeps_entries_readable() {
    let sandbox = Sandbox::new();
    let id = sandbox.add("Keep", "still-here", &[]);
    let before = read(&sandbox.vault_path());

    let out = sandbox.run_ok(&["rotate-key"]);
    assert!(out.contains("1 entry re-encrypted"));
    assert_ne!(read(&sandbox.vault_path()), before);

    let shown = sandbox.run_ok(&["show", &id, "--reveal"]);
    assert!(shown.contains("password:      still-here"));
}

#[test]
fn corrupt_key_is_reported_not_replaced() {
    let sandbox = Sandbox::new();
    sandbox.add("Entry", "pw", &[]);
    let path = sandbox.vault_path();

    let mut document: serde_json::Value = serde_json::from_str(&read(&path)).unwrap();
    document["slots"]["vault-key"] = serde_json::Value::String("AAAA".to_string());
    std::fs::write(&path, serde_json::to_vec(&document).unwrap()).unwrap();
    let damaged = read(&path);

    let output = sandbox.run(&["list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("vault key is corrupt"));
    assert_eq!(read(&path), damaged);
}

#[test]
fn invalid_config_file_is_rejected() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.dir.path().join("strongbox.toml"),
        "[generator]\nlenght = 20\n",
    )
    .unwrap();
    let output = sandbox.run(&["status"]);
    assert!(!output.status.success());
}
