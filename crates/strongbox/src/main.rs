// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongbox - a personal credential vault encrypted at rest.
//!
//! This is the binary entry point.

mod entries;
mod generate;
mod prompt;
mod status;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strongbox_config::model::StrongboxConfig;
use strongbox_core::StrongboxError;

use crate::entries::{EntryArgs, PasswordSource};
use crate::generate::GenerateArgs;

/// Strongbox - a personal credential vault encrypted at rest.
#[derive(Parser, Debug)]
#[command(name = "strongbox", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List entries, optionally filtered by title, username or url.
    List {
        /// Case-insensitive search text.
        query: Option<String>,
        /// Show passwords in clear text.
        #[arg(long)]
        reveal: bool,
    },
    /// Show one entry.
    Show {
        /// Entry id or unique id prefix.
        id: String,
        /// Show password and notes in clear text.
        #[arg(long)]
        reveal: bool,
    },
    /// Add an entry. The password is read from the terminal or
    /// STRONGBOX_ENTRY_PASSWORD unless --generate is given.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Generate a random password using the [generator] settings.
        #[arg(long)]
        generate: bool,
    },
    /// Change fields of an entry.
    Edit {
        /// Entry id or unique id prefix.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Prompt for a new password.
        #[arg(long, conflicts_with = "generate")]
        password: bool,
        /// Replace the password with a generated one.
        #[arg(long)]
        generate: bool,
    },
    /// Remove an entry.
    Rm {
        /// Entry id or unique id prefix.
        id: String,
    },
    /// Print a random password.
    Generate {
        #[arg(long)]
        length: Option<usize>,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_lowercase: bool,
        #[arg(long)]
        no_numbers: bool,
        #[arg(long)]
        no_symbols: bool,
        /// Leave out look-alike characters (i l 1 L o 0 O).
        #[arg(long)]
        exclude_similar: bool,
    },
    /// Re-encrypt every entry under a freshly generated key.
    RotateKey,
    /// List entries that could not be decrypted.
    Quarantine {
        /// Drop them permanently.
        #[arg(long)]
        discard: bool,
    },
    /// Show vault location and health.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => strongbox_config::load_and_validate_path(path),
        None => strongbox_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            strongbox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let Some(command) = cli.command else {
        println!("strongbox: use --help for available commands");
        return;
    };

    if let Err(e) = run(&config, command).await {
        if std::io::stderr().is_terminal() {
            use colored::Colorize;
            eprintln!("{} {e}", "error:".red().bold());
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(config: &StrongboxConfig, command: Commands) -> Result<(), StrongboxError> {
    match command {
        Commands::List { query, reveal } => {
            entries::run_list(config, query.as_deref(), reveal).await
        }
        Commands::Show { id, reveal } => entries::run_show(config, &id, reveal).await,
        Commands::Add {
            title,
            username,
            url,
            notes,
            generate,
        } => {
            let args = EntryArgs {
                title: Some(title),
                username,
                url,
                notes,
            };
            entries::run_add(config, args, generate).await
        }
        Commands::Edit {
            id,
            title,
            username,
            url,
            notes,
            password,
            generate,
        } => {
            let source = if generate {
                PasswordSource::Generate
            } else if password {
                PasswordSource::Prompt
            } else {
                PasswordSource::Keep
            };
            let args = EntryArgs {
                title,
                username,
                url,
                notes,
            };
            entries::run_edit(config, &id, args, source).await
        }
        Commands::Rm { id } => entries::run_rm(config, &id).await,
        Commands::Generate {
            length,
            no_uppercase,
            no_lowercase,
            no_numbers,
            no_symbols,
            exclude_similar,
        } => generate::run_generate(
            &config.generator,
            GenerateArgs {
                length,
                no_uppercase,
                no_lowercase,
                no_numbers,
                no_symbols,
                exclude_similar,
            },
        ),
        Commands::RotateKey => status::run_rotate_key(config).await,
        Commands::Quarantine { discard } => entries::run_quarantine(config, discard).await,
        Commands::Status { json, plain } => status::run_status(config, json, plain).await,
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strongbox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
