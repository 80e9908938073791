// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox generate` command implementation.

use secrecy::ExposeSecret;
use strongbox_config::GeneratorConfig;
use strongbox_core::StrongboxError;
use strongbox_vault::{generate_password, GeneratorOptions};

/// Overrides applied on top of the `[generator]` config section.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenerateArgs {
    pub length: Option<usize>,
    pub no_uppercase: bool,
    pub no_lowercase: bool,
    pub no_numbers: bool,
    pub no_symbols: bool,
    pub exclude_similar: bool,
}

pub fn options_from(defaults: &GeneratorConfig, args: GenerateArgs) -> GeneratorOptions {
    let mut options = GeneratorOptions::from(defaults);
    if let Some(length) = args.length {
        options.length = length;
    }
    options.uppercase &= !args.no_uppercase;
    options.lowercase &= !args.no_lowercase;
    options.numbers &= !args.no_numbers;
    options.symbols &= !args.no_symbols;
    options.exclude_similar |= args.exclude_similar;
    options
}

/// Run `strongbox generate`. Prints one password to stdout and touches no
/// storage.
pub fn run_generate(defaults: &GeneratorConfig, args: GenerateArgs) -> Result<(), StrongboxError> {
    let password = generate_password(&options_from(defaults, args))?;
    println!("{}", password.expose_secret());
    Ok(())
}
