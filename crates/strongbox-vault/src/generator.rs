// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation from the OS CSPRNG.

use rand::rngs::OsRng;
use rand::Rng;
use secrecy::SecretString;
use strongbox_config::validation::{MAX_GENERATED_LENGTH, MIN_GENERATED_LENGTH};
use strongbox_config::GeneratorConfig;
use strongbox_core::StrongboxError;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
const SIMILAR: &str = "il1Lo0O";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    pub exclude_similar: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

impl From<&GeneratorConfig> for GeneratorOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            length: config.length,
            uppercase: config.uppercase,
            lowercase: config.lowercase,
            numbers: config.numbers,
            symbols: config.symbols,
            exclude_similar: config.exclude_similar,
        }
    }
}

impl GeneratorOptions {
    /// Characters a generated password may contain.
    pub fn alphabet(&self) -> Vec<char> {
        let classes = [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.numbers, NUMBERS),
            (self.symbols, SYMBOLS),
        ];
        classes
            .iter()
            .filter(|(enabled, _)| *enabled)
            .flat_map(|(_, chars)| chars.chars())
            .filter(|c| !(self.exclude_similar && SIMILAR.contains(*c)))
            .collect()
    }

    pub fn validate(&self) -> Result<(), StrongboxError> {
        if !(MIN_GENERATED_LENGTH..=MAX_GENERATED_LENGTH).contains(&self.length) {
            return Err(StrongboxError::Config(format!(
                "password length must be between {MIN_GENERATED_LENGTH} and {MAX_GENERATED_LENGTH}, got {}",
                self.length
            )));
        }
        if self.alphabet().is_empty() {
            return Err(StrongboxError::Config(
                "at least one character class must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Draw `options.length` characters uniformly from the enabled classes.
pub fn generate_password(options: &GeneratorOptions) -> Result<SecretString, StrongboxError> {
    options.validate()?;
    let alphabet = options.alphabet();
    let mut rng = OsRng;
    let password: String = (0..options.length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();
    Ok(SecretString::from(password))
}
