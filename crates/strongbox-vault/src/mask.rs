// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display masking for secret values.

/// Mask a secret value for display.
///
/// Values shorter than 10 characters show as `****`. Longer values show the
/// first 4 and last 4 characters. Counts characters, not bytes.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count < 10 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    let suffix: String = value.chars().skip(count - 4).collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("correct-horse-battery-staple"), "corr...aple");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn mask_secret_exact_boundary() {
        assert_eq!(mask_secret("123456789"), "****");
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }

    #[test]
    fn mask_secret_multibyte() {
        assert_eq!(mask_secret("пароль-длинный"), "паро...нный");
    }
}
