// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search over decrypted records.

use strongbox_core::SecretRecord;

/// Records whose title, username or url contain `query`, ignoring case.
/// A blank query matches everything. Order is preserved.
pub fn filter_records<'a>(records: &'a [SecretRecord], query: &str) -> Vec<&'a SecretRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            [&record.title, &record.username, &record.url]
                .iter()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
        })
        .collect()
}
