// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lossy-safe entry validation and sanitization.
//!
//! Always produces a usable record: missing or malformed fields degrade to
//! defaults and push a warning instead of failing. Callers decide whether
//! the warnings reach the user or only the log.

use chrono::{DateTime, Utc};
use fieldlog_core::{EntryType, ParsedEntry, ValidatedEntry};

/// Upper bound on plausible numeric values; anything beyond is treated as
/// a parsing artifact and reset.
const NUMERIC_CEILING: i64 = 1_000_000;

/// Maximum stored length for any text field.
const TEXT_FIELD_MAX: usize = 200;

/// Validate and sanitize a parse candidate into a persistable record.
///
/// Never fails. Numeric fields default to 0 with a warning when missing,
/// stay negative with a warning, and reset to 0 with a warning beyond the
/// plausibility ceiling. Text fields are scrubbed, trimmed, and capped;
/// an empty `client` or `location` is flagged but kept.
///
/// Idempotent: re-validating the output produces the same record.
pub fn validate_entry(
    candidate: &ParsedEntry,
    entry_type: EntryType,
    date: DateTime<Utc>,
) -> (ValidatedEntry, Vec<String>) {
    let mut warnings = Vec::new();

    let orders = numeric_field("orders", candidate.orders, &mut warnings);
    let amount = numeric_field("amount", candidate.amount, &mut warnings);

    let client = text_field("client", candidate.client.as_deref(), &mut warnings);
    let location = text_field("location", candidate.location.as_deref(), &mut warnings);
    let remarks = match candidate.remarks.as_deref() {
        None => {
            warnings.push("Missing remarks".to_string());
            String::new()
        }
        Some(value) => sanitize_text(value),
    };

    if client.is_empty() && candidate.client.is_some() {
        warnings.push("Empty client field".to_string());
    }
    if location.is_empty() && candidate.location.is_some() {
        warnings.push("Empty location field".to_string());
    }

    let entry = ValidatedEntry {
        entry_type,
        client,
        location,
        orders,
        amount,
        remarks,
        date,
    };
    (entry, warnings)
}

fn numeric_field(name: &str, value: Option<i64>, warnings: &mut Vec<String>) -> i64 {
    match value {
        None => {
            warnings.push(format!("Missing {name}, defaulting to 0"));
            0
        }
        Some(n) if n < 0 => {
            warnings.push(format!("Negative {name} value: {n}"));
            n
        }
        Some(n) if n > NUMERIC_CEILING => {
            warnings.push(format!("Suspicious {name} value: {n}, resetting to 0"));
            0
        }
        Some(n) => n,
    }
}

fn text_field(name: &str, value: Option<&str>, warnings: &mut Vec<String>) -> String {
    match value {
        None => {
            warnings.push(format!("Missing {name}"));
            String::new()
        }
        Some(value) => sanitize_text(value),
    }
}

/// Strip characters with quoting/markup significance, trim, and cap length.
fn sanitize_text(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | ';'))
        .collect();
    cleaned.trim().chars().take(TEXT_FIELD_MAX).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn full_candidate() -> ParsedEntry {
        ParsedEntry {
            client: Some("Apollo Pharmacy".into()),
            location: Some("Mumbai".into()),
            orders: Some(10),
            amount: Some(25000),
            remarks: Some("urgent".into()),
        }
    }

    #[test]
    fn complete_candidate_passes_without_warnings() {
        let (entry, warnings) = validate_entry(&full_candidate(), EntryType::Sales, now());
        assert!(warnings.is_empty());
        assert_eq!(entry.client, "Apollo Pharmacy");
        assert_eq!(entry.orders, 10);
        assert_eq!(entry.amount, 25000);
        assert_eq!(entry.entry_type, EntryType::Sales);
    }

    #[test]
    fn missing_numerics_default_to_zero_with_warning() {
        let mut candidate = full_candidate();
        candidate.orders = None;
        candidate.amount = None;
        let (entry, warnings) = validate_entry(&candidate, EntryType::Sales, now());
        assert_eq!(entry.orders, 0);
        assert_eq!(entry.amount, 0);
        assert!(warnings.contains(&"Missing orders, defaulting to 0".to_string()));
        assert!(warnings.contains(&"Missing amount, defaulting to 0".to_string()));
    }

    #[test]
    fn negative_numerics_are_kept_but_warned() {
        let mut candidate = full_candidate();
        candidate.amount = Some(-500);
        let (entry, warnings) = validate_entry(&candidate, EntryType::Purchase, now());
        assert_eq!(entry.amount, -500);
        assert!(warnings.iter().any(|w| w.contains("Negative amount")));
    }

    #[test]
    fn implausible_numerics_reset_to_zero() {
        let mut candidate = full_candidate();
        candidate.amount = Some(999_999_999);
        let (entry, warnings) = validate_entry(&candidate, EntryType::Sales, now());
        assert_eq!(entry.amount, 0);
        assert!(warnings.iter().any(|w| w.contains("Suspicious amount")));
    }

    #[test]
    fn missing_text_defaults_to_empty_with_warning() {
        let mut candidate = full_candidate();
        candidate.location = None;
        candidate.remarks = None;
        let (entry, warnings) = validate_entry(&candidate, EntryType::Sales, now());
        assert_eq!(entry.location, "");
        assert_eq!(entry.remarks, "");
        assert!(warnings.contains(&"Missing location".to_string()));
        assert!(warnings.contains(&"Missing remarks".to_string()));
    }

    #[test]
    fn blank_client_is_flagged() {
        let mut candidate = full_candidate();
        candidate.client = Some("   ".into());
        let (entry, warnings) = validate_entry(&candidate, EntryType::Sales, now());
        assert_eq!(entry.client, "");
        assert!(warnings.contains(&"Empty client field".to_string()));
    }

    #[test]
    fn markup_characters_are_scrubbed() {
        let mut candidate = full_candidate();
        candidate.client = Some("<b>Apollo</b>; 'Pharmacy'".into());
        let (entry, _) = validate_entry(&candidate, EntryType::Sales, now());
        assert_eq!(entry.client, "bApollo/b Pharmacy");
    }

    #[test]
    fn long_text_is_capped() {
        let mut candidate = full_candidate();
        candidate.remarks = Some("x".repeat(500));
        let (entry, _) = validate_entry(&candidate, EntryType::Sales, now());
        assert_eq!(entry.remarks.len(), 200);
    }

    #[test]
    fn validation_is_idempotent() {
        let mut candidate = full_candidate();
        candidate.orders = None;
        candidate.location = None;
        let date = now();

        let (first, first_warnings) = validate_entry(&candidate, EntryType::Sales, date);
        let (second, second_warnings) =
            validate_entry(&ParsedEntry::from(&first), EntryType::Sales, date);

        assert_eq!(first, second);
        // Pass one reports the missing fields; pass two must not invent
        // new defaults on top of the already-applied ones.
        assert!(first_warnings.contains(&"Missing orders, defaulting to 0".to_string()));
        assert!(!second_warnings.contains(&"Missing orders, defaulting to 0".to_string()));
    }
}
