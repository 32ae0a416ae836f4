// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing message rendering.
//!
//! Pure functions from pipeline outcomes to Telegram Markdown. Nothing in
//! here touches the network, so every message shape is unit-testable.

use fieldlog_core::ValidatedEntry;
use fieldlog_pipeline::{BatchResult, MessageOutcome};

/// How many saved entries a batch report lists before truncating.
const REPORT_SAVED_LIMIT: usize = 5;

/// How many warnings / failures a batch report lists before truncating.
const REPORT_ISSUE_LIMIT: usize = 3;

/// Greeting and mode menu for casual openers.
pub fn greeting_menu() -> String {
    "Hello! Please select what you'd like to log:\n\n/sales\n/purchase".to_string()
}

/// Nudge when a message arrives before /sales or /purchase was chosen.
pub fn choose_type_prompt() -> String {
    "Please start by choosing /sales or /purchase.".to_string()
}

/// Reply for users with no registered company.
pub fn not_registered() -> String {
    "Your account is not registered with any company yet. Ask your admin to add you."
        .to_string()
}

/// Confirmation after an entry lands in the sheet.
pub fn entry_confirmation(user_name: &str, entry: &ValidatedEntry, warnings: &[String]) -> String {
    let mut text = format!(
        "*{} Logged!*\n\nName: {}\nClient: {}\nOrders: {}\nAmount: ₹{}\nRemarks: {}\nTime: {}",
        entry.entry_type,
        user_name,
        entry.client,
        entry.orders,
        entry.amount,
        entry.remarks,
        entry.date.format("%H:%M"),
    );
    if !warnings.is_empty() {
        text.push_str("\n\nHeads up:\n");
        for warning in warnings {
            text.push_str(&format!("- {warning}\n"));
        }
    }
    text
}

/// Help text when neither parser could read the message.
pub fn structured_format_help() -> String {
    "*Unable to parse your message automatically.*\n\n\
     Please use this format:\n\
     ```\n\
     Client: [Customer Name]\n\
     Location: [Area/City]\n\
     Orders: [Number of items]\n\
     Amount: [Amount]\n\
     Remarks: [Any additional notes]\n\
     ```\n\n\
     Example:\n\
     `Client: Apollo Pharmacy\n\
     Location: Mumbai\n\
     Orders: 5\n\
     Amount: ₹5000\n\
     Remarks: Regular order`"
        .to_string()
}

/// Reply when every API key sat in a quota window.
pub fn all_keys_busy() -> String {
    "The parsing service is busy right now. Please try again in a minute.".to_string()
}

/// Reply when the sheet rejected the row.
pub fn save_failed() -> String {
    "Your entry was understood but could not be saved. Please try again.".to_string()
}

/// Acknowledgement after a location share.
pub fn location_saved(address: &str) -> String {
    format!("Location saved: {address}\nNew entries will carry it automatically.")
}

/// Render the outcome of a single-entry message.
pub fn render_outcome(user_name: &str, outcome: &MessageOutcome) -> String {
    match outcome {
        MessageOutcome::Rejected { classification } => classification
            .fallback_response
            .clone()
            .unwrap_or_else(structured_format_help),
        MessageOutcome::ParseFailed => structured_format_help(),
        MessageOutcome::AllKeysRateLimited => all_keys_busy(),
        MessageOutcome::SaveFailed => save_failed(),
        MessageOutcome::Logged {
            entry, warnings, ..
        } => entry_confirmation(user_name, entry, warnings),
    }
}

/// Render the summary of a batch run: counts first, then the first few
/// saved entries, warnings, and failures.
pub fn batch_report(result: &BatchResult) -> String {
    let mut text = format!(
        "*Batch processing complete*\n\nProcessed: {}/{} entries\n",
        result.processed, result.total
    );
    if result.failed > 0 {
        text.push_str(&format!("Failed: {} entries\n", result.failed));
    }

    if !result.saved_entries.is_empty() {
        text.push_str("\n*Saved:*\n");
        for saved in result.saved_entries.iter().take(REPORT_SAVED_LIMIT) {
            text.push_str(&format!(
                "- {} - ₹{} ({} units)\n",
                saved.entry.client, saved.entry.amount, saved.entry.orders
            ));
        }
        let rest = result.saved_entries.len().saturating_sub(REPORT_SAVED_LIMIT);
        if rest > 0 {
            text.push_str(&format!("... and {rest} more entries\n"));
        }
    }

    if !result.warnings.is_empty() {
        text.push_str("\n*Warnings:*\n");
        for warning in result.warnings.iter().take(REPORT_ISSUE_LIMIT) {
            text.push_str(&format!("- {warning}\n"));
        }
        let rest = result.warnings.len().saturating_sub(REPORT_ISSUE_LIMIT);
        if rest > 0 {
            text.push_str(&format!("... and {rest} more warnings\n"));
        }
    }

    if !result.failed_entries.is_empty() {
        text.push_str("\n*Failed:*\n");
        for failed in result.failed_entries.iter().take(REPORT_ISSUE_LIMIT) {
            text.push_str(&format!("- Entry {}: {}\n", failed.index, failed.reason));
        }
        let rest = result
            .failed_entries
            .len()
            .saturating_sub(REPORT_ISSUE_LIMIT);
        if rest > 0 {
            text.push_str(&format!("... and {rest} more failed entries\n"));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fieldlog_core::EntryType;
    use fieldlog_pipeline::{FailedEntry, SavedEntry};
    use std::time::Duration;

    fn entry(client: &str, orders: i64, amount: i64) -> ValidatedEntry {
        ValidatedEntry {
            entry_type: EntryType::Sales,
            client: client.into(),
            location: "Mumbai".into(),
            orders,
            amount,
            remarks: "ok".into(),
            date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
        }
    }

    fn saved(index: usize, client: &str) -> SavedEntry {
        SavedEntry {
            entry_id: format!("batch_x_{index}"),
            entry: entry(client, 5, 25000),
            warnings: Vec::new(),
            original_text: String::new(),
            index,
        }
    }

    #[test]
    fn confirmation_lists_all_fields() {
        let text = entry_confirmation("Asha Patel", &entry("Apollo", 5, 25000), &[]);
        assert!(text.contains("*Sales Logged!*"));
        assert!(text.contains("Client: Apollo"));
        assert!(text.contains("Orders: 5"));
        assert!(text.contains("Amount: ₹25000"));
        assert!(text.contains("Time: 09:30"));
        assert!(!text.contains("Heads up"));
    }

    #[test]
    fn confirmation_appends_warnings() {
        let warnings = vec!["Missing location".to_string()];
        let text = entry_confirmation("Asha", &entry("Apollo", 5, 25000), &warnings);
        assert!(text.contains("Heads up:"));
        assert!(text.contains("- Missing location"));
    }

    #[test]
    fn batch_report_shows_counts_and_entries() {
        let result = BatchResult {
            processed: 2,
            failed: 1,
            total: 3,
            saved_entries: vec![saved(1, "Apollo"), saved(2, "Cipla")],
            failed_entries: vec![FailedEntry {
                text: "junk".into(),
                reason: "gibberish_detected".into(),
                index: 3,
            }],
            warnings: vec!["Entry 1: Missing location".into()],
            processing_time: Duration::from_secs(2),
            used_parallel_processing: true,
        };
        let text = batch_report(&result);
        assert!(text.contains("Processed: 2/3 entries"));
        assert!(text.contains("Failed: 1 entries"));
        assert!(text.contains("- Apollo - ₹25000 (5 units)"));
        assert!(text.contains("- Entry 3: gibberish_detected"));
        assert!(text.contains("- Entry 1: Missing location"));
    }

    #[test]
    fn batch_report_truncates_long_lists() {
        let result = BatchResult {
            processed: 7,
            failed: 0,
            total: 7,
            saved_entries: (1..=7).map(|i| saved(i, "Apollo")).collect(),
            failed_entries: Vec::new(),
            warnings: Vec::new(),
            processing_time: Duration::from_secs(2),
            used_parallel_processing: true,
        };
        let text = batch_report(&result);
        assert!(text.contains("... and 2 more entries"));
    }

    #[test]
    fn rejected_outcome_uses_classifier_guidance() {
        let classifier = fieldlog_intake::InputClassifier::default();
        let classification = classifier.classify("asdfghjkl");
        let expected = classification.fallback_response.clone().unwrap();
        let outcome = MessageOutcome::Rejected { classification };
        assert_eq!(render_outcome("Asha", &outcome), expected);
    }

    #[test]
    fn parse_failure_renders_template_help() {
        let text = render_outcome("Asha", &MessageOutcome::ParseFailed);
        assert!(text.contains("Client: [Customer Name]"));
        assert!(text.contains("Unable to parse"));
    }
}
