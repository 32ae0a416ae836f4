// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch detection and splitting of multi-entry messages.
//!
//! Splitting runs in two passes: explicit separators first, then (when
//! that finds nothing) line regrouping anchored at entry-opening keywords.

/// Explicit entry separators, tried in order.
const SEPARATORS: &[&str] = &["\n\n", "\n---", "\n***", "\n==="];

/// Lowercase keywords that open a new entry during line regrouping.
const ENTRY_TRIGGERS: &[&str] = &["client:", "sold", "bought", "purchase"];

/// Entries shorter than this after trimming are separator debris, not
/// transactions.
const MIN_ENTRY_CHARS: usize = 10;

/// Split a message into candidate entries.
///
/// Blank lines and `---`/`***`/`===` rules split first. If that leaves a
/// single block and the text spans multiple lines, lines are regrouped
/// into entries anchored at keyword triggers; the regrouping only wins
/// when it actually finds more than one entry.
pub fn split_entries(text: &str) -> Vec<String> {
    let mut entries = vec![text.to_string()];
    for separator in SEPARATORS {
        entries = entries
            .iter()
            .flat_map(|entry| entry.split(separator))
            .map(str::to_string)
            .collect();
    }

    let mut cleaned: Vec<String> = entries
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| e.chars().count() > MIN_ENTRY_CHARS)
        .collect();

    if cleaned.len() <= 1 && text.contains('\n') {
        let regrouped = regroup_by_triggers(text);
        if regrouped.len() > 1 {
            cleaned = regrouped;
        }
    }

    tracing::debug!(entries = cleaned.len(), "split message into entries");
    cleaned
}

/// Group lines into entries, starting a new one at each trigger keyword.
fn regroup_by_triggers(text: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                entries.push(current.join("\n"));
                current.clear();
            }
        } else if is_trigger_line(line) {
            if !current.is_empty() {
                entries.push(current.join("\n"));
                current.clear();
            }
            current.push(line);
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        entries.push(current.join("\n"));
    }

    entries
}

fn is_trigger_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    ENTRY_TRIGGERS.iter().any(|t| lower.contains(t))
}

/// Whether a message looks like it contains multiple entries.
///
/// At least two independent signals must agree before a message is routed
/// through batch processing.
pub fn detect_batch_input(text: &str) -> bool {
    let line_count = text.lines().count();
    let indicators = [
        text.matches("\n\n").count() >= 1,
        text.matches("Client:").count() > 1,
        text.matches("sold").count() + text.matches("bought").count() > 1,
        line_count > 6,
        ["---", "***", "==="].iter().any(|s| text.contains(s)),
    ];
    indicators.iter().filter(|i| **i).count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_splits_into_two_entries() {
        let text = "Sold 5 units to Apollo for 25000\n\nSold 3 units to Cipla for 9000";
        let entries = split_entries(text);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("Apollo"));
        assert!(entries[1].contains("Cipla"));
    }

    #[test]
    fn explicit_rules_split() {
        let text = "Sold 5 units to Apollo for 25000\n---\nBought 2 boxes from Cipla for 4000";
        assert_eq!(split_entries(text).len(), 2);
    }

    #[test]
    fn single_paragraph_stays_one_entry() {
        let text = "Client: Apollo\nLocation: Mumbai\nOrders: 5\nAmount: 25000\nRemarks: ok";
        assert_eq!(split_entries(text).len(), 1);
    }

    #[test]
    fn single_line_stays_one_entry() {
        assert_eq!(split_entries("Sold 5 units to Apollo for 25000").len(), 1);
    }

    #[test]
    fn keyword_triggers_regroup_multiline_text() {
        let text = "sold 5 units to Apollo for 25000\nsold 3 units to Cipla for 9000";
        let entries = split_entries(text);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn continuation_lines_stay_with_their_entry() {
        let text = "Client: Apollo\nOrders: 5\nAmount: 25000\nClient: Cipla\nOrders: 2\nAmount: 4000";
        let entries = split_entries(text);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("25000"));
        assert!(entries[1].contains("4000"));
    }

    #[test]
    fn separator_debris_is_dropped() {
        let text = "Sold 5 units to Apollo for 25000\n\n---\n\nSold 3 units to Cipla for 9000";
        let entries = split_entries(text);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn batch_detection_needs_two_indicators() {
        // Blank line + two "sold" mentions: batch.
        assert!(detect_batch_input(
            "sold 5 to Apollo\n\nsold 3 to Cipla"
        ));
        // A single ordinary sentence: not a batch.
        assert!(!detect_batch_input("Sold 5 units to Apollo for 25000"));
        // One blank line alone is not enough.
        assert!(!detect_batch_input("hello\n\nworld"));
    }

    #[test]
    fn many_structured_labels_detect_as_batch() {
        let text = "Client: Apollo\nOrders: 5\nAmount: 100\nClient: Cipla\nOrders: 1\nAmount: 50\nRemarks: x";
        assert!(detect_batch_input(text));
    }
}
