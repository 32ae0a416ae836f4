// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-based transaction intent detection.

use strum::Display;

const SALES_KEYWORDS: &[&str] = &["sale", "sold", "order", "dealt"];
const PURCHASE_KEYWORDS: &[&str] = &["purchase", "bought", "procured", "acquired"];

/// What kind of transaction a message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    SalesEntry,
    PurchaseEntry,
    Unknown,
}

/// Guess whether a message records a sale or a purchase. Sales vocabulary
/// wins ties, matching how field staff phrase mixed updates.
pub fn detect_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();
    if SALES_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Intent::SalesEntry
    } else if PURCHASE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Intent::PurchaseEntry
    } else {
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sold_is_a_sale() {
        assert_eq!(detect_intent("Sold 5 units to Apollo"), Intent::SalesEntry);
    }

    #[test]
    fn bought_is_a_purchase() {
        assert_eq!(
            detect_intent("Bought 20 strips from Cipla"),
            Intent::PurchaseEntry
        );
    }

    #[test]
    fn sales_vocabulary_wins_ties() {
        assert_eq!(
            detect_intent("sold what we bought last week"),
            Intent::SalesEntry
        );
    }

    #[test]
    fn neutral_text_is_unknown() {
        assert_eq!(detect_intent("visited the Chembur branch"), Intent::Unknown);
    }
}
