// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic input classification: the cost-control gate.
//!
//! Rejects gibberish, casual chat, and context-free messages with
//! zero-cost rules before anything reaches the network. Every message
//! passes through here exactly once, ahead of both parsers.

use regex::Regex;
use strum::Display;

/// Business vocabulary that marks a message as transaction-shaped
/// (substring match, lowercase).
const BUSINESS_KEYWORDS: &[&str] = &[
    "sold", "sale", "sales", "buy", "bought", "purchase", "client", "customer",
    "amount", "rupees", "₹", "rs", "money", "payment", "invoice", "order",
    "units", "items", "products", "goods", "delivered", "delivery", "shipped",
    "apollo", "pharmacy", "medical", "hospital", "clinic", "doctor",
    "today", "yesterday", "morning", "evening", "urgent", "completed",
];

/// Gibberish heuristics, applied to the trimmed lowercase text.
const GIBBERISH_PATTERNS: &[&str] = &[
    r"^[a-z]{1,3}$",                 // whole message is one very short token
    r"^[qwxz]{3,}",                  // uncommon letter clusters
    r"[aeiou]{4,}",                  // too many vowels together
    r"[bcdfghjklmnpqrstvwxyz]{5,}",  // too many consonants together
    r"(.)\1{4,}",                    // same character 5+ times in a row
    r"^[^a-zA-Z]*$",                 // no letters at all
    r"[!@#$%^&*()]{3,}",             // special-character runs
];

/// Casual small-talk patterns (word-bounded, lowercase).
const CASUAL_PATTERNS: &[&str] = &[
    r"\bhello\b",
    r"\bhi\b",
    r"\bhey\b",
    r"\bhow are you\b",
    r"\bweather\b",
    r"\bfeeling\b",
    r"\bgood morning\b",
    r"\bgood evening\b",
    r"\bthanks\b",
    r"\bthank you\b",
];

/// Example inputs shown in rejection guidance.
const FORMAT_EXAMPLES: &[&str] = &[
    "Client: Apollo Pharmacy, Orders: 5, Amount: ₹25000",
    "Sold 10 units to MedCorp for ₹15000",
    "Purchase from XYZ supplier - 20 items - ₹8000",
    "Apollo - 3 boxes - ₹12000 - urgent delivery",
];

/// Why the classifier accepted or rejected a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ClassifyReason {
    ValidBusinessInput,
    EmptyInput,
    TooShort,
    TooLong,
    GibberishDetected,
    CasualConversation,
    NoBusinessContext,
}

/// Result of classifying one raw message.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub is_valid: bool,
    pub reason: ClassifyReason,
    /// Ordered hints for fixing the input. Empty on acceptance.
    pub suggestions: Vec<&'static str>,
    /// Whether the message should proceed to parsing (and AI fallback).
    pub should_use_ai: bool,
    /// User-facing rejection text, built from a reason-keyed template
    /// plus one example. `None` on acceptance.
    pub fallback_response: Option<String>,
}

impl ClassificationResult {
    fn accepted() -> Self {
        Self {
            is_valid: true,
            reason: ClassifyReason::ValidBusinessInput,
            suggestions: Vec::new(),
            should_use_ai: true,
            fallback_response: None,
        }
    }
}

/// Length bounds applied before any pattern checks.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for ClassifierLimits {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 500,
        }
    }
}

/// Zero-cost message classifier. Regexes compile once at construction.
pub struct InputClassifier {
    limits: ClassifierLimits,
    gibberish: Vec<Regex>,
    casual: Vec<Regex>,
    digit: Regex,
}

impl InputClassifier {
    pub fn new(limits: ClassifierLimits) -> Self {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .map(|p| Regex::new(p).expect("classifier pattern is valid"))
                .collect()
        };
        Self {
            limits,
            gibberish: compile(GIBBERISH_PATTERNS),
            casual: compile(CASUAL_PATTERNS),
            digit: Regex::new(r"\d").expect("digit pattern is valid"),
        }
    }

    /// Classify a raw message. Rules apply in order; first match wins.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.reject(text, ClassifyReason::EmptyInput, vec!["Please type a message"]);
        }

        let lower = trimmed.to_lowercase();

        if lower.chars().count() < self.limits.min_chars {
            return self.reject(
                text,
                ClassifyReason::TooShort,
                vec!["Please provide more details about your transaction"],
            );
        }

        if lower.chars().count() > self.limits.max_chars {
            return self.reject(
                text,
                ClassifyReason::TooLong,
                vec!["Please keep your message under 500 characters"],
            );
        }

        if self.gibberish.iter().any(|p| p.is_match(&lower)) {
            return self.reject(
                text,
                ClassifyReason::GibberishDetected,
                vec![
                    "I couldn't understand that. Please describe your transaction clearly.",
                    "Example: 'Sold 5 units to Apollo Pharmacy for ₹25000'",
                ],
            );
        }

        if self.casual.iter().any(|p| p.is_match(&lower)) {
            return self.reject(
                text,
                ClassifyReason::CasualConversation,
                vec![
                    "I'm here to help with business transactions.",
                    "Please describe a sale or purchase transaction.",
                ],
            );
        }

        let has_business_context = BUSINESS_KEYWORDS.iter().any(|k| lower.contains(k));
        let has_numbers = self.digit.is_match(trimmed);
        if !has_business_context && !has_numbers {
            return self.reject(
                text,
                ClassifyReason::NoBusinessContext,
                vec![
                    "Please include business details like client name, amount, or quantity.",
                    "Example: 'Apollo Pharmacy - 5 units - ₹25000'",
                ],
            );
        }

        tracing::debug!(chars = trimmed.len(), "input accepted for parsing");
        ClassificationResult::accepted()
    }

    fn reject(
        &self,
        text: &str,
        reason: ClassifyReason,
        suggestions: Vec<&'static str>,
    ) -> ClassificationResult {
        tracing::debug!(%reason, "input rejected");
        let fallback = rejection_response(text, reason, &suggestions);
        ClassificationResult {
            is_valid: false,
            reason,
            suggestions,
            should_use_ai: false,
            fallback_response: Some(fallback),
        }
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new(ClassifierLimits::default())
    }
}

/// Build the user-facing rejection text: reason-keyed template, first
/// suggestion, and (for multi-suggestion reasons) one format example
/// picked deterministically from the input length.
fn rejection_response(text: &str, reason: ClassifyReason, suggestions: &[&str]) -> String {
    let base = match reason {
        ClassifyReason::EmptyInput => "Please type a message to get started!",
        ClassifyReason::TooShort => "Could you provide more details about your transaction?",
        ClassifyReason::TooLong => "That message is quite long! Please keep it concise.",
        ClassifyReason::GibberishDetected => {
            "I couldn't understand that message. Let me help you format it properly!"
        }
        ClassifyReason::CasualConversation => {
            "Hi there! I'm here to help with business transactions."
        }
        ClassifyReason::NoBusinessContext => "I need more business details to help you.",
        ClassifyReason::ValidBusinessInput => "I need help understanding your message.",
    };

    match suggestions {
        [] => base.to_string(),
        [only] => format!("{base}\n\nTry something like:\n{only}"),
        [first, ..] => {
            let example = FORMAT_EXAMPLES[text.len() % FORMAT_EXAMPLES.len()];
            format!("{base}\n\nTry something like:\n{first}\n\nFormat examples:\n{example}")
        }
    }
}
