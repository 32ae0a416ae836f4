// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic parsing of the `Label: value` entry template.
//!
//! Attempted before the AI adapter because it is free: a failure here is
//! the fallback trigger, never a user-visible error.

use fieldlog_core::ParsedEntry;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer pattern is valid"));

/// Why the structured template did not match. Always recoverable: the
/// caller falls through to AI extraction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuredParseError {
    #[error("no `{0}` line found")]
    MissingLabel(&'static str),

    #[error("`{label}` line has no value after the colon")]
    MissingValue { label: &'static str },

    #[error("could not read a number from `{label}: {value}`")]
    InvalidNumber { label: &'static str, value: String },
}

/// Parse the five-line `Client/Location/Orders/Amount/Remarks` template.
///
/// Labels are matched by case-sensitive substring anywhere in a line, as
/// field staff often prefix them with bullets or numbering. Order quantity
/// values support multi-term summation ("3 boxes + 5 bottles" is 8).
pub fn parse_structured(text: &str) -> Result<ParsedEntry, StructuredParseError> {
    let lines: Vec<&str> = text.lines().collect();

    let client = labeled_value(&lines, "Client")?;
    let location = labeled_value(&lines, "Location")?;
    let orders_raw = labeled_value(&lines, "Orders")?;
    let amount_raw = labeled_value(&lines, "Amount")?;
    let remarks = labeled_value(&lines, "Remarks")?;

    let orders = parse_orders(&orders_raw).ok_or_else(|| StructuredParseError::InvalidNumber {
        label: "Orders",
        value: orders_raw.clone(),
    })?;
    let amount = parse_amount(&amount_raw).ok_or_else(|| StructuredParseError::InvalidNumber {
        label: "Amount",
        value: amount_raw.clone(),
    })?;

    Ok(ParsedEntry {
        client: Some(client),
        location: Some(location),
        orders: Some(orders),
        amount: Some(amount),
        remarks: Some(remarks),
    })
}

/// Find the first line containing `label` and return the text after its
/// first colon, trimmed.
fn labeled_value(lines: &[&str], label: &'static str) -> Result<String, StructuredParseError> {
    let line = lines
        .iter()
        .find(|l| l.contains(label))
        .ok_or(StructuredParseError::MissingLabel(label))?;
    let (_, value) = line
        .split_once(':')
        .ok_or(StructuredParseError::MissingValue { label })?;
    Ok(value.trim().to_string())
}

/// Read an order quantity: every integer in the value is extracted, and
/// summed when the value joins terms with `+`, "and", or a comma;
/// otherwise the first integer wins.
pub fn parse_orders(value: &str) -> Option<i64> {
    let numbers: Vec<i64> = INTEGER
        .find_iter(value)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if numbers.is_empty() {
        return None;
    }

    let lower = value.to_lowercase();
    let multi_term = value.contains('+')
        || value.contains(',')
        || lower.split_whitespace().any(|w| w == "and");
    if multi_term {
        Some(numbers.iter().sum())
    } else {
        Some(numbers[0])
    }
}

/// Read an amount: currency markers and thousands separators stripped,
/// remainder parsed as an integer.
pub fn parse_amount(value: &str) -> Option<i64> {
    let cleaned: String = value
        .replace('₹', "")
        .replace("Rs.", "")
        .replace("Rs", "")
        .replace(',', "")
        .trim()
        .to_string();
    cleaned.parse().ok()
}
