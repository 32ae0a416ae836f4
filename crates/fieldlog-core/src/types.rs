// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Fieldlog workspace.
//!
//! Each pipeline stage hands a distinct, named struct to the next stage:
//! raw text goes in, a [`ParsedEntry`] candidate comes out of either parser,
//! and the validator produces a [`ValidatedEntry`] that is never mutated
//! after hand-off to persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Telegram user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether an entry records a sale or a purchase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum EntryType {
    Sales,
    Purchase,
}

/// A candidate transaction produced by the structured parser or the AI
/// extraction adapter. All fields are optional; see [`ParsedEntry::is_usable`]
/// for the minimum a candidate needs before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntry {
    pub client: Option<String>,
    pub location: Option<String>,
    pub orders: Option<i64>,
    pub amount: Option<i64>,
    pub remarks: Option<String>,
}

impl ParsedEntry {
    /// A candidate is usable only when `client`, `orders`, and `amount`
    /// are all present. `location` and `remarks` may be filled in later
    /// (GPS enrichment, original text fallback).
    pub fn is_usable(&self) -> bool {
        self.client.is_some() && self.orders.is_some() && self.amount.is_some()
    }
}

/// A sanitized, complete transaction record ready for persistence.
///
/// Produced exactly once per accepted message by the entry validator;
/// every field is concrete (defaults applied, warnings emitted separately).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedEntry {
    pub entry_type: EntryType,
    pub client: String,
    pub location: String,
    pub orders: i64,
    pub amount: i64,
    pub remarks: String,
    pub date: DateTime<Utc>,
}

impl From<&ValidatedEntry> for ParsedEntry {
    /// View a validated entry as a parse candidate again. Used to check
    /// validator idempotence; empty strings stay as `Some("")` so a second
    /// validation pass sees exactly what the first pass produced.
    fn from(entry: &ValidatedEntry) -> Self {
        ParsedEntry {
            client: Some(entry.client.clone()),
            location: Some(entry.location.clone()),
            orders: Some(entry.orders),
            amount: Some(entry.amount),
            remarks: Some(entry.remarks.clone()),
        }
    }
}

/// How confident a reverse-geocode result is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum GeoAccuracy {
    High,
    Medium,
    Low,
}

/// A resolved GPS fix: a short human-readable address plus accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    /// Condensed address, e.g. "Chembur, Mumbai".
    pub short_address: String,
    pub accuracy: GeoAccuracy,
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn usable_requires_client_orders_amount() {
        assert!(full_candidate().is_usable());

        let mut missing_client = full_candidate();
        missing_client.client = None;
        assert!(!missing_client.is_usable());

        let mut missing_orders = full_candidate();
        missing_orders.orders = None;
        assert!(!missing_orders.is_usable());

        let mut missing_amount = full_candidate();
        missing_amount.amount = None;
        assert!(!missing_amount.is_usable());
    }

    #[test]
    fn usable_without_location_or_remarks() {
        let mut candidate = full_candidate();
        candidate.location = None;
        candidate.remarks = None;
        assert!(candidate.is_usable());
    }

    #[test]
    fn entry_type_round_trips_through_strings() {
        use std::str::FromStr;
        for variant in [EntryType::Sales, EntryType::Purchase] {
            let s = variant.to_string();
            assert_eq!(EntryType::from_str(&s).unwrap(), variant);
        }
    }

    #[test]
    fn geo_accuracy_display_is_lowercase() {
        assert_eq!(GeoAccuracy::High.to_string(), "high");
        assert_eq!(GeoAccuracy::Low.to_string(), "low");
    }

    #[test]
    fn validated_entry_views_back_as_candidate() {
        let validated = ValidatedEntry {
            entry_type: EntryType::Sales,
            client: "Apollo".into(),
            location: String::new(),
            orders: 3,
            amount: 24000,
            remarks: "ok".into(),
            date: Utc::now(),
        };
        let candidate = ParsedEntry::from(&validated);
        assert_eq!(candidate.client.as_deref(), Some("Apollo"));
        assert_eq!(candidate.location.as_deref(), Some(""));
        assert!(candidate.is_usable());
    }
}
