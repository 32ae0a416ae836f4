// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row construction for the append-only entry store.
//!
//! The store is schema-blind; this module is the single place that knows
//! the column order of a company sheet.

use chrono::{DateTime, Utc};
use fieldlog_core::{UserId, ValidatedEntry};
use fieldlog_intake::NameNormalizer;

/// Per-message user context: who sent it, which company partition their
/// entries land in, and their last known GPS-derived address, if any.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: UserId,
    pub full_name: String,
    pub company: String,
    pub gps_location: Option<String>,
}

/// Entry id for a single logged message: short random tag.
pub fn single_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

/// Entry id for one member of a batch: timestamp plus original index, so
/// neighbors in the sheet sort back into message order.
pub fn batch_entry_id(timestamp: DateTime<Utc>, index: usize) -> String {
    format!("batch_{}_{}", timestamp.format("%Y%m%d_%H%M%S"), index)
}

/// Build the 15-column sheet row for one validated entry.
///
/// Client and location are folded onto canonical names so per-company
/// sheets group consistently no matter how field staff spell them; the
/// user-facing confirmation keeps the raw names.
pub fn build_row(
    entry_id: &str,
    entry: &ValidatedEntry,
    user: &UserContext,
    normalizer: &NameNormalizer,
) -> Vec<String> {
    vec![
        entry_id.to_string(),
        entry.date.format("%d-%m-%Y").to_string(),
        user.full_name.clone(),
        entry.entry_type.to_string(),
        normalizer.normalize_client(&entry.client),
        normalizer.normalize_location(&entry.location),
        entry.orders.to_string(),
        entry.amount.to_string(),
        entry.remarks.clone(),
        user.user_id.to_string(),
        entry.date.format("%H:%M").to_string(),
        user.company.clone(),
        entry.date.to_rfc3339(),
        entry.date.to_rfc3339(),
        user.gps_location.clone().unwrap_or_default(),
    ]
}
