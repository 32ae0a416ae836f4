// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defensive parsing of model output into entry candidates.
//!
//! Models fence JSON in markdown, quote numbers, and leave currency
//! markers in amounts despite instructions. Everything here converts that
//! reality into either a clean [`ParsedEntry`] or `None`; a miss is never
//! an error, the user simply gets asked to rephrase.

use fieldlog_core::ParsedEntry;
use serde_json::Value;
use tracing::warn;

/// The keys the model must return. Values may be null, but an absent key
/// means the model ignored the schema and the whole response is discarded
/// rather than trusted as a partial record.
const REQUIRED_KEYS: [&str; 5] = ["client", "location", "orders", "amount", "remarks"];

/// Parse a raw model response into an entry candidate.
///
/// Returns `None` when the response is not JSON, is not an object, or is
/// missing any required key.
pub fn parse_extraction_response(raw: &str) -> Option<ParsedEntry> {
    let cleaned = strip_code_fence(raw);

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "model returned invalid JSON");
            return None;
        }
    };

    let object = match value.as_object() {
        Some(object) => object,
        None => {
            warn!("model returned JSON that is not an object");
            return None;
        }
    };

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            warn!(key, "model response missing required key");
            return None;
        }
    }

    Some(ParsedEntry {
        client: text_value(&object["client"]),
        location: text_value(&object["location"]),
        orders: numeric_value(&object["orders"]),
        amount: numeric_value(&object["amount"]),
        remarks: text_value(&object["remarks"]),
    })
}

/// Strip a markdown code fence and an optional leading `json` tag.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let inner = trimmed.trim_matches('`').trim();
    match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => inner[4..].trim_start(),
        _ => inner,
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        // A model occasionally returns a bare number for a text field.
        other => Some(other.to_string()),
    }
}

/// Coerce a JSON value to an integer, tolerating string-wrapped numbers
/// with currency markers and thousands separators.
fn numeric_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '-')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}
