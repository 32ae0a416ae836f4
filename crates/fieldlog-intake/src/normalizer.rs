// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fuzzy canonicalization of client and location names.
//!
//! Field staff type the same pharmacy a dozen ways (apollo, Apolo,
//! appollo pharmacy). Entries are folded onto canonical names with
//! string-similarity matching so downstream reporting groups correctly.
//! Below-threshold names pass through unchanged.

use std::collections::HashMap;
use std::sync::Mutex;

use regex::Regex;

/// Minimum normalized similarity to fold a name onto a canonical form.
const SIMILARITY_THRESHOLD: f64 = 0.70;

/// Canonical client names and their observed spellings.
const CLIENT_PATTERNS: &[(&str, &[&str])] = &[
    (
        "apollo",
        &["apollo", "apolo", "appollo", "apolloo", "apollo pharmacy", "apollo pharma", "apollo medical"],
    ),
    ("cipla", &["cipla", "ciple", "cipala", "cipla warehouse", "cipla medical"]),
    ("fortis", &["fortis", "forits", "fortiss", "fortis hospital", "fortis healthcare"]),
    ("max healthcare", &["max", "max healthcare", "max health", "max hospital"]),
    ("city hospital", &["city", "city hospital", "city hosp", "city medical"]),
    ("reliance", &["reliance", "relianse", "relians", "reliance pharmacy"]),
];

/// Canonical location names and their observed spellings.
const LOCATION_PATTERNS: &[(&str, &[&str])] = &[
    ("mumbai", &["mumbai", "mummbai", "mumbaii", "mumbay", "bombay"]),
    ("bandra", &["bandra", "bandraa", "bandara"]),
    ("andheri", &["andheri", "anderi", "andehri"]),
    ("pune", &["pune", "poona", "punee"]),
    ("chennai", &["chennai", "chenai", "chennaii", "madras"]),
];

/// Name normalizer with an alias cache so repeated spellings are folded
/// without re-scoring.
pub struct NameNormalizer {
    strip_chars: Regex,
    collapse_ws: Regex,
    gps_suffix: Regex,
    client_cache: Mutex<HashMap<String, String>>,
    location_cache: Mutex<HashMap<String, String>>,
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self {
            strip_chars: Regex::new(r"[^\w\s]").expect("strip pattern is valid"),
            collapse_ws: Regex::new(r"\s+").expect("whitespace pattern is valid"),
            gps_suffix: Regex::new(r"\(GPS:.*?\)").expect("gps pattern is valid"),
            client_cache: Mutex::new(HashMap::new()),
            location_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fold a client name onto its canonical form, or return the cleaned
    /// input when nothing scores above the threshold.
    pub fn normalize_client(&self, client: &str) -> String {
        if client.trim().is_empty() {
            return String::new();
        }
        if let Some(hit) = self.client_cache.lock().unwrap().get(client) {
            return hit.clone();
        }
        let normalized = self.best_match(client, CLIENT_PATTERNS);
        self.client_cache
            .lock()
            .unwrap()
            .insert(client.to_string(), normalized.clone());
        normalized
    }

    /// Fold a location name onto its canonical form. A trailing
    /// `(GPS: ...)` annotation is ignored for matching.
    pub fn normalize_location(&self, location: &str) -> String {
        if location.trim().is_empty() {
            return String::new();
        }
        let cleaned = self.gps_suffix.replace_all(location, "").trim().to_string();
        if let Some(hit) = self.location_cache.lock().unwrap().get(&cleaned) {
            return hit.clone();
        }
        let normalized = self.best_match(&cleaned, LOCATION_PATTERNS);
        self.location_cache
            .lock()
            .unwrap()
            .insert(cleaned, normalized.clone());
        normalized
    }

    /// Lowercase, strip punctuation, collapse runs of whitespace.
    fn clean(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let stripped = self.strip_chars.replace_all(lower.trim(), "");
        self.collapse_ws.replace_all(&stripped, " ").into_owned()
    }

    fn best_match(&self, target: &str, patterns: &[(&str, &[&str])]) -> String {
        let cleaned = self.clean(target);
        let mut best = cleaned.clone();
        let mut best_score = 0.0;

        for (canonical, variations) in patterns {
            for variation in *variations {
                let score = strsim::normalized_levenshtein(&cleaned, variation);
                if score > SIMILARITY_THRESHOLD && score > best_score {
                    best = (*canonical).to_string();
                    best_score = score;
                }
            }
        }

        best
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misspelled_client_folds_to_canonical() {
        let normalizer = NameNormalizer::new();
        assert_eq!(normalizer.normalize_client("Apolo"), "apollo");
        assert_eq!(normalizer.normalize_client("appollo"), "apollo");
        assert_eq!(normalizer.normalize_client("Apollo Pharmacy"), "apollo");
    }

    #[test]
    fn misspelled_location_folds_to_canonical() {
        let normalizer = NameNormalizer::new();
        assert_eq!(normalizer.normalize_location("Mummbai"), "mumbai");
        assert_eq!(normalizer.normalize_location("Bombay"), "mumbai");
    }

    #[test]
    fn unknown_names_pass_through_cleaned() {
        let normalizer = NameNormalizer::new();
        assert_eq!(
            normalizer.normalize_client("Wellness Forever"),
            "wellness forever"
        );
    }

    #[test]
    fn gps_annotation_is_ignored_for_matching() {
        let normalizer = NameNormalizer::new();
        assert_eq!(
            normalizer.normalize_location("Bandra (GPS: 19.06, 72.83)"),
            "bandra"
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        let normalizer = NameNormalizer::new();
        assert_eq!(normalizer.normalize_client("  "), "");
    }

    #[test]
    fn cache_returns_same_answer_for_repeat_lookups() {
        let normalizer = NameNormalizer::new();
        let first = normalizer.normalize_client("Apolo");
        let second = normalizer.normalize_client("Apolo");
        assert_eq!(first, second);
    }
}
