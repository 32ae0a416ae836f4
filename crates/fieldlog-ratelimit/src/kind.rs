// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport error classification.
//!
//! The upstream provider reports quota exhaustion only in prose, so the
//! limiter has to sniff error text. The heuristic lives here and nowhere
//! else; if the provider ever grows structured error codes, this is the
//! one function to replace.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// Fallback exhaustion window when the provider gives no retry hint.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

static RETRY_DELAY_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"retry_delay\s*\{\s*seconds:\s*(\d+)").expect("retry-delay pattern is valid")
});

/// Coarse classification of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The key's quota is exhausted (HTTP 429 or quota-flavored text).
    QuotaExhausted,
    /// Anything else: network failure, malformed response, server error.
    Other,
}

/// Classify an error message by substring. Mirrors the upstream contract:
/// quota conditions mention "429" or "quota" in the body text.
pub fn classify_transport_error(text: &str) -> TransportErrorKind {
    if text.contains("429") || text.to_lowercase().contains("quota") {
        TransportErrorKind::QuotaExhausted
    } else {
        TransportErrorKind::Other
    }
}

/// Extract the provider's `retry_delay { seconds: N }` hint, falling back
/// to a conservative default.
pub fn extract_retry_delay(text: &str) -> Duration {
    RETRY_DELAY_HINT
        .captures(text)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_quota() {
        assert_eq!(
            classify_transport_error("API returned 429: resource exhausted"),
            TransportErrorKind::QuotaExhausted
        );
    }

    #[test]
    fn quota_word_is_quota_case_insensitive() {
        assert_eq!(
            classify_transport_error("Quota exceeded for model"),
            TransportErrorKind::QuotaExhausted
        );
    }

    #[test]
    fn network_error_is_other() {
        assert_eq!(
            classify_transport_error("connection reset by peer"),
            TransportErrorKind::Other
        );
    }

    #[test]
    fn retry_hint_is_parsed() {
        let text = "429 rate limited. retry_delay { seconds: 37 }";
        assert_eq!(extract_retry_delay(text), Duration::from_secs(37));
    }

    #[test]
    fn missing_hint_falls_back_to_default() {
        assert_eq!(
            extract_retry_delay("429 rate limited"),
            Duration::from_secs(60)
        );
    }
}
