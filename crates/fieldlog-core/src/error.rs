// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the Fieldlog workspace.

use thiserror::Error;

/// The primary error type used across Fieldlog collaborator traits and core operations.
///
/// Recoverable pipeline outcomes (classifier rejections, structured-parse
/// fallbacks, extraction misses) are modeled as values, not as variants here.
/// This enum covers the failures that cross a crate boundary.
#[derive(Debug, Error)]
pub enum FieldlogError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM provider errors (API failure, malformed response, rate limiting).
    ///
    /// The message carries the upstream status and body text verbatim: the
    /// rate limiter classifies quota errors by inspecting this string.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Channel errors (Telegram send failure, message format).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistence errors (sheet append failure, partition not found).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Geocoding lookup errors.
    #[error("geocoding error: {message}")]
    Geocode { message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
