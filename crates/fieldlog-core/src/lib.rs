// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Fieldlog bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Fieldlog workspace. The parsing,
//! rate-limiting, and orchestration crates all build on what is defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::FieldlogError;
pub use types::{EntryType, GeoAccuracy, GeoFix, ParsedEntry, UserId, ValidatedEntry};

pub use traits::{CompanyDirectory, EntryStore, Geocoder, LlmProvider};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = FieldlogError::Config("test".into());
        let _provider = FieldlogError::Provider {
            message: "test".into(),
            source: None,
        };
        let _channel = FieldlogError::Channel {
            message: "test".into(),
            source: None,
        };
        let _storage = FieldlogError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _geocode = FieldlogError::Geocode {
            message: "test".into(),
        };
        let _timeout = FieldlogError::Timeout {
            duration: std::time::Duration::from_secs(20),
        };
        let _internal = FieldlogError::Internal("test".into());
    }

    #[test]
    fn provider_error_message_is_preserved_verbatim() {
        // The rate limiter classifies quota conditions from this text.
        let err = FieldlogError::Provider {
            message: "API returned 429: quota exceeded".into(),
            source: None,
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota"));
    }

    #[test]
    fn trait_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LlmProvider>();
        assert_send_sync::<dyn EntryStore>();
        assert_send_sync::<dyn Geocoder>();
        assert_send_sync::<dyn CompanyDirectory>();
    }
}
