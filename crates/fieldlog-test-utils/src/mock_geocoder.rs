// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-answer geocoder for tests.

use async_trait::async_trait;

use fieldlog_core::{GeoAccuracy, GeoFix, Geocoder};

/// Geocoder that always returns the same fix (or always fails).
pub struct FixedGeocoder {
    fix: Option<GeoFix>,
}

impl FixedGeocoder {
    /// Always answers with the given short address at high accuracy.
    pub fn answering(short_address: &str) -> Self {
        Self {
            fix: Some(GeoFix {
                short_address: short_address.to_string(),
                accuracy: GeoAccuracy::High,
            }),
        }
    }

    /// Always fails, forcing callers onto the coordinate fallback.
    pub fn failing() -> Self {
        Self { fix: None }
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Option<GeoFix> {
        self.fix.clone()
    }
}
