// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reverse-geocoding trait.

use async_trait::async_trait;

use crate::types::GeoFix;

/// Reverse-geocode a GPS coordinate into a short address.
///
/// Returns `None` on any lookup failure; callers fall back to a
/// coordinate string.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Option<GeoFix>;
}
