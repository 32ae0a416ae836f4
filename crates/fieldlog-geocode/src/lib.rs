// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reverse geocoding for the Fieldlog bot.
//!
//! Wraps Nominatim behind the [`fieldlog_core::Geocoder`] trait so the
//! rest of the system only ever sees a short address or `None`.

pub mod client;

pub use client::{NominatimClient, coordinate_fallback};
