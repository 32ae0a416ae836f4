// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Fieldlog integration tests.
//!
//! Deterministic stand-ins for every collaborator trait: a scripted LLM
//! provider with a call counter, an in-memory entry store, and a
//! fixed-answer geocoder.

pub mod mock_geocoder;
pub mod mock_provider;
pub mod mock_store;

pub use mock_geocoder::FixedGeocoder;
pub use mock_provider::{DEFAULT_EXTRACTION, MockProvider};
pub use mock_store::MemoryStore;
