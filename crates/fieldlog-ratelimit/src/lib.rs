// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate limiting and key health tracking for the Fieldlog extraction
//! pipeline.
//!
//! Multiple Gemini API keys carry independent per-minute/hour/day quotas.
//! [`RateLimiter`] tracks usage and health per key, parks keys through
//! provider-reported exhaustion windows, and hands out available keys in a
//! stable preference order for parallel batch extraction.

pub mod kind;
pub mod limiter;

pub use kind::{TransportErrorKind, classify_transport_error, extract_retry_delay};
pub use limiter::{KeyStatus, KeyTier, LimiterStatus, RateLimiter};
