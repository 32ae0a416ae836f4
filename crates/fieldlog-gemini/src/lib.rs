// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini extraction adapter for the Fieldlog bot.
//!
//! [`GeminiClient`] speaks the `generateContent` REST API for one key;
//! [`ExtractorPool`] rotates calls across every configured key under the
//! rate limiter's direction; [`extractor`] turns whatever the model
//! returns into a [`fieldlog_core::ParsedEntry`] or nothing.

pub mod client;
pub mod extractor;
pub mod pool;
pub mod prompt;
pub mod types;

pub use client::GeminiClient;
pub use extractor::{parse_extraction_response, strip_code_fence};
pub use pool::{ExtractorPool, PoolError};
pub use prompt::build_extraction_prompt;
