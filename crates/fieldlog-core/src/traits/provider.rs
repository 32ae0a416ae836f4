// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language-model provider trait.

use async_trait::async_trait;

use crate::error::FieldlogError;

/// A single-shot language-model call: one prompt in, one text response out.
///
/// No streaming. The caller owns all prompt construction and all response
/// parsing; implementations only move bytes and report transport failures.
/// Error messages must carry the upstream status and body verbatim so the
/// rate limiter can recognize quota conditions.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, FieldlogError>;
}
