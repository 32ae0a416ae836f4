// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider for deterministic testing.
//!
//! `MockProvider` implements `LlmProvider` with pre-configured responses,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use fieldlog_core::{FieldlogError, LlmProvider};

/// A scripted response: either model text or a provider error message.
pub type Scripted = Result<String, String>;

/// A mock LLM provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty, a
/// default JSON extraction is returned. Calls are counted, so tests can
/// assert that a path never reached the provider at all.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    calls: AtomicUsize,
}

/// Default extraction returned once the queue is empty.
pub const DEFAULT_EXTRACTION: &str = r#"{"client": "Mock Pharma", "location": "Testville", "orders": 1, "amount": 100, "remarks": "mock"}"#;

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock provider pre-loaded with the given response texts.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful response.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a provider failure with the given error message.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// How many times `generate` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_response(&self) -> Scripted {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_EXTRACTION.to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, FieldlogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.next_response()
            .await
            .map_err(|message| FieldlogError::Provider {
                message,
                source: None,
            })
    }
}
