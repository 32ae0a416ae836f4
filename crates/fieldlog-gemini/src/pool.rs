// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-key extraction pool.
//!
//! Holds one provider per configured key tier and coordinates with the
//! rate limiter: every call picks an available key, records the outcome,
//! and rotates to another key when a quota window slams shut mid-batch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use fieldlog_core::{FieldlogError, LlmProvider, ParsedEntry};
use fieldlog_ratelimit::{
    KeyTier, RateLimiter, TransportErrorKind, classify_transport_error,
};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::extractor::parse_extraction_response;
use crate::prompt::build_extraction_prompt;

/// Attempts per extraction before giving up; each attempt may land on a
/// different key.
const MAX_ATTEMPTS: u32 = 3;

/// The one extraction failure that is surfaced instead of swallowed:
/// nothing can be parsed while every key is parked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("all API keys are rate limited")]
    AllKeysRateLimited,
}

/// Key-rotating extraction front end over the configured providers.
pub struct ExtractorPool {
    providers: BTreeMap<KeyTier, Arc<dyn LlmProvider>>,
    limiter: Arc<RateLimiter>,
    call_timeout: Duration,
    key_wait: Duration,
}

impl ExtractorPool {
    pub fn new(
        providers: BTreeMap<KeyTier, Arc<dyn LlmProvider>>,
        limiter: Arc<RateLimiter>,
        call_timeout: Duration,
        key_wait: Duration,
    ) -> Self {
        info!(keys = providers.len(), "extractor pool initialized");
        Self {
            providers,
            limiter,
            call_timeout,
            key_wait,
        }
    }

    /// Number of configured keys.
    pub fn key_count(&self) -> usize {
        self.providers.len()
    }

    /// Whether the pool can fan a batch out across more than one key.
    pub fn parallel_capable(&self) -> bool {
        self.providers.len() > 1
    }

    /// Shared limiter handle, for status reporting.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Extract a candidate entry from one message.
    ///
    /// `Ok(None)` is an ordinary extraction miss (malformed response,
    /// transport failure, timeout); `Err` only when no key is usable
    /// within the wait budget.
    pub async fn extract(&self, text: &str) -> Result<Option<ParsedEntry>, PoolError> {
        let prompt = build_extraction_prompt(text);

        for attempt in 0..MAX_ATTEMPTS {
            let tier = self.pick_key().await?;
            let provider = &self.providers[&tier];

            match timeout(self.call_timeout, provider.generate(&prompt)).await {
                Ok(Ok(raw)) => {
                    self.limiter.record_request(tier, true, "");
                    debug!(key = %tier, "extraction call succeeded");
                    return Ok(parse_extraction_response(&raw));
                }
                Ok(Err(err)) => {
                    let message = err.to_string();
                    self.limiter.record_request(tier, false, &message);
                    let quota = classify_transport_error(&message)
                        == TransportErrorKind::QuotaExhausted;
                    if quota && attempt + 1 < MAX_ATTEMPTS {
                        // The key just got parked; the next attempt will
                        // pick whichever key is still open.
                        warn!(key = %tier, attempt, "quota hit, rotating key");
                        continue;
                    }
                    warn!(key = %tier, %message, "extraction call failed");
                    return Ok(None);
                }
                Err(_) => {
                    let message =
                        format!("extraction timed out after {:?}", self.call_timeout);
                    self.limiter.record_request(tier, false, &message);
                    warn!(key = %tier, %message, "extraction call timed out");
                    return Ok(None);
                }
            }
        }

        Ok(None)
    }

    /// Pick a key: an open preferred/first-available key if any, otherwise
    /// block (bounded) until one frees up.
    async fn pick_key(&self) -> Result<KeyTier, PoolError> {
        let preferred = self.providers.keys().next().copied();
        if let Some(tier) = preferred
            && self.limiter.can_use_key(tier)
        {
            return Ok(tier);
        }
        if let Some(tier) = self
            .limiter
            .get_available_keys()
            .into_iter()
            .find(|t| self.providers.contains_key(t))
        {
            debug!(key = %tier, "preferred key unavailable, switching");
            return Ok(tier);
        }
        self.limiter
            .wait_for_available_key(preferred, self.key_wait)
            .await
            .filter(|t| self.providers.contains_key(t))
            .ok_or(PoolError::AllKeysRateLimited)
    }
}
