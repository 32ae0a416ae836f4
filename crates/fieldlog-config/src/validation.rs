// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: non-zero quotas, sane pipeline bounds, key/quota coherence.

use crate::diagnostic::ConfigError;
use crate::model::{FieldlogConfig, KeyQuota};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FieldlogConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (tier, quota) in [
        ("primary", &config.limits.primary),
        ("secondary", &config.limits.secondary),
        ("tertiary", &config.limits.tertiary),
    ] {
        validate_quota(tier, quota, &mut errors);
    }

    if config.pipeline.min_message_chars >= config.pipeline.max_message_chars {
        errors.push(ConfigError::Validation {
            message: format!(
                "pipeline.min_message_chars ({}) must be below max_message_chars ({})",
                config.pipeline.min_message_chars, config.pipeline.max_message_chars
            ),
        });
    }

    if config.pipeline.max_batch_entries == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.max_batch_entries must be at least 1".to_string(),
        });
    }

    if config.pipeline.extraction_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.extraction_timeout_secs must be non-zero".to_string(),
        });
    }

    if config.geocoding.user_agent.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "geocoding.user_agent must not be empty (Nominatim requires one)"
                .to_string(),
        });
    }

    // A bot token without any Gemini key means free-text messages could
    // never be parsed once structured parsing fails.
    if config.telegram.bot_token.is_some() && config.gemini.key_count() == 0 {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token is set but no gemini.*_api_key is configured"
                .to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_quota(tier: &str, quota: &KeyQuota, errors: &mut Vec<ConfigError>) {
    if quota.requests_per_minute == 0 {
        errors.push(ConfigError::Validation {
            message: format!("limits.{tier}.requests_per_minute must be non-zero"),
        });
    }
    if quota.requests_per_hour < quota.requests_per_minute {
        errors.push(ConfigError::Validation {
            message: format!(
                "limits.{tier}.requests_per_hour ({}) is below requests_per_minute ({})",
                quota.requests_per_hour, quota.requests_per_minute
            ),
        });
    }
    if quota.daily_quota < quota.requests_per_hour {
        errors.push(ConfigError::Validation {
            message: format!(
                "limits.{tier}.daily_quota ({}) is below requests_per_hour ({})",
                quota.daily_quota, quota.requests_per_hour
            ),
        });
    }
}
