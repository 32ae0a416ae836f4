// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Fieldlog bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, so typos fail loudly instead of silently
//! falling back to defaults.

use serde::{Deserialize, Serialize};

/// Top-level Fieldlog configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the only thing a deployment must supply is a bot token and at
/// least one Gemini API key.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldlogConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Gemini API settings, including the multi-key allocation.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Per-key request quotas for the rate limiter.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Input pipeline bounds (message length, batch size, timeouts).
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Reverse-geocoding settings.
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Static user-to-company registration.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Entry store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "fieldlog".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram channel.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user IDs with admin commands enabled.
    #[serde(default)]
    pub admin_ids: Vec<u64>,
}

/// Gemini API configuration.
///
/// Up to three keys are supported; the rate limiter rotates across
/// whichever subset is configured.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Model identifier used for extraction requests.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Primary API key (heavy parsing and transactions).
    #[serde(default)]
    pub primary_api_key: Option<String>,

    /// Secondary API key.
    #[serde(default)]
    pub secondary_api_key: Option<String>,

    /// Tertiary API key.
    #[serde(default)]
    pub tertiary_api_key: Option<String>,
}

impl GeminiConfig {
    /// Number of keys actually configured.
    pub fn key_count(&self) -> usize {
        [
            &self.primary_api_key,
            &self.secondary_api_key,
            &self.tertiary_api_key,
        ]
        .iter()
        .filter(|k| k.is_some())
        .count()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            primary_api_key: None,
            secondary_api_key: None,
            tertiary_api_key: None,
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

/// Request quotas for one API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyQuota {
    pub requests_per_minute: u32,
    pub requests_per_hour: u32,
    pub daily_quota: u32,
}

/// Per-key quotas for the rate limiter.
///
/// Defaults are deliberately conservative, well under the provider's
/// advertised ceilings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default = "default_primary_quota")]
    pub primary: KeyQuota,

    #[serde(default = "default_secondary_quota")]
    pub secondary: KeyQuota,

    #[serde(default = "default_tertiary_quota")]
    pub tertiary: KeyQuota,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_quota(),
            secondary: default_secondary_quota(),
            tertiary: default_tertiary_quota(),
        }
    }
}

fn default_primary_quota() -> KeyQuota {
    KeyQuota {
        requests_per_minute: 12,
        requests_per_hour: 500,
        daily_quota: 1000,
    }
}

fn default_secondary_quota() -> KeyQuota {
    KeyQuota {
        requests_per_minute: 10,
        requests_per_hour: 400,
        daily_quota: 800,
    }
}

fn default_tertiary_quota() -> KeyQuota {
    KeyQuota {
        requests_per_minute: 8,
        requests_per_hour: 300,
        daily_quota: 600,
    }
}

/// Input pipeline bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Minimum message length accepted by the classifier.
    #[serde(default = "default_min_message_chars")]
    pub min_message_chars: usize,

    /// Maximum message length accepted by the classifier.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Maximum entries per batch message. Exceeding this rejects the whole
    /// batch with no partial processing.
    #[serde(default = "default_max_batch_entries")]
    pub max_batch_entries: usize,

    /// Hard timeout for a single extraction call, in seconds.
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,

    /// Upper bound on waiting for a rate-limited key, in seconds.
    #[serde(default = "default_key_wait_secs")]
    pub key_wait_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_message_chars: default_min_message_chars(),
            max_message_chars: default_max_message_chars(),
            max_batch_entries: default_max_batch_entries(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
            key_wait_secs: default_key_wait_secs(),
        }
    }
}

fn default_min_message_chars() -> usize {
    3
}

fn default_max_message_chars() -> usize {
    500
}

fn default_max_batch_entries() -> usize {
    10
}

fn default_extraction_timeout_secs() -> u64 {
    20
}

fn default_key_wait_secs() -> u64 {
    30
}

/// Reverse-geocoding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeocodingConfig {
    /// Nominatim endpoint base URL.
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,

    /// User-Agent header sent with lookups. Nominatim requires an
    /// identifying agent string.
    #[serde(default = "default_geocoding_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
            user_agent: default_geocoding_user_agent(),
            timeout_secs: default_geocoding_timeout_secs(),
        }
    }
}

fn default_geocoding_endpoint() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_user_agent() -> String {
    "fieldlog/0.1 (Telegram bot)".to_string()
}

fn default_geocoding_timeout_secs() -> u64 {
    10
}

/// Entry store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory where per-company entry files live.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("fieldlog"))
        .unwrap_or_else(|| std::path::PathBuf::from("fieldlog-data"))
        .to_string_lossy()
        .into_owned()
}

/// Static user-to-company registration.
///
/// Company CRUD is managed elsewhere; the bot only needs a read-only
/// mapping from Telegram user id to company partition.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Company partition for users not listed in `users`. `None` means
    /// unlisted users are not registered at all.
    #[serde(default)]
    pub default_company: Option<String>,

    /// Explicit user-id-to-company assignments. Keys are Telegram user
    /// ids as strings (TOML table keys are always strings).
    #[serde(default)]
    pub users: std::collections::HashMap<String, String>,
}
