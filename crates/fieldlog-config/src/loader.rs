// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./fieldlog.toml` > `~/.config/fieldlog/fieldlog.toml`
//! > `/etc/fieldlog/fieldlog.toml` with environment variable overrides via
//! the `FIELDLOG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FieldlogConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/fieldlog/fieldlog.toml` (system-wide)
/// 3. `~/.config/fieldlog/fieldlog.toml` (user XDG config)
/// 4. `./fieldlog.toml` (local directory)
/// 5. `FIELDLOG_*` environment variables
pub fn load_config() -> Result<FieldlogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FieldlogConfig::default()))
        .merge(Toml::file("/etc/fieldlog/fieldlog.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("fieldlog/fieldlog.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("fieldlog.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FieldlogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FieldlogConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FieldlogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FieldlogConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `FIELDLOG_GEMINI_PRIMARY_API_KEY` must
/// map to `gemini.primary_api_key`, not `gemini.primary.api.key`.
fn env_provider() -> Env {
    Env::prefixed("FIELDLOG_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("limits_", "limits.", 1)
            .replacen("pipeline_", "pipeline.", 1)
            .replacen("geocoding_", "geocoding.", 1)
            .replacen("directory_", "directory.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
