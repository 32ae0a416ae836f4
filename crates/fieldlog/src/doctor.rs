// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `doctor` subcommand: configuration and readiness report.

use fieldlog_config::FieldlogConfig;
use fieldlog_ratelimit::{KeyTier, RateLimiter};

/// Render a human-readable readiness report.
pub fn report(config: &FieldlogConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("bot name:        {}\n", config.bot.name));
    out.push_str(&format!(
        "telegram token:  {}\n",
        if config.telegram.bot_token.is_some() { "set" } else { "MISSING" }
    ));
    out.push_str(&format!("gemini model:    {}\n", config.gemini.model));
    out.push_str(&format!(
        "gemini keys:     {} configured\n",
        config.gemini.key_count()
    ));
    let mut tiers = Vec::new();
    for (tier, key, quota) in [
        (KeyTier::Primary, &config.gemini.primary_api_key, &config.limits.primary),
        (KeyTier::Secondary, &config.gemini.secondary_api_key, &config.limits.secondary),
        (KeyTier::Tertiary, &config.gemini.tertiary_api_key, &config.limits.tertiary),
    ] {
        if key.is_some() {
            tiers.push(tier);
            out.push_str(&format!(
                "  {tier}: {}/min, {}/hour, {}/day\n",
                quota.requests_per_minute, quota.requests_per_hour, quota.daily_quota
            ));
        }
    }
    // A fresh limiter snapshot confirms every configured key starts in
    // rotation.
    let limiter = RateLimiter::new(&config.limits, &tiers);
    let status = limiter.status();
    out.push_str(&format!(
        "keys in rotation: {}/{}\n",
        status.available_keys, status.total_keys
    ));
    out.push_str(&format!(
        "batch ceiling:   {} entries\n",
        config.pipeline.max_batch_entries
    ));
    out.push_str(&format!("geocoding:       {}\n", config.geocoding.endpoint));
    out.push_str(&format!("data dir:        {}\n", config.storage.data_dir));
    out.push_str(&format!(
        "registration:    {} users{}\n",
        config.directory.users.len(),
        config
            .directory
            .default_company
            .as_deref()
            .map(|c| format!(" (default company: {c})"))
            .unwrap_or_default()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_missing_token() {
        let report = report(&FieldlogConfig::default());
        assert!(report.contains("telegram token:  MISSING"));
        assert!(report.contains("gemini keys:     0 configured"));
    }

    #[test]
    fn report_lists_configured_key_quotas() {
        let config = fieldlog_config::load_and_validate_str(
            r#"
[gemini]
primary_api_key = "k1"
"#,
        )
        .unwrap();
        let report = report(&config);
        assert!(report.contains("primary: 12/min, 500/hour, 1000/day"));
        assert!(!report.contains("secondary:"));
        assert!(report.contains("keys in rotation: 1/1"));
    }
}
