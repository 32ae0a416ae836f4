// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-key quota tracking, health accounting, and key selection.
//!
//! The limiter owns the only mutable state touched by concurrent
//! extraction tasks. Every read and write goes through methods that take
//! the internal lock, so counter updates are atomic with respect to
//! concurrent callers.
//!
//! Time is `tokio::time::Instant` throughout, which lets tests drive the
//! clock with `start_paused` instead of sleeping for real.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use fieldlog_config::{KeyQuota, LimitsConfig};
use serde::Serialize;
use strum::{Display, EnumString};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::kind::{TransportErrorKind, classify_transport_error, extract_retry_delay};

/// Consecutive failures after which a key is pulled from rotation.
const UNHEALTHY_AFTER: u32 = 3;

/// Named API key slots, in stable preference order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum KeyTier {
    Primary,
    Secondary,
    Tertiary,
}

impl KeyTier {
    /// All tiers, in preference order.
    pub const ALL: [KeyTier; 3] = [KeyTier::Primary, KeyTier::Secondary, KeyTier::Tertiary];
}

/// Mutable accounting for one key.
#[derive(Debug)]
struct KeySlot {
    quota: KeyQuota,
    minute_count: u32,
    hour_count: u32,
    day_count: u32,
    /// When the per-minute counter rolls over. Set on the first request of
    /// a minute, cleared lazily on the next check after it passes. The
    /// hour/day counters have no rollover; they reset only with the
    /// process (see DESIGN.md).
    reset_time: Option<Instant>,
    healthy: bool,
    consecutive_errors: u32,
    last_error: Option<String>,
    quota_exhausted: bool,
    exhausted_until: Option<Instant>,
}

impl KeySlot {
    fn new(quota: KeyQuota) -> Self {
        Self {
            quota,
            minute_count: 0,
            hour_count: 0,
            day_count: 0,
            reset_time: None,
            healthy: true,
            consecutive_errors: 0,
            last_error: None,
            quota_exhausted: false,
            exhausted_until: None,
        }
    }
}

/// Point-in-time view of one key, for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatus {
    pub tier: KeyTier,
    pub available: bool,
    pub healthy: bool,
    pub consecutive_errors: u32,
    pub minute_used: u32,
    pub minute_limit: u32,
    pub hour_used: u32,
    pub day_used: u32,
    pub quota_exhausted: bool,
    pub last_error: Option<String>,
}

/// Point-in-time view of the whole limiter.
#[derive(Debug, Clone, Serialize)]
pub struct LimiterStatus {
    pub keys: Vec<KeyStatus>,
    pub available_keys: usize,
    pub total_keys: usize,
}

/// Tracks quotas and health across the configured key set.
pub struct RateLimiter {
    slots: Mutex<BTreeMap<KeyTier, KeySlot>>,
}

impl RateLimiter {
    /// Build a limiter for the given tiers only; unconfigured keys never
    /// enter rotation.
    pub fn new(limits: &LimitsConfig, tiers: &[KeyTier]) -> Self {
        let mut slots = BTreeMap::new();
        for tier in tiers {
            let quota = match tier {
                KeyTier::Primary => limits.primary,
                KeyTier::Secondary => limits.secondary,
                KeyTier::Tertiary => limits.tertiary,
            };
            slots.insert(*tier, KeySlot::new(quota));
        }
        info!(keys = slots.len(), "rate limiter initialized");
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Whether a key can take a request right now.
    ///
    /// Performs the lazy resets as a side effect: an expired exhaustion
    /// window clears `quota_exhausted`, and a passed `reset_time` zeroes
    /// the minute counter.
    pub fn can_use_key(&self, tier: KeyTier) -> bool {
        let mut slots = self.slots.lock().unwrap();
        let Some(slot) = slots.get_mut(&tier) else {
            return false;
        };
        Self::slot_usable(tier, slot)
    }

    fn slot_usable(tier: KeyTier, slot: &mut KeySlot) -> bool {
        let now = Instant::now();

        if slot.quota_exhausted {
            match slot.exhausted_until {
                Some(until) if now < until => return false,
                _ => {
                    slot.quota_exhausted = false;
                    slot.exhausted_until = None;
                    info!(key = %tier, "quota window expired, key back in rotation");
                }
            }
        }

        if !slot.healthy {
            return false;
        }

        if slot.day_count >= slot.quota.daily_quota {
            return false;
        }

        if slot.hour_count >= slot.quota.requests_per_hour {
            return false;
        }

        if let Some(reset) = slot.reset_time
            && now > reset
        {
            slot.minute_count = 0;
            slot.reset_time = None;
        }

        slot.minute_count < slot.quota.requests_per_minute
    }

    /// Record one request against a key and update its health.
    ///
    /// Counters increment unconditionally. A success clears the error
    /// streak; a failure extends it, and quota-flavored failures open an
    /// exhaustion window sized by the provider's retry hint.
    pub fn record_request(&self, tier: KeyTier, success: bool, error_message: &str) {
        let mut slots = self.slots.lock().unwrap();
        let Some(slot) = slots.get_mut(&tier) else {
            return;
        };
        let now = Instant::now();

        slot.minute_count += 1;
        slot.hour_count += 1;
        slot.day_count += 1;
        if slot.reset_time.is_none() {
            slot.reset_time = Some(now + Duration::from_secs(60));
        }

        if success {
            slot.consecutive_errors = 0;
            slot.healthy = true;
            slot.last_error = None;
            return;
        }

        slot.consecutive_errors += 1;
        slot.last_error = Some(error_message.to_string());

        if classify_transport_error(error_message) == TransportErrorKind::QuotaExhausted {
            let delay = extract_retry_delay(error_message);
            slot.quota_exhausted = true;
            slot.exhausted_until = Some(now + delay);
            warn!(key = %tier, delay_secs = delay.as_secs(), "quota exhausted, key parked");
        }

        if slot.consecutive_errors >= UNHEALTHY_AFTER {
            slot.healthy = false;
            warn!(
                key = %tier,
                errors = slot.consecutive_errors,
                "key marked unhealthy after consecutive failures"
            );
        }
    }

    /// Keys currently able to take a request, in stable preference order.
    pub fn get_available_keys(&self) -> Vec<KeyTier> {
        let mut slots = self.slots.lock().unwrap();
        slots
            .iter_mut()
            .filter_map(|(tier, slot)| Self::slot_usable(*tier, slot).then_some(*tier))
            .collect()
    }

    /// Poll until the preferred key or any key frees up, or `max_wait`
    /// elapses. Returns `None` on timeout.
    pub async fn wait_for_available_key(
        &self,
        preferred: Option<KeyTier>,
        max_wait: Duration,
    ) -> Option<KeyTier> {
        let deadline = Instant::now() + max_wait;

        loop {
            if let Some(tier) = preferred
                && self.can_use_key(tier)
            {
                return Some(tier);
            }
            if let Some(first) = self.get_available_keys().first() {
                return Some(*first);
            }
            if Instant::now() >= deadline {
                warn!(
                    max_wait_secs = max_wait.as_secs(),
                    "timed out waiting for an available key"
                );
                return None;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }

    /// Snapshot for status reporting (`fieldlog doctor`).
    pub fn status(&self) -> LimiterStatus {
        let mut slots = self.slots.lock().unwrap();
        let keys: Vec<KeyStatus> = slots
            .iter_mut()
            .map(|(tier, slot)| {
                let available = Self::slot_usable(*tier, slot);
                KeyStatus {
                    tier: *tier,
                    available,
                    healthy: slot.healthy,
                    consecutive_errors: slot.consecutive_errors,
                    minute_used: slot.minute_count,
                    minute_limit: slot.quota.requests_per_minute,
                    hour_used: slot.hour_count,
                    day_used: slot.day_count,
                    quota_exhausted: slot.quota_exhausted,
                    last_error: slot.last_error.clone(),
                }
            })
            .collect();
        let available_keys = keys.iter().filter(|k| k.available).count();
        let total_keys = keys.len();
        LimiterStatus {
            keys,
            available_keys,
            total_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter::new(&LimitsConfig::default(), &KeyTier::ALL)
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_keys_are_available_in_preference_order() {
        let limiter = limiter();
        assert!(limiter.can_use_key(KeyTier::Primary));
        assert_eq!(
            limiter.get_available_keys(),
            vec![KeyTier::Primary, KeyTier::Secondary, KeyTier::Tertiary]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_tier_is_never_usable() {
        let limiter = RateLimiter::new(&LimitsConfig::default(), &[KeyTier::Primary]);
        assert!(!limiter.can_use_key(KeyTier::Secondary));
        assert_eq!(limiter.get_available_keys(), vec![KeyTier::Primary]);
    }

    #[tokio::test(start_paused = true)]
    async fn three_consecutive_failures_mark_unhealthy() {
        let limiter = limiter();
        for _ in 0..3 {
            limiter.record_request(KeyTier::Primary, false, "connection reset");
        }
        // Quota counters are nowhere near their ceilings; health alone
        // pulls the key.
        assert!(!limiter.can_use_key(KeyTier::Primary));
        assert!(limiter.can_use_key(KeyTier::Secondary));
    }

    #[tokio::test(start_paused = true)]
    async fn success_heals_an_error_streak() {
        let limiter = limiter();
        limiter.record_request(KeyTier::Primary, false, "boom");
        limiter.record_request(KeyTier::Primary, false, "boom");
        limiter.record_request(KeyTier::Primary, true, "");
        limiter.record_request(KeyTier::Primary, false, "boom");
        assert!(limiter.can_use_key(KeyTier::Primary));
    }

    #[tokio::test(start_paused = true)]
    async fn quota_error_opens_exhaustion_window() {
        let limiter = limiter();
        limiter.record_request(
            KeyTier::Primary,
            false,
            "429 rate limited. retry_delay { seconds: 30 }",
        );
        assert!(!limiter.can_use_key(KeyTier::Primary));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(limiter.can_use_key(KeyTier::Primary));
        assert!(!limiter.status().keys[0].quota_exhausted);
    }

    #[tokio::test(start_paused = true)]
    async fn minute_counter_rolls_over_lazily() {
        let limiter = limiter();
        let rpm = LimitsConfig::default().primary.requests_per_minute;
        for _ in 0..rpm {
            limiter.record_request(KeyTier::Primary, true, "");
        }
        assert!(!limiter.can_use_key(KeyTier::Primary));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.can_use_key(KeyTier::Primary));
    }

    #[tokio::test(start_paused = true)]
    async fn hour_counter_never_rolls_over() {
        let limiter = limiter();
        let rph = LimitsConfig::default().primary.requests_per_hour;
        for _ in 0..rph {
            limiter.record_request(KeyTier::Primary, true, "");
            // Keep the minute window clear so only the hour ceiling binds.
            tokio::time::advance(Duration::from_secs(61)).await;
        }
        assert!(!limiter.can_use_key(KeyTier::Primary));

        // Even a day later the hour counter holds; it resets only with
        // the process.
        tokio::time::advance(Duration::from_secs(86_400)).await;
        assert!(!limiter.can_use_key(KeyTier::Primary));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_preferred_key_immediately() {
        let limiter = limiter();
        let got = limiter
            .wait_for_available_key(Some(KeyTier::Secondary), Duration::from_secs(5))
            .await;
        assert_eq!(got, Some(KeyTier::Secondary));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_falls_back_to_any_available_key() {
        let limiter = limiter();
        for _ in 0..3 {
            limiter.record_request(KeyTier::Primary, false, "boom");
        }
        let got = limiter
            .wait_for_available_key(Some(KeyTier::Primary), Duration::from_secs(5))
            .await;
        assert_eq!(got, Some(KeyTier::Secondary));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_when_everything_is_parked() {
        let limiter = limiter();
        for tier in KeyTier::ALL {
            limiter.record_request(tier, false, "429 quota exceeded");
        }
        let got = limiter
            .wait_for_available_key(Some(KeyTier::Primary), Duration::from_secs(5))
            .await;
        assert_eq!(got, None);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_picks_up_key_freed_mid_wait() {
        let limiter = limiter();
        for tier in KeyTier::ALL {
            limiter.record_request(
                tier,
                false,
                "429 rate limited. retry_delay { seconds: 3 }",
            );
        }
        // Windows expire after 3 s, well inside the 10 s wait.
        let got = limiter
            .wait_for_available_key(None, Duration::from_secs(10))
            .await;
        assert_eq!(got, Some(KeyTier::Primary));
    }

    #[tokio::test(start_paused = true)]
    async fn status_reports_counters_and_availability() {
        let limiter = limiter();
        limiter.record_request(KeyTier::Primary, true, "");
        limiter.record_request(KeyTier::Primary, false, "connection reset");

        let status = limiter.status();
        assert_eq!(status.total_keys, 3);
        assert_eq!(status.available_keys, 3);

        let primary = &status.keys[0];
        assert_eq!(primary.tier, KeyTier::Primary);
        assert_eq!(primary.minute_used, 2);
        assert_eq!(primary.consecutive_errors, 1);
        assert_eq!(primary.last_error.as_deref(), Some("connection reset"));
    }
}
