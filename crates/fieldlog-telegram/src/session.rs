// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation state.
//!
//! Telegram gives us no session; the bot remembers, per user, which log
//! mode (/sales or /purchase) is active and the last GPS-derived address.
//! State is in-memory only and resets with the process.

use std::collections::HashMap;
use std::sync::Mutex;

use fieldlog_core::{EntryType, UserId};

#[derive(Debug, Default, Clone)]
struct Session {
    entry_type: Option<EntryType>,
    gps_location: Option<String>,
}

/// Thread-safe per-user session map.
#[derive(Debug, Default)]
pub struct Sessions {
    inner: Mutex<HashMap<UserId, Session>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch a user into sales or purchase logging mode.
    pub fn set_entry_type(&self, user: UserId, entry_type: EntryType) {
        self.inner
            .lock()
            .unwrap()
            .entry(user)
            .or_default()
            .entry_type = Some(entry_type);
    }

    /// The user's active logging mode, if they chose one.
    pub fn entry_type(&self, user: UserId) -> Option<EntryType> {
        self.inner
            .lock()
            .unwrap()
            .get(&user)
            .and_then(|s| s.entry_type)
    }

    /// Remember the user's last GPS-derived address.
    pub fn set_gps_location(&self, user: UserId, address: String) {
        self.inner
            .lock()
            .unwrap()
            .entry(user)
            .or_default()
            .gps_location = Some(address);
    }

    /// The user's last GPS-derived address, if they shared a location.
    pub fn gps_location(&self, user: UserId) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .get(&user)
            .and_then(|s| s.gps_location.clone())
    }
}
