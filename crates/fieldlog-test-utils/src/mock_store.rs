// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory entry store for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use fieldlog_core::EntryStore;

/// Append-only store backed by a per-partition map, with a switch to
/// simulate persistence failures.
pub struct MemoryStore {
    partitions: Mutex<HashMap<String, Vec<Vec<String>>>>,
    accept: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            partitions: Mutex::new(HashMap::new()),
            accept: AtomicBool::new(true),
        }
    }

    /// Make subsequent appends fail (return `false`).
    pub fn reject_appends(&self) {
        self.accept.store(false, Ordering::SeqCst);
    }

    /// Rows appended to one partition, in order.
    pub fn rows(&self, partition: &str) -> Vec<Vec<String>> {
        self.partitions
            .lock()
            .unwrap()
            .get(partition)
            .cloned()
            .unwrap_or_default()
    }

    /// Total rows across all partitions.
    pub fn row_count(&self) -> usize {
        self.partitions.lock().unwrap().values().map(Vec::len).sum()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn append(&self, row: Vec<String>, partition: &str) -> bool {
        if !self.accept.load(Ordering::SeqCst) {
            return false;
        }
        self.partitions
            .lock()
            .unwrap()
            .entry(partition.to_string())
            .or_default()
            .push(row);
        true
    }
}
