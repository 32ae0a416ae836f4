// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parallel batch orchestration.
//!
//! A multi-entry message is split, every candidate is pre-screened by the
//! classifier (so junk never burns an API call), survivors are extracted
//! concurrently across the key pool, and results are reassembled in
//! original message order no matter when each extraction finishes.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fieldlog_core::{EntryStore, EntryType, ValidatedEntry};
use fieldlog_gemini::{ExtractorPool, PoolError};
use fieldlog_intake::{InputClassifier, NameNormalizer, validate_entry};
use futures::future::join_all;
use tracing::{info, warn};

use crate::row::{UserContext, batch_entry_id, build_row};
use crate::split::split_entries;

/// Reason tag for entries the extractor could not turn into a usable record.
const REASON_PARSING_FAILED: &str = "parsing_failed";

/// Reason tag applied to every entry of an oversized batch.
const REASON_BATCH_LIMIT: &str = "batch_limit_exceeded";

/// Reason tag when every key sat in a quota window for the whole wait.
const REASON_ALL_KEYS_LIMITED: &str = "all_keys_rate_limited";

/// One successfully stored entry.
#[derive(Debug, Clone)]
pub struct SavedEntry {
    pub entry_id: String,
    pub entry: ValidatedEntry,
    pub warnings: Vec<String>,
    pub original_text: String,
    /// 1-based position in the original message.
    pub index: usize,
}

/// One entry that did not make it, and why.
#[derive(Debug, Clone)]
pub struct FailedEntry {
    pub text: String,
    pub reason: String,
    /// 1-based position in the original message.
    pub index: usize,
}

/// Aggregate outcome of one batch message.
#[derive(Debug)]
pub struct BatchResult {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
    pub saved_entries: Vec<SavedEntry>,
    pub failed_entries: Vec<FailedEntry>,
    /// Per-entry validation warnings, prefixed with the entry index.
    pub warnings: Vec<String>,
    pub processing_time: Duration,
    pub used_parallel_processing: bool,
}

/// Orchestrates splitting, screening, concurrent extraction, validation,
/// and persistence for multi-entry messages.
pub struct BatchProcessor {
    classifier: InputClassifier,
    normalizer: NameNormalizer,
    pool: Arc<ExtractorPool>,
    store: Arc<dyn EntryStore>,
    max_batch_entries: usize,
}

impl BatchProcessor {
    pub fn new(
        classifier: InputClassifier,
        pool: Arc<ExtractorPool>,
        store: Arc<dyn EntryStore>,
        max_batch_entries: usize,
    ) -> Self {
        Self {
            classifier,
            normalizer: NameNormalizer::new(),
            pool,
            store,
            max_batch_entries,
        }
    }

    /// Process one multi-entry message end to end.
    pub async fn process_batch(
        &self,
        raw_text: &str,
        entry_type: EntryType,
        user: &UserContext,
    ) -> BatchResult {
        let started = std::time::Instant::now();
        let candidates = split_entries(raw_text);
        let total = candidates.len();

        // Hard ceiling: no partial processing, no AI calls.
        if total > self.max_batch_entries {
            warn!(total, limit = self.max_batch_entries, "batch over size limit");
            let failed_entries: Vec<FailedEntry> = candidates
                .into_iter()
                .enumerate()
                .map(|(i, text)| FailedEntry {
                    text,
                    reason: REASON_BATCH_LIMIT.to_string(),
                    index: i + 1,
                })
                .collect();
            return BatchResult {
                processed: 0,
                failed: total,
                total,
                saved_entries: Vec::new(),
                failed_entries,
                warnings: Vec::new(),
                processing_time: started.elapsed(),
                used_parallel_processing: false,
            };
        }

        // Screen every candidate before anything touches the network.
        let mut failed_entries: Vec<FailedEntry> = Vec::new();
        let mut survivors: Vec<(usize, String)> = Vec::new();
        for (i, text) in candidates.into_iter().enumerate() {
            let classification = self.classifier.classify(&text);
            if classification.is_valid {
                survivors.push((i + 1, text));
            } else {
                failed_entries.push(FailedEntry {
                    text,
                    reason: classification.reason.to_string(),
                    index: i + 1,
                });
            }
        }

        let used_parallel = survivors.len() > 1 && self.pool.parallel_capable();
        let extracted = if used_parallel {
            self.extract_parallel(&survivors).await
        } else {
            self.extract_sequential(&survivors).await
        };

        // Reassemble in original message order; concurrent completion
        // order is meaningless to the user.
        let mut saved_entries: Vec<SavedEntry> = Vec::new();
        let batch_stamp = Utc::now();
        for ((index, text), result) in survivors.into_iter().zip(extracted) {
            match result {
                Err(PoolError::AllKeysRateLimited) => {
                    failed_entries.push(FailedEntry {
                        text,
                        reason: REASON_ALL_KEYS_LIMITED.to_string(),
                        index,
                    });
                }
                Ok(candidate) if candidate.as_ref().is_some_and(|c| c.is_usable()) => {
                    let mut candidate = candidate.expect("checked above");
                    if candidate.remarks.is_none() {
                        candidate.remarks = Some(text.clone());
                    }
                    let (entry, warnings) = validate_entry(&candidate, entry_type, batch_stamp);
                    let entry_id = batch_entry_id(batch_stamp, index);
                    let row = build_row(&entry_id, &entry, user, &self.normalizer);
                    if self.store.append(row, &user.company).await {
                        saved_entries.push(SavedEntry {
                            entry_id,
                            entry,
                            warnings,
                            original_text: text,
                            index,
                        });
                    } else {
                        warn!(index, "store rejected batch entry");
                        failed_entries.push(FailedEntry {
                            text,
                            reason: "save_failed".to_string(),
                            index,
                        });
                    }
                }
                Ok(_) => {
                    failed_entries.push(FailedEntry {
                        text,
                        reason: REASON_PARSING_FAILED.to_string(),
                        index,
                    });
                }
            }
        }

        failed_entries.sort_by_key(|f| f.index);
        let warnings = collect_warnings(&saved_entries);
        let result = BatchResult {
            processed: saved_entries.len(),
            failed: failed_entries.len(),
            total,
            saved_entries,
            failed_entries,
            warnings,
            processing_time: started.elapsed(),
            used_parallel_processing: used_parallel,
        };
        info!(
            processed = result.processed,
            failed = result.failed,
            total = result.total,
            parallel = result.used_parallel_processing,
            "batch complete"
        );
        result
    }

    /// Extract all survivors concurrently. Each future carries its slot,
    /// so results line up with `survivors` regardless of completion order.
    async fn extract_parallel(
        &self,
        survivors: &[(usize, String)],
    ) -> Vec<Result<Option<fieldlog_core::ParsedEntry>, PoolError>> {
        let futures = survivors
            .iter()
            .map(|(_, text)| self.pool.extract(text));
        join_all(futures).await
    }

    async fn extract_sequential(
        &self,
        survivors: &[(usize, String)],
    ) -> Vec<Result<Option<fieldlog_core::ParsedEntry>, PoolError>> {
        let mut results = Vec::with_capacity(survivors.len());
        for (_, text) in survivors {
            results.push(self.pool.extract(text).await);
        }
        results
    }
}

/// Flatten per-entry warnings into user-presentable lines.
fn collect_warnings(saved: &[SavedEntry]) -> Vec<String> {
    saved
        .iter()
        .flat_map(|entry| {
            entry
                .warnings
                .iter()
                .map(move |w| format!("Entry {}: {}", entry.index, w))
        })
        .collect()
}
