// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single-message pipeline.
//!
//! classify -> structured parse -> AI fallback -> validate -> persist.
//! The structured parser goes first because it is free and deterministic;
//! its failure is what licenses spending an API call.

use std::sync::Arc;

use chrono::Utc;
use fieldlog_core::{EntryStore, EntryType, ValidatedEntry};
use fieldlog_gemini::{ExtractorPool, PoolError};
use fieldlog_intake::{
    ClassificationResult, InputClassifier, NameNormalizer, parse_structured, validate_entry,
};
use tracing::{debug, info, warn};

use crate::row::{UserContext, build_row, single_entry_id};

/// Outcome of processing one single-entry message. Rendering to user
/// text is the channel layer's job.
#[derive(Debug)]
pub enum MessageOutcome {
    /// The classifier turned the message away; `classification` carries
    /// the reason and ready-made guidance text.
    Rejected { classification: ClassificationResult },
    /// Neither parser produced a usable record.
    ParseFailed,
    /// Every configured key sat in a quota window for the whole wait.
    AllKeysRateLimited,
    /// The record was parsed and validated but the store refused the row.
    SaveFailed,
    /// The entry is in the sheet.
    Logged {
        entry_id: String,
        entry: ValidatedEntry,
        warnings: Vec<String>,
        /// False when the structured template matched and no API call
        /// was spent.
        used_ai: bool,
    },
}

/// Classify, parse, validate, and persist one message.
pub struct MessagePipeline {
    classifier: InputClassifier,
    normalizer: NameNormalizer,
    pool: Arc<ExtractorPool>,
    store: Arc<dyn EntryStore>,
}

impl MessagePipeline {
    pub fn new(
        classifier: InputClassifier,
        pool: Arc<ExtractorPool>,
        store: Arc<dyn EntryStore>,
    ) -> Self {
        Self {
            classifier,
            normalizer: NameNormalizer::new(),
            pool,
            store,
        }
    }

    pub async fn process_message(
        &self,
        text: &str,
        entry_type: EntryType,
        user: &UserContext,
    ) -> MessageOutcome {
        let classification = self.classifier.classify(text);
        if !classification.is_valid {
            return MessageOutcome::Rejected { classification };
        }

        // Free path first.
        let (candidate, used_ai) = match parse_structured(text) {
            Ok(candidate) => {
                debug!("structured template matched, no AI call needed");
                (Some(candidate), false)
            }
            Err(parse_err) => {
                debug!(%parse_err, "structured parse missed, falling back to AI");
                match self.pool.extract(text).await {
                    Ok(candidate) => (candidate, true),
                    Err(PoolError::AllKeysRateLimited) => {
                        warn!("message dropped: all keys rate limited");
                        return MessageOutcome::AllKeysRateLimited;
                    }
                }
            }
        };

        let mut candidate = match candidate {
            Some(candidate) if candidate.is_usable() => candidate,
            _ => return MessageOutcome::ParseFailed,
        };
        if candidate.remarks.is_none() {
            candidate.remarks = Some(text.to_string());
        }

        let (entry, warnings) = validate_entry(&candidate, entry_type, Utc::now());
        let entry_id = single_entry_id();
        let row = build_row(&entry_id, &entry, user, &self.normalizer);
        if !self.store.append(row, &user.company).await {
            warn!(entry_id, "store rejected entry row");
            return MessageOutcome::SaveFailed;
        }

        info!(
            entry_id,
            client = %entry.client,
            amount = entry.amount,
            used_ai,
            "entry logged"
        );
        MessageOutcome::Logged {
            entry_id,
            entry,
            warnings,
            used_ai,
        }
    }
}
