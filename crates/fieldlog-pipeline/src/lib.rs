// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message and batch processing pipelines for the Fieldlog bot.
//!
//! [`MessagePipeline`] handles one entry per message; [`BatchProcessor`]
//! splits multi-entry messages and fans extraction out across the key
//! pool while preserving original message order in its results.

pub mod batch;
pub mod pipeline;
pub mod row;
pub mod split;

pub use batch::{BatchProcessor, BatchResult, FailedEntry, SavedEntry};
pub use pipeline::{MessageOutcome, MessagePipeline};
pub use row::{UserContext, batch_entry_id, build_row, single_entry_id};
pub use split::{detect_batch_input, split_entries};
