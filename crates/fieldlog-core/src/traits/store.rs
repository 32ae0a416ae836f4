// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only persistence trait.

use async_trait::async_trait;

/// An append-only keyed row store (per-company spreadsheets in production).
///
/// The caller supplies a fully-formed row; the store never inspects field
/// meaning. A failed append returns `false` rather than an error — callers
/// report the miss per entry and keep going.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn append(&self, row: Vec<String>, partition: &str) -> bool;
}
