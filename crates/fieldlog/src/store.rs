// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSONL-backed entry store.
//!
//! Each company partition appends to its own `<partition>.jsonl` file, one
//! JSON array of columns per line. The production deployment points the
//! store at a synced directory; the contract is the same append-only one
//! the spreadsheet backend honors.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use fieldlog_core::EntryStore;
use tracing::{error, warn};

/// Append-only row store writing one JSON line per entry.
pub struct JsonlStore {
    dir: PathBuf,
}

impl JsonlStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn partition_path(&self, partition: &str) -> Option<PathBuf> {
        // Partition names come from config; keep them path-safe anyway.
        if partition.is_empty()
            || partition
                .chars()
                .any(|c| !(c.is_alphanumeric() || c == '-' || c == '_'))
        {
            warn!(partition, "refusing unsafe partition name");
            return None;
        }
        Some(self.dir.join(format!("{partition}.jsonl")))
    }
}

#[async_trait]
impl EntryStore for JsonlStore {
    async fn append(&self, row: Vec<String>, partition: &str) -> bool {
        let Some(path) = self.partition_path(partition) else {
            return false;
        };
        let line = match serde_json::to_string(&row) {
            Ok(line) => line,
            Err(err) => {
                error!(%err, "failed to serialize row");
                return false;
            }
        };

        let result = (|| -> std::io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            writeln!(file, "{line}")?;
            Ok(())
        })();

        match result {
            Ok(()) => true,
            Err(err) => {
                error!(%err, path = %path.display(), "failed to append row");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rows_append_per_partition() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path());

        assert!(store.append(vec!["a".into(), "1".into()], "acme").await);
        assert!(store.append(vec!["b".into(), "2".into()], "acme").await);
        assert!(store.append(vec!["c".into(), "3".into()], "globex").await);

        let acme = std::fs::read_to_string(dir.path().join("acme.jsonl")).unwrap();
        let lines: Vec<&str> = acme.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Vec<String> = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, vec!["a", "1"]);

        let globex = std::fs::read_to_string(dir.path().join("globex.jsonl")).unwrap();
        assert_eq!(globex.lines().count(), 1);
    }

    #[tokio::test]
    async fn unsafe_partition_names_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path());
        assert!(!store.append(vec!["a".into()], "../escape").await);
        assert!(!store.append(vec!["a".into()], "").await);
    }
}
