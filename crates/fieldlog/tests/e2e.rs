// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests over mock collaborators.
//!
//! Exercises the full classify -> parse -> extract -> validate -> persist
//! path with the scripted provider and in-memory store, the same wiring
//! `serve` builds with real backends.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use fieldlog_config::LimitsConfig;
use fieldlog_core::{EntryType, LlmProvider, UserId};
use fieldlog_gemini::ExtractorPool;
use fieldlog_intake::InputClassifier;
use fieldlog_pipeline::{
    BatchProcessor, MessageOutcome, MessagePipeline, UserContext,
};
use fieldlog_ratelimit::{KeyTier, RateLimiter};
use fieldlog_test_utils::{MemoryStore, MockProvider};

fn wiring(provider: Arc<MockProvider>) -> (MessagePipeline, BatchProcessor, Arc<MemoryStore>) {
    let limiter = Arc::new(RateLimiter::new(
        &LimitsConfig::default(),
        &[KeyTier::Primary],
    ));
    let mut providers: BTreeMap<KeyTier, Arc<dyn LlmProvider>> = BTreeMap::new();
    providers.insert(KeyTier::Primary, provider);
    let pool = Arc::new(ExtractorPool::new(
        providers,
        limiter,
        Duration::from_secs(20),
        Duration::from_secs(5),
    ));
    let store = Arc::new(MemoryStore::new());
    let pipeline = MessagePipeline::new(
        InputClassifier::default(),
        Arc::clone(&pool),
        store.clone(),
    );
    let batch = BatchProcessor::new(InputClassifier::default(), pool, store.clone(), 10);
    (pipeline, batch, store)
}

fn user() -> UserContext {
    UserContext {
        user_id: UserId(42),
        full_name: "Asha Patel".into(),
        company: "acme-pharma".into(),
        gps_location: Some("Chembur, Mumbai".into()),
    }
}

#[tokio::test]
async fn structured_message_is_logged_without_any_ai_call() {
    let provider = Arc::new(MockProvider::new());
    let (pipeline, _, store) = wiring(provider.clone());

    let text = "Client: Apollo Pharmacy\nLocation: Mumbai\nOrders: 10 tablets + 5 injections\nAmount: ₹15,000\nRemarks: urgent";
    let outcome = pipeline.process_message(text, EntryType::Sales, &user()).await;

    let MessageOutcome::Logged { entry, used_ai, .. } = outcome else {
        panic!("expected Logged");
    };
    assert!(!used_ai);
    assert_eq!(entry.client, "Apollo Pharmacy");
    assert_eq!(entry.orders, 15);
    assert_eq!(entry.amount, 15000);
    assert_eq!(provider.call_count(), 0);

    let rows = store.rows("acme-pharma");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.len(), 15);
    assert_eq!(row[3], "Sales");
    // Canonical names in the sheet, raw names in the confirmation.
    assert_eq!(row[4], "apollo");
    assert_eq!(row[14], "Chembur, Mumbai");
}

#[tokio::test]
async fn free_text_takes_the_ai_path() {
    let provider = Arc::new(MockProvider::with_responses(vec![
        r#"{"client": "Medico", "location": "Pune", "orders": 5, "amount": 11000, "remarks": null}"#
            .to_string(),
    ]));
    let (pipeline, _, store) = wiring(provider.clone());

    let text = "Sold 5 units to Medico in Pune for 11000";
    let outcome = pipeline
        .process_message(text, EntryType::Purchase, &user())
        .await;

    let MessageOutcome::Logged { entry, used_ai, .. } = outcome else {
        panic!("expected Logged");
    };
    assert!(used_ai);
    assert_eq!(entry.client, "Medico");
    assert_eq!(entry.remarks, text);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(store.row_count(), 1);
}

#[tokio::test]
async fn short_input_is_rejected_before_the_provider() {
    let provider = Arc::new(MockProvider::new());
    let (pipeline, _, store) = wiring(provider.clone());

    let outcome = pipeline.process_message("ok", EntryType::Sales, &user()).await;
    let MessageOutcome::Rejected { classification } = outcome else {
        panic!("expected Rejected");
    };
    assert_eq!(
        classification.reason,
        fieldlog_intake::ClassifyReason::TooShort
    );
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn batch_message_saves_entries_in_message_order() {
    let provider = Arc::new(MockProvider::with_responses(vec![
        r#"{"client": "Medico", "location": null, "orders": 5, "amount": 11000, "remarks": null}"#
            .to_string(),
        r#"{"client": "Zenith", "location": null, "orders": 2, "amount": 4200, "remarks": null}"#
            .to_string(),
    ]));
    let (_, batch, store) = wiring(provider.clone());

    let result = batch
        .process_batch(
            "Sold 5 units to Medico for 11000\n\nSold 2 units to Zenith for 4200",
            EntryType::Sales,
            &user(),
        )
        .await;

    assert_eq!(result.total, 2);
    assert_eq!(result.processed, 2);
    assert_eq!(result.failed, 0);
    // Single key: sequential dispatch keeps the scripted order aligned.
    assert!(!result.used_parallel_processing);
    assert_eq!(result.saved_entries[0].entry.client, "Medico");
    assert_eq!(result.saved_entries[1].entry.client, "Zenith");
    assert_eq!(store.rows("acme-pharma").len(), 2);
}

#[tokio::test]
async fn oversized_batch_is_rejected_whole() {
    let provider = Arc::new(MockProvider::new());
    let (_, batch, store) = wiring(provider.clone());

    let text = (1..=11)
        .map(|i| format!("Sold {i} units to Medico for 1000{i}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let result = batch.process_batch(&text, EntryType::Sales, &user()).await;

    assert_eq!(result.processed, 0);
    assert_eq!(result.failed, 11);
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn mixed_batch_reports_per_entry_reasons() {
    let provider = Arc::new(MockProvider::with_responses(vec![
        r#"{"client": "Medico", "location": null, "orders": 5, "amount": 11000, "remarks": null}"#
            .to_string(),
    ]));
    let (_, batch, _) = wiring(provider.clone());

    let result = batch
        .process_batch(
            "Sold 5 units to Medico for 11000\n\nhello how are you today",
            EntryType::Sales,
            &user(),
        )
        .await;

    assert_eq!(result.processed, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(result.failed_entries[0].reason, "casual_conversation");
    assert_eq!(provider.call_count(), 1);
}
