// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring and startup for the `serve` subcommand.
//!
//! Everything is constructed here and injected by handle: the rate
//! limiter into the pool, the pool into both pipelines, the pipelines
//! into the Telegram handler. No component reaches for globals.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use fieldlog_config::FieldlogConfig;
use fieldlog_core::{CompanyDirectory, EntryStore, FieldlogError, Geocoder, LlmProvider};
use fieldlog_gemini::{ExtractorPool, GeminiClient};
use fieldlog_geocode::NominatimClient;
use fieldlog_intake::{ClassifierLimits, InputClassifier};
use fieldlog_pipeline::{BatchProcessor, MessagePipeline};
use fieldlog_ratelimit::{KeyTier, RateLimiter};
use fieldlog_telegram::{BotContext, Sessions};
use teloxide::Bot;
use tracing::info;

use crate::directory::StaticDirectory;
use crate::store::JsonlStore;

/// Build the full bot context from configuration.
pub fn build_context(config: &FieldlogConfig) -> Result<BotContext, FieldlogError> {
    let mut providers: BTreeMap<KeyTier, Arc<dyn LlmProvider>> = BTreeMap::new();
    for (tier, key) in [
        (KeyTier::Primary, &config.gemini.primary_api_key),
        (KeyTier::Secondary, &config.gemini.secondary_api_key),
        (KeyTier::Tertiary, &config.gemini.tertiary_api_key),
    ] {
        if let Some(key) = key {
            let client = GeminiClient::new(key, &config.gemini.model)?;
            providers.insert(tier, Arc::new(client));
        }
    }
    if providers.is_empty() {
        return Err(FieldlogError::Config(
            "no Gemini API key configured; set gemini.primary_api_key".into(),
        ));
    }
    let tiers: Vec<KeyTier> = providers.keys().copied().collect();
    info!(keys = tiers.len(), model = %config.gemini.model, "providers ready");

    let limiter = Arc::new(RateLimiter::new(&config.limits, &tiers));
    let pool = Arc::new(ExtractorPool::new(
        providers,
        limiter,
        Duration::from_secs(config.pipeline.extraction_timeout_secs),
        Duration::from_secs(config.pipeline.key_wait_secs),
    ));

    let limits = ClassifierLimits {
        min_chars: config.pipeline.min_message_chars,
        max_chars: config.pipeline.max_message_chars,
    };
    let store: Arc<dyn EntryStore> = Arc::new(JsonlStore::new(&config.storage.data_dir));
    let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimClient::new(&config.geocoding)?);
    let directory: Arc<dyn CompanyDirectory> =
        Arc::new(StaticDirectory::from_config(&config.directory));

    let pipeline = MessagePipeline::new(
        InputClassifier::new(limits),
        Arc::clone(&pool),
        Arc::clone(&store),
    );
    let batch = BatchProcessor::new(
        InputClassifier::new(limits),
        pool,
        store,
        config.pipeline.max_batch_entries,
    );

    Ok(BotContext {
        pipeline,
        batch,
        geocoder,
        directory,
        sessions: Sessions::new(),
    })
}

/// Run the bot until shutdown.
pub async fn serve(config: FieldlogConfig) -> Result<(), FieldlogError> {
    let token = config.telegram.bot_token.clone().ok_or_else(|| {
        FieldlogError::Config("telegram.bot_token is required to serve".into())
    })?;

    let context = Arc::new(build_context(&config)?);
    let bot = Bot::new(token);
    info!(bot = %config.bot.name, "fieldlog serving");
    fieldlog_telegram::run(bot, context).await;
    Ok(())
}
