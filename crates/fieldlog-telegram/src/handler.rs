// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram message handling.
//!
//! The channel layer stays thin: extract who said what, keep per-user
//! session state, and hand the text to the pipeline. All interpretation
//! lives in `fieldlog-pipeline` and below.

use std::sync::Arc;

use fieldlog_core::{CompanyDirectory, EntryType, Geocoder, UserId};
use fieldlog_geocode::coordinate_fallback;
use fieldlog_intake::{Intent, detect_intent};
use fieldlog_pipeline::{BatchProcessor, MessagePipeline, UserContext, detect_batch_input};
use teloxide::Bot;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt};
use teloxide::dptree;
use teloxide::prelude::{Dispatcher, Requester, ResponseResult, Update};
use teloxide::types::{Message, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::format;
use crate::session::Sessions;

/// Bot commands. Everything else arrives as plain text.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Show the menu.
    Start,
    /// Switch to logging sales entries.
    Sales,
    /// Switch to logging purchase entries.
    Purchase,
}

/// Everything a handler invocation needs, shared across updates.
pub struct BotContext {
    pub pipeline: MessagePipeline,
    pub batch: BatchProcessor,
    pub geocoder: Arc<dyn Geocoder>,
    pub directory: Arc<dyn CompanyDirectory>,
    pub sessions: Sessions,
}

/// Run the long-polling dispatcher until shutdown.
pub async fn run(bot: Bot, ctx: Arc<BotContext>) {
    info!("starting Telegram long polling");
    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<BotContext>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = UserId(user.id.0);

    let reply = match cmd {
        Command::Start => format::greeting_menu(),
        Command::Sales => {
            ctx.sessions.set_entry_type(user_id, EntryType::Sales);
            "Sales mode on. Send your entries as text.".to_string()
        }
        Command::Purchase => {
            ctx.sessions.set_entry_type(user_id, EntryType::Purchase);
            "Purchase mode on. Send your entries as text.".to_string()
        }
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = UserId(user.id.0);

    // Location shares update the session; the next entries carry the fix.
    if let Some(location) = msg.location() {
        let reply = remember_location(&ctx, user_id, location.latitude, location.longitude).await;
        bot.send_message(msg.chat.id, reply).await?;
        return Ok(());
    }

    let Some(text) = msg.text() else {
        debug!(msg_id = msg.id.0, "ignoring unsupported message type");
        return Ok(());
    };

    if !ctx.directory.is_registered(user_id).await {
        bot.send_message(msg.chat.id, format::not_registered()).await?;
        return Ok(());
    }

    // Without an explicit mode, the message's own wording can carry the
    // intent ("sold ..." / "bought ...").
    let entry_type = match ctx.sessions.entry_type(user_id) {
        Some(entry_type) => entry_type,
        None => match detect_intent(text) {
            Intent::SalesEntry => EntryType::Sales,
            Intent::PurchaseEntry => EntryType::Purchase,
            Intent::Unknown => {
                bot.send_message(msg.chat.id, format::choose_type_prompt())
                    .await?;
                return Ok(());
            }
        },
    };

    let company = match ctx.directory.company_of(user_id).await {
        Some(company) => company,
        None => {
            bot.send_message(msg.chat.id, format::not_registered()).await?;
            return Ok(());
        }
    };

    let user_ctx = UserContext {
        user_id,
        full_name: user.full_name(),
        company,
        gps_location: ctx.sessions.gps_location(user_id),
    };

    let reply = if detect_batch_input(text) {
        let result = ctx.batch.process_batch(text, entry_type, &user_ctx).await;
        format::batch_report(&result)
    } else {
        let outcome = ctx
            .pipeline
            .process_message(text, entry_type, &user_ctx)
            .await;
        format::render_outcome(&user_ctx.full_name, &outcome)
    };

    send_markdown(&bot, &msg, &reply).await
}

/// Send as legacy Markdown, falling back to plain text when the content
/// breaks entity parsing.
async fn send_markdown(bot: &Bot, msg: &Message, text: &str) -> ResponseResult<()> {
    use teloxide::payloads::SendMessageSetters;
    match bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Markdown)
        .await
    {
        Ok(_) => Ok(()),
        Err(err) => {
            warn!(%err, "Markdown send failed, retrying as plain text");
            bot.send_message(msg.chat.id, text).await?;
            Ok(())
        }
    }
}

/// Reverse-geocode a shared location and stash it in the session.
async fn remember_location(
    ctx: &BotContext,
    user_id: UserId,
    latitude: f64,
    longitude: f64,
) -> String {
    let address = match ctx.geocoder.reverse(latitude, longitude).await {
        Some(fix) => {
            debug!(accuracy = %fix.accuracy, "location resolved");
            fix.short_address
        }
        None => coordinate_fallback(latitude, longitude),
    };
    ctx.sessions.set_gps_location(user_id, address.clone());
    format::location_saved(&address)
}
