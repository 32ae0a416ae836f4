// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel layer for the Fieldlog bot.
//!
//! Long polling via teloxide, per-user session state (/sales vs
//! /purchase mode, last GPS fix), and rendering of pipeline outcomes to
//! user-facing Markdown.

pub mod format;
pub mod handler;
pub mod session;

pub use handler::{BotContext, Command, run};
pub use session::Sessions;
