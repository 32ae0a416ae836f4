// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fieldlog - a Telegram bot for logging field sales and purchase entries.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod directory;
mod doctor;
mod serve;
mod store;

/// Fieldlog - log sales and purchases from the field via Telegram.
#[derive(Parser, Debug)]
#[command(name = "fieldlog", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Check configuration and report readiness.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match fieldlog_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            fieldlog_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.bot.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(err) = serve::serve(config).await {
                eprintln!("fieldlog: {err}");
                std::process::exit(1);
            }
        }
        Some(Commands::Doctor) => {
            print!("{}", doctor::report(&config));
        }
        None => {
            println!("fieldlog: use --help for available commands");
        }
    }
}
