//! # Joke Courier
//!
//! A scheduled notifier that posts a joke, the current weather for two
//! cities and a temperature-themed GIF to a Discord-style webhook, plus a
//! tiny HTTP endpoint that serves random jokes from the same dataset.
//!
//! ## Usage
//!
//! ```sh
//! DISCORD_WEBHOOK=https://discord.com/api/webhooks/... joke_courier send
//! joke_courier serve --port 3000
//! ```
//!
//! ## Architecture
//!
//! `send` runs one pass and exits:
//! 1. **Configuration**: webhook secret (required), data assets
//! 2. **Dataset**: load and validate the joke file
//! 3. **Enrichment**: weather for both cities at once, then a GIF for the
//!    temperature tag; both degrade instead of failing
//! 4. **Delivery**: one POST; any failure exits with status 1
//!
//! `serve` loads the dataset once and answers from memory.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod content;
mod dispatch;
mod gif;
mod jokes;
mod message;
mod models;
mod retry;
mod server;
mod utils;
mod weather;

use cli::{Cli, Command, SendArgs};
use config::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();

    match args.command {
        Command::Send(send) => run_send(send).await,
        Command::Serve(serve) => {
            if let Err(e) = server::serve(&serve.dataset, serve.port).await {
                error!(error = %e, "Joke endpoint stopped");
                return Err(e.into());
            }
            Ok(())
        }
    }
}

async fn run_send(args: SendArgs) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();
    info!("joke_courier send starting up");

    let settings = match Settings::resolve(&args).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Configuration error; aborting");
            return Err(e.into());
        }
    };

    match dispatch::run_once(&settings, Utc::now()).await {
        Ok(report) => {
            let elapsed = start_time.elapsed();
            info!(
                turn = %report.turn,
                band = %report.band,
                tag = report.tag,
                status = %report.status,
                ?elapsed,
                "Execution complete"
            );
            debug!(payload = ?report.payload, "Delivered payload");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Dispatch failed");
            Err(e.into())
        }
    }
}
