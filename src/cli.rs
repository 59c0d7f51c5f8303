//! Command-line interface definitions for Joke Courier.
//!
//! Every option can be given as a flag or through the environment, so the
//! binary can run unattended from a scheduler with only secrets injected.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Joke Courier application.
///
/// # Examples
///
/// ```sh
/// # Post today's message (webhook from the environment)
/// DISCORD_WEBHOOK=https://discord.com/api/webhooks/... joke_courier send
///
/// # Serve random jokes on port 8080
/// joke_courier serve --port 8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose one message and post it to the webhook
    Send(SendArgs),
    /// Serve random jokes over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Path to the pipe-delimited joke dataset
    #[arg(short, long, env = "JOKES_PATH", default_value = "data/jokes.csv")]
    pub dataset: PathBuf,

    /// Webhook URL to post to (required)
    #[arg(long, env = "DISCORD_WEBHOOK", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Giphy API key; without it the message goes out with no GIF
    #[arg(long, env = "GIPHY_API_KEY", hide_env_values = true)]
    pub giphy_api_key: Option<String>,

    /// Content rating passed to the GIF search
    #[arg(long, env = "GIPHY_RATING", default_value = "g")]
    pub gif_rating: String,

    /// Base URL of the weather API
    #[arg(long, env = "WEATHER_API_URL", default_value = "https://api.open-meteo.com")]
    pub weather_url: String,

    /// Base URL of the GIF search API
    #[arg(long, env = "GIPHY_API_URL", default_value = "https://api.giphy.com")]
    pub giphy_url: String,

    /// Optional YAML file replacing the built-in weather code table
    #[arg(long, env = "WEATHER_CODES_PATH")]
    pub weather_codes: Option<PathBuf>,

    /// Optional YAML file replacing the built-in greeting phrases
    #[arg(long, env = "GREETINGS_PATH")]
    pub greetings: Option<PathBuf>,

    /// Skip the random pre-request delay (for manual runs)
    #[arg(long)]
    pub no_jitter: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Path to the pipe-delimited joke dataset
    #[arg(short, long, env = "JOKES_PATH", default_value = "data/jokes.csv")]
    pub dataset: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_parsing() {
        let cli = Cli::parse_from([
            "joke_courier",
            "send",
            "--dataset",
            "./jokes.csv",
            "--webhook-url",
            "https://example.com/hook",
            "--no-jitter",
        ]);

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.dataset, PathBuf::from("./jokes.csv"));
                assert_eq!(args.webhook_url.as_deref(), Some("https://example.com/hook"));
                assert_eq!(args.gif_rating, "g");
                assert!(args.no_jitter);
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn test_serve_short_flags() {
        let cli = Cli::parse_from(["joke_courier", "serve", "-d", "/tmp/jokes.csv", "-p", "8080"]);

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.dataset, PathBuf::from("/tmp/jokes.csv"));
                assert_eq!(args.port, 8080);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }
}
