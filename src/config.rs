//! Runtime settings and static data assets.
//!
//! Two YAML assets ship inside the binary and can be replaced by path:
//!
//! - `data/weather_codes.yaml`: WMO code → day/night description and icon
//! - `data/greetings.yaml`: phrase pool for the message title
//!
//! [`Settings::resolve`] turns parsed [`SendArgs`] into everything a
//! dispatch run needs, checking the required webhook before anything else.

use crate::cli::SendArgs;
use crate::models::City;
use crate::retry::RetryPolicy;
use itertools::Itertools;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

const EMBEDDED_WEATHER_CODES: &str = include_str!("../data/weather_codes.yaml");
const EMBEDDED_GREETINGS: &str = include_str!("../data/greetings.yaml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DISCORD_WEBHOOK is not set")]
    MissingWebhook,

    #[error("invalid URL for {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("could not read {path}: {source}")]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {name}: {reason}")]
    Asset { name: &'static str, reason: String },
}

/// One half (day or night) of a weather code entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeEntry {
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DayNight {
    day: CodeEntry,
    night: CodeEntry,
}

/// Read-only lookup from weather code and day flag to a description.
#[derive(Debug, Clone)]
pub struct WeatherCodeTable {
    entries: HashMap<String, DayNight>,
}

impl WeatherCodeTable {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let entries: HashMap<String, DayNight> =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Asset {
                name: "weather code table",
                reason: e.to_string(),
            })?;
        Ok(Self { entries })
    }

    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml(EMBEDDED_WEATHER_CODES)
    }

    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_yaml(&read_asset(path).await?),
            None => Self::embedded(),
        }
    }

    pub fn lookup(&self, code: &str, is_day: bool) -> Option<&CodeEntry> {
        self.entries
            .get(code)
            .map(|entry| if is_day { &entry.day } else { &entry.night })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Deserialize)]
struct GreetingFile {
    phrases: Vec<String>,
}

/// Deduplicated, non-empty pool of title phrases.
#[derive(Debug, Clone)]
pub struct GreetingPool {
    phrases: Vec<String>,
}

impl GreetingPool {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let file: GreetingFile = serde_yaml::from_str(text).map_err(|e| ConfigError::Asset {
            name: "greeting pool",
            reason: e.to_string(),
        })?;
        Self::new(file.phrases)
    }

    pub fn new(phrases: Vec<String>) -> Result<Self, ConfigError> {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unique()
            .collect();
        if phrases.is_empty() {
            return Err(ConfigError::Asset {
                name: "greeting pool",
                reason: "no phrases".to_string(),
            });
        }
        Ok(Self { phrases })
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml(EMBEDDED_GREETINGS)
    }

    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_yaml(&read_asset(path).await?),
            None => Self::embedded(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Uniform draw; repeats across runs are fine.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.phrases
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

async fn read_asset(path: &Path) -> Result<String, ConfigError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::AssetRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Everything one `send` run needs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dataset: PathBuf,
    pub webhook_url: Url,
    pub weather_url: Url,
    pub giphy_url: Url,
    pub giphy_api_key: Option<String>,
    pub gif_rating: String,
    /// First city drives the GIF tag.
    pub cities: [City; 2],
    pub weather_policy: RetryPolicy,
    pub codes: Arc<WeatherCodeTable>,
    pub greetings: Arc<GreetingPool>,
}

impl Settings {
    /// Validate arguments and load data assets.
    ///
    /// The webhook is checked first so a misconfigured run fails before any
    /// file or network access.
    #[instrument(level = "info", skip_all)]
    pub async fn resolve(args: &SendArgs) -> Result<Self, ConfigError> {
        let webhook = args
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingWebhook)?;
        let webhook_url = parse_url("webhook URL", webhook)?;
        let weather_url = parse_url("weather API URL", &args.weather_url)?;
        let giphy_url = parse_url("GIF API URL", &args.giphy_url)?;

        let codes = WeatherCodeTable::load(args.weather_codes.as_deref()).await?;
        let greetings = GreetingPool::load(args.greetings.as_deref()).await?;
        info!(
            weather_codes = codes.len(),
            greetings = greetings.phrases().len(),
            "Loaded data assets"
        );

        let mut weather_policy = RetryPolicy::weather();
        if args.no_jitter {
            weather_policy.jitter_ms = 0..=0;
        }

        let giphy_api_key = args
            .giphy_api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            dataset: args.dataset.clone(),
            webhook_url,
            weather_url,
            giphy_url,
            giphy_api_key,
            gif_rating: args.gif_rating.clone(),
            cities: [City::posadas(), City::buenos_aires()],
            weather_policy,
            codes: Arc::new(codes),
            greetings: Arc::new(greetings),
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send_args(webhook: Option<&str>) -> SendArgs {
        SendArgs {
            dataset: PathBuf::from("data/jokes.csv"),
            webhook_url: webhook.map(str::to_string),
            giphy_api_key: Some("   ".to_string()),
            gif_rating: "g".to_string(),
            weather_url: "https://api.open-meteo.com".to_string(),
            giphy_url: "https://api.giphy.com".to_string(),
            weather_codes: None,
            greetings: None,
            no_jitter: true,
        }
    }

    #[test]
    fn test_embedded_code_table_day_and_night() {
        let table = WeatherCodeTable::embedded().unwrap();
        assert_eq!(table.lookup("0", true).unwrap().description, "Soleado");
        assert_eq!(table.lookup("0", false).unwrap().description, "Despejado");
        assert_eq!(table.lookup("95", true).unwrap().image.as_deref(), Some("thunderstorm"));
        assert!(table.lookup("1234", true).is_none());
    }

    #[test]
    fn test_code_table_image_optional() {
        let yaml = r#"
"7":
  day:
    description: "Humo"
  night:
    description: "Humo nocturno"
"#;
        let table = WeatherCodeTable::from_yaml(yaml).unwrap();
        let entry = table.lookup("7", false).unwrap();
        assert_eq!(entry.description, "Humo nocturno");
        assert_eq!(entry.image, None);
    }

    #[test]
    fn test_malformed_code_table() {
        let err = WeatherCodeTable::from_yaml("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, ConfigError::Asset { .. }));
    }

    #[test]
    fn test_greeting_pool_dedupes() {
        let pool = GreetingPool::new(vec![
            "Hola".to_string(),
            " Hola ".to_string(),
            "".to_string(),
            "Chau".to_string(),
        ])
        .unwrap();
        assert_eq!(pool.phrases(), ["Hola".to_string(), "Chau".to_string()]);
    }

    #[test]
    fn test_greeting_pool_rejects_empty() {
        assert!(GreetingPool::from_yaml("phrases: []\n").is_err());
    }

    #[test]
    fn test_embedded_greetings_load() {
        let pool = GreetingPool::embedded().unwrap();
        assert!(!pool.phrases().is_empty());
        let picked = pool.pick(&mut rand::rng()).to_string();
        assert!(pool.phrases().contains(&picked));
    }

    #[tokio::test]
    async fn test_resolve_requires_webhook() {
        let err = Settings::resolve(&send_args(None)).await.unwrap_err();
        assert!(matches!(err, ConfigError::MissingWebhook));

        let err = Settings::resolve(&send_args(Some("  "))).await.unwrap_err();
        assert!(matches!(err, ConfigError::MissingWebhook));
    }

    #[tokio::test]
    async fn test_resolve_defaults() {
        let settings = Settings::resolve(&send_args(Some("https://example.com/hook")))
            .await
            .unwrap();
        assert_eq!(settings.webhook_url.as_str(), "https://example.com/hook");
        assert_eq!(settings.giphy_api_key, None);
        assert_eq!(settings.cities[0].name, "Posadas");
        assert_eq!(settings.weather_policy.max_attempts, 2);
        assert_eq!(settings.weather_policy.jitter(), std::time::Duration::ZERO);
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_webhook_url() {
        let err = Settings::resolve(&send_args(Some("not a url"))).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
