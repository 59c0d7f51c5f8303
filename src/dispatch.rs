//! One dispatch run: gather content and post it to the webhook.
//!
//! # Pipeline
//!
//! 1. **Dataset**: load jokes (fatal on failure)
//! 2. **Time**: classify the injected instant into turn and greeting band
//! 3. **Weather**: both cities concurrently, each degrading on its own
//! 4. **GIF**: tag from the first city's temperature, then one lookup
//! 5. **Delivery**: compose and POST (fatal on transport error or non-2xx)

use crate::config::Settings;
use crate::content::{self, GreetingBand, Turn};
use crate::gif::GifClient;
use crate::jokes::{DatasetError, load_jokes};
use crate::message::{MessageParts, compose};
use crate::models::WebhookPayload;
use crate::utils::{http_client, truncate_for_log};
use crate::weather::WeatherClient;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info, instrument};
use url::Url;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("webhook delivery failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("webhook rejected message with status {status}")]
    Rejected { status: StatusCode },
}

/// What a successful run sent.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub turn: Turn,
    pub band: GreetingBand,
    pub tag: &'static str,
    pub status: StatusCode,
    pub payload: WebhookPayload,
}

/// POSTs payloads to a single webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookSender {
    http: Client,
    url: Url,
}

impl WebhookSender {
    pub fn new(http: Client, url: Url) -> Self {
        Self { http, url }
    }

    #[instrument(level = "info", skip_all)]
    pub async fn send(&self, payload: &WebhookPayload) -> Result<StatusCode, DispatchError> {
        let response = self
            .http
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Network error posting to webhook");
                DispatchError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                %status,
                response_preview = %truncate_for_log(&body, 300),
                "Webhook rejected message"
            );
            return Err(DispatchError::Rejected { status });
        }

        info!(%status, "Message delivered");
        Ok(status)
    }
}

/// Run the whole pipeline once for the instant `now`.
#[instrument(level = "info", skip_all, fields(now = %now))]
pub async fn run_once(
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<DispatchReport, DispatchError> {
    let book = load_jokes(&settings.dataset).await?;

    let turn = content::turn(now);
    let band = content::greeting_band(now);
    let (phrase, joke) = {
        let mut rng = rand::rng();
        let phrase = settings.greetings.pick(&mut rng).to_string();
        let joke = turn.includes_joke().then(|| book.pick(&mut rng).clone());
        (phrase, joke)
    };
    info!(%turn, %band, with_joke = joke.is_some(), "Classified run");

    let http = http_client().map_err(DispatchError::Client)?;
    let weather = WeatherClient::new(
        http.clone(),
        settings.weather_url.clone(),
        settings.weather_policy.clone(),
        settings.codes.clone(),
    );
    let [primary, secondary] = &settings.cities;
    let (primary_reading, secondary_reading) = weather.fetch_pair(primary, secondary).await;

    let tag = content::tag_for_temperature(primary_reading.temperature_celsius);
    let gifs = GifClient::new(
        http.clone(),
        settings.giphy_url.clone(),
        settings.giphy_api_key.clone(),
        settings.gif_rating.clone(),
    );
    let image_url = gifs.fetch(tag).await;

    let payload = compose(MessageParts {
        band,
        turn,
        phrase: &phrase,
        joke: joke.as_ref(),
        weather: [(primary, &primary_reading), (secondary, &secondary_reading)],
        image_url,
        tag,
    });

    let status = WebhookSender::new(http, settings.webhook_url.clone())
        .send(&payload)
        .await?;

    Ok(DispatchReport {
        turn,
        band,
        tag,
        status,
        payload,
    })
}
