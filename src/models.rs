//! Data models shared by the dispatcher and the joke endpoint.
//!
//! - [`Joke`]: one record from the pipe-delimited dataset
//! - [`City`]: a named coordinate pair queried for current weather
//! - [`WeatherReading`]: the (possibly degraded) weather for one city
//! - [`WebhookPayload`] and friends: the Discord-style embed body we POST

use serde::{Deserialize, Serialize};

/// A single joke as loaded from the dataset.
///
/// `id` is parsed from the first column but never used by the dispatcher;
/// the HTTP endpoint returns it to clients. A non-numeric id becomes `None`
/// and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: Option<u64>,
    pub setup: String,
    pub punchline: String,
}

/// A location queried against the weather endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Posadas, Misiones. Its temperature drives the GIF tag.
    pub fn posadas() -> Self {
        Self::new("Posadas", -27.3671, -55.8961)
    }

    pub fn buenos_aires() -> Self {
        Self::new("Buenos Aires", -34.6037, -58.3816)
    }
}

/// Current conditions for one city.
///
/// A `None` temperature means the upstream could not be reached or returned
/// garbage; the description then carries the placeholder text instead of
/// aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReading {
    pub temperature_celsius: Option<i32>,
    pub description: String,
    pub image_hint: Option<String>,
}

impl WeatherReading {
    /// Description used when every attempt failed.
    pub const UNAVAILABLE: &'static str = "unavailable";

    pub fn unavailable() -> Self {
        Self {
            temperature_celsius: None,
            description: Self::UNAVAILABLE.to_string(),
            image_hint: None,
        }
    }

    /// Render as an embed field value: `"20°C, Soleado"`, or only the
    /// description when the temperature is unknown.
    pub fn field_value(&self) -> String {
        match self.temperature_celsius {
            Some(t) => format!("{}°C, {}", t, self.description),
            None => self.description.clone(),
        }
    }
}

/// Top-level webhook body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

/// A single rich embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    /// RGB packed into an integer, e.g. `0xF1C40F`.
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}
