//! Embed composition.
//!
//! Turns the outcome of a run (time classification, joke, weather, GIF)
//! into the [`WebhookPayload`] that is posted. No I/O happens here.

use crate::content::{GreetingBand, Turn};
use crate::models::{
    City, Embed, EmbedField, EmbedFooter, EmbedImage, Joke, WebhookPayload, WeatherReading,
};

/// Body used outside the morning turn.
pub const SEPARATOR: &str = "───────────────";

/// Everything the composer needs for one message.
#[derive(Debug, Clone)]
pub struct MessageParts<'a> {
    pub band: GreetingBand,
    pub turn: Turn,
    pub phrase: &'a str,
    pub joke: Option<&'a Joke>,
    pub weather: [(&'a City, &'a WeatherReading); 2],
    pub image_url: Option<String>,
    pub tag: &'a str,
}

pub fn title(band: GreetingBand, phrase: &str) -> String {
    format!("{}, {}", band.greeting(), phrase)
}

/// Joke in bold-setup form during the morning turn, separator otherwise.
pub fn body(turn: Turn, joke: Option<&Joke>) -> String {
    match joke {
        Some(joke) if turn.includes_joke() => format!("**{}**\n{}", joke.setup, joke.punchline),
        _ => SEPARATOR.to_string(),
    }
}

pub fn compose(parts: MessageParts<'_>) -> WebhookPayload {
    let fields = parts
        .weather
        .iter()
        .map(|(city, reading)| EmbedField {
            name: city.name.clone(),
            value: reading.field_value(),
            inline: true,
        })
        .collect();

    WebhookPayload {
        embeds: vec![Embed {
            title: title(parts.band, parts.phrase),
            description: body(parts.turn, parts.joke),
            color: parts.turn.color(),
            image: parts.image_url.map(|url| EmbedImage { url }),
            fields,
            footer: Some(EmbedFooter {
                text: format!("#{}", parts.tag),
            }),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joke() -> Joke {
        Joke {
            id: Some(1),
            setup: "¿Qué le dice un techo a otro?".to_string(),
            punchline: "Techo de menos.".to_string(),
        }
    }

    fn sunny() -> WeatherReading {
        WeatherReading {
            temperature_celsius: Some(20),
            description: "Soleado".to_string(),
            image_hint: Some("sun".to_string()),
        }
    }

    #[test]
    fn test_morning_body_includes_joke() {
        let joke = joke();
        assert_eq!(
            body(Turn::Morning, Some(&joke)),
            "**¿Qué le dice un techo a otro?**\nTecho de menos."
        );
    }

    #[test]
    fn test_afternoon_body_is_separator() {
        let joke = joke();
        assert_eq!(body(Turn::Afternoon, Some(&joke)), SEPARATOR);
        assert_eq!(body(Turn::Morning, None), SEPARATOR);
    }

    #[test]
    fn test_compose_full_payload() {
        let joke = joke();
        let posadas = City::posadas();
        let baires = City::buenos_aires();
        let sunny = sunny();
        let unavailable = WeatherReading::unavailable();

        let payload = compose(MessageParts {
            band: GreetingBand::Afternoon,
            turn: Turn::Morning,
            phrase: "Nano, acá te va un chiste:",
            joke: Some(&joke),
            weather: [(&posadas, &sunny), (&baires, &unavailable)],
            image_url: Some("https://media.giphy.com/x.gif".to_string()),
            tag: "mild",
        });

        let embed = &payload.embeds[0];
        assert_eq!(embed.title, "Buenas tardes, Nano, acá te va un chiste:");
        assert!(embed.description.contains("Techo de menos."));
        assert_eq!(embed.color, Turn::Morning.color());
        assert_eq!(embed.image.as_ref().unwrap().url, "https://media.giphy.com/x.gif");
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "Posadas");
        assert_eq!(embed.fields[0].value, "20°C, Soleado");
        assert!(embed.fields[0].inline);
        assert_eq!(embed.fields[1].name, "Buenos Aires");
        assert_eq!(embed.fields[1].value, "unavailable");
        assert_eq!(embed.footer.as_ref().unwrap().text, "#mild");
    }

    #[test]
    fn test_compose_without_image() {
        let posadas = City::posadas();
        let baires = City::buenos_aires();
        let sunny = sunny();

        let payload = compose(MessageParts {
            band: GreetingBand::Evening,
            turn: Turn::Afternoon,
            phrase: "Poing, moroso incobrable.",
            joke: None,
            weather: [(&posadas, &sunny), (&baires, &sunny)],
            image_url: None,
            tag: "mild",
        });

        let embed = &payload.embeds[0];
        assert!(embed.image.is_none());
        assert_eq!(embed.color, Turn::Afternoon.color());
        assert_eq!(embed.description, SEPARATOR);
        assert!(embed.title.starts_with("Buenas noches, "));
    }
}
