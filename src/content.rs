//! Time-of-day classification and temperature-to-tag mapping.
//!
//! All functions are pure: the caller injects the current instant. Two
//! classifications exist side by side and are intentionally kept apart:
//!
//! - [`Turn`] (two-way, split at 14:00 local) decides whether the joke is
//!   included and which accent color is used
//! - [`GreetingBand`] (three-way, split at 12:00 and 20:00 local) only picks
//!   the greeting text
//!
//! Local time is a fixed UTC−3 offset (Argentina, no DST).

use chrono::{DateTime, Timelike, Utc};
use std::fmt;

/// Fixed local offset from UTC, in hours.
pub const UTC_OFFSET_HOURS: i32 = -3;
/// First local hour of the afternoon turn.
pub const TURN_SPLIT_HOUR: u32 = 14;
/// First local hour of the afternoon greeting.
pub const AFTERNOON_START_HOUR: u32 = 12;
/// First local hour of the evening greeting.
pub const EVENING_START_HOUR: u32 = 20;

/// Tag used when the temperature is unknown.
pub const DEFAULT_TAG: &str = "weather";

/// Coarse two-way split of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Morning,
    Afternoon,
}

impl Turn {
    /// Only the morning message carries a joke.
    pub fn includes_joke(self) -> bool {
        matches!(self, Turn::Morning)
    }

    /// Embed accent color.
    pub fn color(self) -> u32 {
        match self {
            Turn::Morning => 0xF1C40F,
            Turn::Afternoon => 0x9B59B6,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Turn::Morning => "morning",
            Turn::Afternoon => "afternoon",
        })
    }
}

/// Finer three-way split used for the greeting text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingBand {
    Morning,
    Afternoon,
    Evening,
}

impl GreetingBand {
    pub fn greeting(self) -> &'static str {
        match self {
            GreetingBand::Morning => "Buenos días",
            GreetingBand::Afternoon => "Buenas tardes",
            GreetingBand::Evening => "Buenas noches",
        }
    }
}

impl fmt::Display for GreetingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GreetingBand::Morning => "morning",
            GreetingBand::Afternoon => "afternoon",
            GreetingBand::Evening => "evening",
        })
    }
}

/// Hour of day (0-23) at the fixed local offset.
pub fn local_hour(now: DateTime<Utc>) -> u32 {
    (now.hour() as i32 + UTC_OFFSET_HOURS).rem_euclid(24) as u32
}

pub fn turn(now: DateTime<Utc>) -> Turn {
    if local_hour(now) < TURN_SPLIT_HOUR {
        Turn::Morning
    } else {
        Turn::Afternoon
    }
}

pub fn greeting_band(now: DateTime<Utc>) -> GreetingBand {
    let hour = local_hour(now);
    if hour < AFTERNOON_START_HOUR {
        GreetingBand::Morning
    } else if hour < EVENING_START_HOUR {
        GreetingBand::Afternoon
    } else {
        GreetingBand::Evening
    }
}

/// Map a temperature to a GIF search tag.
///
/// Bands are checked coldest first and the first match wins; upper bounds
/// are inclusive except for `cold`, which stops below 10.
pub fn tag_for_temperature(temperature: Option<i32>) -> &'static str {
    let Some(t) = temperature else {
        return DEFAULT_TAG;
    };
    if t <= 0 {
        "freezing"
    } else if t < 10 {
        "cold"
    } else if t <= 20 {
        "mild"
    } else if t <= 30 {
        "pleasant"
    } else if t <= 40 {
        "hot"
    } else {
        "extreme heat"
    }
}
