use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTag {
    Sun,
    CloudSun,
    CloudRain,
    Bolt,
    Snowflake,
    Smog,
}

impl IconTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconTag::Sun => "sun",
            IconTag::CloudSun => "cloud-sun",
            IconTag::CloudRain => "cloud-rain",
            IconTag::Bolt => "bolt",
            IconTag::Snowflake => "snowflake",
            IconTag::Smog => "smog",
        }
    }

    /// Terminal glyph for the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconTag::Sun => "☀",
            IconTag::CloudSun => "⛅",
            IconTag::CloudRain => "🌧",
            IconTag::Bolt => "⚡",
            IconTag::Snowflake => "❄",
            IconTag::Smog => "🌫",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Orange,
    Gray,
    Blue,
    Yellow,
    Cyan,
    DarkGray,
}

impl ColorTag {
    /// Theme token, e.g. `orange.400`.
    pub fn token(&self) -> &'static str {
        match self {
            ColorTag::Orange => "orange.400",
            ColorTag::Gray => "gray.400",
            ColorTag::Blue => "blue.400",
            ColorTag::Yellow => "yellow.500",
            ColorTag::Cyan => "cyan.300",
            ColorTag::DarkGray => "gray.500",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherIcon {
    pub icon: IconTag,
    pub color: ColorTag,
}

impl WeatherIcon {
    pub const DEFAULT: WeatherIcon = WeatherIcon { icon: IconTag::Sun, color: ColorTag::Orange };
}

impl Default for WeatherIcon {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Checked top to bottom; the first row with a matching keyword wins.
const RULES: &[(&[&str], WeatherIcon)] = &[
    (&["clear", "sunny"], WeatherIcon { icon: IconTag::Sun, color: ColorTag::Orange }),
    (&["cloud"], WeatherIcon { icon: IconTag::CloudSun, color: ColorTag::Gray }),
    (&["rain", "drizzle"], WeatherIcon { icon: IconTag::CloudRain, color: ColorTag::Blue }),
    (&["thunder", "storm"], WeatherIcon { icon: IconTag::Bolt, color: ColorTag::Yellow }),
    (&["snow"], WeatherIcon { icon: IconTag::Snowflake, color: ColorTag::Cyan }),
    (&["fog", "mist", "haze"], WeatherIcon { icon: IconTag::Smog, color: ColorTag::DarkGray }),
];

/// Map a free-text weather description to an icon and color.
///
/// Matching is case-insensitive substring search. Anything unrecognized,
/// including the empty string, falls back to [`WeatherIcon::DEFAULT`].
pub fn resolve(description: &str) -> WeatherIcon {
    let desc = description.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| desc.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or(WeatherIcon::DEFAULT)
}
