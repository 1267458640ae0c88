use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    error::{WeatherFetchError, truncate_body},
    model::{Forecast, ForecastEntry, WeatherSnapshot},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// The free forecast endpoint covers five days in three-hour steps.
pub const MAX_FORECAST_DAYS: u8 = 5;
const FORECAST_STEPS_PER_DAY: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self { latitude: 37.71337629259278, longitude: -121.88644296702584 }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    location: Coordinates,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: impl Into<String>, location: Coordinates) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            location,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherFetchError> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%url, "Requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherFetchError::Status {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn first_description(weather: &[OwWeather]) -> String {
    weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        WeatherSnapshot {
            temperature: parsed.main.temp,
            description: first_description(&parsed.weather),
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
        }
    }
}

impl OwForecastResponse {
    fn into_forecast(self) -> Result<Forecast, WeatherFetchError> {
        let city = match self.city.country.filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {country}", self.city.name),
            None => self.city.name,
        };

        let entries = self
            .list
            .into_iter()
            .map(|entry| -> Result<ForecastEntry, WeatherFetchError> {
                let time = DateTime::<Utc>::from_timestamp(entry.dt, 0).ok_or_else(|| {
                    WeatherFetchError::Parse(format!("forecast timestamp out of range: {}", entry.dt))
                })?;
                Ok(ForecastEntry {
                    time,
                    temperature: entry.main.temp,
                    description: first_description(&entry.weather),
                    humidity: entry.main.humidity,
                    wind_speed: entry.wind.speed,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast { city, entries })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self) -> Result<WeatherSnapshot, WeatherFetchError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "weather",
                &[
                    ("lat", self.location.latitude.to_string()),
                    ("lon", self.location.longitude.to_string()),
                    ("units", "imperial".to_string()),
                ],
            )
            .await?;

        Ok(parsed.into())
    }

    async fn forecast(&self, city: &str, days: u8) -> Result<Forecast, WeatherFetchError> {
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(WeatherFetchError::ForecastRange { requested: days, max: MAX_FORECAST_DAYS });
        }

        let cnt = u16::from(days) * FORECAST_STEPS_PER_DAY;
        let parsed: OwForecastResponse = self
            .get_json(
                "forecast",
                &[
                    ("q", city.to_string()),
                    ("units", "metric".to_string()),
                    ("cnt", cnt.to_string()),
                ],
            )
            .await?;

        parsed.into_forecast()
    }
}
