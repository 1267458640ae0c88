use crate::{
    Config,
    error::WeatherFetchError,
    latest::LatestResponse,
    model::{Forecast, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at the configured location, imperial units.
    async fn current_weather(&self) -> Result<WeatherSnapshot, WeatherFetchError>;

    /// Forecast for a named city, metric units.
    async fn forecast(&self, city: &str, days: u8) -> Result<Forecast, WeatherFetchError>;
}

/// Construct the weather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let weather = config.weather_config()?;

    Ok(Box::new(OpenWeatherClient::new(
        weather.api_key.clone(),
        weather.base_url(),
        weather.location(),
    )))
}

/// Current-weather source that keeps only the newest response.
///
/// Refreshes may overlap; a response that resolves after a newer one has
/// already been recorded is discarded.
#[derive(Debug)]
pub struct WeatherFeed<P> {
    provider: P,
    latest: LatestResponse<WeatherSnapshot>,
}

impl<P: WeatherProvider> WeatherFeed<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, latest: LatestResponse::new() }
    }

    /// Fetch current weather and return whatever snapshot is current afterwards.
    ///
    /// A failed fetch is logged and leaves weather absent, unless a newer
    /// request has already landed.
    pub async fn refresh(&self) -> Option<WeatherSnapshot> {
        let token = self.latest.begin();

        let value = match self.provider.current_weather().await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, "Weather fetch failed; rendering without weather");
                None
            }
        };

        self.latest.complete(token, value);
        self.latest.current()
    }

    pub fn snapshot(&self) -> Option<WeatherSnapshot> {
        self.latest.current()
    }
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Box<T> {
    async fn current_weather(&self) -> Result<WeatherSnapshot, WeatherFetchError> {
        (**self).current_weather().await
    }

    async fn forecast(&self, city: &str, days: u8) -> Result<Forecast, WeatherFetchError> {
        (**self).forecast(city, days).await
    }
}
