use anyhow::{Context, Result};
use clap::ValueEnum;
use inquire::{CustomType, Password, Text};
use lifeos_core::{
    Config, StorageConfig, metrics::parse_date, provider::openweather::Coordinates,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// OpenWeather API key and location.
    Weather,
    /// Hosted habit table URL and key.
    Storage,
    /// Name, countdown target and workout.
    Profile,
}

/// Prompt for one config section and return the updated config.
pub fn prompt(section: Section, mut config: Config) -> Result<Config> {
    match section {
        Section::Weather => prompt_weather(&mut config)?,
        Section::Storage => prompt_storage(&mut config)?,
        Section::Profile => prompt_profile(&mut config)?,
    }
    Ok(config)
}

fn prompt_weather(config: &mut Config) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let current = config.weather.as_ref().map(|w| w.location()).unwrap_or_default();
    let latitude = CustomType::<f64>::new("Latitude:")
        .with_default(current.latitude)
        .prompt()
        .context("Failed to read latitude")?;
    let longitude = CustomType::<f64>::new("Longitude:")
        .with_default(current.longitude)
        .prompt()
        .context("Failed to read longitude")?;

    config.set_weather_api_key(api_key.trim().to_string());
    if let Some(weather) = config.weather.as_mut() {
        let default = Coordinates::default();
        weather.latitude = (latitude != default.latitude).then_some(latitude);
        weather.longitude = (longitude != default.longitude).then_some(longitude);
    }
    Ok(())
}

fn prompt_storage(config: &mut Config) -> Result<()> {
    let current_url = config.storage.as_ref().map(|s| s.url.clone()).unwrap_or_default();

    let url = Text::new("Project URL:")
        .with_default(&current_url)
        .with_help_message("e.g. https://abcd.supabase.co")
        .prompt()
        .context("Failed to read project URL")?;
    let api_key = Password::new("API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.storage = Some(StorageConfig {
        url: url.trim().to_string(),
        api_key: api_key.trim().to_string(),
    });
    Ok(())
}

fn prompt_profile(config: &mut Config) -> Result<()> {
    let name = Text::new("Your name:")
        .with_default(config.user_name.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read name")?;

    let target = Text::new("Countdown target (YYYY-MM-DD, empty for Dec 31):")
        .with_default(config.target_date.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read target date")?;

    let workout = Text::new("Today's workout:")
        .with_default(config.workout.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read workout")?;

    config.user_name = non_empty(name);
    config.target_date = match non_empty(target) {
        Some(text) => Some(parse_date(&text)?.to_string()),
        None => None,
    };
    config.workout = non_empty(workout);
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
