use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use clap::{Parser, Subcommand};
use lifeos_core::{
    Config, DashboardViewModel, HabitSession, HabitStore, WeatherFeed, WeatherProvider,
    WeatherSnapshot, assemble,
    metrics::{dates, parse_date},
    provider::{openweather::MAX_FORECAST_DAYS, provider_from_config},
    storage::{RestHabitStore, store_from_config},
};

use crate::{
    configure::{self, Section},
    render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "lifeos", version, about = "Personal dashboard: weather, habits and the year so far")]
pub struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials or profile settings.
    Configure {
        #[arg(value_enum)]
        section: Section,
    },

    /// Show the full dashboard.
    Dashboard {
        /// Render as if today were this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        /// Print the view-model as JSON.
        #[arg(long)]
        json: bool,

        /// Re-render every N seconds.
        #[arg(long, value_name = "SECONDS")]
        watch: Option<u64>,
    },

    /// Show current weather at the configured location.
    Weather {
        #[arg(long)]
        json: bool,
    },

    /// Show the multi-day forecast for a city.
    Forecast {
        city: String,

        #[arg(long, default_value_t = MAX_FORECAST_DAYS)]
        days: u8,
    },

    /// Manage habits.
    Habits {
        #[command(subcommand)]
        action: HabitsCommand,
    },

    /// Show date figures: day of year, year progress, countdown.
    Date {
        /// Reference date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Countdown target (YYYY-MM-DD); defaults to the configured target.
        #[arg(long)]
        target: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HabitsCommand {
    /// List habits, newest first.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a habit.
    Add {
        label: String,

        /// Mark it completed right away.
        #[arg(long)]
        completed: bool,
    },

    /// Flip a habit between done and not done.
    Toggle { id: i64 },
}

type Feed = WeatherFeed<Box<dyn WeatherProvider>>;

fn load_config() -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_env();
    Ok(config)
}

fn requested_date(date: Option<&str>) -> Result<Option<NaiveDate>> {
    Ok(date.map(parse_date).transpose()?)
}

/// The current local time, moved onto `date` when one is given.
fn local_now(date: Option<NaiveDate>) -> DateTime<Local> {
    let now = Local::now();
    match date {
        Some(date) => on_date(&now, date),
        None => now,
    }
}

/// `now`'s wall-clock time on `date`. A time that falls in a DST gap moves to
/// noon so the calendar date is preserved.
fn on_date<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> DateTime<Tz> {
    let tz = now.timezone();
    let noon = date.and_time(NaiveTime::MIN) + chrono::Duration::hours(12);

    tz.from_local_datetime(&date.and_time(now.time()))
        .earliest()
        .or_else(|| tz.from_local_datetime(&noon).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&noon))
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { section } => {
                let config = configure::prompt(section, Config::load_raw()?)?;
                config.validate().context(
                    "Config still has invalid values; run `lifeos configure profile` to fix them",
                )?;
                config.save()?;
                println!("Saved to {}", Config::config_file_path()?.display());
            }
            Command::Dashboard { date, json, watch } => {
                run_dashboard(date.as_deref(), json, watch).await?;
            }
            Command::Weather { json } => {
                let provider = provider_from_config(&load_config()?)?;
                let snapshot = provider.current_weather().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                } else {
                    print!("{}", render::weather(&snapshot));
                }
            }
            Command::Forecast { city, days } => {
                let provider = provider_from_config(&load_config()?)?;
                let forecast = provider.forecast(&city, days).await?;
                print!("{}", render::forecast(&forecast));
            }
            Command::Habits { action } => run_habits(action).await?,
            Command::Date { date, target } => {
                let today = local_now(requested_date(date.as_deref())?).date_naive();
                let target = match target {
                    Some(t) => parse_date(&t)?,
                    None => load_config()?.target_date()?.unwrap_or_else(|| dates::end_of_year(today)),
                };
                print!("{}", render::date_metrics(&dates::compute(today, target), &target.to_string()));
            }
        }

        Ok(())
    }
}

async fn run_habits(action: HabitsCommand) -> Result<()> {
    let store = store_from_config(&load_config()?)?;
    let mut session = HabitSession::load(&store).await.context("Failed to load habits")?;
    let today = Local::now().date_naive();

    match action {
        HabitsCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.records())?);
            } else {
                println!("{}", render::progress(&session.progress(today, &Local)));
                print!("{}", render::habit_list(session.records()));
            }
        }
        HabitsCommand::Add { label, completed } => {
            let created = session
                .add(&store, &label, completed)
                .await
                .context("Failed to create habit")?;
            println!("Added #{} {}", created.id, created.label);
        }
        HabitsCommand::Toggle { id } => {
            let habit = session.toggle(&store, id).await.context("Failed to update habit")?;
            let state = if habit.completed { "done" } else { "not done" };
            println!("#{} {} is now {state}", habit.id, habit.label);
        }
    }

    Ok(())
}

/// Collaborators for the dashboard. Either may be missing from config; the
/// dashboard still renders.
struct Sources {
    feed: Option<Arc<Feed>>,
    store: Option<RestHabitStore>,
}

impl Sources {
    fn from_config(config: &Config) -> Self {
        let feed = match provider_from_config(config) {
            Ok(provider) => Some(Arc::new(WeatherFeed::new(provider))),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        };
        let store = match store_from_config(config) {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        };
        Self { feed, store }
    }

    /// Refresh weather, waiting at most `limit`. A slower refresh keeps running
    /// in the background; the feed keeps only the newest result.
    async fn refresh_within(&self, limit: Duration) -> Option<WeatherSnapshot> {
        let feed = Arc::clone(self.feed.as_ref()?);
        let refresh = tokio::spawn({
            let feed = Arc::clone(&feed);
            async move { feed.refresh().await }
        });

        match tokio::time::timeout(limit, refresh).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Weather refresh task failed");
                feed.snapshot()
            }
            Err(_) => {
                tracing::debug!("Weather refresh still running; rendering last snapshot");
                feed.snapshot()
            }
        }
    }

    async fn habits(&self) -> HabitSession {
        let Some(store) = &self.store else {
            return HabitSession::default();
        };
        load_or_empty(store).await
    }
}

async fn load_or_empty<S: HabitStore + ?Sized>(store: &S) -> HabitSession {
    match HabitSession::load(store).await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "Habit fetch failed; rendering without habits");
            HabitSession::default()
        }
    }
}

fn render_view(vm: &DashboardViewModel, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(vm)?);
    } else {
        print!("{}", render::dashboard(vm));
    }
    Ok(())
}

async fn run_dashboard(date: Option<&str>, json: bool, watch: Option<u64>) -> Result<()> {
    let date = requested_date(date)?;
    let config = load_config()?;
    let profile = config.profile()?;
    let sources = Sources::from_config(&config);

    let weather = async {
        match &sources.feed {
            Some(feed) => feed.refresh().await,
            None => None,
        }
    };
    let (weather, session) = tokio::join!(weather, sources.habits());

    let now = local_now(date);
    render_view(&assemble(session.records(), weather.as_ref(), &now, &profile), json)?;

    let Some(secs) = watch else {
        return Ok(());
    };

    let period = Duration::from_secs(secs.max(1));
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;
    loop {
        ticker.tick().await;

        let (weather, session) = tokio::join!(sources.refresh_within(period), sources.habits());
        let now = local_now(date);

        if !json {
            println!();
        }
        render_view(&assemble(session.records(), weather.as_ref(), &now, &profile), json)?;
    }
}
