//! Composes the calculators into the single value the dashboard renders.

use chrono::{DateTime, NaiveDate, NaiveTime, ParseError, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    metrics::{
        dates::{self, DateMetrics},
        habits::{self, HabitProgress},
        icon::{self, WeatherIcon},
    },
    model::{HabitRecord, Reading, WeatherSnapshot},
};

/// One row of the daily schedule card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// 24-hour `HH:MM`.
    pub time: String,
    pub title: String,
    pub category: String,
}

impl ScheduleItem {
    pub fn starts_at(&self) -> Result<NaiveTime, ParseError> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
    }

    /// `08:00 AM`, or the raw text if it does not parse.
    pub fn display_time(&self) -> String {
        self.starts_at()
            .map(|t| t.format("%I:%M %p").to_string())
            .unwrap_or_else(|_| self.time.clone())
    }
}

/// Per-user settings that shape the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardProfile {
    pub user_name: String,
    /// Countdown target; Dec 31 of the current year when unset.
    pub target_date: Option<NaiveDate>,
    pub schedule: Vec<ScheduleItem>,
    pub workout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPanel {
    pub temperature: Reading<f64>,
    pub description: Reading<String>,
    pub humidity: Reading<u8>,
    pub wind_speed: Reading<f64>,
    pub icon: WeatherIcon,
}

impl WeatherPanel {
    pub fn from_snapshot(weather: Option<&WeatherSnapshot>) -> Self {
        match weather {
            Some(w) => WeatherPanel {
                temperature: Reading::Known(w.temperature),
                description: Reading::Known(w.description.clone()),
                humidity: Reading::Known(w.humidity),
                wind_speed: Reading::Known(w.wind_speed),
                icon: icon::resolve(&w.description),
            },
            None => WeatherPanel {
                temperature: Reading::Unknown,
                description: Reading::Unknown,
                humidity: Reading::Unknown,
                wind_speed: Reading::Unknown,
                icon: icon::resolve(""),
            },
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.temperature.is_unknown()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
}

impl Greeting {
    pub fn at(time: NaiveTime) -> Self {
        match time.hour() {
            0..=11 => Greeting::Morning,
            12..=16 => Greeting::Afternoon,
            _ => Greeting::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Greeting::Morning => "Good morning",
            Greeting::Afternoon => "Good afternoon",
            Greeting::Evening => "Good evening",
        }
    }
}

/// Everything one render of the dashboard needs. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardViewModel {
    pub greeting: Greeting,
    pub user_name: String,
    pub target_date: NaiveDate,
    pub date: DateMetrics,
    pub weather: WeatherPanel,
    pub habits: Vec<HabitRecord>,
    pub progress: HabitProgress,
    pub schedule: Vec<ScheduleItem>,
    pub next_event: Option<ScheduleItem>,
    pub workout: Option<String>,
}

/// Build the view-model from whatever inputs are available.
///
/// `weather` is `None` when the fetch failed or has not resolved; every
/// weather reading is then [`Reading::Unknown`]. Never fails.
pub fn assemble<Tz: TimeZone>(
    habits: &[HabitRecord],
    weather: Option<&WeatherSnapshot>,
    now: &DateTime<Tz>,
    profile: &DashboardProfile,
) -> DashboardViewModel {
    let today = now.date_naive();
    let time_of_day = now.time();
    let target_date = profile.target_date.unwrap_or_else(|| dates::end_of_year(today));

    DashboardViewModel {
        greeting: Greeting::at(time_of_day),
        user_name: profile.user_name.clone(),
        target_date,
        date: dates::compute(today, target_date),
        weather: WeatherPanel::from_snapshot(weather),
        habits: habits.to_vec(),
        progress: habits::compute_with_streak(habits, today, &now.timezone()),
        schedule: profile.schedule.clone(),
        next_event: next_event(&profile.schedule, time_of_day).cloned(),
        workout: profile.workout.clone(),
    }
}

/// Earliest schedule item starting at or after `now`. Unparseable times are skipped.
pub fn next_event(schedule: &[ScheduleItem], now: NaiveTime) -> Option<&ScheduleItem> {
    schedule
        .iter()
        .filter_map(|item| item.starts_at().ok().map(|t| (t, item)))
        .filter(|(t, _)| *t >= now)
        .min_by_key(|(t, _)| *t)
        .map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::icon::{ColorTag, IconTag};
    use chrono::{FixedOffset, Utc};

    fn item(time: &str, title: &str) -> ScheduleItem {
        ScheduleItem { time: time.into(), title: title.into(), category: "WORK".into() }
    }

    fn profile() -> DashboardProfile {
        DashboardProfile {
            user_name: "Alex".into(),
            target_date: NaiveDate::from_ymd_opt(2026, 12, 25),
            schedule: vec![
                item("13:00", "Gym - Leg Day"),
                item("08:00", "Morning Routine"),
                item("10:00", "Deep Work Session"),
            ],
            workout: Some("Leg Day Power".into()),
        }
    }

    fn habit(id: i64, completed: bool) -> HabitRecord {
        HabitRecord {
            id,
            label: format!("habit {id}"),
            completed,
            created_at: "2026-10-15T07:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn absent_weather_uses_unknown_sentinel() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let vm = assemble(&[], None, &now, &profile());

        assert!(vm.weather.is_unknown());
        assert_eq!(vm.weather.description, Reading::Unknown);
        assert_eq!(vm.weather.humidity, Reading::Unknown);
        assert_eq!(vm.weather.wind_speed, Reading::Unknown);
        assert_eq!(vm.weather.icon, WeatherIcon { icon: IconTag::Sun, color: ColorTag::Orange });
    }

    #[test]
    fn present_weather_is_resolved() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let weather = WeatherSnapshot {
            temperature: 58.3,
            description: "light rain".into(),
            humidity: 88,
            wind_speed: 12.0,
        };
        let vm = assemble(&[], Some(&weather), &now, &profile());

        assert_eq!(vm.weather.temperature, Reading::Known(58.3));
        assert_eq!(vm.weather.icon.icon, IconTag::CloudRain);
    }

    #[test]
    fn folds_in_date_and_habits() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let habits = [habit(1, true), habit(2, false), habit(3, true)];
        let vm = assemble(&habits, None, &now, &profile());

        assert_eq!(vm.date.today_label, "Thursday, October 15, 2026");
        assert_eq!(vm.date.day_of_year, 288);
        assert_eq!(vm.date.days_to_target, 71);
        assert_eq!(vm.progress.percent_complete, 67);
        assert_eq!(vm.progress.streak_days, 1);
        assert_eq!(vm.habits.len(), 3);
        assert_eq!(vm.user_name, "Alex");
        assert_eq!(vm.greeting, Greeting::Morning);
    }

    #[test]
    fn target_defaults_to_end_of_year() {
        let now = Utc.with_ymd_and_hms(2026, 12, 30, 18, 0, 0).unwrap();
        let vm = assemble(&[], None, &now, &DashboardProfile::default());

        assert_eq!(vm.target_date, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(vm.date.days_to_target, 1);
        assert_eq!(vm.greeting, Greeting::Evening);
    }

    #[test]
    fn dates_follow_local_offset() {
        let utc = Utc.with_ymd_and_hms(2026, 1, 1, 3, 0, 0).unwrap();
        let local = utc.with_timezone(&FixedOffset::west_opt(8 * 3600).unwrap());
        let vm = assemble(&[], None, &local, &DashboardProfile::default());

        assert_eq!(vm.date.day_of_year, 365);
        assert_eq!(vm.target_date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn next_event_is_earliest_upcoming() {
        let schedule = profile().schedule;
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        assert_eq!(next_event(&schedule, at(7, 0)).unwrap().title, "Morning Routine");
        assert_eq!(next_event(&schedule, at(10, 0)).unwrap().title, "Deep Work Session");
        assert_eq!(next_event(&schedule, at(10, 1)).unwrap().title, "Gym - Leg Day");
        assert!(next_event(&schedule, at(13, 1)).is_none());
    }

    #[test]
    fn next_event_skips_bad_times() {
        let schedule = vec![item("soon", "Mystery"), item("09:00", "Standup")];
        let now = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(next_event(&schedule, now).unwrap().title, "Standup");
    }

    #[test]
    fn display_time_is_twelve_hour() {
        assert_eq!(item("13:00", "x").display_time(), "01:00 PM");
        assert_eq!(item("08:00", "x").display_time(), "08:00 AM");
        assert_eq!(item("later", "x").display_time(), "later");
    }

    #[test]
    fn greeting_boundaries() {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        assert_eq!(Greeting::at(at(11)), Greeting::Morning);
        assert_eq!(Greeting::at(at(12)), Greeting::Afternoon);
        assert_eq!(Greeting::at(at(17)), Greeting::Evening);
    }
}
