//! Plain-text rendering of core values. Everything returns a `String` so the
//! command layer decides where it goes.

use std::fmt::Write;

use lifeos_core::{
    DashboardViewModel, Forecast, HabitRecord, Reading, WeatherPanel, WeatherSnapshot,
    metrics::{DateMetrics, HabitProgress, icon},
};

const UNKNOWN: &str = "--";

fn reading_with<T>(reading: &Reading<T>, f: impl Fn(&T) -> String) -> String {
    reading.known().map(f).unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn weather_line(panel: &WeatherPanel) -> String {
    format!(
        "{} {}  {}  humidity {}  wind {}",
        panel.icon.icon.glyph(),
        reading_with(&panel.temperature, |t| format!("{t:.0}°F")),
        reading_with(&panel.description, |d| d.clone()),
        reading_with(&panel.humidity, |h| format!("{h}%")),
        reading_with(&panel.wind_speed, |w| format!("{w:.1} mph")),
    )
}

pub fn weather(snapshot: &WeatherSnapshot) -> String {
    let panel = WeatherPanel::from_snapshot(Some(snapshot));
    format!(
        "{}\nicon: {} ({})\n",
        weather_line(&panel),
        panel.icon.icon.as_str(),
        panel.icon.color.token()
    )
}

pub fn date_metrics(metrics: &DateMetrics, target: &str) -> String {
    format!(
        "{}\nDay {} of the year · {:.2}% complete · {} to {target}\n",
        metrics.today_label,
        metrics.day_of_year,
        metrics.year_complete_percent,
        countdown(metrics.days_to_target),
    )
}

fn countdown(days: i64) -> String {
    match days {
        0 => "0 days".to_string(),
        1 => "1 day".to_string(),
        d if d > 0 => format!("{d} days"),
        -1 => "1 day past".to_string(),
        d => format!("{} days past", -d),
    }
}

pub fn progress(progress: &HabitProgress) -> String {
    let mut out = format!(
        "{}/{} done ({}% complete)",
        progress.completed_count, progress.total_count, progress.percent_complete
    );
    if progress.streak_days > 0 {
        let _ = write!(out, " · streak {} day{}", progress.streak_days, plural(progress.streak_days));
    }
    out
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub fn habit_list(habits: &[HabitRecord]) -> String {
    if habits.is_empty() {
        return "  (no habits yet; add one with `lifeos habits add <label>`)\n".to_string();
    }

    let width = habits.iter().map(|h| h.label.chars().count()).max().unwrap_or(0);
    habits
        .iter()
        .map(|h| {
            let mark = if h.completed { "x" } else { " " };
            format!("  [{mark}] {:<width$}  #{}\n", h.label, h.id)
        })
        .collect()
}

pub fn forecast(forecast: &Forecast) -> String {
    let mut out = format!("Forecast for {}\n", forecast.city);
    for entry in &forecast.entries {
        let icon = icon::resolve(&entry.description);
        let _ = writeln!(
            out,
            "  {}  {} {:>5.1}°C  {:<20} {:>3}%  {:.1} m/s",
            entry.time.format("%a %d %b %H:%M"),
            icon.icon.glyph(),
            entry.temperature,
            entry.description,
            entry.humidity,
            entry.wind_speed,
        );
    }
    out
}

pub fn dashboard(vm: &DashboardViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}, {}", vm.greeting.as_str(), vm.user_name);
    let _ = writeln!(out, "{}", date_metrics(&vm.date, &vm.target_date.to_string()).trim_end());
    let _ = writeln!(out);

    let _ = writeln!(out, "Weather     {}", weather_line(&vm.weather));

    let next = vm
        .next_event
        .as_ref()
        .map(|e| format!("{} {}", e.display_time(), e.title))
        .unwrap_or_else(|| "nothing left today".to_string());
    let _ = writeln!(out, "Next event  {next}");

    if let Some(workout) = &vm.workout {
        let _ = writeln!(out, "Workout     {workout}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Habits      {}", progress(&vm.progress));
    out.push_str(&habit_list(&vm.habits));

    if !vm.schedule.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Schedule");
        let mut schedule: Vec<_> = vm.schedule.iter().collect();
        schedule.sort_by_key(|item| item.starts_at().ok());
        for item in schedule {
            let _ = writeln!(
                out,
                "  {:<8}  {}  {}",
                item.display_time(),
                item.title,
                item.category.to_uppercase()
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use lifeos_core::{DashboardProfile, ScheduleItem, assemble};

    fn habit(id: i64, label: &str, completed: bool) -> HabitRecord {
        HabitRecord {
            id,
            label: label.to_string(),
            completed,
            created_at: Utc.with_ymd_and_hms(2026, 10, 15, 7, 0, 0).unwrap(),
        }
    }

    #[test]
    fn unknown_weather_renders_placeholders() {
        let line = weather_line(&WeatherPanel::from_snapshot(None));
        assert!(line.starts_with("☀ --"));
        assert!(line.contains("humidity --"));
        assert!(line.contains("wind --"));
    }

    #[test]
    fn known_weather_renders_units() {
        let snapshot = WeatherSnapshot {
            temperature: 64.4,
            description: "broken clouds".into(),
            humidity: 58,
            wind_speed: 9.22,
        };
        let text = weather(&snapshot);
        assert!(text.contains("64°F"));
        assert!(text.contains("humidity 58%"));
        assert!(text.contains("wind 9.2 mph"));
        assert!(text.contains("cloud-sun (gray.400)"));
    }

    #[test]
    fn countdown_wording() {
        assert_eq!(countdown(1), "1 day");
        assert_eq!(countdown(77), "77 days");
        assert_eq!(countdown(-3), "3 days past");
    }

    #[test]
    fn habit_list_marks_completed() {
        let text = habit_list(&[habit(1, "Meditate (10m)", true), habit(2, "No Sugar", false)]);
        assert!(text.contains("[x] Meditate (10m)"));
        assert!(text.contains("[ ] No Sugar"));
        assert!(text.contains("#2"));
    }

    #[test]
    fn dashboard_has_every_card() {
        let profile = DashboardProfile {
            user_name: "Alex".into(),
            target_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            schedule: vec![ScheduleItem {
                time: "10:00".into(),
                title: "Deep Work Session".into(),
                category: "work".into(),
            }],
            workout: Some("Leg Day Power".into()),
        };
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 8, 0, 0).unwrap();
        let habits = [habit(1, "Meditate (10m)", true), habit(2, "No Sugar", false)];
        let vm = assemble(&habits, None, &now, &profile);

        let text = dashboard(&vm);
        assert!(text.starts_with("Good morning, Alex\nThursday, October 15, 2026\n"));
        assert!(text.contains("Day 288 of the year · 78.90% complete · 77 days to 2026-12-31"));
        assert!(text.contains("Next event  10:00 AM Deep Work Session"));
        assert!(text.contains("Workout     Leg Day Power"));
        assert!(text.contains("1/2 done (50% complete) · streak 1 day"));
        assert!(text.contains("WORK"));
    }
}
