//! Pure derivations behind the dashboard: weather icon, date figures, habit
//! progress. Nothing here performs I/O or reads the clock.

pub mod dates;
pub mod habits;
pub mod icon;

pub use dates::{DateMetrics, parse_date};
pub use habits::HabitProgress;
pub use icon::{ColorTag, IconTag, WeatherIcon};
