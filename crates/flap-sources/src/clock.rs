#![forbid(unsafe_code)]

//! UTC clock pages.
//!
//! Derives date and time arithmetically from `SystemTime` — no timezone
//! database, UTC only. The page layout mirrors the weather boards: title,
//! blank spacer, then labeled value lines.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{PageSource, SourceError};

const WEEKDAYS: [&str; 7] = [
    "SUNDAY", "MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY",
];

/// A source serving the current UTC date and time.
#[derive(Debug, Clone, Default)]
pub struct ClockSource;

impl ClockSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PageSource for ClockSource {
    fn name(&self) -> &str {
        "clock"
    }

    fn next_pages(&mut self) -> Result<Vec<String>, SourceError> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SourceError::Unavailable(format!("system clock: {e}")))?
            .as_secs();
        Ok(pages_at(secs))
    }
}

/// Render the clock board for a given epoch second. Pure, for testability.
fn pages_at(epoch_secs: u64) -> Vec<String> {
    let days = (epoch_secs / 86_400) as i64;
    let tod = epoch_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    // 1970-01-01 was a Thursday.
    let weekday = WEEKDAYS[((days + 4).rem_euclid(7)) as usize];
    vec![
        "UTC CLOCK".to_string(),
        String::new(),
        format!("TIME      {:02}:{:02}:{:02}", tod / 3600, tod / 60 % 60, tod % 60),
        format!("DATE    {year:04}-{month:02}-{day:02}"),
        String::new(),
        weekday.to_string(),
    ]
}

/// Convert days since 1970-01-01 to a (year, month, day) civil date.
/// Standard era-based algorithm over 400-year cycles.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let month = month as u32;
    (if month <= 2 { year + 1 } else { year }, month, day)
}
