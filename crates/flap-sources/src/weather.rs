#![forbid(unsafe_code)]

//! Canned weather report boards.
//!
//! Cycles through a fixed set of location reports, one per fetch. Live
//! fetching is deliberately out of scope; this source exists so the board
//! has realistic weather-shaped content and so the worker path is
//! exercised by something that looks like a remote provider. Symbols the
//! board's alphabet does not carry (the degree sign) render as blanks.

use crate::{PageSource, SourceError};

struct Report {
    location: &'static str,
    lines: [&'static str; 6],
}

const REPORTS: [Report; 3] = [
    Report {
        location: "LONDON",
        lines: [
            "LONDON, UK",
            "",
            "LOCAL TIME 09:45 AM",
            "TEMP       12°C",
            "RAIN       15%",
            "BRISK SPRING BREEZE",
        ],
    },
    Report {
        location: "NEWARK_ON_TRENT",
        lines: [
            "NEWARK-ON-TRENT, UK",
            "",
            "LOCAL TIME 09:45 AM",
            "TEMP       12°C",
            "RAIN       35%",
            "MIST LIFTING STEADY",
        ],
    },
    Report {
        location: "PLOVDIV",
        lines: [
            "PLOVDIV, BULGARIA",
            "",
            "LOCAL TIME 11:45 AM",
            "TEMP       12°C",
            "RAIN       25%",
            "SUN WITH PASSING CLOUD",
        ],
    },
];

/// A source cycling through canned location reports.
#[derive(Debug, Clone, Default)]
pub struct WeatherSource {
    cursor: usize,
}

impl WeatherSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The location the next fetch will serve.
    #[must_use]
    pub fn next_location(&self) -> &'static str {
        REPORTS[self.cursor].location
    }
}

impl PageSource for WeatherSource {
    fn name(&self) -> &str {
        "weather"
    }

    fn next_pages(&mut self) -> Result<Vec<String>, SourceError> {
        let report = &REPORTS[self.cursor];
        self.cursor = (self.cursor + 1) % REPORTS.len();
        Ok(report.lines.iter().map(|s| (*s).to_string()).collect())
    }
}
