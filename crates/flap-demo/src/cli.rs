#![forbid(unsafe_code)]

//! Command-line argument parsing for the flapboard demo.
//!
//! Hand-rolled `--flag=value` parsing with environment variable overrides
//! under the `FLAP_DEMO_*` prefix.

use std::env;
use std::process;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
flap-demo — a split-flap departures board in your terminal

USAGE:
    flap-demo [OPTIONS]

OPTIONS:
    --source=NAME        Content source: 'static', 'clock', or 'weather'
                         (default: static)
    --fps=N              Target frame rate (default: 60)
    --seed=N             Deterministic RNG seed (default: seeded from clock)
    --fetch-period=SECS  Seconds between content fetches (default: 30)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Space             Toggle to the staged page set
    r                 Full-board refresh ripple
    q / Esc / Ctrl+C  Quit

ENVIRONMENT VARIABLES:
    FLAP_DEMO_SOURCE        Override --source
    FLAP_DEMO_FPS           Override --fps
    FLAP_DEMO_SEED          Override --seed
    FLAP_DEMO_FETCH_PERIOD  Override --fetch-period
    FLAP_DEMO_LOG           Write tracing output to this file";

/// Which content source feeds the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Rotating departures demo boards.
    Static,
    /// UTC clock pages.
    Clock,
    /// Canned weather reports.
    Weather,
}

impl SourceKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "static" => Some(SourceKind::Static),
            "clock" => Some(SourceKind::Clock),
            "weather" => Some(SourceKind::Weather),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Content source feeding the board.
    pub source: SourceKind,
    /// Target frame rate.
    pub fps: u32,
    /// RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Period between content fetches.
    pub fetch_period: Duration,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            source: SourceKind::Static,
            fps: 60,
            seed: None,
            fetch_period: Duration::from_secs(30),
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are
    /// overridden by explicit command-line flags.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Ok(val) = env::var("FLAP_DEMO_SOURCE")
            && let Some(kind) = SourceKind::from_name(&val)
        {
            opts.source = kind;
        }
        if let Ok(val) = env::var("FLAP_DEMO_FPS")
            && let Ok(n) = val.parse()
        {
            opts.fps = n;
        }
        if let Ok(val) = env::var("FLAP_DEMO_SEED")
            && let Ok(n) = val.parse()
        {
            opts.seed = Some(n);
        }
        if let Ok(val) = env::var("FLAP_DEMO_FETCH_PERIOD")
            && let Ok(n) = val.parse()
        {
            opts.fetch_period = Duration::from_secs(n);
        }

        // Parse command-line args (override env vars)
        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("flap-demo {VERSION}");
                    process::exit(0);
                }
                other => {
                    if let Some(val) = other.strip_prefix("--source=") {
                        match SourceKind::from_name(val) {
                            Some(kind) => opts.source = kind,
                            None => {
                                eprintln!("Invalid --source value: {val}");
                                process::exit(1);
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--fps=") {
                        match val.parse() {
                            Ok(n) => opts.fps = n,
                            Err(_) => {
                                eprintln!("Invalid --fps value: {val}");
                                process::exit(1);
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        match val.parse() {
                            Ok(n) => opts.seed = Some(n),
                            Err(_) => {
                                eprintln!("Invalid --seed value: {val}");
                                process::exit(1);
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--fetch-period=") {
                        match val.parse() {
                            Ok(n) => opts.fetch_period = Duration::from_secs(n),
                            Err(_) => {
                                eprintln!("Invalid --fetch-period value: {val}");
                                process::exit(1);
                            }
                        }
                    } else {
                        eprintln!("Unknown argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_names_round_trip() {
        assert_eq!(SourceKind::from_name("static"), Some(SourceKind::Static));
        assert_eq!(SourceKind::from_name("clock"), Some(SourceKind::Clock));
        assert_eq!(SourceKind::from_name("weather"), Some(SourceKind::Weather));
        assert_eq!(SourceKind::from_name("radio"), None);
        assert_eq!(SourceKind::from_name("STATIC"), None);
    }

    #[test]
    fn defaults_are_sensible() {
        let opts = Opts::default();
        assert_eq!(opts.source, SourceKind::Static);
        assert_eq!(opts.fps, 60);
        assert_eq!(opts.seed, None);
        assert_eq!(opts.fetch_period, Duration::from_secs(30));
    }

    #[test]
    fn help_text_documents_every_env_var() {
        for var in [
            "FLAP_DEMO_SOURCE",
            "FLAP_DEMO_FPS",
            "FLAP_DEMO_SEED",
            "FLAP_DEMO_FETCH_PERIOD",
            "FLAP_DEMO_LOG",
        ] {
            assert!(HELP_TEXT.contains(var), "HELP_TEXT missing {var}");
        }
    }

    #[test]
    fn help_text_documents_every_source() {
        for name in ["static", "clock", "weather"] {
            assert!(HELP_TEXT.contains(name), "HELP_TEXT missing source {name}");
        }
    }
}
