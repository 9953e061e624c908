#![forbid(unsafe_code)]

//! Board configuration and startup validation.
//!
//! All timing is fixed configuration: phase durations, cascade spacing, and
//! the four orchestration periods. Defaults reproduce a 6×22 departures
//! board with a 70 ms close / 90 ms open hinge and a 60 ms cascade.
//!
//! Validation is fatal by design — a zero-sized board or an empty alphabet
//! has no sensible degraded mode, so [`Board::new`](crate::board::Board::new)
//! refuses to construct rather than run wrong.

use std::fmt;
use std::time::Duration;

use crate::alphabet::{DEFAULT_BLANK, DEFAULT_CHARSET};

/// Per-cell hinge timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipTiming {
    /// Top half folding down over the current symbol.
    pub close: Duration,
    /// Bottom half opening to reveal the committed symbol.
    pub open: Duration,
    /// Phase durations are sampled per flip as nominal ± this bound, so a
    /// row of simultaneously flipping cells does not land in lockstep.
    pub jitter: Duration,
    /// Phase-duration multiplier applied to ghost flips only.
    pub ghost_slowdown: f64,
    /// Cascade spacing between neighboring cells in a row.
    pub inter_flap_delay: Duration,
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            close: Duration::from_millis(70),
            open: Duration::from_millis(90),
            jitter: Duration::from_millis(8),
            ghost_slowdown: 2.0,
            inter_flap_delay: Duration::from_millis(60),
        }
    }
}

/// Full configuration surface for a [`Board`](crate::board::Board).
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Displayable symbols in flap order.
    pub charset: String,
    /// Symbol substituted for anything outside the charset.
    pub blank: char,
    /// Number of rows.
    pub rows: usize,
    /// Number of cells per row.
    pub cols: usize,
    /// Hinge timing shared by every cell.
    pub timing: FlipTiming,
    /// Period between automatic current/alternate page swaps.
    pub toggle_period: Duration,
    /// Period between ghost-flip passes.
    pub ghost_period: Duration,
    /// Per-cell probability of a ghost flip when the pass fires.
    pub ghost_probability: f64,
    /// Period between single-row random refreshes.
    pub row_refresh_period: Duration,
    /// Period between full-board random refreshes.
    pub full_refresh_period: Duration,
    /// RNG seed; `None` seeds from the system clock.
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            charset: DEFAULT_CHARSET.to_string(),
            blank: DEFAULT_BLANK,
            rows: 6,
            cols: 22,
            timing: FlipTiming::default(),
            toggle_period: Duration::from_secs(6),
            ghost_period: Duration::from_secs(15),
            ghost_probability: 0.04,
            row_refresh_period: Duration::from_secs(45),
            full_refresh_period: Duration::from_secs(7 * 60),
            seed: None,
        }
    }
}

impl BoardConfig {
    /// Check everything that would make the board unrunnable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Alphabet membership/width/duplicate checks live with Alphabet.
        crate::alphabet::Alphabet::new(&self.charset, self.blank)?;
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.cols == 0 {
            return Err(ConfigError::ZeroCols);
        }
        if self.timing.close.is_zero() || self.timing.open.is_zero() {
            return Err(ConfigError::ZeroPhaseDuration);
        }
        if self.timing.inter_flap_delay.is_zero() {
            return Err(ConfigError::ZeroCascadeDelay);
        }
        if !(0.0..=1.0).contains(&self.ghost_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.ghost_probability));
        }
        if !self.timing.ghost_slowdown.is_finite() || self.timing.ghost_slowdown <= 0.0 {
            return Err(ConfigError::BadGhostSlowdown(self.timing.ghost_slowdown));
        }
        Ok(())
    }
}

/// Errors that make a [`BoardConfig`] unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The charset has no symbols.
    EmptyAlphabet,
    /// A symbol appears twice in the charset.
    DuplicateSymbol(char),
    /// A symbol is not a single terminal column wide.
    WideSymbol(char),
    /// The blank symbol is not a charset member.
    BlankNotInAlphabet(char),
    /// Zero rows requested.
    ZeroRows,
    /// Zero columns requested.
    ZeroCols,
    /// A hinge phase duration is zero.
    ZeroPhaseDuration,
    /// The cascade delay is zero; row delays must be strictly increasing.
    ZeroCascadeDelay,
    /// Ghost probability outside `[0, 1]`.
    ProbabilityOutOfRange(f64),
    /// Ghost slowdown multiplier is non-positive or non-finite.
    BadGhostSlowdown(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyAlphabet => write!(f, "alphabet has no symbols"),
            ConfigError::DuplicateSymbol(c) => write!(f, "duplicate alphabet symbol {c:?}"),
            ConfigError::WideSymbol(c) => write!(f, "alphabet symbol {c:?} is not one column wide"),
            ConfigError::BlankNotInAlphabet(c) => {
                write!(f, "blank symbol {c:?} is not in the alphabet")
            }
            ConfigError::ZeroRows => write!(f, "board must have at least one row"),
            ConfigError::ZeroCols => write!(f, "board must have at least one column"),
            ConfigError::ZeroPhaseDuration => write!(f, "flip phase durations must be non-zero"),
            ConfigError::ZeroCascadeDelay => {
                write!(f, "cascade inter-flap delay must be non-zero")
            }
            ConfigError::ProbabilityOutOfRange(p) => {
                write!(f, "ghost probability {p} outside [0, 1]")
            }
            ConfigError::BadGhostSlowdown(m) => {
                write!(f, "ghost slowdown {m} must be positive and finite")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
