#![forbid(unsafe_code)]

//! Split-flap display engine.
//!
//! Three layers, leaves first: [`cell::Cell`] is the two-phase hinge state
//! machine for one character slot, [`row::Row`] cascades target characters
//! across a fixed sequence of cells, and [`board::Board`] composes rows
//! under four countdown timers (auto-toggle, ghost flips, row refresh,
//! full-board refresh).
//!
//! Data flows top-down (board sets row targets, rows set cell targets) and
//! completion flows bottom-up (cells go idle, rows hand back a settle
//! notice the board reacts to). Everything is single-threaded and
//! frame-driven: one `tick(dt)` advances all state synchronously, and
//! rendering/audio read the resulting cell views and flip cues afterwards.

pub mod alphabet;
pub mod board;
pub mod cell;
pub mod config;
pub mod events;
pub mod feed;
pub mod logging;
pub mod rng;
pub mod row;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};

pub use alphabet::{Alphabet, DEFAULT_BLANK, DEFAULT_CHARSET};
pub use board::Board;
pub use cell::{Cell, FlipPhase, FlipView};
pub use config::{BoardConfig, ConfigError, FlipTiming};
pub use events::{FlipEvent, FlipEventKind};
pub use feed::ContentFeed;
pub use rng::XorShift64;
pub use row::{Row, SettleToken};
