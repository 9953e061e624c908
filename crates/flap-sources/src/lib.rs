#![forbid(unsafe_code)]

//! Content providers for the flapboard.
//!
//! A [`PageSource`] produces fixed-width text pages on demand, one line per
//! board row. Sources may be slow or fail; the board never talks to them
//! directly. Instead [`worker::SourceWorker`] polls a source on a
//! background thread and publishes the most recent successful result into
//! a single-slot handoff the board drains through its non-blocking
//! [`ContentFeed`](flap_core::ContentFeed).
//!
//! Shipped sources: rotating static page sets ([`StaticPages`]), a UTC
//! clock ([`ClockSource`]), and canned weather reports ([`WeatherSource`]).

pub mod clock;
pub mod static_pages;
pub mod weather;
pub mod worker;

pub use clock::ClockSource;
pub use static_pages::StaticPages;
pub use weather::WeatherSource;
pub use worker::{SourceWorker, WorkerFeed};

use std::fmt;

/// Error surfaced when a source cannot produce pages this cycle.
///
/// Always recoverable: the worker logs it and keeps the previous slot
/// content, so the board simply shows the last good pages.
#[derive(Debug)]
pub enum SourceError {
    /// The provider has nothing to serve right now.
    Unavailable(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unavailable(msg) => write!(f, "content unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// A producer of text pages for the board.
///
/// Implementations may block or take real time in `next_pages`; they are
/// always driven from the worker thread, never from the tick loop.
pub trait PageSource: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Produce the next page set, one line per board row.
    fn next_pages(&mut self) -> Result<Vec<String>, SourceError>;
}
