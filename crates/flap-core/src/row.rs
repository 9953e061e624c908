#![forbid(unsafe_code)]

//! A row of cells with cascading dispatch.
//!
//! `flip_to` does not touch cells directly: it builds a pending queue that
//! pairs each cell with its target character and a strictly increasing
//! delay (`i × inter_flap_delay` for column `i`), which `advance` drains as
//! time passes. The result is the classic left-to-right ripple, independent
//! of how long any individual cell's own flip chain takes.
//!
//! # Invariants
//!
//! 1. Width is fixed at construction; text is normalized (uppercased,
//!    coerced, padded/truncated) to exactly that width.
//! 2. A new `flip_to` replaces the pending queue outright; cells already
//!    mid-flip continue toward whatever target was last dispatched.
//! 3. The settle notice fires at most once per registration, and only when
//!    the pending queue is empty AND every cell is idle — completion means
//!    the last cascaded cell finished its whole flip chain, not merely that
//!    all delays were dispatched.

use std::sync::Arc;
use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::alphabet::Alphabet;
use crate::cell::{Cell, FlipView};
use crate::config::FlipTiming;
use crate::events::FlipEvent;
use crate::rng::XorShift64;

/// One-shot marker registered by the board and handed back from
/// [`Row::advance`] on the tick the row fully settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleToken;

/// A not-yet-dispatched cascade entry.
#[derive(Debug, Clone)]
struct PendingFlip {
    col: usize,
    symbol: char,
    remaining: Duration,
}

/// An ordered sequence of cells driven as a unit.
#[derive(Debug, Clone)]
pub struct Row {
    alphabet: Arc<Alphabet>,
    inter_flap_delay: Duration,
    cells: Vec<Cell>,
    pending: Vec<PendingFlip>,
    notice: Option<SettleToken>,
}

impl Row {
    /// Build a row of `width` idle blank cells.
    #[must_use]
    pub fn new(
        width: usize,
        alphabet: Arc<Alphabet>,
        timing: FlipTiming,
        rng: &mut XorShift64,
    ) -> Self {
        let cells = (0..width)
            .map(|_| Cell::new(alphabet.clone(), timing, rng.fork()))
            .collect();
        Self {
            alphabet,
            inter_flap_delay: timing.inter_flap_delay,
            cells,
            pending: Vec::new(),
            notice: None,
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// The cells, left to right.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Current row content as a string of settled/mid-flip symbols.
    #[must_use]
    pub fn text(&self) -> String {
        self.cells.iter().map(Cell::current).collect()
    }

    /// Renderer snapshots, left to right.
    pub fn views(&self) -> impl Iterator<Item = FlipView> + '_ {
        self.cells.iter().map(Cell::view)
    }

    /// Whether nothing is pending and every cell is idle.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty() && self.cells.iter().all(Cell::is_idle)
    }

    /// Show `text` at once, no animation, clearing any pending cascade.
    pub fn set_text_immediate(&mut self, text: &str) {
        let chars = self.normalize(text);
        for (cell, c) in self.cells.iter_mut().zip(chars) {
            cell.set_immediate(c);
        }
        self.pending.clear();
    }

    /// Schedule a cascading flip toward `text`.
    pub fn flip_to(&mut self, text: &str) {
        let chars = self.normalize(text);
        self.pending = chars
            .into_iter()
            .enumerate()
            .map(|(col, symbol)| PendingFlip {
                col,
                symbol,
                remaining: self.inter_flap_delay.saturating_mul(col as u32),
            })
            .collect();
    }

    /// Register the one-shot settle notice, replacing any prior one.
    pub fn notify_on_settle(&mut self, token: SettleToken) {
        self.notice = Some(token);
    }

    /// Whether a settle notice is registered and has not yet fired.
    #[must_use]
    pub fn has_settle_notice(&self) -> bool {
        self.notice.is_some()
    }

    /// Advance the cascade and every cell by `dt`.
    ///
    /// Returns the settle notice on the tick the row fully settles, at most
    /// once per registration.
    pub fn advance(&mut self, dt: Duration) -> Option<SettleToken> {
        // Dispatch targets whose cascade delay has elapsed.
        if !self.pending.is_empty() {
            let mut kept = Vec::with_capacity(self.pending.len());
            for mut entry in self.pending.drain(..) {
                match entry.remaining.checked_sub(dt) {
                    Some(rest) if !rest.is_zero() => {
                        entry.remaining = rest;
                        kept.push(entry);
                    }
                    _ => self.cells[entry.col].queue_target(entry.symbol),
                }
            }
            self.pending = kept;
        }

        for cell in &mut self.cells {
            cell.advance(dt);
        }

        if self.pending.is_empty() && self.cells.iter().all(Cell::is_idle) {
            return self.notice.take();
        }
        None
    }

    /// Start ghost flips on idle cells, each independently with
    /// `probability`. Returns how many cells flipped.
    pub(crate) fn ghost_pass(&mut self, probability: f64, rng: &mut XorShift64) -> usize {
        let mut flipped = 0;
        for cell in &mut self.cells {
            if cell.is_idle() && rng.next_f64() < probability {
                cell.start_flip(true);
                flipped += 1;
            }
        }
        flipped
    }

    /// Move this row's flip cues into `out`, tagged with `row_index`.
    pub(crate) fn drain_events(&mut self, row_index: usize, out: &mut Vec<FlipEvent>) {
        for (col, cell) in self.cells.iter_mut().enumerate() {
            for kind in cell.drain_events() {
                out.push(FlipEvent {
                    row: row_index,
                    col,
                    kind,
                });
            }
        }
    }

    /// Normalize arbitrary text to this row's width.
    ///
    /// Uppercase, coerce each grapheme onto the alphabet (multi-scalar
    /// graphemes become blank), truncate past the width, right-pad short
    /// input with blanks.
    fn normalize(&self, text: &str) -> Vec<char> {
        let width = self.cells.len();
        let upper = text.to_uppercase();
        let mut out: Vec<char> = upper
            .graphemes(true)
            .take(width)
            .map(|g| {
                let mut chars = g.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.alphabet.coerce(c),
                    _ => self.alphabet.blank(),
                }
            })
            .collect();
        out.resize(width, self.alphabet.blank());
        out
    }
}
