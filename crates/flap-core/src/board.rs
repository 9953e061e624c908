#![forbid(unsafe_code)]

//! Board-level orchestration.
//!
//! The board owns a fixed grid of rows and sequences every timed effect
//! from four independent countdown timers, checked in a fixed order each
//! tick:
//!
//! | timer | effect on fire |
//! |-------|----------------|
//! | auto-toggle | swap current/alternate pages, cascade every row to its new line |
//! | ghost-flip | every idle cell flips in place with configured probability |
//! | row-refresh | one random row flips to random symbols, then restores itself |
//! | full-refresh | every row flips to random symbols; once ALL settle, restore |
//!
//! # Tick contract
//!
//! `tick(dt)` polls the content feed, fires expired timers (each rearms to
//! its period), advances rows in ascending index order, processes settle
//! notices after the row loop, then aggregates flip cues for the audio
//! consumer. Everything happens synchronously; that total order
//! board→rows→cells is the ordering guarantee.
//!
//! # Failure Modes
//!
//! - Feed yields nothing: the board keeps showing the last good content.
//! - Full refresh requested mid-refresh: idempotent no-op.
//! - Malformed configuration: construction fails, nothing runs degraded.

use std::sync::Arc;
use std::time::Duration;

use crate::alphabet::Alphabet;
use crate::config::{BoardConfig, ConfigError};
use crate::events::FlipEvent;
use crate::feed::ContentFeed;
use crate::row::{Row, SettleToken};
use crate::rng::XorShift64;

/// Countdown that rearms to its period each time it fires.
#[derive(Debug, Clone)]
struct PeriodTimer {
    remaining: Duration,
    period: Duration,
}

impl PeriodTimer {
    fn new(period: Duration) -> Self {
        Self {
            remaining: period,
            period,
        }
    }

    /// Decrement by `dt`; true once when the period has elapsed.
    fn tick(&mut self, dt: Duration) -> bool {
        match self.remaining.checked_sub(dt) {
            Some(rest) if !rest.is_zero() => {
                self.remaining = rest;
                false
            }
            _ => {
                self.remaining = self.period;
                true
            }
        }
    }

    fn rearm(&mut self) {
        self.remaining = self.period;
    }
}

/// Why a settle notice was registered on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoticePurpose {
    RowRefresh,
    FullRefresh,
}

/// A fixed grid of split-flap rows plus the event timers that drive it.
pub struct Board {
    alphabet: Arc<Alphabet>,
    rows: Vec<Row>,
    current_pages: Vec<String>,
    alternate_pages: Vec<String>,
    toggle_timer: PeriodTimer,
    ghost_timer: PeriodTimer,
    row_refresh_timer: PeriodTimer,
    full_refresh_timer: PeriodTimer,
    ghost_probability: f64,
    refreshing: bool,
    outstanding_rows: usize,
    notice_purpose: Vec<Option<NoticePurpose>>,
    rng: XorShift64,
    feed: Option<Box<dyn ContentFeed>>,
    events: Vec<FlipEvent>,
}

impl Board {
    /// Validate `config` and build an all-blank board.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let alphabet = Arc::new(Alphabet::new(&config.charset, config.blank)?);
        let mut rng = match config.seed {
            Some(seed) => XorShift64::new(seed),
            None => XorShift64::from_entropy(),
        };
        let rows: Vec<Row> = (0..config.rows)
            .map(|_| Row::new(config.cols, alphabet.clone(), config.timing, &mut rng))
            .collect();
        let blank_line: String = std::iter::repeat_n(alphabet.blank(), config.cols).collect();
        Ok(Self {
            alphabet,
            notice_purpose: vec![None; rows.len()],
            current_pages: vec![blank_line.clone(); rows.len()],
            alternate_pages: vec![blank_line; rows.len()],
            rows,
            toggle_timer: PeriodTimer::new(config.toggle_period),
            ghost_timer: PeriodTimer::new(config.ghost_period),
            row_refresh_timer: PeriodTimer::new(config.row_refresh_period),
            full_refresh_timer: PeriodTimer::new(config.full_refresh_period),
            ghost_probability: config.ghost_probability,
            refreshing: false,
            outstanding_rows: 0,
            rng,
            feed: None,
            events: Vec::new(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Row::width)
    }

    /// A row for rendering or inspection.
    #[must_use]
    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    /// The intended (currently displayed) pages, one line per row.
    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.current_pages
    }

    /// Whether a full-board refresh pass is in progress.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// The alphabet shared by every cell.
    #[must_use]
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Attach the content feed polled at tick time.
    pub fn set_feed(&mut self, feed: Box<dyn ContentFeed>) {
        self.feed = Some(feed);
    }

    /// Replace displayed content outright, no animation. Startup only.
    ///
    /// The alternate slot is mirrored too, so a toggle that arrives before
    /// any staged content re-shows the same pages instead of blanks.
    pub fn set_pages_immediate(&mut self, pages: &[String]) {
        self.current_pages = self.fit_pages(pages);
        self.alternate_pages = self.current_pages.clone();
        for (row, line) in self.rows.iter_mut().zip(&self.current_pages) {
            row.set_text_immediate(line);
        }
    }

    /// Stage pages into the alternate slot; they appear on the next toggle.
    pub fn stage_pages(&mut self, pages: &[String]) {
        self.alternate_pages = self.fit_pages(pages);
    }

    /// Swap current/alternate pages and cascade every row to its new line.
    pub fn toggle_now(&mut self) {
        std::mem::swap(&mut self.current_pages, &mut self.alternate_pages);
        for (row, line) in self.rows.iter_mut().zip(&self.current_pages) {
            row.flip_to(line);
        }
        self.toggle_timer.rearm();
        crate::debug!("page toggle");
    }

    /// Start a full-board refresh: every row flips to random symbols, then
    /// restores its intended line once all rows have settled.
    ///
    /// A no-op while a pass is already in progress.
    pub fn refresh_now(&mut self) {
        if self.refreshing {
            crate::debug!("full refresh already in progress, ignoring");
            return;
        }
        self.refreshing = true;
        self.outstanding_rows = self.rows.len();
        for i in 0..self.rows.len() {
            let line = self.random_line();
            self.rows[i].flip_to(&line);
            self.rows[i].notify_on_settle(SettleToken);
            // Overrides any in-flight row-refresh; the full pass restores
            // the intended line anyway.
            self.notice_purpose[i] = Some(NoticePurpose::FullRefresh);
        }
        self.full_refresh_timer.rearm();
        crate::debug!(rows = self.rows.len(), "full refresh started");
    }

    /// Drive all state forward by `dt`. Call once per frame.
    pub fn tick(&mut self, dt: Duration) {
        // Out-of-band content hand-off; never blocks.
        if let Some(pages) = self.feed.as_mut().and_then(|feed| feed.poll()) {
            crate::debug!(lines = pages.len(), "staging fetched pages");
            self.alternate_pages = self.fit_pages(&pages);
        }

        // Timers fire in fixed order before rows advance.
        if self.toggle_timer.tick(dt) {
            self.toggle_now();
        }
        if self.ghost_timer.tick(dt) {
            self.ghost_pass();
        }
        if self.row_refresh_timer.tick(dt) {
            self.row_refresh();
        }
        if self.full_refresh_timer.tick(dt) {
            self.refresh_now();
        }

        // Rows advance in ascending index order; settle notices are
        // collected here and processed after the loop so a restore cascade
        // never reorders the advance pass itself.
        let mut settled: Vec<usize> = Vec::new();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if row.advance(dt).is_some() {
                settled.push(i);
            }
        }
        for i in settled {
            self.on_row_settled(i);
        }

        for (i, row) in self.rows.iter_mut().enumerate() {
            row.drain_events(i, &mut self.events);
        }
    }

    /// Take the flip cues queued since the last drain.
    pub fn drain_flip_events(&mut self) -> Vec<FlipEvent> {
        std::mem::take(&mut self.events)
    }

    fn on_row_settled(&mut self, index: usize) {
        match self.notice_purpose[index].take() {
            Some(NoticePurpose::RowRefresh) => {
                let line = self.current_pages[index].clone();
                self.rows[index].flip_to(&line);
                crate::debug!(row = index, "row refresh settling back");
            }
            Some(NoticePurpose::FullRefresh) => {
                self.outstanding_rows = self.outstanding_rows.saturating_sub(1);
                if self.outstanding_rows == 0 {
                    for i in 0..self.rows.len() {
                        let line = self.current_pages[i].clone();
                        self.rows[i].flip_to(&line);
                    }
                    self.refreshing = false;
                    crate::debug!("full refresh complete, restoring pages");
                }
            }
            None => {}
        }
    }

    /// Ghost-flip pass: every idle cell, independently, with configured
    /// probability.
    fn ghost_pass(&mut self) {
        let mut flipped = 0;
        for row in &mut self.rows {
            flipped += row.ghost_pass(self.ghost_probability, &mut self.rng);
        }
        if flipped > 0 {
            crate::trace!(cells = flipped, "ghost flips");
        }
    }

    /// Refresh one random row that has no pending settle notice.
    fn row_refresh(&mut self) {
        let candidates: Vec<usize> = (0..self.rows.len())
            .filter(|&i| !self.rows[i].has_settle_notice())
            .collect();
        let Some(&index) = candidates.get(self.rng.next_index(candidates.len())) else {
            return;
        };
        let line = self.random_line();
        self.rows[index].flip_to(&line);
        self.rows[index].notify_on_settle(SettleToken);
        self.notice_purpose[index] = Some(NoticePurpose::RowRefresh);
        crate::debug!(row = index, "row refresh started");
    }

    /// A row-width string of random alphabet symbols.
    fn random_line(&mut self) -> String {
        let width = self.width();
        let mut line = String::with_capacity(width);
        for _ in 0..width {
            line.push(self.alphabet.random_symbol(&mut self.rng));
        }
        line
    }

    /// Pad or truncate a page set to one line per row; rows normalize line
    /// width themselves.
    fn fit_pages(&self, pages: &[String]) -> Vec<String> {
        (0..self.rows.len())
            .map(|i| pages.get(i).cloned().unwrap_or_default())
            .collect()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("rows", &self.rows.len())
            .field("cols", &self.width())
            .field("refreshing", &self.refreshing)
            .field("has_feed", &self.feed.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlipTiming;

    const STEP: Duration = Duration::from_millis(10);

    /// Deterministic config with far-off timers so individual effects can
    /// be exercised in isolation.
    fn quiet_config(rows: usize, cols: usize) -> BoardConfig {
        BoardConfig {
            rows,
            cols,
            timing: FlipTiming {
                jitter: Duration::ZERO,
                ..FlipTiming::default()
            },
            toggle_period: Duration::from_secs(3600),
            ghost_period: Duration::from_secs(3600),
            row_refresh_period: Duration::from_secs(3600),
            full_refresh_period: Duration::from_secs(3600),
            seed: Some(42),
            ..Default::default()
        }
    }

    fn settle(board: &mut Board) {
        for _ in 0..20_000 {
            if (0..board.height()).all(|i| board.row(i).is_settled()) && !board.is_refreshing() {
                return;
            }
            board.tick(STEP);
        }
        panic!("board never settled");
    }

    fn texts(board: &Board) -> Vec<String> {
        (0..board.height()).map(|i| board.row(i).text()).collect()
    }

    #[test]
    fn construction_rejects_bad_config() {
        assert!(Board::new(quiet_config(0, 5)).is_err());
        assert!(Board::new(quiet_config(5, 0)).is_err());
    }

    #[test]
    fn new_board_is_blank_and_settled() {
        let board = Board::new(quiet_config(2, 4)).unwrap();
        assert_eq!(texts(&board), vec!["    ", "    "]);
        assert!(!board.is_refreshing());
    }

    #[test]
    fn toggle_swaps_pages_and_cascades() {
        let mut board = Board::new(quiet_config(2, 4)).unwrap();
        board.set_pages_immediate(&["AAAA".into(), "BBBB".into()]);
        board.stage_pages(&["CCCC".into(), "DDDD".into()]);
        board.toggle_now();
        settle(&mut board);
        assert_eq!(texts(&board), vec!["CCCC", "DDDD"]);
        // Toggling back restores the originals.
        board.toggle_now();
        settle(&mut board);
        assert_eq!(texts(&board), vec!["AAAA", "BBBB"]);
    }

    #[test]
    fn auto_toggle_timer_fires_and_rearms() {
        // Period shorter than the other timers, expired with one big tick
        // so it cannot re-fire while the cascade settles.
        let mut cfg = quiet_config(1, 3);
        cfg.toggle_period = Duration::from_secs(1000);
        let mut board = Board::new(cfg).unwrap();
        board.set_pages_immediate(&["AAA".into()]);
        board.stage_pages(&["BBB".into()]);
        board.tick(Duration::from_secs(1000));
        settle(&mut board);
        assert_eq!(texts(&board), vec!["BBB"]);
        // Rearmed: the next expiry toggles back.
        board.stage_pages(&["AAA".into()]);
        board.tick(Duration::from_secs(1000));
        settle(&mut board);
        assert_eq!(texts(&board), vec!["AAA"]);
    }

    #[test]
    fn feed_content_lands_in_alternate_slot() {
        let mut board = Board::new(quiet_config(1, 5)).unwrap();
        board.set_pages_immediate(&["FIRST".into()]);
        let mut served = false;
        board.set_feed(Box::new(move || {
            if served {
                None
            } else {
                served = true;
                Some(vec!["NEXT".to_string()])
            }
        }));
        board.tick(STEP);
        // Current content untouched until a toggle.
        assert_eq!(texts(&board), vec!["FIRST"]);
        board.toggle_now();
        settle(&mut board);
        assert_eq!(texts(&board), vec!["NEXT "]);
    }

    #[test]
    fn feed_silence_keeps_prior_content() {
        let mut board = Board::new(quiet_config(1, 5)).unwrap();
        board.set_pages_immediate(&["HELLO".into()]);
        board.stage_pages(&["WORLD".into()]);
        board.set_feed(Box::new(|| None));
        for _ in 0..10 {
            board.tick(STEP);
        }
        board.toggle_now();
        settle(&mut board);
        assert_eq!(texts(&board), vec!["WORLD"]);
    }

    #[test]
    fn full_refresh_restores_intended_text() {
        let mut board = Board::new(quiet_config(2, 4)).unwrap();
        board.set_pages_immediate(&["AB12".into(), "CD34".into()]);
        board.refresh_now();
        assert!(board.is_refreshing());
        settle(&mut board);
        assert!(!board.is_refreshing());
        assert_eq!(texts(&board), vec!["AB12", "CD34"]);
    }

    #[test]
    fn refresh_flag_holds_until_all_rows_report() {
        let mut board = Board::new(quiet_config(2, 3)).unwrap();
        board.set_pages_immediate(&["AAA".into(), "BBB".into()]);
        board.refresh_now();
        let mut saw_refreshing_ticks = 0;
        for _ in 0..20_000 {
            if !board.is_refreshing() {
                break;
            }
            board.tick(STEP);
            saw_refreshing_ticks += 1;
        }
        assert!(!board.is_refreshing());
        assert!(saw_refreshing_ticks > 1, "refresh should span many ticks");
        settle(&mut board);
        assert_eq!(texts(&board), vec!["AAA", "BBB"]);
    }

    #[test]
    fn overlapping_refresh_is_idempotent() {
        // Two boards, same seed: one asks once, one asks repeatedly while
        // the pass is in flight. Their tick-by-tick states must match.
        let mut once = Board::new(quiet_config(2, 4)).unwrap();
        let mut twice = Board::new(quiet_config(2, 4)).unwrap();
        let pages = ["GATE".to_string(), "A 12".to_string()];
        once.set_pages_immediate(&pages);
        twice.set_pages_immediate(&pages);

        once.refresh_now();
        twice.refresh_now();
        twice.refresh_now();
        twice.refresh_now();

        for _ in 0..5_000 {
            once.tick(STEP);
            twice.tick(STEP);
            assert_eq!(texts(&once), texts(&twice));
            assert_eq!(once.is_refreshing(), twice.is_refreshing());
        }
        assert!(!once.is_refreshing());
        assert_eq!(texts(&once), vec!["GATE", "A 12"]);
    }

    #[test]
    fn row_refresh_restores_one_row() {
        let mut cfg = quiet_config(3, 4);
        cfg.row_refresh_period = Duration::from_secs(1000);
        let mut board = Board::new(cfg).unwrap();
        board.set_pages_immediate(&["AAAA".into(), "BBBB".into(), "CCCC".into()]);
        board.tick(Duration::from_secs(1000));
        // Some row is now cascading toward random content.
        assert!((0..3).any(|i| board.row(i).has_settle_notice()));
        settle(&mut board);
        assert_eq!(texts(&board), vec!["AAAA", "BBBB", "CCCC"]);
    }

    #[test]
    fn ghost_timer_flips_and_settles_back() {
        let mut cfg = quiet_config(1, 4);
        cfg.ghost_period = Duration::from_secs(1000);
        cfg.ghost_probability = 1.0;
        let mut board = Board::new(cfg).unwrap();
        board.set_pages_immediate(&["WXYZ".into()]);
        board.tick(Duration::from_secs(1000));
        assert!(!board.row(0).is_settled());
        settle(&mut board);
        assert_eq!(texts(&board), vec!["WXYZ"]);
        // Two cues per cell: close and open.
        let events = board.drain_flip_events();
        assert_eq!(events.len(), 8);
    }

    #[test]
    fn events_drain_once() {
        let mut board = Board::new(quiet_config(1, 2)).unwrap();
        board.set_pages_immediate(&["AB".into()]);
        board.stage_pages(&["BA".into()]);
        board.toggle_now();
        settle(&mut board);
        assert!(!board.drain_flip_events().is_empty());
        assert!(board.drain_flip_events().is_empty());
    }
}
