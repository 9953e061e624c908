#![forbid(unsafe_code)]

//! One split-flap character slot.
//!
//! A cell is a three-state hinge machine: `Idle`, `Closing` (the top flap
//! folds down over the current symbol), `Opening` (the bottom flap opens on
//! the committed one). A mechanical unit cannot jump to an arbitrary flap,
//! so reaching a target means chaining single-step flips — one alphabet
//! position per close→open cycle — until `current == target`.
//!
//! # Invariants
//!
//! 1. `current == target` whenever the cell is idle.
//! 2. `next` is only meaningful while a flip is in flight.
//! 3. Each single-step flip emits exactly two [`FlipEventKind`] cues:
//!    `Close` on flip start, `Open` on commit.
//! 4. The cell owns its timers exclusively; nothing outside `advance`
//!    mutates phase or elapsed time.
//!
//! # Failure Modes
//!
//! None. Out-of-alphabet input coerces to the blank symbol; a flip in
//! flight always runs to its natural end and can only be redirected by
//! changing `target` before the next phase boundary.

use std::sync::Arc;
use std::time::Duration;

use crate::alphabet::Alphabet;
use crate::config::FlipTiming;
use crate::events::FlipEventKind;
use crate::rng::XorShift64;

/// Floor for sampled phase durations; jitter never collapses a phase.
const MIN_PHASE: Duration = Duration::from_millis(1);

/// Where the hinge is in its two-phase cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipPhase {
    /// Settled; `current` is fully visible.
    #[default]
    Idle,
    /// Top half folding down.
    Closing,
    /// Bottom half opening on the committed symbol.
    Opening,
}

/// Per-frame snapshot consumed by the renderer.
///
/// `progress` is elapsed time over the effective phase duration, clamped to
/// `[0, 1]`; it is `0.0` while idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipView {
    /// Settled symbol (idle) or the symbol being vacated (mid-flip).
    pub current: char,
    /// Symbol that becomes `current` when the closing phase commits.
    pub next: char,
    /// Hinge phase.
    pub phase: FlipPhase,
    /// Phase progress fraction in `[0, 1]`.
    pub progress: f32,
}

/// A single flap position.
#[derive(Debug, Clone)]
pub struct Cell {
    alphabet: Arc<Alphabet>,
    timing: FlipTiming,
    rng: XorShift64,
    current: char,
    target: char,
    next: char,
    phase: FlipPhase,
    elapsed: Duration,
    // Effective durations for the flip in flight, sampled at flip start.
    close_effective: Duration,
    open_effective: Duration,
    ghost: bool,
    events: Vec<FlipEventKind>,
}

impl Cell {
    /// Build an idle cell showing the blank symbol.
    #[must_use]
    pub fn new(alphabet: Arc<Alphabet>, timing: FlipTiming, rng: XorShift64) -> Self {
        let blank = alphabet.blank();
        Self {
            alphabet,
            timing,
            rng,
            current: blank,
            target: blank,
            next: blank,
            phase: FlipPhase::Idle,
            elapsed: Duration::ZERO,
            close_effective: timing.close,
            open_effective: timing.open,
            ghost: false,
            events: Vec::new(),
        }
    }

    /// The settled (or being-vacated) symbol.
    #[must_use]
    pub fn current(&self) -> char {
        self.current
    }

    /// The symbol the cell is being driven toward.
    #[must_use]
    pub fn target(&self) -> char {
        self.target
    }

    /// Current hinge phase.
    #[must_use]
    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    /// Whether the cell is settled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == FlipPhase::Idle
    }

    /// Whether the flip in flight is a cosmetic no-op flip.
    #[must_use]
    pub fn is_ghost(&self) -> bool {
        self.ghost
    }

    /// Force the cell to show `symbol` with no animation. Startup only.
    pub fn set_immediate(&mut self, symbol: char) {
        let c = self.alphabet.coerce(symbol);
        self.current = c;
        self.target = c;
        self.next = c;
        self.phase = FlipPhase::Idle;
        self.elapsed = Duration::ZERO;
        self.ghost = false;
    }

    /// Set the drive target. Animation starts lazily on a later `advance`
    /// while idle with `current != target`.
    pub fn queue_target(&mut self, symbol: char) {
        self.target = self.alphabet.coerce(symbol);
    }

    /// Begin one single-step flip.
    ///
    /// Ghost flips cycle the hinge but settle back on the same symbol, at
    /// the configured slowdown; they are purely cosmetic idle-time motion.
    pub fn start_flip(&mut self, ghost: bool) {
        self.next = if ghost {
            self.current
        } else {
            self.alphabet.successor(self.current)
        };
        self.ghost = ghost;
        self.close_effective = self.sample_phase(self.timing.close, ghost);
        self.open_effective = self.sample_phase(self.timing.open, ghost);
        self.phase = FlipPhase::Closing;
        self.elapsed = Duration::ZERO;
        self.events.push(FlipEventKind::Close);
    }

    /// Sample an effective phase duration: nominal ± jitter, slowed for
    /// ghost flips, floored so a phase always takes observable time.
    fn sample_phase(&mut self, nominal: Duration, ghost: bool) -> Duration {
        let jitter = self.rng.jitter_nanos(self.timing.jitter);
        let nanos = (nominal.as_nanos() as i64 + jitter).max(0) as u64;
        let mut dur = Duration::from_nanos(nanos);
        if ghost {
            dur = dur.mul_f64(self.timing.ghost_slowdown);
        }
        dur.max(MIN_PHASE)
    }

    /// Advance the hinge by `dt`. Called unconditionally every tick.
    pub fn advance(&mut self, dt: Duration) {
        match self.phase {
            FlipPhase::Idle => {
                if self.current != self.target {
                    // The starting tick does not also accumulate.
                    self.start_flip(false);
                }
            }
            FlipPhase::Closing => {
                self.elapsed += dt;
                if self.elapsed >= self.close_effective {
                    // Fully closed: commit to the next symbol.
                    self.current = self.next;
                    self.elapsed = Duration::ZERO;
                    self.phase = FlipPhase::Opening;
                    self.events.push(FlipEventKind::Open);
                }
            }
            FlipPhase::Opening => {
                self.elapsed += dt;
                if self.elapsed >= self.open_effective {
                    self.elapsed = Duration::ZERO;
                    if self.current == self.target {
                        self.phase = FlipPhase::Idle;
                        self.ghost = false;
                    } else {
                        // Keep marching, one alphabet position per cycle.
                        self.start_flip(false);
                    }
                }
            }
        }
    }

    /// Snapshot for the renderer.
    #[must_use]
    pub fn view(&self) -> FlipView {
        let progress = match self.phase {
            FlipPhase::Idle => 0.0,
            FlipPhase::Closing => phase_fraction(self.elapsed, self.close_effective),
            FlipPhase::Opening => phase_fraction(self.elapsed, self.open_effective),
        };
        FlipView {
            current: self.current,
            next: self.next,
            phase: self.phase,
            progress,
        }
    }

    /// Take the flip cues queued since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, FlipEventKind> {
        self.events.drain(..)
    }
}

fn phase_fraction(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOSE: Duration = Duration::from_millis(70);
    const OPEN: Duration = Duration::from_millis(90);

    /// Jitter-free timing so phase boundaries land exactly.
    fn timing() -> FlipTiming {
        FlipTiming {
            close: CLOSE,
            open: OPEN,
            jitter: Duration::ZERO,
            ghost_slowdown: 2.0,
            inter_flap_delay: Duration::from_millis(60),
        }
    }

    fn cell() -> Cell {
        Cell::new(Arc::new(Alphabet::default()), timing(), XorShift64::new(1))
    }

    #[test]
    fn starts_idle_and_blank() {
        let c = cell();
        assert_eq!(c.current(), ' ');
        assert_eq!(c.target(), ' ');
        assert!(c.is_idle());
    }

    #[test]
    fn set_immediate_coerces_and_stays_idle() {
        let mut c = cell();
        c.set_immediate('K');
        assert_eq!(c.current(), 'K');
        assert_eq!(c.target(), 'K');
        // Non-members coerce to blank at the cell level, lowercase included.
        c.set_immediate('q');
        assert_eq!(c.current(), ' ');
        assert_eq!(c.target(), ' ');
        assert!(c.is_idle());
        assert_eq!(c.drain_events().count(), 0);
    }

    #[test]
    fn queue_target_nonmember_drives_to_blank() {
        let mut c = cell();
        c.set_immediate('A');
        c.queue_target('a');
        assert_eq!(c.target(), ' ');
        c.advance(Duration::ZERO);
        assert_eq!(c.phase(), FlipPhase::Closing);
    }

    #[test]
    fn queue_target_does_not_start_animation() {
        let mut c = cell();
        c.queue_target('B');
        assert!(c.is_idle());
        assert_eq!(c.current(), ' ');
    }

    #[test]
    fn settled_idle_advance_is_noop() {
        let mut c = cell();
        c.set_immediate('A');
        for _ in 0..100 {
            c.advance(Duration::from_millis(16));
        }
        assert_eq!(c.current(), 'A');
        assert!(c.is_idle());
        assert_eq!(c.drain_events().count(), 0);
    }

    #[test]
    fn single_step_flip_advances_one_position() {
        let mut c = cell();
        c.queue_target('A'); // successor of blank
        c.advance(Duration::ZERO); // idle + mismatch -> flip starts
        assert_eq!(c.phase(), FlipPhase::Closing);
        c.advance(CLOSE); // commit
        assert_eq!(c.phase(), FlipPhase::Opening);
        assert_eq!(c.current(), 'A');
        c.advance(OPEN); // settle
        assert!(c.is_idle());
        assert_eq!(c.current(), 'A');
    }

    #[test]
    fn flip_emits_close_then_open() {
        let mut c = cell();
        c.queue_target('A');
        c.advance(Duration::ZERO);
        c.advance(CLOSE);
        c.advance(OPEN);
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(events, vec![FlipEventKind::Close, FlipEventKind::Open]);
    }

    #[test]
    fn multi_step_march_chains_flips() {
        let mut c = cell();
        c.queue_target('C'); // blank -> A -> B -> C, three cycles
        let mut cycles = 0;
        while !c.is_idle() || c.current() != 'C' {
            c.advance(Duration::ZERO);
            c.advance(CLOSE);
            c.advance(OPEN);
            cycles += 1;
            assert!(cycles <= 3, "march overshot");
        }
        assert_eq!(cycles, 3);
        assert_eq!(c.drain_events().count(), 6);
    }

    #[test]
    fn ghost_flip_returns_to_same_symbol() {
        let mut c = cell();
        c.set_immediate('K');
        c.start_flip(true);
        assert!(c.is_ghost());
        // Ghost phases run at the slowdown multiplier.
        c.advance(CLOSE.mul_f64(2.0));
        assert_eq!(c.phase(), FlipPhase::Opening);
        assert_eq!(c.current(), 'K');
        c.advance(OPEN.mul_f64(2.0));
        assert!(c.is_idle());
        assert!(!c.is_ghost());
        assert_eq!(c.current(), 'K');
        assert_eq!(c.drain_events().count(), 2);
    }

    #[test]
    fn ghost_slowdown_delays_commit() {
        let mut c = cell();
        c.set_immediate('K');
        c.start_flip(true);
        // Nominal close time is not enough when slowed 2x.
        c.advance(CLOSE);
        assert_eq!(c.phase(), FlipPhase::Closing);
    }

    #[test]
    fn retarget_mid_flight_redirects_at_phase_boundary() {
        let mut c = cell();
        c.queue_target('A');
        c.advance(Duration::ZERO);
        c.advance(CLOSE); // committed to 'A', opening
        c.queue_target('B'); // redirect while in flight
        c.advance(OPEN); // boundary re-evaluates target -> new flip
        assert_eq!(c.phase(), FlipPhase::Closing);
        c.advance(CLOSE);
        c.advance(OPEN);
        assert!(c.is_idle());
        assert_eq!(c.current(), 'B');
    }

    #[test]
    fn view_progress_clamped() {
        let mut c = cell();
        c.queue_target('A');
        c.advance(Duration::ZERO);
        c.advance(Duration::from_millis(35));
        let v = c.view();
        assert_eq!(v.phase, FlipPhase::Closing);
        assert!((v.progress - 0.5).abs() < 1e-3);
        assert_eq!(v.next, 'A');

        let idle = cell().view();
        assert_eq!(idle.progress, 0.0);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut t = timing();
        t.jitter = Duration::from_millis(8);
        let mut c = Cell::new(Arc::new(Alphabet::default()), t, XorShift64::new(99));
        for _ in 0..50 {
            c.start_flip(false);
            assert!(c.close_effective >= CLOSE - t.jitter);
            assert!(c.close_effective <= CLOSE + t.jitter);
            assert!(c.open_effective >= OPEN - t.jitter);
            assert!(c.open_effective <= OPEN + t.jitter);
            c.set_immediate(' ');
        }
    }
}
