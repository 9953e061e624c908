#![forbid(unsafe_code)]

//! Phase-aware board renderer.
//!
//! A terminal cell cannot show a half-folded flap, so the renderer
//! approximates the hinge from each cell's [`FlipView`]: through the first
//! half of the closing phase the vacating symbol is still visible, past
//! the midpoint the incoming symbol takes over, and mid-flip cells render
//! dim so the snap back to full brightness reads as the flap landing.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Attribute, Print, SetAttribute},
};
use flap_core::{Board, FlipPhase, FlipView};
use unicode_width::UnicodeWidthStr;

const ORIGIN_X: u16 = 2;
const ORIGIN_Y: u16 = 2;
const TITLE: &str = "F L A P B O A R D";

/// Queue a full frame and flush it.
pub fn draw(out: &mut impl Write, board: &Board, clacks: u64) -> io::Result<()> {
    // Cells are spaced one column apart, like flaps in a bezel.
    let board_width = board.width() * 2;
    let pad = board_width.saturating_sub(TITLE.width()) / 2;
    queue!(
        out,
        cursor::MoveTo(ORIGIN_X, 0),
        Print(" ".repeat(pad)),
        Print(TITLE)
    )?;

    for row_index in 0..board.height() {
        queue!(out, cursor::MoveTo(ORIGIN_X, ORIGIN_Y + row_index as u16))?;
        for view in board.row(row_index).views() {
            queue!(
                out,
                SetAttribute(attribute_for(&view)),
                Print(glyph_for(&view)),
                SetAttribute(Attribute::Reset),
                Print(' ')
            )?;
        }
    }

    let status_y = ORIGIN_Y + board.height() as u16 + 1;
    queue!(
        out,
        cursor::MoveTo(ORIGIN_X, status_y),
        SetAttribute(Attribute::Dim),
        // Left-pad the counter so a shrinking number leaves no residue.
        Print(format!(
            "SPACE toggle   R refresh   Q quit   clacks {clacks:<12}"
        )),
        SetAttribute(Attribute::Reset)
    )?;
    out.flush()
}

/// Which symbol occupies the cell at this point in the hinge cycle.
fn glyph_for(view: &FlipView) -> char {
    match view.phase {
        FlipPhase::Idle | FlipPhase::Opening => view.current,
        FlipPhase::Closing if view.progress >= 0.5 => view.next,
        FlipPhase::Closing => view.current,
    }
}

/// Mid-flip cells dim; settled and nearly-open cells are full brightness.
fn attribute_for(view: &FlipView) -> Attribute {
    match view.phase {
        FlipPhase::Idle => Attribute::Reset,
        FlipPhase::Closing => Attribute::Dim,
        FlipPhase::Opening if view.progress < 0.5 => Attribute::Dim,
        FlipPhase::Opening => Attribute::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(phase: FlipPhase, progress: f32) -> FlipView {
        FlipView {
            current: 'A',
            next: 'B',
            phase,
            progress,
        }
    }

    #[test]
    fn idle_shows_current_at_full_brightness() {
        let v = view(FlipPhase::Idle, 0.0);
        assert_eq!(glyph_for(&v), 'A');
        assert_eq!(attribute_for(&v), Attribute::Reset);
    }

    #[test]
    fn closing_switches_to_next_at_midpoint() {
        assert_eq!(glyph_for(&view(FlipPhase::Closing, 0.2)), 'A');
        assert_eq!(glyph_for(&view(FlipPhase::Closing, 0.5)), 'B');
        assert_eq!(glyph_for(&view(FlipPhase::Closing, 0.9)), 'B');
    }

    #[test]
    fn opening_always_shows_committed_symbol() {
        assert_eq!(glyph_for(&view(FlipPhase::Opening, 0.1)), 'A');
        assert_eq!(glyph_for(&view(FlipPhase::Opening, 0.9)), 'A');
    }

    #[test]
    fn brightness_returns_in_late_open() {
        assert_eq!(attribute_for(&view(FlipPhase::Opening, 0.2)), Attribute::Dim);
        assert_eq!(
            attribute_for(&view(FlipPhase::Opening, 0.8)),
            Attribute::Reset
        );
    }
}
