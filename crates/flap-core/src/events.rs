#![forbid(unsafe_code)]

//! Flip notifications for the audio collaborator.
//!
//! Each single-step flip produces exactly two events: one when the hinge
//! starts closing and one when it commits into the opening phase. Events are
//! queued during [`Board::tick`](crate::board::Board::tick) and drained by
//! the caller; there are no callbacks, so the consumer decides per frame
//! what (if anything) to play. Draining is destructive — events are not
//! replayed.

/// Which hinge transition produced the cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipEventKind {
    /// The top flap started folding down.
    Close,
    /// The flap committed; the bottom half is opening on the new symbol.
    Open,
}

/// One flip cue, tagged with the cell that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipEvent {
    /// Row index, ascending from the top of the board.
    pub row: usize,
    /// Column index, ascending left to right.
    pub col: usize,
    /// Hinge transition.
    pub kind: FlipEventKind,
}
