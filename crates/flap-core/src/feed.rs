#![forbid(unsafe_code)]

//! Non-blocking content handoff into the board.
//!
//! Content providers (weather, clock, static pages) may have real latency;
//! the board never waits on them. Instead it polls a [`ContentFeed`] once
//! per tick: `poll` must return immediately, handing over the most recent
//! unseen page set or `None`. A failed or still-running fetch simply yields
//! `None` and the board keeps cascading the last good content.

/// A single-slot, non-blocking source of page content.
pub trait ContentFeed {
    /// Take the most recent unseen page set, one line per row.
    ///
    /// Must never block. Returning the same content twice is harmless but
    /// wasteful; implementations normally `take()` out of a slot.
    fn poll(&mut self) -> Option<Vec<String>>;
}

/// Closures work as feeds; handy for tests and simple wiring.
impl<F> ContentFeed for F
where
    F: FnMut() -> Option<Vec<String>>,
{
    fn poll(&mut self) -> Option<Vec<String>> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_feed_polls_through() {
        let mut served = false;
        let mut feed = move || {
            if served {
                None
            } else {
                served = true;
                Some(vec!["HELLO".to_string()])
            }
        };
        assert_eq!(feed.poll(), Some(vec!["HELLO".to_string()]));
        assert_eq!(feed.poll(), None);
    }
}
