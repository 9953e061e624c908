#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII wrapper around the terminal state the demo touches: raw mode,
//! alternate screen, hidden cursor. Everything is restored in reverse
//! order on drop, which also runs during panic unwinding, so no exit path
//! leaves the user's shell in raw mode.

use std::io::{self, Write};

use crossterm::{cursor, execute, terminal};

/// Holds the terminal in demo mode for its lifetime.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enter raw mode, switch to the alternate screen, hide the cursor,
    /// and clear.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        ) {
            // Half-entered state: undo raw mode before bailing.
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = out.flush();
    }
}
