#![forbid(unsafe_code)]

//! Rotating static page sets.
//!
//! The classic demo content: two departures boards that the auto-toggle
//! alternates between. Each `next_pages` call serves the next set in
//! round-robin order.

use crate::{PageSource, SourceError};

/// A source that cycles through a fixed list of page sets.
#[derive(Debug, Clone)]
pub struct StaticPages {
    name: String,
    sets: Vec<Vec<String>>,
    cursor: usize,
}

impl StaticPages {
    /// Build a rotating source from explicit page sets.
    #[must_use]
    pub fn new(name: impl Into<String>, sets: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            sets,
            cursor: 0,
        }
    }

    /// The two-board airport departures demo.
    #[must_use]
    pub fn departures_demo() -> Self {
        let a = [
            "NEW YORK  JFK  AA123 ",
            "BOSTON     BOS  DL987",
            "CHICAGO    ORD  UA452",
            "LOS ANGELES LAX SW330",
            "SEATTLE    SEA  AS808",
            "MIAMI      MIA  AA455",
        ];
        let b = [
            "SAN DIEGO  SAN UA987 ",
            "ATLANTA    ATL DL204",
            "DALLAS     DFW AA540",
            "DENVER     DEN UA311",
            "PHOENIX    PHX SW209",
            "LAS VEGAS  LAS NK701",
        ];
        let to_set = |lines: &[&str]| lines.iter().map(|s| (*s).to_string()).collect();
        Self::new("departures", vec![to_set(&a), to_set(&b)])
    }
}

impl PageSource for StaticPages {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_pages(&mut self) -> Result<Vec<String>, SourceError> {
        if self.sets.is_empty() {
            return Err(SourceError::Unavailable(format!(
                "static source '{}' has no page sets",
                self.name
            )));
        }
        let pages = self.sets[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.sets.len();
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_round_robin() {
        let mut src = StaticPages::new(
            "test",
            vec![vec!["A".into()], vec!["B".into()], vec!["C".into()]],
        );
        assert_eq!(src.next_pages().unwrap(), vec!["A"]);
        assert_eq!(src.next_pages().unwrap(), vec!["B"]);
        assert_eq!(src.next_pages().unwrap(), vec!["C"]);
        assert_eq!(src.next_pages().unwrap(), vec!["A"]);
    }

    #[test]
    fn empty_source_is_unavailable() {
        let mut src = StaticPages::new("empty", Vec::new());
        assert!(src.next_pages().is_err());
    }

    #[test]
    fn departures_demo_has_two_six_line_boards() {
        let mut src = StaticPages::departures_demo();
        let first = src.next_pages().unwrap();
        let second = src.next_pages().unwrap();
        assert_eq!(first.len(), 6);
        assert_eq!(second.len(), 6);
        assert_ne!(first, second);
        // Third fetch wraps back to the first board.
        assert_eq!(src.next_pages().unwrap(), first);
    }
}
