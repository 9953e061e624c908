#![forbid(unsafe_code)]

//! The ordered character set a board can display.
//!
//! A split-flap module carries a fixed ring of printed flaps; advancing the
//! hinge moves exactly one position along that ring, wrapping from the last
//! flap back to the first. [`Alphabet`] models the ring: position defines the
//! total order, [`successor`](Alphabet::successor) is the one-step advance,
//! and anything a caller feeds in that is not on the ring coerces to the
//! designated blank flap.
//!
//! # Invariants
//!
//! 1. Symbols are distinct and each occupies a single terminal column.
//! 2. The blank symbol is a member of the set.
//! 3. `coerce` is total: every `char` maps to a member symbol.
//! 4. The set is immutable after construction; share it as `Arc<Alphabet>`.
//!
//! # Failure Modes
//!
//! Construction is the only fallible operation; an empty set, a duplicate,
//! a wide symbol, or a blank outside the set is a [`ConfigError`]. After
//! that, nothing here can fail — bad input is coerced, never rejected.

use std::collections::HashMap;

use unicode_width::UnicodeWidthChar;

use crate::config::ConfigError;
use crate::rng::XorShift64;

/// Character ring typical of airport split-flap boards.
pub const DEFAULT_CHARSET: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.-/'#:";

/// Default blank flap.
pub const DEFAULT_BLANK: char = ' ';

/// An ordered, fixed set of displayable symbols with a designated blank.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
    blank_index: usize,
}

impl Alphabet {
    /// Validate and build an alphabet from its symbols in flap order.
    pub fn new(symbols: &str, blank: char) -> Result<Self, ConfigError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if UnicodeWidthChar::width(c) != Some(1) {
                return Err(ConfigError::WideSymbol(c));
            }
            if index.insert(c, i).is_some() {
                return Err(ConfigError::DuplicateSymbol(c));
            }
        }

        let blank_index = *index
            .get(&blank)
            .ok_or(ConfigError::BlankNotInAlphabet(blank))?;

        Ok(Self {
            symbols,
            index,
            blank_index,
        })
    }

    /// Number of flaps on the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; kept for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The designated blank symbol.
    #[must_use]
    pub fn blank(&self) -> char {
        self.symbols[self.blank_index]
    }

    /// Whether `c` is a member symbol, without coercion.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    /// Ring position of a member symbol.
    #[must_use]
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    /// Map any input character onto the ring.
    ///
    /// Members pass through unchanged; everything else becomes the blank
    /// symbol, including lowercase letters. Case folding is a text-level
    /// concern handled by row normalization before coercion.
    #[must_use]
    pub fn coerce(&self, c: char) -> char {
        if self.contains(c) { c } else { self.blank() }
    }

    /// The next symbol in flap order, wrapping past the end of the ring.
    #[must_use]
    pub fn successor(&self, c: char) -> char {
        let i = self
            .index_of(self.coerce(c))
            .unwrap_or(self.blank_index);
        self.symbols[(i + 1) % self.symbols.len()]
    }

    /// A uniformly random member symbol.
    pub fn random_symbol(&self, rng: &mut XorShift64) -> char {
        self.symbols[rng.next_index(self.symbols.len())]
    }

    /// The symbols in flap order.
    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_CHARSET, DEFAULT_BLANK).expect("built-in charset is valid")
    }
}
