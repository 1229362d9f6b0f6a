use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Order in which a key's bytes are consumed while walking the trie.
///
/// Both directions share one tree: putting `b"ab"` reversed lands on the same
/// node as putting `b"ba"` forward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Direction {
    /// First byte to last.
    #[default]
    Forward,
    /// Last byte to first.
    Reversed,
}

impl Direction {
    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Reversed,
            Direction::Reversed => Direction::Forward,
        }
    }

    pub(crate) fn cursor(self, key: &[u8]) -> Option<Cursor<'_>> {
        if key.is_empty() {
            return None;
        }
        Some(Cursor {
            key,
            dir: self,
            step: 0,
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Forward => "forward",
            Direction::Reversed => "reversed",
        })
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "fwd" => Ok(Direction::Forward),
            "reversed" | "reverse" | "rev" => Ok(Direction::Reversed),
            _ => Err(Error::InvalidDirection(s.to_owned())),
        }
    }
}

/// Position within a non-empty key, counted in traversal steps.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'k> {
    key: &'k [u8],
    dir: Direction,
    step: usize,
}

impl Cursor<'_> {
    #[inline]
    pub(crate) fn byte(&self) -> u8 {
        match self.dir {
            Direction::Forward => self.key[self.step],
            Direction::Reversed => self.key[self.key.len() - 1 - self.step],
        }
    }

    #[inline]
    pub(crate) fn is_last(&self) -> bool {
        self.step + 1 == self.key.len()
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        debug_assert!(!self.is_last());
        self.step += 1;
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.step
    }
}
