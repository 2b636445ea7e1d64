//! # Grid Directions and Passage Masks
//!
//! Each maze cell carries a 4-bit mask of open walls:
//!
//! ```text
//! bit0 = North   bit1 = East   bit2 = South   bit3 = West
//! ```
//!
//! The grid origin is the top-left cell; y grows southwards.

use serde::{Deserialize, Serialize};

/// One of the four cardinal directions on the maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Towards y - 1.
    North = 0,
    /// Towards x + 1.
    East = 1,
    /// Towards y + 1.
    South = 2,
    /// Towards x - 1.
    West = 3,
}

impl Direction {
    /// All directions in bit order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The mask bit for this direction.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// The direction pointing back.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Grid offset `(dx, dy)` of one step in this direction.
    #[inline]
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Lower-case name used in player-facing text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Parses a direction word or abbreviation, case-insensitively.
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Some(Self::North),
            "e" | "east" => Some(Self::East),
            "s" | "south" => Some(Self::South),
            "w" | "west" => Some(Self::West),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A 4-bit set of open directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Passages(u8);

impl Passages {
    /// No open walls.
    pub const NONE: Self = Self(0);
    /// Every wall open.
    pub const ALL: Self = Self(0b1111);

    /// Creates a mask from raw bits, rejecting values outside `[0, 15]`.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits > 0b1111 {
            None
        } else {
            Some(Self(bits))
        }
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Checks whether `dir` is open.
    #[inline]
    #[must_use]
    pub const fn contains(self, dir: Direction) -> bool {
        (self.0 & dir.bit()) != 0
    }

    /// Opens `dir`.
    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    /// Combines two masks.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Keeps only directions open in both masks.
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns true if no direction is open.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of open directions.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates open directions in bit order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl From<Direction> for Passages {
    fn from(dir: Direction) -> Self {
        Self(dir.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_match_layout_convention() {
        assert_eq!(Direction::North.bit(), 1);
        assert_eq!(Direction::East.bit(), 2);
        assert_eq!(Direction::South.bit(), 4);
        assert_eq!(Direction::West.bit(), 8);
    }

    #[test]
    fn test_opposites_cancel_deltas() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0), "{dir} and its opposite");
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_parse_abbreviations() {
        assert_eq!(Direction::parse("N"), Some(Direction::North));
        assert_eq!(Direction::parse("west"), Some(Direction::West));
        assert_eq!(Direction::parse(" south "), Some(Direction::South));
        assert_eq!(Direction::parse("up"), None);
    }

    #[test]
    fn test_passages_range() {
        assert_eq!(Passages::from_bits(15), Some(Passages::ALL));
        assert_eq!(Passages::from_bits(16), None);

        let mut p = Passages::NONE;
        p.insert(Direction::East);
        p.insert(Direction::West);
        assert_eq!(p.bits(), 0b1010);
        assert_eq!(p.directions().collect::<Vec<_>>(), vec![Direction::East, Direction::West]);
        assert_eq!(p.count(), 2);
    }
}
