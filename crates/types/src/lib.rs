//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules engine, session layer, host protocol).
//!
//! # Board Geometry
//!
//! - Cells are addressed as `(col, row)`
//! - `col` grows to the right, `row` grows **upward**
//! - Gravity pulls tiles toward row 0
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 5 | Board columns |
//! | `DEFAULT_HEIGHT` | 5 | Board rows |
//! | `DEFAULT_KIND_COUNT` | 5 | Distinct tile kinds |
//! | `DEFAULT_MIN_MATCH` | 3 | Minimum run length for a valid match |
//! | `DEFAULT_ITEM_SCORE` | 60 | Points per matched tile |
//! | `DEFAULT_MAX_RESHUFFLES` | 10 | Shuffle attempts before giving up on a deadlock |
//! | `DEFAULT_ROUND_TIME_MS` | 120000 | Round duration |
//! | `DEFAULT_INTRO_MS` | 2000 | Round intro during which input is refused |
//! | `TARGET_SCORE_PER_LEVEL` | 1000 | Target score is `level * 1000` |
//! | `MAX_BOARD_CELLS` | 65536 | Largest accepted `width * height` |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Coord, Direction, TileKind};
//!
//! let origin = Coord::new(2, 0);
//! assert_eq!(origin.step(Direction::Up), Coord::new(2, 1));
//! assert!(origin.is_adjacent(Coord::new(3, 0)));
//! assert!(!origin.is_adjacent(Coord::new(3, 1)));
//!
//! let kind = TileKind::new(4);
//! assert_eq!(kind.index(), 4);
//!
//! assert_eq!(Direction::from_str("left"), Some(Direction::Left));
//! ```

/// Default board width in columns
pub const DEFAULT_WIDTH: usize = 5;

/// Default board height in rows
pub const DEFAULT_HEIGHT: usize = 5;

/// Default number of distinct tile kinds
pub const DEFAULT_KIND_COUNT: u8 = 5;

/// Minimum run length for a match to be valid
pub const DEFAULT_MIN_MATCH: usize = 3;

/// Points awarded per tile in a resolved match
pub const DEFAULT_ITEM_SCORE: u32 = 60;

/// Shuffle attempts before a deadlock is reported as exhausted
pub const DEFAULT_MAX_RESHUFFLES: u32 = 10;

/// Largest board area (`width * height`) a configuration may ask for
pub const MAX_BOARD_CELLS: usize = 1 << 16;

/// Cascade steps allowed per cell of board area
pub const CASCADE_STEPS_PER_CELL: usize = 4;

/// Random re-rolls per cell during the initial sweep before falling back to a
/// deterministic pick
pub const SWEEP_REROLL_LIMIT: u32 = 32;

/// Round duration in milliseconds (2 minutes)
pub const DEFAULT_ROUND_TIME_MS: u32 = 120_000;

/// Round intro duration in milliseconds; the clock and input are frozen meanwhile
pub const DEFAULT_INTRO_MS: u32 = 2_000;

/// Target score added per level
pub const TARGET_SCORE_PER_LEVEL: u32 = 1_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_constants() {
        assert_eq!(DEFAULT_WIDTH, 5);
        assert_eq!(DEFAULT_HEIGHT, 5);
        assert_eq!(DEFAULT_MIN_MATCH, 3);
        assert_eq!(DEFAULT_ITEM_SCORE, 60);
        assert_eq!(DEFAULT_MAX_RESHUFFLES, 10);
        assert_eq!(DEFAULT_ROUND_TIME_MS, 120_000);
        assert_eq!(TARGET_SCORE_PER_LEVEL, 1_000);
    }

    #[test]
    fn step_and_adjacency() {
        let c = Coord::new(1, 1);
        assert_eq!(c.step(Direction::Left), Coord::new(0, 1));
        assert_eq!(c.step(Direction::Right), Coord::new(2, 1));
        assert_eq!(c.step(Direction::Down), Coord::new(1, 0));
        assert_eq!(c.step(Direction::Up), Coord::new(1, 2));

        for dir in Direction::ALL {
            assert!(c.is_adjacent(c.step(dir)));
            assert_eq!(c.direction_to(c.step(dir)), Some(dir));
        }

        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(2, 2)));
        assert!(!c.is_adjacent(Coord::new(3, 1)));
        assert_eq!(c.direction_to(Coord::new(2, 2)), None);
    }

    #[test]
    fn move_is_unordered() {
        let a = Move::new(Coord::new(0, 0), Coord::new(1, 0));
        let b = Move::new(Coord::new(1, 0), Coord::new(0, 0));
        assert_eq!(a.normalized(), b.normalized());
        assert!(a.is_adjacent());
    }

    #[test]
    fn direction_strings() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
        assert_eq!(Direction::from_str("diagonal"), None);
    }
}

/// Opaque tile identity
///
/// Presentation owns the mapping from kind to sprite; the rules only compare
/// kinds for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKind(pub u8);

impl TileKind {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl From<u8> for TileKind {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Board coordinate, `row` grows upward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}

impl Coord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Neighbour one cell away in `dir` (may lie outside the board)
    pub fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }

    /// True iff exactly one axis differs, by exactly one cell
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dc = (self.col - other.col).abs();
        let dr = (self.row - other.row).abs();
        dc + dr == 1
    }

    /// Direction from `self` to an adjacent `other`
    pub fn direction_to(self, other: Coord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.step(dir) == other)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((col, row): (i32, i32)) -> Self {
        Self { col, row }
    }
}

/// Orthogonal direction on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// `(dcol, drow)` for one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("Right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("none"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "right" => Some(Direction::Right),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

/// Axis of a straight-line match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

/// A swap between two cells
///
/// Used both for player swap attempts and for legal moves reported as hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub a: Coord,
    pub b: Coord,
}

impl Move {
    pub const fn new(a: Coord, b: Coord) -> Self {
        Self { a, b }
    }

    pub fn is_adjacent(&self) -> bool {
        self.a.is_adjacent(self.b)
    }

    /// Same move with the smaller coordinate first
    pub fn normalized(self) -> Self {
        if self.a <= self.b {
            self
        } else {
            Self {
                a: self.b,
                b: self.a,
            }
        }
    }
}

/// One visible effect of a board mutation
///
/// Events are emitted in the order the mutations happen; the board is already in
/// its final state for the event when it is recorded, so a presentation layer may
/// replay them at any pace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoardEvent {
    /// Two tiles exchanged cells
    Swapped { a: Coord, b: Coord },
    /// A non-matching swap was undone
    Reverted { a: Coord, b: Coord },
    /// A match was removed from the board
    Cleared { kind: TileKind, cells: Vec<Coord> },
    /// A surviving tile dropped to a lower cell
    Fell { from: Coord, to: Coord, kind: TileKind },
    /// A fresh tile entered the board; `from` lies above the top row
    Spawned { from: Coord, to: Coord, kind: TileKind },
    /// A tile moved to a new cell during a reshuffle
    Shuffled { from: Coord, to: Coord, kind: TileKind },
}

impl BoardEvent {
    /// Lowercase event name used by the host protocol
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::Swapped { .. } => "swapped",
            BoardEvent::Reverted { .. } => "reverted",
            BoardEvent::Cleared { .. } => "cleared",
            BoardEvent::Fell { .. } => "fell",
            BoardEvent::Spawned { .. } => "spawned",
            BoardEvent::Shuffled { .. } => "shuffled",
        }
    }
}
