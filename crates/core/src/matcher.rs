//! Match detection
//!
//! A match is a straight run of equal kinds through an origin cell. Runs never
//! combine axes (no L or T shapes). When both the horizontal and the vertical run
//! through a cell qualify, the longer one wins and an exact tie goes to the
//! horizontal run.

use crate::error::Result;
use crate::grid::Grid;
use crate::types::{Axis, Coord, TileKind};

/// Run of equal kinds through an origin cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    pub origin: Coord,
    pub kind: TileKind,
    /// `None` for an invalid match (origin only)
    pub axis: Option<Axis>,
    /// Cells ordered ascending along the axis
    pub cells: Vec<Coord>,
}

/// Bounding box of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchBounds {
    pub min_col: i32,
    pub max_col: i32,
    pub min_row: i32,
    pub max_row: i32,
}

impl Match {
    fn single(origin: Coord, kind: TileKind) -> Self {
        Self {
            origin,
            kind,
            axis: None,
            cells: vec![origin],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Valid matches always carry an axis; the detector only assigns one to runs
    /// that reached the minimum size.
    pub fn is_valid(&self) -> bool {
        self.axis.is_some()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn bounds(&self) -> MatchBounds {
        let mut b = MatchBounds {
            min_col: self.origin.col,
            max_col: self.origin.col,
            min_row: self.origin.row,
            max_row: self.origin.row,
        };
        for c in &self.cells {
            b.min_col = b.min_col.min(c.col);
            b.max_col = b.max_col.max(c.col);
            b.min_row = b.min_row.min(c.row);
            b.max_row = b.max_row.max(c.row);
        }
        b
    }
}

/// Finds matches of at least `min_match` tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchDetector {
    min_match: usize,
}

impl MatchDetector {
    pub fn new(min_match: usize) -> Self {
        Self { min_match }
    }

    pub fn min_match(&self) -> usize {
        self.min_match
    }

    /// Horizontal run through `origin`, left to right
    pub fn horizontal_run(&self, grid: &Grid, origin: Coord) -> Result<Vec<Coord>> {
        self.run(grid, origin, (1, 0))
    }

    /// Vertical run through `origin`, bottom to top
    pub fn vertical_run(&self, grid: &Grid, origin: Coord) -> Result<Vec<Coord>> {
        self.run(grid, origin, (0, 1))
    }

    fn run(&self, grid: &Grid, origin: Coord, (dc, dr): (i32, i32)) -> Result<Vec<Coord>> {
        let kind = grid.get(origin)?;

        let mut start = origin;
        loop {
            let prev = Coord::new(start.col - dc, start.row - dr);
            if grid.kind_at(prev) != Some(kind) {
                break;
            }
            start = prev;
        }

        let mut cells = Vec::new();
        let mut cur = start;
        while grid.kind_at(cur) == Some(kind) {
            cells.push(cur);
            cur = Coord::new(cur.col + dc, cur.row + dr);
        }
        Ok(cells)
    }

    /// Best match through `origin`. Pure.
    pub fn match_at(&self, grid: &Grid, origin: Coord) -> Result<Match> {
        let kind = grid.get(origin)?;
        let horizontal = self.horizontal_run(grid, origin)?;
        let vertical = self.vertical_run(grid, origin)?;

        let h_ok = horizontal.len() >= self.min_match;
        let v_ok = vertical.len() >= self.min_match;

        let (axis, cells) = match (h_ok, v_ok) {
            (true, true) if horizontal.len() >= vertical.len() => (Axis::Horizontal, horizontal),
            (true, true) => (Axis::Vertical, vertical),
            (true, false) => (Axis::Horizontal, horizontal),
            (false, true) => (Axis::Vertical, vertical),
            (false, false) => return Ok(Match::single(origin, kind)),
        };

        Ok(Match {
            origin,
            kind,
            axis: Some(axis),
            cells,
        })
    }

    /// First valid match in scan order (column by column, bottom to top)
    pub fn first_match(&self, grid: &Grid) -> Option<Match> {
        grid.coords()
            .filter_map(|c| self.match_at(grid, c).ok())
            .find(Match::is_valid)
    }

    pub fn has_any_match(&self, grid: &Grid) -> bool {
        self.first_match(grid).is_some()
    }
}
