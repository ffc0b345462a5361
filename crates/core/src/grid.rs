//! Grid module - owns tile identity for every cell
//!
//! Uses a flat row-major vector (`row * width + col`) for cache locality.
//! Coordinates: `(col, row)`, col grows to the right, row grows upward; gravity
//! pulls toward row 0. Every cell always holds a kind: removal and refill work on
//! per-column scratch buffers and write back complete columns.

use arrayvec::ArrayVec;

use crate::error::{CoreError, Result};
use crate::rng::RandomSource;
use crate::types::{Coord, Direction, TileKind, MAX_BOARD_CELLS};

/// The game grid - `width` columns x `height` rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major cells, row 0 first
    cells: Vec<TileKind>,
}

impl Grid {
    /// Create a grid with every cell holding kind 0
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidConfig(
                "width and height must be > 0".into(),
            ));
        }
        let area = match width.checked_mul(height) {
            Some(area) if area <= MAX_BOARD_CELLS => area,
            _ => return Err(CoreError::InvalidConfig("board is too large".into())),
        };
        Ok(Self {
            width,
            height,
            cells: vec![TileKind(0); area],
        })
    }

    /// Build a grid from rows of kind indices, **bottom row first**.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidConfig("grid rows must not be empty".into()));
        }
        if rows.iter().any(|r| r.as_ref().len() != width) {
            return Err(CoreError::InvalidConfig(
                "grid rows must all have the same length".into(),
            ));
        }

        let cells = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().copied().map(TileKind))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Calculate flat index from coordinates
    #[inline(always)]
    fn index(&self, coord: Coord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(coord.row as usize * self.width + coord.col as usize)
    }

    fn checked_index(&self, coord: Coord) -> Result<usize> {
        self.index(coord).ok_or(CoreError::OutOfBounds(coord))
    }

    /// Coordinate of a flat index
    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.col >= 0
            && coord.row >= 0
            && (coord.col as usize) < self.width
            && (coord.row as usize) < self.height
    }

    /// Kind at `coord`
    pub fn get(&self, coord: Coord) -> Result<TileKind> {
        self.checked_index(coord).map(|idx| self.cells[idx])
    }

    /// Kind at `coord`, `None` when out of bounds
    pub fn kind_at(&self, coord: Coord) -> Option<TileKind> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    pub fn set(&mut self, coord: Coord, kind: TileKind) -> Result<()> {
        let idx = self.checked_index(coord)?;
        self.cells[idx] = kind;
        Ok(())
    }

    /// Exchange the kinds of two cells. Both coordinates are checked before
    /// anything changes.
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<()> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Fill every cell with a uniformly random kind in `[0, kind_count)`
    pub fn initialize<R: RandomSource + ?Sized>(&mut self, rng: &mut R, kind_count: u8) {
        // Column-major so column refills and setup draw in the same order.
        for col in 0..self.width {
            for row in 0..self.height {
                let kind = TileKind(rng.next_int(0, kind_count as u32) as u8);
                self.cells[row * self.width + col] = kind;
            }
        }
    }

    /// All coordinates in scan order: column by column, bottom to top
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.width as i32)
            .flat_map(move |col| (0..self.height as i32).map(move |row| Coord::new(col, row)))
    }

    /// In-bounds orthogonal neighbours (up, right, down, left order)
    pub fn neighbors(&self, coord: Coord) -> ArrayVec<Coord, 4> {
        let mut out = ArrayVec::new();
        for dir in Direction::ALL {
            let next = coord.step(dir);
            if self.in_bounds(next) {
                out.push(next);
            }
        }
        out
    }

    /// Kinds of one column, bottom to top
    pub fn column(&self, col: usize) -> impl Iterator<Item = TileKind> + '_ {
        (0..self.height).map(move |row| self.cells[row * self.width + col])
    }

    /// Overwrite one column, bottom to top
    pub(crate) fn write_column(&mut self, col: usize, kinds: &[TileKind]) {
        debug_assert_eq!(kinds.len(), self.height);
        for (row, &kind) in kinds.iter().enumerate() {
            self.cells[row * self.width + col] = kind;
        }
    }

    /// Get a reference to the internal row-major cells
    pub fn kinds(&self) -> &[TileKind] {
        &self.cells
    }

    pub(crate) fn kinds_mut(&mut self) -> &mut [TileKind] {
        &mut self.cells
    }

    /// Check every kind is inside a catalog of `kind_count` kinds
    pub fn check_catalog(&self, kind_count: u8) -> Result<()> {
        match self.cells.iter().find(|k| k.0 >= kind_count) {
            Some(bad) => Err(CoreError::UnknownKind {
                kind: bad.0,
                kind_count,
            }),
            None => Ok(()),
        }
    }

    /// Rows of kind indices, bottom row first (inverse of [`Grid::from_rows`])
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|k| k.0).collect())
            .collect()
    }

    /// Stable FNV-1a 64 hash of dimensions and cells
    pub fn fnv1a64(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;

        let mut h = OFFSET_BASIS;
        let dims = [self.width as u32, self.height as u32];
        let bytes = dims
            .iter()
            .flat_map(|d| d.to_le_bytes())
            .chain(self.cells.iter().map(|k| k.0));
        for b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(PRIME);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(5, 4).unwrap();
        assert_eq!(grid.index(Coord::new(0, 0)), Some(0));
        assert_eq!(grid.index(Coord::new(4, 0)), Some(4));
        assert_eq!(grid.index(Coord::new(0, 1)), Some(5));
        assert_eq!(grid.index(Coord::new(4, 3)), Some(19));
        assert_eq!(grid.index(Coord::new(-1, 0)), None);
        assert_eq!(grid.index(Coord::new(5, 0)), None);
        assert_eq!(grid.index(Coord::new(0, 4)), None);
        assert_eq!(grid.coord_of(7), Coord::new(2, 1));
    }

    #[test]
    fn test_from_rows_is_bottom_first() {
        let grid = Grid::from_rows(&[[0u8, 1, 2], [3, 4, 0]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(Coord::new(0, 0)), Ok(TileKind(0)));
        assert_eq!(grid.get(Coord::new(1, 1)), Ok(TileKind(4)));
        assert_eq!(grid.to_rows(), vec![vec![0, 1, 2], vec![3, 4, 0]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows: Vec<Vec<u8>> = vec![vec![0, 1], vec![2]];
        assert!(Grid::from_rows(&rows).is_err());
        let empty: Vec<Vec<u8>> = Vec::new();
        assert!(Grid::from_rows(&empty).is_err());
    }

    #[test]
    fn test_swap_checks_both_before_mutating() {
        let mut grid = Grid::from_rows(&[[0u8, 1]]).unwrap();
        let before = grid.clone();
        assert_eq!(
            grid.swap(Coord::new(0, 0), Coord::new(2, 0)),
            Err(CoreError::OutOfBounds(Coord::new(2, 0)))
        );
        assert_eq!(grid, before);

        grid.swap(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![1, 0]]);
    }

    #[test]
    fn test_initialize_stays_in_catalog() {
        let mut grid = Grid::new(8, 8).unwrap();
        let mut rng = SimpleRng::new(3);
        grid.initialize(&mut rng, 4);
        assert!(grid.check_catalog(4).is_ok());
        assert!(grid.kinds().iter().any(|k| k.0 != 0));
    }

    #[test]
    fn test_neighbors_at_corner_and_center() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.neighbors(Coord::new(0, 0)).len(), 2);
        assert_eq!(grid.neighbors(Coord::new(1, 1)).len(), 4);
        assert_eq!(grid.neighbors(Coord::new(2, 1)).len(), 3);
    }

    #[test]
    fn test_coords_scan_order() {
        let grid = Grid::new(2, 2).unwrap();
        let order: Vec<Coord> = grid.coords().collect();
        assert_eq!(
            order,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = Grid::from_rows(&[[0u8, 1], [1, 0]]).unwrap();
        let mut b = a.clone();
        assert_eq!(a.fnv1a64(), b.fnv1a64());
        b.set(Coord::new(0, 0), TileKind(1)).unwrap();
        assert_ne!(a.fnv1a64(), b.fnv1a64());
    }
}
