use crate::engine::EngineState;
use crate::grid::Grid;

/// Copy of the board handed to observers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major kinds, row 0 first
    pub cells: Vec<u8>,
    /// FNV-1a 64 of dimensions and cells
    pub board_hash: u64,
    pub state: EngineState,
}

impl BoardSnapshot {
    pub fn capture(grid: &Grid, state: EngineState) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: grid.kinds().iter().map(|k| k.0).collect(),
            board_hash: grid.fnv1a64(),
            state,
        }
    }

    /// Refresh in place, reusing the cell buffer
    pub fn update(&mut self, grid: &Grid, state: EngineState) {
        self.width = grid.width();
        self.height = grid.height();
        self.cells.clear();
        self.cells.extend(grid.kinds().iter().map(|k| k.0));
        self.board_hash = grid.fnv1a64();
        self.state = state;
    }

    /// Kind at `(col, row)`, `None` outside the board
    pub fn kind_at(&self, col: usize, row: usize) -> Option<u8> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    /// Rows bottom first
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn playable(&self) -> bool {
        self.state == EngineState::Idle
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            board_hash: 0,
            state: EngineState::Idle,
        }
    }
}
