//! Initial sweep - remove pre-existing matches before play starts
//!
//! Cells are visited in scan order. A cell that lies on a valid match is re-rolled
//! with fresh random kinds; after `SWEEP_REROLL_LIMIT` misses the first kind of the
//! catalog that breaks every run through the cell is taken instead.
//!
//! A re-roll only creates runs through the re-rolled cell, so once a cell is settled
//! no earlier cell can be pulled back into a match. One pass leaves the grid
//! match-free.

use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::grid::Grid;
use crate::matcher::MatchDetector;
use crate::rng::RandomSource;
use crate::types::{TileKind, SWEEP_REROLL_LIMIT};

/// Sweep `grid` until it holds no valid match. Returns the number of cells changed.
pub fn sweep<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    detector: &MatchDetector,
    kind_count: u8,
    rng: &mut R,
) -> Result<usize> {
    let coords: Vec<_> = grid.coords().collect();
    let mut changed = 0usize;

    for cell in coords {
        if !detector.match_at(grid, cell)?.is_valid() {
            continue;
        }
        changed += 1;

        let mut settled = false;
        for _ in 0..SWEEP_REROLL_LIMIT {
            grid.set(cell, TileKind(rng.next_int(0, kind_count as u32) as u8))?;
            if !detector.match_at(grid, cell)?.is_valid() {
                settled = true;
                break;
            }
        }
        if settled {
            continue;
        }

        warn!(col = cell.col, row = cell.row, "sweep re-rolls exhausted, picking kind");
        let mut picked = false;
        for kind in 0..kind_count {
            grid.set(cell, TileKind(kind))?;
            if !detector.match_at(grid, cell)?.is_valid() {
                picked = true;
                break;
            }
        }
        if !picked {
            return Err(CoreError::SweepExhausted(cell));
        }
    }

    debug!(changed, "initial sweep done");
    Ok(changed)
}
