//! Move validation - would a swap produce a match?

use crate::error::Result;
use crate::grid::Grid;
use crate::matcher::{Match, MatchDetector};
use crate::types::Coord;

/// Result of a tentative swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapEvaluation {
    pub valid: bool,
    /// Match through the tile that started at `a` (it now sits at `b`)
    pub match_a: Match,
    /// Match through the tile that started at `b` (it now sits at `a`)
    pub match_b: Match,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveValidator {
    detector: MatchDetector,
}

impl MoveValidator {
    pub fn new(detector: MatchDetector) -> Self {
        Self { detector }
    }

    /// True iff exactly one axis differs, by exactly one
    pub fn is_adjacent(a: Coord, b: Coord) -> bool {
        a.is_adjacent(b)
    }

    /// Evaluate a swap on a scratch copy; `grid` is never modified.
    pub fn evaluate_swap(&self, grid: &Grid, a: Coord, b: Coord) -> Result<SwapEvaluation> {
        let mut scratch = grid.clone();
        self.evaluate_swap_in_place(&mut scratch, a, b)
    }

    /// Swap, evaluate and swap back. `grid` is unchanged when this returns, on the
    /// error path too.
    pub fn evaluate_swap_in_place(
        &self,
        grid: &mut Grid,
        a: Coord,
        b: Coord,
    ) -> Result<SwapEvaluation> {
        grid.swap(a, b)?;
        let evaluated = self.evaluate_swapped(grid, a, b);
        grid.swap(a, b)?;
        evaluated
    }

    /// Evaluate a grid on which `a` and `b` have already been swapped.
    pub fn evaluate_swapped(&self, grid: &Grid, a: Coord, b: Coord) -> Result<SwapEvaluation> {
        let match_a = self.detector.match_at(grid, b)?;
        let match_b = self.detector.match_at(grid, a)?;
        Ok(SwapEvaluation {
            valid: match_a.is_valid() || match_b.is_valid(),
            match_a,
            match_b,
        })
    }
}
