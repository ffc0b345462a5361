//! Deadlock detection - enumerate every swap that would produce a match

use crate::grid::Grid;
use crate::types::{Coord, Move};
use crate::validator::MoveValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlockDetector {
    validator: MoveValidator,
}

impl DeadlockDetector {
    pub fn new(validator: MoveValidator) -> Self {
        Self { validator }
    }

    /// All legal moves, each pair reported once as (cell, right/up neighbour),
    /// in scan order.
    pub fn legal_moves(&self, grid: &Grid) -> Vec<Move> {
        let mut scratch = grid.clone();
        let mut moves = Vec::new();

        for cell in grid.coords() {
            for other in [Coord::new(cell.col + 1, cell.row), Coord::new(cell.col, cell.row + 1)] {
                if !grid.in_bounds(other) {
                    continue;
                }
                let valid = self
                    .validator
                    .evaluate_swap_in_place(&mut scratch, cell, other)
                    .map(|eval| eval.valid)
                    .unwrap_or(false);
                if valid {
                    moves.push(Move::new(cell, other));
                }
            }
        }

        moves
    }

    /// First legal move in scan order
    pub fn first_move(&self, grid: &Grid) -> Option<Move> {
        self.legal_moves(grid).into_iter().next()
    }

    pub fn is_deadlocked(&self, grid: &Grid) -> bool {
        self.legal_moves(grid).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchDetector;

    fn detector() -> DeadlockDetector {
        DeadlockDetector::new(MoveValidator::new(MatchDetector::new(3)))
    }

    #[test]
    fn test_checkerboard_of_three_kinds_is_deadlocked() {
        let grid = Grid::from_rows(&[
            [0u8, 1, 2, 0],
            [1, 2, 0, 1],
            [2, 0, 1, 2],
            [0, 1, 2, 0],
        ])
        .unwrap();
        assert!(detector().is_deadlocked(&grid));
    }

    #[test]
    fn test_finds_horizontal_and_vertical_moves() {
        // Row 0: 0 0 1 0 -> swapping (2,0) with (3,0) completes 0 0 0.
        let grid = Grid::from_rows(&[[0u8, 0, 1, 0], [2, 3, 4, 2], [3, 4, 2, 3]]).unwrap();
        let moves = detector().legal_moves(&grid);
        assert!(moves.contains(&Move::new(Coord::new(2, 0), Coord::new(3, 0))));
        for m in &moves {
            assert!(m.is_adjacent());
            assert!(m.a < m.b);
        }
    }

    #[test]
    fn test_equal_kind_swap_counts_when_it_sits_on_a_match() {
        // Swapping two 0s leaves the board unchanged, and that board already holds 0 0 0.
        let grid = Grid::from_rows(&[[0u8, 0, 0], [1, 2, 1]]).unwrap();
        let moves = detector().legal_moves(&grid);
        assert!(moves.contains(&Move::new(Coord::new(0, 0), Coord::new(1, 0))));
        assert!(!detector().is_deadlocked(&grid));
    }

    #[test]
    fn test_last_row_and_column_pairs_are_checked() {
        // The only legal move pairs two cells of the top row.
        let grid = Grid::from_rows(&[[1u8, 2, 3, 4], [2, 3, 4, 1], [0, 0, 5, 0]]).unwrap();
        let moves = detector().legal_moves(&grid);
        assert_eq!(moves, vec![Move::new(Coord::new(2, 2), Coord::new(3, 2))]);
    }
}
