//! Gravity - removal, column collapse and refill
//!
//! Removed cells are dropped column by column: survivors compact toward row 0
//! keeping their relative order, then the vacated top cells receive fresh kinds.
//! A fresh tile in a column that lost `n` cells enters from `n` rows above its
//! destination, mirroring how survivors fall `n` rows at most.

use crate::error::{CoreError, Result};
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{BoardEvent, Coord, TileKind};

/// Remove `cells`, collapse every affected column and refill from the top.
///
/// Emits one `Fell` per tile that changed row and one `Spawned` per fresh tile,
/// columns in ascending order, bottom to top within a column. Fresh kinds are
/// drawn from `rng` in that same order. Returns the number of cells removed.
pub fn collapse<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    cells: &[Coord],
    kind_count: u8,
    rng: &mut R,
    events: &mut Vec<BoardEvent>,
) -> Result<usize> {
    let width = grid.width();
    let height = grid.height();

    let mut removed = vec![false; grid.len()];
    for &c in cells {
        if !grid.in_bounds(c) {
            return Err(CoreError::OutOfBounds(c));
        }
        removed[c.row as usize * width + c.col as usize] = true;
    }

    let mut total = 0usize;
    let mut column: Vec<TileKind> = Vec::with_capacity(height);

    for col in 0..width {
        let lost = (0..height)
            .filter(|&row| removed[row * width + col])
            .count();
        if lost == 0 {
            continue;
        }
        total += lost;

        column.clear();
        let survivors = grid
            .column(col)
            .enumerate()
            .filter(|&(row, _)| !removed[row * width + col]);
        for (row, kind) in survivors {
            let to = column.len();
            column.push(kind);
            if row != to {
                events.push(BoardEvent::Fell {
                    from: Coord::new(col as i32, row as i32),
                    to: Coord::new(col as i32, to as i32),
                    kind,
                });
            }
        }

        for row in column.len()..height {
            let kind = TileKind(rng.next_int(0, kind_count as u32) as u8);
            column.push(kind);
            events.push(BoardEvent::Spawned {
                from: Coord::new(col as i32, (row + lost) as i32),
                to: Coord::new(col as i32, row as i32),
                kind,
            });
        }

        grid.write_column(col, &column);
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    #[test]
    fn test_vertical_removal_shifts_column() {
        // Column 1 holds 5 / 1 1 1 / 4 bottom to top; remove rows 1..=3.
        let mut grid = Grid::from_rows(&[[0u8, 4, 2], [2, 1, 0], [0, 1, 2], [2, 1, 0], [0, 5, 2]])
            .unwrap();
        let cells = [Coord::new(1, 1), Coord::new(1, 2), Coord::new(1, 3)];
        let mut rng = ScriptedRng::new(vec![3, 3, 3]);
        let mut events = Vec::new();

        let removed = collapse(&mut grid, &cells, 6, &mut rng, &mut events).unwrap();
        assert_eq!(removed, 3);

        let col: Vec<u8> = grid.column(1).map(|k| k.0).collect();
        assert_eq!(col, vec![4, 5, 3, 3, 3]);
        assert_eq!(
            events[0],
            BoardEvent::Fell {
                from: Coord::new(1, 4),
                to: Coord::new(1, 1),
                kind: TileKind(5)
            }
        );
        assert_eq!(
            events[1],
            BoardEvent::Spawned {
                from: Coord::new(1, 5),
                to: Coord::new(1, 2),
                kind: TileKind(3)
            }
        );
        assert_eq!(events.len(), 4);
        // Other columns untouched.
        assert_eq!(grid.column(0).map(|k| k.0).collect::<Vec<_>>(), vec![0, 2, 0, 2, 0]);
    }

    #[test]
    fn test_horizontal_removal_touches_each_column_once() {
        let mut grid = Grid::from_rows(&[[1u8, 1, 1], [2, 3, 4], [0, 0, 2]]).unwrap();
        let cells = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)];
        let mut rng = ScriptedRng::new(vec![4]);
        let mut events = Vec::new();

        collapse(&mut grid, &cells, 5, &mut rng, &mut events).unwrap();

        assert_eq!(grid.to_rows(), vec![vec![2, 3, 4], vec![0, 0, 2], vec![4, 4, 4]]);
        let falls = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::Fell { .. }))
            .count();
        let spawns = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::Spawned { .. }))
            .count();
        assert_eq!(falls, 6);
        assert_eq!(spawns, 3);
    }

    #[test]
    fn test_out_of_bounds_cell_is_rejected() {
        let mut grid = Grid::from_rows(&[[1u8, 2]]).unwrap();
        let before = grid.clone();
        let mut rng = ScriptedRng::new(vec![0]);
        let mut events = Vec::new();
        let res = collapse(&mut grid, &[Coord::new(2, 0)], 3, &mut rng, &mut events);
        assert_eq!(res, Err(CoreError::OutOfBounds(Coord::new(2, 0))));
        assert_eq!(grid, before);
        assert!(events.is_empty());
    }
}
