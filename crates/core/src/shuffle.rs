//! Shuffler - Fisher-Yates permutation of every tile on the board
//!
//! The shuffler only permutes. Whether the result is acceptable (match-free and
//! playable) is decided by the resolution engine's reshuffle loop.

use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{BoardEvent, Coord, TileKind};

/// One tile relocated by a shuffle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShuffleMove {
    pub from: Coord,
    pub to: Coord,
    pub kind: TileKind,
}

impl From<ShuffleMove> for BoardEvent {
    fn from(m: ShuffleMove) -> Self {
        BoardEvent::Shuffled {
            from: m.from,
            to: m.to,
            kind: m.kind,
        }
    }
}

/// Permute the grid in place.
///
/// Walks the row-major cell list forward: for each `i` below `n - 1` draw
/// `j` in `[i, n)` and exchange `i` with `j`. Returns one move per tile that
/// ended up on a different cell, in scan order of the destination.
pub fn shuffle<R: RandomSource + ?Sized>(grid: &mut Grid, rng: &mut R) -> Vec<ShuffleMove> {
    let n = grid.len();
    // origin[k] = index the tile now at k started from
    let mut origin: Vec<usize> = (0..n).collect();

    {
        let cells = grid.kinds_mut();
        for i in 0..n.saturating_sub(1) {
            let j = rng.next_int(i as u32, n as u32) as usize;
            if j != i {
                cells.swap(i, j);
                origin.swap(i, j);
            }
        }
    }

    grid.coords()
        .filter_map(|to| {
            let idx = to.row as usize * grid.width() + to.col as usize;
            let from_idx = origin[idx];
            (from_idx != idx).then(|| ShuffleMove {
                from: grid.coord_of(from_idx),
                to,
                kind: grid.kinds()[idx],
            })
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::rng::SimpleRng;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn moves_replay_onto_original(
            width in 1usize..7,
            height in 1usize..7,
            seed in any::<u32>(),
        ) {
            let mut grid = Grid::new(width, height).unwrap();
            let mut rng = SimpleRng::new(seed);
            grid.initialize(&mut rng, 6);
            let before = grid.clone();

            let moves = shuffle(&mut grid, &mut rng);

            let mut replayed = before.clone();
            for m in &moves {
                prop_assert_eq!(before.get(m.from).unwrap(), m.kind);
                replayed.set(m.to, m.kind).unwrap();
            }
            prop_assert_eq!(replayed, grid);
        }
    }
}
