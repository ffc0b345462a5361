//! Two-tap selection and swipe classification

use crate::types::{Coord, Direction};

/// What a tap did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    Selected(Coord),
    /// The selected tile was tapped again
    Deselected(Coord),
    /// Second tap on a tile that is not a neighbour of the first
    Forbidden { from: Coord, to: Coord },
    /// Second tap on a neighbour; the pair should be swapped
    Pair(Coord, Coord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    selected: Option<Coord>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap. Any second tap leaves nothing selected.
    pub fn tap(&mut self, at: Coord) -> Tap {
        match self.selected.take() {
            None => {
                self.selected = Some(at);
                Tap::Selected(at)
            }
            Some(prev) if prev == at => Tap::Deselected(at),
            Some(prev) if prev.is_adjacent(at) => Tap::Pair(prev, at),
            Some(prev) => Tap::Forbidden { from: prev, to: at },
        }
    }

    pub fn clear(&mut self) -> Option<Coord> {
        self.selected.take()
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }
}

/// Direction of a drag from `(0, 0)` to `(dx, dy)` in board space (y up).
///
/// `None` unless the major axis exceeds `threshold`. Each direction owns a
/// 90 degree sector centered on its axis; boundaries at 45 degrees go
/// counter-clockwise (right owns 45, up owns 135).
pub fn swipe_direction(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs().max(dy.abs()) <= threshold {
        return None;
    }
    let angle = dy.atan2(dx).to_degrees();
    let dir = if angle > -45.0 && angle <= 45.0 {
        Direction::Right
    } else if angle > 45.0 && angle <= 135.0 {
        Direction::Up
    } else if angle > -135.0 && angle <= -45.0 {
        Direction::Down
    } else {
        Direction::Left
    };
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tap_flow() {
        let mut sel = Selection::new();
        let a = Coord::new(1, 1);

        assert_eq!(sel.tap(a), Tap::Selected(a));
        assert_eq!(sel.selected(), Some(a));
        assert_eq!(sel.tap(a), Tap::Deselected(a));
        assert_eq!(sel.selected(), None);

        sel.tap(a);
        let b = Coord::new(2, 1);
        assert_eq!(sel.tap(b), Tap::Pair(a, b));
        assert_eq!(sel.selected(), None);

        sel.tap(a);
        let far = Coord::new(3, 3);
        assert_eq!(sel.tap(far), Tap::Forbidden { from: a, to: far });
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn test_swipe_sectors() {
        assert_eq!(swipe_direction(10.0, 1.0, 5.0), Some(Direction::Right));
        assert_eq!(swipe_direction(-1.0, 10.0, 5.0), Some(Direction::Up));
        assert_eq!(swipe_direction(-10.0, -2.0, 5.0), Some(Direction::Left));
        assert_eq!(swipe_direction(2.0, -10.0, 5.0), Some(Direction::Down));
        assert_eq!(swipe_direction(3.0, 3.0, 5.0), None);
    }
}
