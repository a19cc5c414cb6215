//! Grid distance model: Manhattan geometry over integer row/column cells.
//!
//! All travel in the simulation happens on an axis-aligned grid, one cell per
//! tick. [`Coordinate::step_toward`] is the single movement primitive: it
//! resolves the row axis before the column axis whenever both differ.

use serde::{Deserialize, Serialize};

/// A cell on the simulation grid. `(0, 0)` is the depot where every vehicle
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: u32,
    pub column: u32,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { row: 0, column: 0 };

    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// One movement tick toward `target`: a single cell along a single axis,
    /// row axis first. Returns `self` unchanged when already at `target`.
    pub fn step_toward(self, target: Coordinate) -> Coordinate {
        if self.row < target.row {
            Coordinate::new(self.row + 1, self.column)
        } else if self.row > target.row {
            Coordinate::new(self.row - 1, self.column)
        } else if self.column < target.column {
            Coordinate::new(self.row, self.column + 1)
        } else if self.column > target.column {
            Coordinate::new(self.row, self.column - 1)
        } else {
            self
        }
    }
}

/// Manhattan distance between two cells, in ticks of travel.
pub fn manhattan(a: Coordinate, b: Coordinate) -> u64 {
    u64::from(a.row.abs_diff(b.row)) + u64::from(a.column.abs_diff(b.column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_zero_on_identity() {
        let a = Coordinate::new(2, 7);
        let b = Coordinate::new(5, 1);
        assert_eq!(manhattan(a, b), manhattan(b, a));
        assert_eq!(manhattan(a, b), 9);
        assert_eq!(manhattan(a, a), 0);
        assert_eq!(manhattan(b, b), 0);
    }

    #[test]
    fn distance_satisfies_triangle_inequality() {
        let points = [
            Coordinate::ORIGIN,
            Coordinate::new(3, 0),
            Coordinate::new(0, 4),
            Coordinate::new(7, 7),
            Coordinate::new(2, 9),
        ];
        for a in points {
            for b in points {
                for c in points {
                    assert!(manhattan(a, c) <= manhattan(a, b) + manhattan(b, c));
                }
            }
        }
    }

    #[test]
    fn step_toward_moves_one_cell_along_one_axis() {
        let from = Coordinate::new(1, 1);
        let to = Coordinate::new(4, 5);
        let next = from.step_toward(to);
        assert_eq!(manhattan(from, next), 1);
        assert_eq!(manhattan(next, to), manhattan(from, to) - 1);
    }

    #[test]
    fn step_toward_prefers_the_row_axis() {
        let from = Coordinate::new(1, 1);
        assert_eq!(from.step_toward(Coordinate::new(4, 5)), Coordinate::new(2, 1));
        assert_eq!(from.step_toward(Coordinate::new(0, 5)), Coordinate::new(0, 1));
        // Row aligned: the column axis takes over.
        assert_eq!(from.step_toward(Coordinate::new(1, 5)), Coordinate::new(1, 2));
        assert_eq!(from.step_toward(Coordinate::new(1, 0)), Coordinate::new(1, 0));
    }

    #[test]
    fn step_toward_holds_at_the_target() {
        let at = Coordinate::new(3, 3);
        assert_eq!(at.step_toward(at), at);
    }

    #[test]
    fn repeated_steps_reach_the_target_in_manhattan_distance_ticks() {
        let mut pos = Coordinate::new(9, 2);
        let target = Coordinate::new(4, 6);
        let expected_ticks = manhattan(pos, target);
        for _ in 0..expected_ticks {
            pos = pos.step_toward(target);
        }
        assert_eq!(pos, target);
    }
}
