//! Grid coordinates

use serde::{Deserialize, Serialize};

/// A cell coordinate on a rectangular grid.
///
/// Rows grow downward and columns grow rightward, matching the order in
/// which board art is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Row index (0 at the top)
    pub row: usize,
    /// Column index (0 at the left)
    pub col: usize,
}

impl GridPos {
    /// Create a new position
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance to another cell
    #[must_use]
    pub fn manhattan_distance(&self, other: &GridPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Apply a signed (row, col) delta.
    ///
    /// Returns `None` when the delta would move past the top or left edge;
    /// bounds on the other two sides are the caller's to check against the
    /// board.
    #[must_use]
    pub fn offset(&self, drow: isize, dcol: isize) -> Option<GridPos> {
        let row = self.row.checked_add_signed(drow)?;
        let col = self.col.checked_add_signed(dcol)?;
        Some(GridPos { row, col })
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = GridPos::new(2, 9);
        let b = GridPos::new(4, 4);
        assert_eq!(a.manhattan_distance(&b), 7);
        assert_eq!(b.manhattan_distance(&a), 7);
        assert_eq!(a.manhattan_distance(&a), 0);
    }

    #[test]
    fn test_offset_clips_at_origin() {
        let origin = GridPos::new(0, 0);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(0, -1), None);
        assert_eq!(origin.offset(1, 1), Some(GridPos::new(1, 1)));
    }
}
