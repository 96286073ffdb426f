//! Board art: the fixed floor plans and glyph placement
//!
//! A board is an immutable value. Placing the goal or the agent returns a
//! new copy, so two environments built in the same process can never see
//! each other's edits.

use ndarray::Array2;

use corridor_rl_core::{EnvError, GridPos, Result};

/// Wall glyph
pub const WALL: char = '#';
/// Floor glyph
pub const FLOOR: char = ' ';
/// Agent glyph
pub const AGENT: char = 'A';
/// Goal glyph
pub const GOAL: char = 'G';

/// Color triple on the 0..=999 channel scale
pub type Rgb = (u16, u16, u16);

const ROOM_PLAN: [&str; 9] = [
    "###########",
    "#         #",
    "#         #",
    "#         #",
    "#         #",
    "#         #",
    "#         #",
    "#         #",
    "###########",
];

const HALLWAY_PLAN: [&str; 3] = [
    "###########",
    "#         #",
    "###########",
];

/// Observation scalar for a glyph
#[must_use]
pub fn value_of(glyph: char) -> f64 {
    match glyph {
        WALL => 0.0,
        AGENT => 2.0,
        GOAL => 3.0,
        _ => 1.0,
    }
}

/// Glyph rendered for an observation scalar
#[must_use]
pub fn glyph_for(value: f64) -> char {
    if value.abs() < f64::EPSILON {
        WALL
    } else if (value - 2.0).abs() < f64::EPSILON {
        AGENT
    } else if (value - 3.0).abs() < f64::EPSILON {
        GOAL
    } else {
        FLOOR
    }
}

/// Background color for a glyph
#[must_use]
pub fn background_color(glyph: char) -> Rgb {
    match glyph {
        WALL => (599, 599, 599),
        AGENT => (0, 706, 999),
        GOAL => (999, 999, 0),
        _ => (858, 858, 858),
    }
}

/// Foreground color for a glyph
#[must_use]
pub fn foreground_color(_glyph: char) -> Rgb {
    (0, 0, 0)
}

/// A rectangular, wall-bordered board holding at most one agent and one
/// goal glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameArt {
    rows: Vec<Vec<char>>,
}

impl GameArt {
    /// The 9 x 11 bordered room
    #[must_use]
    pub fn room() -> Self {
        Self::from_plan(&ROOM_PLAN)
    }

    /// The 3 x 11 single-row hallway
    #[must_use]
    pub fn hallway() -> Self {
        Self::from_plan(&HALLWAY_PLAN)
    }

    fn from_plan(plan: &[&str]) -> Self {
        Self {
            rows: plan.iter().map(|row| row.chars().collect()).collect(),
        }
    }

    /// Parse board art from text rows, rejecting anything that breaks the
    /// shape or border invariants
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let art = Self {
            rows: rows
                .iter()
                .map(|row| row.as_ref().chars().collect())
                .collect(),
        };

        if art.rows.is_empty() || art.rows[0].is_empty() {
            return Err(EnvError::MalformedArt("board art is empty".into()));
        }
        let cols = art.rows[0].len();
        for (i, row) in art.rows.iter().enumerate() {
            if row.len() != cols {
                return Err(EnvError::MalformedArt(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
        }
        for (i, row) in art.rows.iter().enumerate() {
            let border_row = i == 0 || i == art.rows.len() - 1;
            for (j, &glyph) in row.iter().enumerate() {
                let border_col = j == 0 || j == cols - 1;
                if (border_row || border_col) && glyph != WALL {
                    return Err(EnvError::MalformedArt(format!(
                        "border cell ({i}, {j}) holds {glyph:?}, expected a wall"
                    )));
                }
                if !matches!(glyph, WALL | FLOOR | AGENT | GOAL) {
                    return Err(EnvError::MalformedArt(format!(
                        "unknown glyph {glyph:?} at ({i}, {j})"
                    )));
                }
            }
        }
        for glyph in [AGENT, GOAL] {
            if art.count(glyph) > 1 {
                return Err(EnvError::MalformedArt(format!(
                    "more than one {glyph:?} glyph"
                )));
            }
        }

        Ok(art)
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Glyph at a cell, or `None` when out of bounds
    #[must_use]
    pub fn glyph(&self, pos: GridPos) -> Option<char> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    /// Copy with the goal glyph written into the plan
    pub fn with_goal(&self, pos: GridPos) -> Result<GameArt> {
        self.place(GOAL, pos)
    }

    /// Copy with the agent glyph written into the plan
    pub fn with_agent(&self, pos: GridPos) -> Result<GameArt> {
        self.place(AGENT, pos)
    }

    fn place(&self, glyph: char, pos: GridPos) -> Result<GameArt> {
        match self.glyph(pos) {
            None => Err(EnvError::InvalidPlacement {
                row: pos.row,
                col: pos.col,
                reason: "out of bounds".into(),
            }),
            Some(FLOOR) => Ok(self.stamped(glyph, pos)),
            Some(occupant) => Err(EnvError::InvalidPlacement {
                row: pos.row,
                col: pos.col,
                reason: format!("cell already holds {occupant:?}"),
            }),
        }
    }

    /// Copy with `glyph` drawn over whatever the cell holds.
    ///
    /// Rendering-only escape hatch: the agent overlay may sit on the goal
    /// cell, which `place` would reject.
    #[must_use]
    pub(crate) fn stamped(&self, glyph: char, pos: GridPos) -> GameArt {
        let mut rows = self.rows.clone();
        rows[pos.row][pos.col] = glyph;
        GameArt { rows }
    }

    fn find(&self, glyph: char) -> Option<GridPos> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|&g| g == glyph)
                .map(|c| GridPos::new(r, c))
        })
    }

    fn count(&self, glyph: char) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&g| g == glyph).count())
            .sum()
    }

    /// Position of the goal glyph, if placed
    #[must_use]
    pub fn goal(&self) -> Option<GridPos> {
        self.find(GOAL)
    }

    /// Position of the agent glyph, if placed
    #[must_use]
    pub fn agent(&self) -> Option<GridPos> {
        self.find(AGENT)
    }

    /// True when the agent may not enter the cell
    #[must_use]
    pub fn is_impassable(&self, pos: GridPos) -> bool {
        matches!(self.glyph(pos), Some(WALL) | None)
    }

    /// Render the board as per-cell observation scalars
    #[must_use]
    pub fn to_values(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows(), self.cols()), |(r, c)| {
            value_of(self.rows[r][c])
        })
    }

    /// Text rows of the board, for display
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_plan_dimensions() {
        let room = GameArt::room();
        assert_eq!(room.rows(), 9);
        assert_eq!(room.cols(), 11);

        let hallway = GameArt::hallway();
        assert_eq!(hallway.rows(), 3);
        assert_eq!(hallway.cols(), 11);
    }

    #[test]
    fn test_base_plans_are_bordered_and_empty() {
        for art in [GameArt::room(), GameArt::hallway()] {
            assert_eq!(art.goal(), None);
            assert_eq!(art.agent(), None);
            for r in 0..art.rows() {
                assert_eq!(art.glyph(GridPos::new(r, 0)), Some(WALL));
                assert_eq!(art.glyph(GridPos::new(r, art.cols() - 1)), Some(WALL));
            }
            for c in 0..art.cols() {
                assert_eq!(art.glyph(GridPos::new(0, c)), Some(WALL));
                assert_eq!(art.glyph(GridPos::new(art.rows() - 1, c)), Some(WALL));
            }
        }
    }

    #[test]
    fn test_placement_writes_exactly_one_glyph() {
        let art = GameArt::room()
            .with_goal(GridPos::new(2, 9))
            .unwrap()
            .with_agent(GridPos::new(4, 4))
            .unwrap();

        assert_eq!(art.goal(), Some(GridPos::new(2, 9)));
        assert_eq!(art.agent(), Some(GridPos::new(4, 4)));
        assert_eq!(art.count(GOAL), 1);
        assert_eq!(art.count(AGENT), 1);
    }

    #[test]
    fn test_placement_rejects_walls_and_out_of_bounds() {
        let art = GameArt::room();
        assert!(matches!(
            art.with_goal(GridPos::new(0, 0)),
            Err(EnvError::InvalidPlacement { .. })
        ));
        assert!(matches!(
            art.with_goal(GridPos::new(20, 3)),
            Err(EnvError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn test_placement_rejects_collisions() {
        let art = GameArt::room().with_goal(GridPos::new(2, 9)).unwrap();
        assert!(matches!(
            art.with_agent(GridPos::new(2, 9)),
            Err(EnvError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn test_value_mapping_round_trip() {
        for glyph in [WALL, FLOOR, AGENT, GOAL] {
            assert_eq!(glyph_for(value_of(glyph)), glyph);
        }
    }

    #[test]
    fn test_to_values_uses_the_mapping() {
        let art = GameArt::hallway().with_goal(GridPos::new(1, 6)).unwrap();
        let values = art.to_values();
        assert_eq!(values[(0, 0)], 0.0);
        assert_eq!(values[(1, 1)], 1.0);
        assert_eq!(values[(1, 6)], 3.0);
    }

    #[test]
    fn test_parse_rejects_ragged_art() {
        let err = GameArt::parse(&["####", "#  #", "###"]).unwrap_err();
        assert!(matches!(err, EnvError::MalformedArt(_)));
    }

    #[test]
    fn test_parse_rejects_broken_border() {
        let err = GameArt::parse(&["####", "   #", "####"]).unwrap_err();
        assert!(matches!(err, EnvError::MalformedArt(_)));
    }

    #[test]
    fn test_parse_rejects_duplicate_agents() {
        let err = GameArt::parse(&["#####", "#AA #", "#####"]).unwrap_err();
        assert!(matches!(err, EnvError::MalformedArt(_)));
    }

    #[test]
    fn test_parse_accepts_the_base_plans() {
        assert_eq!(GameArt::parse(&ROOM_PLAN).unwrap(), GameArt::room());
        assert_eq!(GameArt::parse(&HALLWAY_PLAN).unwrap(), GameArt::hallway());
    }
}
