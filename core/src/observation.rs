use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a player can see of one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservedCell {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    Exploded,
}

impl ObservedCell {
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Exploded)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Mine truth is only known for uncovered cells.
    pub const fn disclosed_mine(self) -> Option<bool> {
        match self {
            Self::Hidden | Self::Flagged => None,
            Self::Revealed(_) => Some(false),
            Self::Exploded => Some(true),
        }
    }
}

/// The board as the hint advisor is allowed to see it, indexed `[[y, x]]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub start: Coord2,
    pub cells: Array2<ObservedCell>,
}

impl Observation {
    pub fn new(
        size: Coord2,
        mine_count: CellCount,
        start: Coord2,
        cells: Array2<ObservedCell>,
    ) -> Result<Self> {
        let obs = Self {
            size,
            mine_count,
            start,
            cells,
        };
        obs.validate()?;
        Ok(obs)
    }

    pub fn from_board(board: &Board) -> Self {
        let cells = board.squares().map(|cell| {
            match (cell.is_revealed(), cell.is_flagged(), cell.is_mine()) {
                (true, _, true) => ObservedCell::Exploded,
                (true, _, false) => ObservedCell::Revealed(board.num_mines(cell.position())),
                (false, true, _) => ObservedCell::Flagged,
                (false, false, _) => ObservedCell::Hidden,
            }
        });

        Self {
            size: board.size(),
            mine_count: board.total_mines(),
            start: board.start(),
            cells,
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<ObservedCell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (self.size.1 as usize, self.size.0 as usize);
        if self.cells.dim() != expected {
            return Err(BoardError::InvalidBoardShape);
        }
        if self.mine_count >= mult(self.size.0, self.size.1) {
            return Err(BoardError::TooManyMines);
        }
        if !in_bounds(self.start, self.size) {
            return Err(BoardError::InvalidCoords);
        }
        Ok(())
    }
}
