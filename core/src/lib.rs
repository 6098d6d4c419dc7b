#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use hint::*;
pub use observation::*;
pub use schedule::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod hint;
mod observation;
mod schedule;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl BoardConfig {
    /// Board sizes offered by the puzzle picker.
    pub const PRESETS: [BoardConfig; 6] = [
        Self::new_unchecked((9, 9), 10),
        Self::new_unchecked((9, 9), 35),
        Self::new_unchecked((16, 16), 40),
        Self::new_unchecked((16, 16), 99),
        Self::new_unchecked((30, 16), 99),
        Self::new_unchecked((30, 16), 170),
    ];

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps the size to at least one cell and leaves room for a mine-free start cell.
    pub fn new((width, height): Coord2, mines: CellCount) -> Self {
        let width = width.clamp(1, Coord::MAX);
        let height = height.clamp(1, Coord::MAX);
        let mines = mines.min(mult(width, height) - 1);
        Self::new_unchecked((width, height), mines)
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    pub fn validate(&self) -> Result<Self> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(BoardError::InvalidBoardShape);
        }
        if self.mines >= self.total_cells() {
            return Err(BoardError::TooManyMines);
        }
        Ok(*self)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size) {
            Ok(coords)
        } else {
            Err(BoardError::InvalidCoords)
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new_unchecked((10, 10), 30)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

impl BitOr for MarkOutcome {
    type Output = MarkOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::NoChange, Self::NoChange) => Self::NoChange,
            _ => Self::Changed,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    /// `false` only when the move uncovered a mine.
    pub const fn is_safe(self) -> bool {
        !matches!(self, Self::HitMine)
    }
}

/// Merges outcomes of a multi-cell reveal, a mine dominates everything.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
