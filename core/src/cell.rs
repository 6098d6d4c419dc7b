use serde::{Deserialize, Serialize};

use crate::*;

/// One square of the board.
///
/// `is_mine` is ground truth fixed when the board is populated. The remaining
/// flags are player-visible state owned by [`Board`]: `revealed` only ever goes
/// from `false` to `true`, and a revealed cell is never flagged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Coord2,
    is_mine: bool,
    revealed: bool,
    flagged: bool,
    highlighted: bool,
}

impl Cell {
    pub const fn new(position: Coord2, is_mine: bool) -> Self {
        Self {
            position,
            is_mine,
            revealed: false,
            flagged: false,
            highlighted: false,
        }
    }

    /// Builds a cell from a generator seed, dropping a flag on an already revealed seed.
    pub const fn from_seed(position: Coord2, seed: CellSeed) -> Self {
        Self {
            position,
            is_mine: seed.is_mine,
            revealed: seed.is_visible,
            flagged: seed.is_flagged && !seed.is_visible,
            highlighted: false,
        }
    }

    pub const fn position(&self) -> Coord2 {
        self.position
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Mine truth as the player may know it: `None` while the cell is covered.
    pub const fn disclosed_mine(&self) -> Option<bool> {
        if self.revealed { Some(self.is_mine) } else { None }
    }

    pub(crate) fn set_revealed(&mut self) -> bool {
        let changed = !self.revealed || self.flagged;
        self.revealed = true;
        self.flagged = false;
        changed
    }

    pub(crate) fn toggle_flag(&mut self) {
        self.flagged = !self.flagged;
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) -> bool {
        let changed = self.highlighted != highlighted;
        self.highlighted = highlighted;
        changed
    }
}

/// Per-cell layout produced by a [`BoardGenerator`], the `{isMine, isVisible, isFlagged}` triple.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSeed {
    pub is_mine: bool,
    pub is_visible: bool,
    pub is_flagged: bool,
}

impl CellSeed {
    pub const fn hidden(is_mine: bool) -> Self {
        Self {
            is_mine,
            is_visible: false,
            is_flagged: false,
        }
    }
}
