use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl BoardStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Identity of one game, shared by every snapshot of that game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardId(usize);

impl BoardId {
    fn next() -> Self {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A Minesweeper board: the cell grid, its metadata, and the game status.
///
/// Cells are stored row-major, indexed `[y][x]`. Every mutating operation
/// reports what it did through an outcome value and bumps [`Board::revision`]
/// when the game state changed, so an observer only has to compare revisions
/// to know when to re-render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    config: BoardConfig,
    start: Coord2,
    grid: Array2<Cell>,
    initialized: bool,
    status: BoardStatus,
    revision: u64,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Blank, uninitialized board. Mines are placed on the first [`Board::initialize`].
    pub fn new(config: BoardConfig) -> Self {
        Self::with_start(config, (0, 0))
    }

    pub fn with_start(config: BoardConfig, start: Coord2) -> Self {
        Self {
            id: BoardId::next(),
            config,
            start,
            grid: Array2::default((0, 0)),
            initialized: false,
            status: BoardStatus::NotStarted,
            revision: 0,
            triggered_mine: None,
        }
    }

    /// Builds an initialized, in-progress board from a row-major seed grid.
    ///
    /// The seed grid must be exactly `height` rows of `width` cells. The mine
    /// count is taken from the seeds; the start cell is not revealed.
    pub fn from_seed_grid(size: Coord2, start: Coord2, seeds: &[Vec<CellSeed>]) -> Result<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidBoardShape);
        }
        if seeds.len() != usize::from(height)
            || seeds.iter().any(|row| row.len() != usize::from(width))
        {
            return Err(BoardError::InvalidBoardShape);
        }
        if !in_bounds(start, size) {
            return Err(BoardError::InvalidCoords);
        }

        let grid = Array2::from_shape_fn((usize::from(height), usize::from(width)), |(y, x)| {
            // both axes are bounded by `Coord` through `size`
            let position = (x as Coord, y as Coord);
            Cell::from_seed(position, seeds[y][x])
        });
        let mines: CellCount = grid
            .iter()
            .filter(|cell| cell.is_mine())
            .count()
            .try_into()
            .map_err(|_| BoardError::TooManyMines)?;
        let config = BoardConfig::new_unchecked(size, mines).validate()?;

        Ok(Self {
            id: BoardId::next(),
            config,
            start,
            grid,
            initialized: true,
            status: BoardStatus::InProgress,
            revision: 0,
            triggered_mine: None,
        })
    }

    /// Initialized, fully covered board with mines at `mine_coords`.
    pub fn from_mine_coords(size: Coord2, start: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut seeds =
            alloc::vec![alloc::vec![CellSeed::default(); usize::from(size.0)]; usize::from(size.1)];
        for &(x, y) in mine_coords {
            if !in_bounds((x, y), size) {
                return Err(BoardError::InvalidCoords);
            }
            seeds[usize::from(y)][usize::from(x)].is_mine = true;
        }
        Self::from_seed_grid(size, start, &seeds)
    }

    /// Asks `generator` for a layout that keeps `start` safe, then reveals `start`.
    ///
    /// Returns the populated snapshot of this game; `self` stays the blank shell.
    pub async fn initialize<G: BoardGenerator>(
        &self,
        start: Coord2,
        generator: &G,
    ) -> core::result::Result<Board, InitializeError<G::Error>> {
        if self.initialized {
            return Err(BoardError::AlreadyInitialized.into());
        }
        let config = self.config.validate()?;
        let start = config.validate_coords(start)?;

        let seeds = generator
            .generate(GenerateRequest { config, start })
            .await
            .map_err(InitializeError::Generator)?;

        let mut board = Board::from_seed_grid(config.size, start, &seeds)?;
        if board.config.mines != config.mines {
            log::warn!(
                "Generated board mine count mismatch, actual: {}, requested: {}",
                board.config.mines,
                config.mines
            );
        }
        if board.grid[start.to_nd_index()].is_mine() {
            log::warn!("Generator placed a mine on the start cell {:?}", start);
            return Err(BoardError::InvalidBoardShape.into());
        }
        board.id = self.id;
        board.revision = self.revision + 1;
        let outcome = board.reveal_cell(start);
        log::debug!("Initialized {:?} from {:?}: {:?}", board.config, start, outcome);
        Ok(board)
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn width(&self) -> Coord {
        self.config.width()
    }

    pub fn height(&self) -> Coord {
        self.config.height()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Bumped by every reveal, flag, and status change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Cell grid indexed `[[y, x]]`, empty until initialized.
    pub fn squares(&self) -> &Array2<Cell> {
        &self.grid
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.grid.get(coords.to_nd_index())
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_revealed())
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_flagged())
    }

    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flag_count() as isize)
    }

    /// Grid-adjacent coordinates of `coords`, clipped at the board edges.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.grid.iter_neighbors(coords)
    }

    /// Number of mines around `coords`.
    pub fn num_mines(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Cell::is_mine)
    }

    pub fn num_flagged(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Cell::is_flagged)
    }

    /// Whether a chord on `coords` would act: a revealed number whose flag count matches.
    pub fn is_chordable(&self, coords: Coord2) -> bool {
        match self.cell(coords) {
            Some(cell) if cell.is_revealed() && !cell.is_mine() => {
                let count = self.num_mines(coords);
                count > 0 && count == self.num_flagged(coords)
            }
            _ => false,
        }
    }

    /// Reveals one covered cell, flood filling from it when it has no adjacent mines.
    ///
    /// Flagged cells, moves before initialization and moves on a finished board
    /// are ignored.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.config.validate_coords(coords)?;
        if !self.initialized || self.status.is_finished() {
            log::debug!("Ignoring reveal at {:?} in state {:?}", coords, self.status);
            return Ok(RevealOutcome::NoChange);
        }
        Ok(self.reveal_cell(coords))
    }

    /// Reveals every covered, unflagged neighbor of a satisfied number.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.config.validate_coords(coords)?;
        if !self.initialized || self.status.is_finished() || !self.is_chordable(coords) {
            return Ok(RevealOutcome::NoChange);
        }

        let targets: Vec<Coord2> = self
            .neighbors(coords)
            .filter(|&pos| {
                let cell = &self.grid[pos.to_nd_index()];
                !cell.is_revealed() && !cell.is_flagged()
            })
            .collect();
        log::debug!("Chord at {:?} opens {:?}", coords, targets);

        Ok(targets
            .into_iter()
            .map(|pos| self.reveal_cell(pos))
            .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor))
    }

    /// Toggles the flag on a covered cell.
    pub fn flag_square(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.config.validate_coords(coords)?;
        if !self.initialized || self.status.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = &mut self.grid[coords.to_nd_index()];
        if cell.is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }
        cell.toggle_flag();
        log::debug!("Flag at {:?}: {}", coords, cell.is_flagged());
        self.revision += 1;
        Ok(MarkOutcome::Changed)
    }

    /// Moves an in-progress board to [`BoardStatus::Won`] once every safe cell is revealed.
    ///
    /// Flags play no part in the check. Returns whether the board is won.
    pub fn check_win(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        if self.status == BoardStatus::InProgress {
            let unrevealed = self.count_cells(|cell| !cell.is_revealed());
            let mines = self.count_cells(Cell::is_mine);
            if unrevealed == mines {
                self.end_game(BoardStatus::Won);
            }
        }
        self.status == BoardStatus::Won
    }

    /// Clears all highlights, then highlights the cells named by the active step.
    ///
    /// `None` only clears. Coordinates outside the board are skipped.
    pub fn highlight_hint_cells(&mut self, steps: Option<&[HintStep]>) -> MarkOutcome {
        let mut outcome = MarkOutcome::NoChange;
        for cell in self.grid.iter_mut() {
            if cell.set_highlighted(false) {
                outcome = MarkOutcome::Changed;
            }
        }

        let Some(step) = steps.and_then(|steps| steps.iter().find(|step| step.active)) else {
            return outcome;
        };
        for &coords in step
            .hidden_cells_to_highlight
            .iter()
            .chain(step.revealed_cells_to_highlight.iter())
        {
            match self.grid.get_mut(coords.to_nd_index()) {
                Some(cell) => {
                    if cell.set_highlighted(true) {
                        outcome = MarkOutcome::Changed;
                    }
                }
                None => log::warn!("Hint names cell {:?} outside the board", coords),
            }
        }
        outcome
    }

    /// Highlights the active step of `hint`.
    ///
    /// The first call only accepts a hint requested for the current revision,
    /// later moves on the same game keep it valid while the player cycles steps.
    pub fn apply_hint(&mut self, hint: &mut HintSequence) -> MarkOutcome {
        if self.status.is_finished() || hint.is_stale_for(self) {
            log::debug!("Dropping stale hint for revision {}", hint.revision());
            return self.highlight_hint_cells(None);
        }
        hint.accept();
        self.highlight_hint_cells(Some(hint.steps()))
    }

    pub fn dismiss_hint(&mut self) -> MarkOutcome {
        self.highlight_hint_cells(None)
    }

    /// Uncovers a cell without game logic, used by the post-game reveal sequence.
    pub(crate) fn expose(&mut self, coords: Coord2) -> MarkOutcome {
        match self.grid.get_mut(coords.to_nd_index()).map(Cell::set_revealed) {
            Some(true) => {
                self.revision += 1;
                MarkOutcome::Changed
            }
            _ => MarkOutcome::NoChange,
        }
    }

    fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        self.reveal_cell_by(coords, BTreeSet::pop_first)
    }

    /// `take` picks the next frontier cell; the revealed set does not depend on its choice.
    fn reveal_cell_by<F>(&mut self, coords: Coord2, mut take: F) -> RevealOutcome
    where
        F: FnMut(&mut BTreeSet<Coord2>) -> Option<Coord2>,
    {
        let cell = &mut self.grid[coords.to_nd_index()];
        if cell.is_revealed() || cell.is_flagged() {
            return RevealOutcome::NoChange;
        }
        cell.set_revealed();
        let is_mine = cell.is_mine();
        self.revision += 1;

        if is_mine {
            log::debug!("Mine revealed at {:?}", coords);
            self.triggered_mine.get_or_insert(coords);
            self.end_game(BoardStatus::Lost);
            return RevealOutcome::HitMine;
        }

        let adjacent_mines = self.num_mines(coords);
        log::debug!("Reveal at {:?}, mine count: {}", coords, adjacent_mines);

        if adjacent_mines == 0 {
            let mut frontier: BTreeSet<Coord2> = self.covered_neighbors(coords).collect();
            while let Some(next) = take(&mut frontier) {
                self.grid[next.to_nd_index()].set_revealed();
                let next_mines = self.num_mines(next);
                log::trace!("Flood revealed {:?}, mine count: {}", next, next_mines);
                if next_mines == 0 {
                    frontier.extend(self.covered_neighbors(next));
                }
            }
        }

        if self.check_win() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    fn end_game(&mut self, status: BoardStatus) {
        if self.status.is_finished() {
            return;
        }
        self.status = status;
        self.revision += 1;
        self.highlight_hint_cells(None);
        log::debug!("Game ended: {:?}", status);
    }

    fn covered_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.neighbors(coords)
            .filter(|&pos| !self.grid[pos.to_nd_index()].is_revealed())
    }

    fn count_neighbors(&self, coords: Coord2, pred: impl Fn(&Cell) -> bool) -> u8 {
        let count = self
            .neighbors(coords)
            .filter(|&pos| pred(&self.grid[pos.to_nd_index()]))
            .count();
        // at most eight neighbors
        count as u8
    }

    fn count_cells(&self, pred: impl Fn(&Cell) -> bool) -> CellCount {
        let count = self.grid.iter().filter(|&cell| pred(cell)).count();
        // the grid never holds more than `Coord::MAX^2` cells
        count as CellCount
    }
}
