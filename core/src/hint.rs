use alloc::string::String;
use alloc::vec::Vec;
use core::future::Future;
use serde::{Deserialize, Serialize};

use crate::*;

/// One explained step of a hint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintStep {
    pub text: String,
    /// Covered cells the step talks about.
    pub hidden_cells_to_highlight: Vec<Coord2>,
    /// Revealed cells the step talks about.
    pub revealed_cells_to_highlight: Vec<Coord2>,
    pub active: bool,
}

impl HintStep {
    pub fn new(
        text: impl Into<String>,
        hidden_cells_to_highlight: Vec<Coord2>,
        revealed_cells_to_highlight: Vec<Coord2>,
    ) -> Self {
        Self {
            text: text.into(),
            hidden_cells_to_highlight,
            revealed_cells_to_highlight,
            active: false,
        }
    }
}

/// What the step-cycling control offers next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HintAction {
    Next,
    Restart,
}

impl HintAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Restart => "Restart hint",
        }
    }
}

/// An ordered, non-empty hint with exactly one active step.
///
/// A sequence is requested for one board revision. Until it is first shown it
/// is stale once the board moves on; after that it follows the game until it
/// is dismissed, replaced by the next request, or the game ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintSequence {
    board_id: BoardId,
    revision: u64,
    accepted: bool,
    steps: Vec<HintStep>,
    active: usize,
}

impl HintSequence {
    /// Activates the first step. Returns `None` for an empty hint.
    pub fn new(board: &Board, steps: Vec<HintStep>) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        let mut hint = Self {
            board_id: board.id(),
            revision: board.revision(),
            accepted: false,
            steps,
            active: 0,
        };
        hint.activate(0);
        Some(hint)
    }

    pub fn steps(&self) -> &[HintStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &HintStep {
        &self.steps[self.active]
    }

    pub fn is_last(&self) -> bool {
        self.active + 1 == self.steps.len()
    }

    /// Board revision the hint was computed for.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the hint has been shown on its board at least once.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn is_stale_for(&self, board: &Board) -> bool {
        self.board_id != board.id() || (!self.accepted && self.revision != board.revision())
    }

    pub(crate) fn accept(&mut self) {
        self.accepted = true;
    }

    /// `None` when the hint has a single step and there is nothing to cycle.
    pub fn action(&self) -> Option<HintAction> {
        match (self.steps.len(), self.is_last()) {
            (1, _) => None,
            (_, true) => Some(HintAction::Restart),
            (_, false) => Some(HintAction::Next),
        }
    }

    /// Moves to the next step, wrapping from the last back to the first.
    pub fn advance(&mut self) -> &HintStep {
        let next = (self.active + 1) % self.steps.len();
        self.activate(next);
        self.active()
    }

    fn activate(&mut self, index: usize) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.active = i == index;
        }
        self.active = index;
    }
}

/// External service that explains a safe move for an observed board.
pub trait HintAdvisor {
    type Error: core::error::Error + 'static;

    /// `Ok(None)` means the advisor has no hint for this board.
    fn advise(
        &self,
        observation: &Observation,
    ) -> impl Future<Output = core::result::Result<Option<Vec<HintStep>>, Self::Error>> + Send;
}

/// Fetches a hint for `board`. Failures and empty hints are logged and become `None`.
pub async fn request_hint<A: HintAdvisor>(board: &Board, advisor: &A) -> Option<HintSequence> {
    if !board.is_initialized() || board.is_finished() {
        log::debug!("No hint for board in state {:?}", board.status());
        return None;
    }

    let observation = Observation::from_board(board);
    match advisor.advise(&observation).await {
        Ok(Some(steps)) => {
            let hint = HintSequence::new(board, steps);
            if hint.is_none() {
                log::debug!("Hint advisor returned no steps");
            }
            hint
        }
        Ok(None) => {
            log::debug!("Hint advisor has no hint");
            None
        }
        Err(err) => {
            log::warn!("Hint request failed: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use futures::executor::block_on;

    struct FixedAdvisor(core::result::Result<Option<Vec<HintStep>>, BoardError>);

    impl HintAdvisor for FixedAdvisor {
        type Error = BoardError;

        fn advise(
            &self,
            _observation: &Observation,
        ) -> impl Future<Output = core::result::Result<Option<Vec<HintStep>>, Self::Error>> + Send
        {
            core::future::ready(self.0.clone())
        }
    }

    fn board() -> Board {
        let mut board = Board::from_mine_coords((3, 3), (0, 0), &[(2, 2)]).unwrap();
        board.reveal((1, 1)).unwrap();
        board
    }

    fn steps(n: usize) -> Vec<HintStep> {
        (0..n)
            .map(|i| HintStep::new("step", vec![(0, i as Coord)], vec![(1, 1)]))
            .collect()
    }

    #[test]
    fn new_activates_first_step() {
        let hint = HintSequence::new(&board(), steps(3)).unwrap();

        assert_eq!(hint.active_index(), 0);
        assert_eq!(hint.steps().iter().filter(|step| step.active).count(), 1);
        assert!(hint.steps()[0].active);
    }

    #[test]
    fn empty_hint_is_none() {
        assert_eq!(HintSequence::new(&board(), Vec::new()), None);
    }

    #[test]
    fn advance_wraps_to_first_step() {
        let mut hint = HintSequence::new(&board(), steps(3)).unwrap();

        assert_eq!(hint.action(), Some(HintAction::Next));
        hint.advance();
        hint.advance();
        assert!(hint.is_last());
        assert_eq!(hint.action(), Some(HintAction::Restart));
        assert_eq!(hint.action().map(HintAction::label), Some("Restart hint"));

        hint.advance();
        assert_eq!(hint.active_index(), 0);
        assert_eq!(hint.steps().iter().filter(|step| step.active).count(), 1);
    }

    #[test]
    fn single_step_has_no_action() {
        let mut hint = HintSequence::new(&board(), steps(1)).unwrap();

        assert_eq!(hint.action(), None);
        hint.advance();
        assert_eq!(hint.active_index(), 0);
    }

    #[test]
    fn apply_highlights_active_step() {
        let mut board = board();
        let mut hint = HintSequence::new(&board, steps(2)).unwrap();

        assert_eq!(board.apply_hint(&mut hint), MarkOutcome::Changed);
        assert!(board.cell((0, 0)).unwrap().is_highlighted());

        hint.advance();
        board.apply_hint(&mut hint);
        assert!(!board.cell((0, 0)).unwrap().is_highlighted());
        assert!(board.cell((0, 1)).unwrap().is_highlighted());
        assert!(board.cell((1, 1)).unwrap().is_highlighted());
    }

    #[test]
    fn stale_hint_only_clears() {
        let mut board = board();
        let mut hint = HintSequence::new(&board, steps(1)).unwrap();
        board.flag_square((2, 2)).unwrap();

        assert!(hint.is_stale_for(&board));
        board.apply_hint(&mut hint);
        assert!(board.cells().all(|cell| !cell.is_highlighted()));
        assert!(!hint.is_accepted());
    }

    #[test]
    fn shown_hint_survives_moves_while_cycling() {
        let mut board = board();
        let mut hint = HintSequence::new(&board, steps(2)).unwrap();
        board.apply_hint(&mut hint);
        assert!(hint.is_accepted());

        board.flag_square((2, 1)).unwrap();
        hint.advance();

        assert!(!hint.is_stale_for(&board));
        assert_eq!(board.apply_hint(&mut hint), MarkOutcome::Changed);
        assert!(board.cell((0, 1)).unwrap().is_highlighted());
        assert!(!board.cell((0, 0)).unwrap().is_highlighted());
    }

    #[test]
    fn shown_hint_is_dropped_when_game_ends() {
        let mut board = board();
        let mut hint = HintSequence::new(&board, steps(2)).unwrap();
        board.apply_hint(&mut hint);

        board.reveal((2, 2)).unwrap();
        hint.advance();

        assert_eq!(board.apply_hint(&mut hint), MarkOutcome::NoChange);
        assert!(board.cells().all(|cell| !cell.is_highlighted()));
    }

    #[test]
    fn shown_hint_stays_with_its_game() {
        let mut board = board();
        let mut hint = HintSequence::new(&board, steps(1)).unwrap();
        board.apply_hint(&mut hint);

        assert!(hint.is_stale_for(&self::board()));
    }

    #[test]
    fn hint_from_other_game_is_stale() {
        let other = board();
        let hint = HintSequence::new(&other, steps(1)).unwrap();

        assert!(hint.is_stale_for(&board()));
    }

    #[test]
    fn request_hint_wraps_steps() {
        let board = board();
        let advisor = FixedAdvisor(Ok(Some(steps(2))));

        let hint = block_on(request_hint(&board, &advisor)).unwrap();

        assert_eq!(hint.len(), 2);
        assert!(!hint.is_stale_for(&board));
    }

    #[test]
    fn request_hint_swallows_failures() {
        let board = board();

        assert_eq!(
            block_on(request_hint(&board, &FixedAdvisor(Err(BoardError::InvalidBoardShape)))),
            None
        );
        assert_eq!(block_on(request_hint(&board, &FixedAdvisor(Ok(None)))), None);
        assert_eq!(block_on(request_hint(&board, &FixedAdvisor(Ok(Some(Vec::new()))))), None);
    }

    #[test]
    fn request_hint_skips_finished_board() {
        let mut board = board();
        board.reveal((2, 2)).unwrap();

        let advisor = FixedAdvisor(Ok(Some(steps(1))));
        assert_eq!(block_on(request_hint(&board, &advisor)), None);
    }
}
