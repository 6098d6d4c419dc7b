use alloc::vec::Vec;
use core::time::Duration;
use rand::{Rng, RngExt};

use crate::*;

/// Timing of the post-game sweep that uncovers the rest of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevealPacing {
    /// Pause before the first cell opens.
    pub lead_in: Duration,
    /// Added per unit of Manhattan distance from the origin.
    pub base_delay: Duration,
    /// Upper bound of the random extra delay per cell.
    pub jitter: Duration,
}

impl RevealPacing {
    pub fn delay(&self, coords: Coord2, origin: Coord2, jitter: Duration) -> Duration {
        let distance = u32::from(manhattan_distance(coords, origin));
        self.lead_in + self.base_delay * distance + jitter.min(self.jitter)
    }
}

impl Default for RevealPacing {
    fn default() -> Self {
        Self {
            lead_in: Duration::from_millis(1000),
            base_delay: Duration::from_millis(200),
            jitter: Duration::from_millis(200),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevealStep {
    pub coords: Coord2,
    pub delay: Duration,
}

/// Pending cells of a reveal sweep, ordered by delay.
///
/// The schedule is bound to the game it was built for: applying it to a
/// different board does nothing, and [`RevealSchedule::cancel`] drops every
/// pending step when the game is replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealSchedule {
    board_id: BoardId,
    pending: Vec<RevealStep>,
}

impl RevealSchedule {
    pub fn pending(&self) -> &[RevealStep] {
        &self.pending
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn cancel(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelled {} pending reveals", self.pending.len());
        }
        self.pending.clear();
    }

    /// Uncovers every pending cell whose delay has passed. Returns how many cells changed.
    pub fn apply_due(&mut self, board: &mut Board, elapsed: Duration) -> usize {
        if board.id() != self.board_id {
            log::warn!("Reveal schedule applied to another game, cancelling");
            self.cancel();
            return 0;
        }

        let due = self.pending.partition_point(|step| step.delay <= elapsed);
        self.pending
            .drain(..due)
            .filter(|step| board.expose(step.coords).has_update())
            .count()
    }
}

impl Board {
    /// Schedules every still-covered cell to open in a wave spreading out from `origin`.
    pub fn reveal_remaining_schedule<R: Rng + ?Sized>(
        &self,
        origin: Coord2,
        pacing: &RevealPacing,
        rng: &mut R,
    ) -> RevealSchedule {
        let jitter_ms = u64::try_from(pacing.jitter.as_millis()).unwrap_or(u64::MAX);
        let mut pending: Vec<RevealStep> = self
            .cells()
            .filter(|cell| !cell.is_revealed())
            .map(|cell| {
                let jitter = Duration::from_millis(rng.random_range(0..=jitter_ms));
                RevealStep {
                    coords: cell.position(),
                    delay: pacing.delay(cell.position(), origin, jitter),
                }
            })
            .collect();
        pending.sort_by_key(|step| step.delay);

        RevealSchedule {
            board_id: self.id(),
            pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn lost_board() -> Board {
        let mut board = Board::from_mine_coords((4, 4), (0, 0), &[(3, 3), (0, 3)]).unwrap();
        board.flag_square((3, 3)).unwrap();
        board.reveal((1, 1)).unwrap();
        board.reveal((0, 3)).unwrap();
        board
    }

    #[test]
    fn delay_grows_with_distance() {
        let pacing = RevealPacing::default();

        assert_eq!(pacing.delay((0, 0), (0, 0), Duration::ZERO), Duration::from_millis(1000));
        assert_eq!(pacing.delay((2, 1), (0, 0), Duration::ZERO), Duration::from_millis(1600));
        assert_eq!(
            pacing.delay((0, 0), (0, 0), Duration::from_secs(5)),
            Duration::from_millis(1200)
        );
    }

    #[test]
    fn schedule_covers_unrevealed_cells_in_order() {
        let board = lost_board();
        let mut rng = SmallRng::seed_from_u64(5);

        let schedule = board.reveal_remaining_schedule((0, 3), &RevealPacing::default(), &mut rng);

        let unrevealed = board.cells().filter(|cell| !cell.is_revealed()).count();
        assert_eq!(schedule.pending().len(), unrevealed);
        assert!(schedule.pending().windows(2).all(|w| w[0].delay <= w[1].delay));
    }

    #[test]
    fn apply_due_uncovers_and_unflags() {
        let mut board = lost_board();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut schedule =
            board.reveal_remaining_schedule((0, 3), &RevealPacing::default(), &mut rng);

        assert_eq!(schedule.apply_due(&mut board, Duration::from_millis(999)), 0);
        let opened = schedule.apply_due(&mut board, Duration::from_secs(60));

        assert!(opened > 0);
        assert!(schedule.is_done());
        assert!(board.cells().all(|cell| cell.is_revealed() && !cell.is_flagged()));
        assert_eq!(board.status(), BoardStatus::Lost);
    }

    #[test]
    fn cancelled_schedule_does_nothing() {
        let mut board = lost_board();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut schedule =
            board.reveal_remaining_schedule((0, 3), &RevealPacing::default(), &mut rng);
        let revealed = board.revealed_count();

        schedule.cancel();

        assert_eq!(schedule.apply_due(&mut board, Duration::from_secs(60)), 0);
        assert_eq!(board.revealed_count(), revealed);
    }

    #[test]
    fn schedule_ignores_replacement_board() {
        let board = lost_board();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut schedule =
            board.reveal_remaining_schedule((0, 3), &RevealPacing::default(), &mut rng);
        let mut next_game = Board::from_mine_coords((4, 4), (0, 0), &[(3, 3)]).unwrap();

        assert_eq!(schedule.apply_due(&mut next_game, Duration::from_secs(60)), 0);
        assert_eq!(next_game.revealed_count(), 0);
        assert!(schedule.is_done());
    }
}
