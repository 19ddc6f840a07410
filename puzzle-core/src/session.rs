use log::{debug, info};
use rand::Rng;

use crate::arrangement::{self, Arrangement};
use crate::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Unsolved,
    Solved,
}

/// A completed drag gesture: the tile picked up at `from` was dropped on `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub from: usize,
    pub to: usize,
}

/// One puzzle round owned by the caller.
///
/// `Solved` is entered only through [`Session::apply`]; it is left only by
/// [`Session::restart`] or [`Session::reshuffle`].
#[derive(Clone, Debug)]
pub struct Session {
    arrangement: Arrangement,
    status: Status,
}

impl Session {
    /// Start a round on a `side` x `side` grid with a shuffled board.
    pub fn new<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Result<Self, EngineError> {
        let mut arrangement = arrangement::reset(side)?;
        scramble(&mut arrangement, rng);
        Ok(Session {
            arrangement,
            status: Status::Unsolved,
        })
    }

    /// Resume from a known arrangement. Status is derived from the tiles.
    pub fn from_arrangement(arrangement: Arrangement) -> Self {
        let status = if arrangement::is_solved(&arrangement) {
            Status::Solved
        } else {
            Status::Unsolved
        };
        Session {
            arrangement,
            status,
        }
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn side(&self) -> usize {
        self.arrangement.side()
    }

    /// Apply a swap request and re-evaluate the win condition.
    ///
    /// Requests arriving after the board is solved are ignored until the
    /// round is restarted.
    pub fn apply(&mut self, req: SwapRequest) -> Result<Status, EngineError> {
        if self.status == Status::Solved {
            debug!("swap {}<->{} ignored, round already solved", req.from, req.to);
            return Ok(self.status);
        }
        arrangement::swap(&mut self.arrangement, req.from, req.to)?;
        if arrangement::is_solved(&self.arrangement) {
            info!("puzzle solved ({}x{})", self.side(), self.side());
            self.status = Status::Solved;
        }
        Ok(self.status)
    }

    /// Back to a fresh shuffled board of the same size.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.arrangement.restore();
        scramble(&mut self.arrangement, rng);
        self.status = Status::Unsolved;
    }

    /// Shuffle the current board again without resetting it first.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        scramble(&mut self.arrangement, rng);
        self.status = Status::Unsolved;
    }
}

// Unsolved must never show a finished board.
fn scramble<R: Rng + ?Sized>(a: &mut Arrangement, rng: &mut R) {
    if a.len() < 2 {
        return;
    }
    loop {
        arrangement::shuffle(a, rng);
        if !arrangement::is_solved(a) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn nearly_solved() -> Session {
        let mut tiles: Vec<usize> = (0..16).collect();
        tiles.swap(14, 15);
        Session::from_arrangement(Arrangement::from_tiles(4, tiles).unwrap())
    }

    #[test]
    fn oversized_side_fails_instead_of_hanging() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for side in [crate::arrangement::MAX_SIDE + 1, 65_536, usize::MAX] {
            assert_eq!(
                Session::new(side, &mut rng).unwrap_err(),
                EngineError::InvalidSide(side)
            );
        }
    }

    #[test]
    fn new_session_is_unsolved_and_scrambled() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let s = Session::new(2, &mut rng).unwrap();
            assert_eq!(s.status(), Status::Unsolved);
            assert!(!arrangement::is_solved(s.arrangement()));
        }
    }

    #[test]
    fn final_swap_enters_solved() {
        let mut s = nearly_solved();
        assert_eq!(s.status(), Status::Unsolved);
        let st = s.apply(SwapRequest { from: 15, to: 14 }).unwrap();
        assert_eq!(st, Status::Solved);
        assert!(arrangement::is_solved(s.arrangement()));
    }

    #[test]
    fn non_solving_swap_stays_unsolved() {
        let mut s = nearly_solved();
        let st = s.apply(SwapRequest { from: 0, to: 1 }).unwrap();
        assert_eq!(st, Status::Unsolved);
    }

    #[test]
    fn solved_round_ignores_further_swaps() {
        let mut s = nearly_solved();
        s.apply(SwapRequest { from: 14, to: 15 }).unwrap();
        let before = s.arrangement().clone();
        let st = s.apply(SwapRequest { from: 0, to: 1 }).unwrap();
        assert_eq!(st, Status::Solved);
        assert_eq!(s.arrangement(), &before);
    }

    #[test]
    fn bad_request_is_rejected_and_board_kept() {
        let mut s = nearly_solved();
        let before = s.arrangement().clone();
        let err = s.apply(SwapRequest { from: 3, to: 40 }).unwrap_err();
        assert_eq!(
            err,
            EngineError::PositionOutOfRange {
                position: 40,
                len: 16
            }
        );
        assert_eq!(s.arrangement(), &before);
        assert_eq!(s.status(), Status::Unsolved);
    }

    #[test]
    fn restart_leaves_solved() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut s = nearly_solved();
        s.apply(SwapRequest { from: 14, to: 15 }).unwrap();
        s.restart(&mut rng);
        assert_eq!(s.status(), Status::Unsolved);
        assert_eq!(s.side(), 4);
        assert!(!arrangement::is_solved(s.arrangement()));
    }

    #[test]
    fn reshuffle_keeps_tile_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut s = Session::new(3, &mut rng).unwrap();
        s.reshuffle(&mut rng);
        let mut v = s.arrangement().tiles().to_vec();
        v.sort_unstable();
        assert_eq!(v, (0..9).collect::<Vec<_>>());
        assert_eq!(s.status(), Status::Unsolved);
    }
}
