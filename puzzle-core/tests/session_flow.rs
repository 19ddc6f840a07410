use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use futures::executor::block_on;
use futures::future;
use puzzle_core::{
    ImageProbe, ImageSource, PuzzleConfig, Session, Status, SwapRequest, is_solved,
    resolve_image,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Solve the board the way a player would: drag the right tile onto each
/// position in turn.
fn solve_by_dragging(session: &mut Session) -> usize {
    let mut swaps = 0;
    for pos in 0..session.arrangement().len() {
        let from = session
            .arrangement()
            .tiles()
            .iter()
            .position(|&t| t == pos)
            .unwrap();
        if from == pos {
            continue;
        }
        let status = session.apply(SwapRequest { from, to: pos }).unwrap();
        swaps += 1;
        if status == Status::Solved {
            break;
        }
    }
    swaps
}

#[test]
fn solved_is_reached_only_on_the_last_drag() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut session = Session::new(4, &mut rng).unwrap();
    let mut statuses = Vec::new();
    for pos in 0..16 {
        let from = session
            .arrangement()
            .tiles()
            .iter()
            .position(|&t| t == pos)
            .unwrap();
        if from != pos {
            statuses.push(session.apply(SwapRequest { from, to: pos }).unwrap());
        }
    }
    let (last, rest) = statuses.split_last().unwrap();
    assert_eq!(*last, Status::Solved);
    assert!(rest.iter().all(|s| *s == Status::Unsolved));
    assert!(is_solved(session.arrangement()));
}

#[test]
fn closing_the_reveal_starts_a_new_round() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut session = Session::new(3, &mut rng).unwrap();
    assert!(solve_by_dragging(&mut session) > 0);
    assert_eq!(session.status(), Status::Solved);

    session.restart(&mut rng);
    assert_eq!(session.status(), Status::Unsolved);
    assert_eq!(session.arrangement().len(), 9);
    assert!(!is_solved(session.arrangement()));
}

#[test]
fn every_rendered_tile_has_a_crop_inside_the_image() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let session = Session::new(5, &mut rng).unwrap();
    let a = session.arrangement();
    for pos in 0..a.len() {
        let crop = a.crop(pos).unwrap();
        assert!((0.0..=100.0).contains(&crop.x));
        assert!((0.0..=100.0).contains(&crop.y));
    }
}

/// Nothing ever loads; every timer fires at once and is recorded.
#[derive(Default)]
struct Offline {
    waits: RefCell<Vec<Duration>>,
}

impl ImageProbe for Offline {
    fn load(&self, _url: &str) -> impl Future<Output = bool> {
        future::pending()
    }

    fn sleep(&self, dur: Duration) -> impl Future<Output = ()> {
        self.waits.borrow_mut().push(dur);
        future::ready(())
    }
}

#[test]
fn configured_candidates_fall_back_when_offline() {
    let mut cfg = PuzzleConfig::default();
    cfg.apply_query("?img=https%3A%2F%2Fbad.invalid%2Fx.jpg&timeout=50");
    let offline = Offline::default();
    let r = block_on(resolve_image(
        &offline,
        &cfg.candidates,
        cfg.probe_timeout(),
        |_| {},
    ));
    assert_eq!(r.source, ImageSource::Fallback);
    assert!(r.source.url().starts_with("data:image/svg+xml"));
    assert_eq!(r.statuses.len(), 2);
    assert_eq!(*offline.waits.borrow(), vec![Duration::from_millis(50)]);
}

#[test]
fn configured_timeout_applies_to_every_candidate() {
    let mut cfg = PuzzleConfig::default();
    cfg.apply_query("?img=a.jpg&img=b.jpg&img=c.jpg&timeout=1200");
    let offline = Offline::default();
    let r = block_on(resolve_image(
        &offline,
        &cfg.candidates,
        cfg.probe_timeout(),
        |_| {},
    ));
    assert_eq!(r.source, ImageSource::Fallback);
    assert_eq!(*offline.waits.borrow(), vec![cfg.probe_timeout(); 3]);
    assert_eq!(cfg.probe_timeout(), Duration::from_millis(1200));
}
