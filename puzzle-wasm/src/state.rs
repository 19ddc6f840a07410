use std::cell::RefCell;
use std::rc::Rc;

use puzzle_core::{Session, SwapRequest};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use web_sys::{Document, HtmlElement, Window};

/// Everything the adapter can be asked to do. Gesture and button handlers
/// only build these; [`crate::update`] is the one place that acts on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    Swap(SwapRequest),
    Shuffle,
    CloseReveal,
}

/// Adapter state stored behind an `Rc<RefCell<_>>` so it can be shared
/// across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub board: HtmlElement,
    /// `None` until the image source has been resolved.
    pub session: Option<Session>,
    pub image_url: String,
    pub prize_url: String,
    pub rng: ChaCha8Rng,
    /// Completion overlay currently attached to the body.
    pub overlay: Option<crate::reveal::Overlay>,
}

impl State {
    pub fn new(window: Window, document: Document, board: HtmlElement) -> Self {
        State {
            window,
            document,
            board,
            session: None,
            image_url: String::new(),
            prize_url: String::new(),
            rng: ChaCha8Rng::seed_from_u64(browser_seed()),
            overlay: None,
        }
    }
}

// Math.random only yields 52 useful bits; mixing in the clock is enough
// for shuffling a picture.
fn browser_seed() -> u64 {
    let r = (js_sys::Math::random() * (1u64 << 52) as f64) as u64;
    let t = js_sys::Date::now() as u64;
    r ^ t.rotate_left(32)
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
