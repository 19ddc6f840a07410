/// DOM ids and tuning values shared by the browser adapter.
pub const BOARD_ID: &str = "board";
pub const SHUFFLE_BTN_ID: &str = "shuffleBtn";
pub const DEBUG_ID: &str = "debug";
pub const MODAL_TPL_ID: &str = "modalTpl";
pub const PRIZE_IMG_ID: &str = "prizeImg";
pub const CLOSE_MODAL_ID: &str = "closeModal";

/// Optional JSON config fetched next to the page.
pub const CONFIG_PATH: &str = "puzzle.json";

/// Confetti burst shown on a win.
pub const CONFETTI_PARTICLES: usize = 200;
/// Cone width in degrees around straight up.
pub const CONFETTI_SPREAD_DEG: f64 = 100.0;
/// Burst origin as a fraction of the viewport height.
pub const CONFETTI_ORIGIN_Y: f64 = 0.6;
pub const CONFETTI_START_VELOCITY: f64 = 45.0;
pub const CONFETTI_DECAY: f64 = 0.9;
pub const CONFETTI_GRAVITY: f64 = 3.0;
/// Frames a particle lives for.
pub const CONFETTI_TICKS: u32 = 200;
