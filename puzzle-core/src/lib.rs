//! Tile arrangement engine for the drag puzzle.
//!
//! Everything here is free of DOM types so it runs and tests natively; the
//! `puzzle-wasm` crate renders a [`Session`] and feeds gestures back into it.

pub mod arrangement;
pub mod config;
pub mod error;
pub mod image;
pub mod layout;
pub mod session;

pub use arrangement::{Arrangement, MAX_SIDE, is_solved, reset, shuffle, swap};
pub use config::PuzzleConfig;
pub use error::{ConfigError, EngineError};
pub use image::{ImageProbe, ImageSource, ProbeOutcome, ProbeStatus, Resolution, resolve_image};
pub use layout::TileCrop;
pub use session::{Session, Status, SwapRequest};
