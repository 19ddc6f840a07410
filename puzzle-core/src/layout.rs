/// Background crop of one source tile, in percent of the free image travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileCrop {
    pub x: f64,
    pub y: f64,
}

impl TileCrop {
    /// CSS `background-position` value, e.g. `"33.333333333333336% 0%"`.
    pub fn to_css(self) -> String {
        format!("{}% {}%", self.x, self.y)
    }
}

/// Crop offset for source tile `value` on a `side` x `side` grid.
///
/// Column and row are taken row-major from the uncut image and mapped onto
/// `0..=100` so the first tile sits at `0% 0%` and the last at `100% 100%`.
/// Only reachable through [`crate::Arrangement::crop`], whose side is
/// always in `2..=MAX_SIDE`.
pub(crate) fn tile_crop(value: usize, side: usize) -> TileCrop {
    debug_assert!(side >= 2, "tile_crop needs side >= 2, got {side}");
    let step = 100.0 / (side - 1) as f64;
    let col = value % side;
    let row = value / side;
    TileCrop {
        x: col as f64 * step,
        y: row as f64 * step,
    }
}
