use rand::Rng;

use crate::error::EngineError;
use crate::layout::{TileCrop, tile_crop};

/// Largest grid the engine builds. Every tile becomes a DOM node, so this
/// also bounds the rendered board.
pub const MAX_SIDE: usize = 32;

/// Number of tiles on a `side` x `side` grid, or `InvalidSide` outside
/// `2..=MAX_SIDE`.
pub fn tile_count(side: usize) -> Result<usize, EngineError> {
    if !(2..=MAX_SIDE).contains(&side) {
        return Err(EngineError::InvalidSide(side));
    }
    side.checked_mul(side).ok_or(EngineError::InvalidSide(side))
}

/// Which source tile sits at each board position.
///
/// `tiles()[pos]` is the row-major index of the tile in the uncut image.
/// The sequence is always a permutation of `0..side * side`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrangement {
    side: usize,
    tiles: Vec<usize>,
}

impl Arrangement {
    /// Identity arrangement for a `side` x `side` grid.
    pub fn identity(side: usize) -> Result<Self, EngineError> {
        let n = tile_count(side)?;
        Ok(Arrangement {
            side,
            tiles: (0..n).collect(),
        })
    }

    /// Build an arrangement from explicit tile values, checking that they form
    /// a permutation of `0..side * side`.
    pub fn from_tiles(side: usize, tiles: Vec<usize>) -> Result<Self, EngineError> {
        let n = tile_count(side)?;
        if tiles.len() != n {
            return Err(EngineError::LengthMismatch {
                expected: n,
                actual: tiles.len(),
            });
        }
        let mut seen = vec![false; n];
        for &t in &tiles {
            if t >= n || seen[t] {
                return Err(EngineError::NotAPermutation(n));
            }
            seen[t] = true;
        }
        Ok(Arrangement { side, tiles })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    /// Source tile at `pos`, if the position exists.
    pub fn tile_at(&self, pos: usize) -> Option<usize> {
        self.tiles.get(pos).copied()
    }

    /// True when `pos` holds its own tile.
    pub fn is_correct(&self, pos: usize) -> bool {
        self.tile_at(pos) == Some(pos)
    }

    /// Background crop for the tile currently shown at `pos`.
    pub fn crop(&self, pos: usize) -> Option<TileCrop> {
        self.tile_at(pos).map(|t| tile_crop(t, self.side))
    }

    /// Put every tile back on its own position.
    pub fn restore(&mut self) {
        for (i, t) in self.tiles.iter_mut().enumerate() {
            *t = i;
        }
    }

    fn check(&self, position: usize) -> Result<(), EngineError> {
        if position < self.tiles.len() {
            Ok(())
        } else {
            Err(EngineError::PositionOutOfRange {
                position,
                len: self.tiles.len(),
            })
        }
    }
}

/// Fresh identity arrangement of `side * side` tiles.
pub fn reset(side: usize) -> Result<Arrangement, EngineError> {
    Arrangement::identity(side)
}

/// Fisher-Yates shuffle in place: every position from the back is paired with
/// a uniformly chosen position not yet fixed.
pub fn shuffle<R: Rng + ?Sized>(arrangement: &mut Arrangement, rng: &mut R) {
    let tiles = &mut arrangement.tiles;
    for i in (1..tiles.len()).rev() {
        let j = rng.gen_range(0..=i);
        tiles.swap(i, j);
    }
}

/// Exchange the tiles at two board positions.
///
/// Both positions are checked before anything is touched. Equal positions
/// leave the arrangement as it is.
pub fn swap(arrangement: &mut Arrangement, a: usize, b: usize) -> Result<(), EngineError> {
    arrangement.check(a)?;
    arrangement.check(b)?;
    if a != b {
        arrangement.tiles.swap(a, b);
    }
    Ok(())
}

/// Whether every position holds the tile of the same index.
pub fn is_solved(arrangement: &Arrangement) -> bool {
    arrangement.tiles.iter().enumerate().all(|(i, &t)| i == t)
}
