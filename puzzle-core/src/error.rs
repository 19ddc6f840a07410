/// Errors raised by the tile arrangement engine.
///
/// These all indicate an integration mistake on the caller's side; the
/// gesture surface only ever produces positions of rendered tiles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("side length must be between 2 and {max}, got {0}", max = crate::arrangement::MAX_SIDE)]
    InvalidSide(usize),
    #[error("board position {position} is out of range for {len} tiles")]
    PositionOutOfRange { position: usize, len: usize },
    #[error("expected {expected} tiles, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("tile sequence is not a permutation of 0..{0}")]
    NotAPermutation(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("side length must be between 2 and {max}, got {0}", max = crate::arrangement::MAX_SIDE)]
    InvalidSide(usize),
    #[error("probe timeout must be non-zero")]
    ZeroTimeout,
}
