use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::arrangement::MAX_SIDE;
use crate::error::ConfigError;

pub const DEFAULT_SIDE: usize = 4;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 8000;

/// Puzzle settings: built-in defaults, then an optional `puzzle.json`, then
/// query string overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Grid dimension; the board has `side * side` tiles.
    pub side: usize,
    /// Image URLs tried in order before the embedded fallback.
    pub candidates: Vec<String>,
    pub probe_timeout_ms: u64,
    /// Image shown in the completion overlay.
    pub prize_url: String,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        PuzzleConfig {
            side: DEFAULT_SIDE,
            candidates: vec!["img/pazzle.jpg".to_string()],
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            prize_url: "img/pazzle-priz.png".to_string(),
        }
    }
}

impl PuzzleConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: PuzzleConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SIDE).contains(&self.side) {
            return Err(ConfigError::InvalidSide(self.side));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Apply `?side=`, `?img=` and `?timeout=` from a location search string.
    ///
    /// `img` may repeat; given values replace the candidate list in order.
    /// Values that do not parse or fail validation are logged and skipped.
    pub fn apply_query(&mut self, search: &str) {
        let mut images = Vec::new();
        for (k, v) in query_pairs(search) {
            match k.as_str() {
                "side" => match v.parse::<usize>() {
                    Ok(side) if (2..=MAX_SIDE).contains(&side) => self.side = side,
                    _ => warn!("ignoring side={v}"),
                },
                "timeout" => match v.parse::<u64>() {
                    Ok(ms) if ms > 0 => self.probe_timeout_ms = ms,
                    _ => warn!("ignoring timeout={v}"),
                },
                "img" if !v.is_empty() => images.push(v),
                _ => {}
            }
        }
        if !images.is_empty() {
            self.candidates = images;
        }
    }
}

fn query_pairs(search: &str) -> Vec<(String, String)> {
    let s = search.trim_start_matches('?');
    s.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut it = pair.splitn(2, '=');
            let k = it.next().unwrap_or("");
            let v = it.next().unwrap_or("");
            (url_decode(k), url_decode(v))
        })
        .collect()
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}
