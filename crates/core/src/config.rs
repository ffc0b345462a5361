//! Rules configuration
//!
//! Every tunable of the rules engine lives in [`Rules`]. Defaults describe the
//! classic board: 5x5, five tile kinds, runs of three, 60 points per tile.

use crate::error::{CoreError, Result};
use crate::types::{
    CASCADE_STEPS_PER_CELL, DEFAULT_HEIGHT, DEFAULT_ITEM_SCORE, DEFAULT_KIND_COUNT,
    DEFAULT_MAX_RESHUFFLES, DEFAULT_MIN_MATCH, DEFAULT_WIDTH, MAX_BOARD_CELLS,
};

/// Which match(es) a successful swap resolves when both swapped tiles complete a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwapMatchPolicy {
    /// Resolve the match through the tile the player moved first; fall back to the
    /// other tile's match only when the first is invalid. The second match, if any,
    /// stays on the board and is picked up by the cascade scan.
    #[default]
    PreferOrigin,
    /// Remove and score both matches in the same step.
    ResolveBoth,
}

impl SwapMatchPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prefer_origin" | "preferorigin" | "origin" => Some(Self::PreferOrigin),
            "resolve_both" | "resolveboth" | "both" => Some(Self::ResolveBoth),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreferOrigin => "prefer_origin",
            Self::ResolveBoth => "resolve_both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub width: usize,
    pub height: usize,
    /// Size of the tile catalog; kinds are `0..kind_count`.
    pub kind_count: u8,
    pub min_match: usize,
    pub item_score: u32,
    pub max_reshuffles: u32,
    /// Upper bound on cascade steps for one swap.
    pub cascade_limit: usize,
    pub swap_policy: SwapMatchPolicy,
}

impl Default for Rules {
    fn default() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Rules {
    /// Default rules for a board of the given size; the cascade limit scales with area.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            kind_count: DEFAULT_KIND_COUNT,
            min_match: DEFAULT_MIN_MATCH,
            item_score: DEFAULT_ITEM_SCORE,
            max_reshuffles: DEFAULT_MAX_RESHUFFLES,
            cascade_limit: width
                .saturating_mul(height)
                .saturating_mul(CASCADE_STEPS_PER_CELL),
            swap_policy: SwapMatchPolicy::default(),
        }
    }

    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidConfig(
                "width and height must be > 0".into(),
            ));
        }
        match self.width.checked_mul(self.height) {
            Some(area) if area <= MAX_BOARD_CELLS => {}
            _ => {
                return Err(CoreError::InvalidConfig(format!(
                    "{}x{} board exceeds {} cells",
                    self.width, self.height, MAX_BOARD_CELLS
                )));
            }
        }
        if self.kind_count < 2 {
            return Err(CoreError::InvalidConfig("kind_count must be >= 2".into()));
        }
        if self.min_match < 2 {
            return Err(CoreError::InvalidConfig("min_match must be >= 2".into()));
        }
        if self.min_match > self.width.max(self.height) {
            return Err(CoreError::InvalidConfig(format!(
                "min_match {} does not fit a {}x{} board",
                self.min_match, self.width, self.height
            )));
        }
        if self.cascade_limit == 0 {
            return Err(CoreError::InvalidConfig(
                "cascade_limit must be > 0".into(),
            ));
        }
        Ok(())
    }
}
