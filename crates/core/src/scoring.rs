//! Scoring module - match points and level targets

use crate::types::TARGET_SCORE_PER_LEVEL;

/// Points for one resolved match of `len` tiles
pub fn match_score(len: usize, item_score: u32) -> u32 {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    len.saturating_mul(item_score)
}

/// Points for a set of matches resolved together
pub fn total_score<I: IntoIterator<Item = usize>>(lens: I, item_score: u32) -> u32 {
    lens.into_iter()
        .fold(0u32, |acc, len| acc.saturating_add(match_score(len, item_score)))
}

/// Score needed to clear a round at `level` (level 1 = 1000)
pub fn target_score(level: u32) -> u32 {
    level.saturating_mul(TARGET_SCORE_PER_LEVEL)
}

/// Fill ratio of the score bar, clamped to `[0, 1]`
pub fn progress_ratio(score: u32, target: u32) -> f32 {
    if target == 0 {
        return 1.0;
    }
    (score as f32 / target as f32).clamp(0.0, 1.0)
}
