//! Round clock and level targets

use crate::types::{DEFAULT_INTRO_MS, DEFAULT_ROUND_TIME_MS, TARGET_SCORE_PER_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    pub round_time_ms: u32,
    /// Time at round start during which the clock is frozen and input refused
    pub intro_ms: u32,
    pub target_per_level: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_time_ms: DEFAULT_ROUND_TIME_MS,
            intro_ms: DEFAULT_INTRO_MS,
            target_per_level: TARGET_SCORE_PER_LEVEL,
        }
    }
}

impl RoundConfig {
    /// Score needed to clear `level`
    pub fn target_for(&self, level: u32) -> u32 {
        level.saturating_mul(self.target_per_level)
    }
}

/// Counts down one round. The intro runs first; time left over from a tick that
/// finishes the intro is charged to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundClock {
    intro_left_ms: u32,
    time_left_ms: u32,
    expired: bool,
}

impl RoundClock {
    pub fn new(config: &RoundConfig) -> Self {
        Self {
            intro_left_ms: config.intro_ms,
            time_left_ms: config.round_time_ms,
            expired: false,
        }
    }

    /// Advance by `elapsed_ms`. Returns true on the tick that runs the clock out.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.expired {
            return false;
        }

        let mut rest = elapsed_ms;
        if self.intro_left_ms > 0 {
            let used = rest.min(self.intro_left_ms);
            self.intro_left_ms -= used;
            rest -= used;
        }
        if rest == 0 {
            return false;
        }

        self.time_left_ms = self.time_left_ms.saturating_sub(rest);
        if self.time_left_ms == 0 {
            self.expired = true;
            return true;
        }
        false
    }

    pub fn in_intro(&self) -> bool {
        self.intro_left_ms > 0
    }

    pub fn intro_left_ms(&self) -> u32 {
        self.intro_left_ms
    }

    pub fn time_left_ms(&self) -> u32 {
        self.time_left_ms
    }

    /// Whole seconds left, as shown on a round timer
    pub fn seconds_left(&self) -> u32 {
        self.time_left_ms / 1000
    }

    pub fn expired(&self) -> bool {
        self.expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(round_time_ms: u32, intro_ms: u32) -> RoundConfig {
        RoundConfig {
            round_time_ms,
            intro_ms,
            ..RoundConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = RoundConfig::default();
        assert_eq!(cfg.round_time_ms, 120_000);
        assert_eq!(cfg.intro_ms, 2_000);
        assert_eq!(cfg.target_for(1), 1000);
        assert_eq!(cfg.target_for(4), 4000);
    }

    #[test]
    fn test_intro_freezes_clock() {
        let mut clock = RoundClock::new(&config(10_000, 2_000));
        assert!(clock.in_intro());
        assert!(!clock.tick(1_500));
        assert_eq!(clock.time_left_ms(), 10_000);
        assert_eq!(clock.intro_left_ms(), 500);

        // 500 ms finish the intro, the remaining 700 ms count.
        assert!(!clock.tick(1_200));
        assert!(!clock.in_intro());
        assert_eq!(clock.time_left_ms(), 9_300);
        assert_eq!(clock.seconds_left(), 9);
    }

    #[test]
    fn test_expires_once() {
        let mut clock = RoundClock::new(&config(1_000, 0));
        assert!(!clock.tick(999));
        assert!(clock.tick(5));
        assert!(clock.expired());
        assert_eq!(clock.time_left_ms(), 0);
        assert!(!clock.tick(16));
    }
}
