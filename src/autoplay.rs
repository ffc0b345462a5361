//! Headless runner: plays a session by always taking the hint.
//!
//! Useful for smoke-testing rule changes and for quick throughput numbers.

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::core::{ResolutionOutcome, Rules, SimpleRng};
use crate::session::{GameSession, RoundConfig};

/// Milliseconds charged to the round clock per move
const MOVE_TIME_MS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayConfig {
    pub seed: u32,
    pub moves: u32,
    pub width: usize,
    pub height: usize,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            seed: 1,
            moves: 50,
            width: rules.width,
            height: rules.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutoplayReport {
    pub moves: u32,
    pub score: u32,
    pub levels_cleared: u32,
    pub reshuffles: u32,
    /// Set when the board could not be recovered from a deadlock
    pub stuck: bool,
}

pub fn parse_autoplay_args(args: &[String]) -> Result<Option<AutoplayConfig>> {
    if args.is_empty() || args[0] != "autoplay" {
        return Ok(None);
    }

    let mut config = AutoplayConfig::default();
    let mut i = 1usize;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let v = args
            .get(i)
            .ok_or_else(|| anyhow!("autoplay: missing value for {}", flag))?;
        match flag {
            "--seed" => {
                config.seed = v
                    .parse()
                    .map_err(|_| anyhow!("autoplay: invalid --seed value: {}", v))?;
            }
            "--moves" => {
                config.moves = v
                    .parse()
                    .map_err(|_| anyhow!("autoplay: invalid --moves value: {}", v))?;
            }
            "--width" => {
                config.width = v
                    .parse()
                    .map_err(|_| anyhow!("autoplay: invalid --width value: {}", v))?;
            }
            "--height" => {
                config.height = v
                    .parse()
                    .map_err(|_| anyhow!("autoplay: invalid --height value: {}", v))?;
            }
            other => {
                return Err(anyhow!("autoplay: unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(Some(config))
}

/// Play up to `config.moves` hinted swaps, advancing a level whenever the target is met.
pub fn run_autoplay(config: &AutoplayConfig) -> Result<AutoplayReport> {
    let rules = Rules::with_size(config.width, config.height);
    let round = RoundConfig {
        intro_ms: 0,
        round_time_ms: u32::MAX,
        ..RoundConfig::default()
    };
    let mut session = GameSession::new(rules, round, SimpleRng::new(config.seed))?;
    let mut report = AutoplayReport::default();
    let mut total_score = 0u32;

    while report.moves < config.moves {
        let Some(mv) = session.hint() else {
            match session.reshuffle() {
                Ok(events) => {
                    report.reshuffles += 1;
                    debug!(events = events.len(), "reshuffled");
                    continue;
                }
                Err(e) => {
                    info!(error = %e, "no way out of deadlock");
                    report.stuck = true;
                    break;
                }
            }
        };

        let outcome = session.swap(mv.a, mv.b)?;
        if !matches!(outcome, ResolutionOutcome::Resolved(_)) {
            return Err(anyhow!("hinted move {:?} did not resolve", mv));
        }
        report.moves += 1;
        session.tick(MOVE_TIME_MS);

        if session.round_cleared() {
            total_score = total_score.saturating_add(session.score());
            report.levels_cleared += 1;
            session.next_round()?;
        }
    }

    report.score = total_score.saturating_add(session.score());
    info!(
        moves = report.moves,
        score = report.score,
        levels = report.levels_cleared,
        "autoplay finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_autoplay_args(&args(&[])).unwrap(), None);
        assert_eq!(parse_autoplay_args(&args(&["serve"])).unwrap(), None);

        let cfg = parse_autoplay_args(&args(&["autoplay", "--seed", "9", "--moves", "3"]))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.moves, 3);
        assert_eq!(cfg.width, 5);

        assert!(parse_autoplay_args(&args(&["autoplay", "--moves"])).is_err());
        assert!(parse_autoplay_args(&args(&["autoplay", "--speed", "2"])).is_err());
        assert!(parse_autoplay_args(&args(&["autoplay", "--seed", "x"])).is_err());
    }

    #[test]
    fn test_autoplay_scores() {
        let report = run_autoplay(&AutoplayConfig {
            moves: 10,
            ..AutoplayConfig::default()
        })
        .unwrap();
        assert!(report.moves > 0 || report.stuck);
        // Every resolved swap clears at least one run of three.
        assert!(report.score >= report.moves * 180);
    }
}
