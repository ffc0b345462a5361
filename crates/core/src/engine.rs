//! Resolution engine - turns swap requests into complete event sequences
//!
//! The engine owns the grid, the rules and the random source. A swap runs to
//! completion inside one call:
//!
//! ```text
//! Idle -> SwapPending -> Validating -> Reverting -> Idle
//!                                   -> Resolving -> Cascading -> Idle | Deadlocked
//! ```
//!
//! Only `Idle` and `Deadlocked` are observable between calls. Every other state
//! is entered and left while `request_swap` runs; a failing step returns the
//! engine to `Idle`.

use tracing::{debug, trace, warn};

use crate::config::{Rules, SwapMatchPolicy};
use crate::deadlock::DeadlockDetector;
use crate::error::{CoreError, Result};
use crate::gravity::collapse;
use crate::grid::Grid;
use crate::matcher::{Match, MatchDetector};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::match_score;
use crate::shuffle::shuffle;
use crate::snapshot::BoardSnapshot;
use crate::sweep::sweep;
use crate::types::{Axis, BoardEvent, Coord, Move, TileKind};
use crate::validator::MoveValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Idle,
    SwapPending,
    Validating,
    Reverting,
    Resolving,
    Cascading,
    /// No legal move and every reshuffle attempt failed
    Deadlocked,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::SwapPending => "swap_pending",
            EngineState::Validating => "validating",
            EngineState::Reverting => "reverting",
            EngineState::Resolving => "resolving",
            EngineState::Cascading => "cascading",
            EngineState::Deadlocked => "deadlocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A swap arrived while the engine was not accepting input
    NotIdle(EngineState),
    NotAdjacent,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotIdle(_) => "not_idle",
            RejectReason::NotAdjacent => "not_adjacent",
        }
    }
}

/// A match removed during a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch {
    pub kind: TileKind,
    pub axis: Axis,
    pub cells: Vec<Coord>,
    pub score: u32,
    /// 0 for the swap itself, 1.. for cascade steps
    pub depth: usize,
}

/// How the board ended up after a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Playable { legal_moves: usize },
    /// Reshuffles ran out; the engine stays `Deadlocked` until [`ResolutionEngine::reshuffle`]
    /// succeeds
    Deadlocked { attempts: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub events: Vec<BoardEvent>,
    pub score_delta: u32,
    pub matches: Vec<ResolvedMatch>,
    pub settlement: Settlement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Nothing changed and no event was produced
    Rejected(RejectReason),
    /// The swap made no match and was undone: `[Swapped, Reverted]`
    Reverted(Vec<BoardEvent>),
    Resolved(Resolution),
}

impl ResolutionOutcome {
    pub fn events(&self) -> &[BoardEvent] {
        match self {
            ResolutionOutcome::Rejected(_) => &[],
            ResolutionOutcome::Reverted(events) => events,
            ResolutionOutcome::Resolved(r) => &r.events,
        }
    }

    pub fn score_delta(&self) -> u32 {
        match self {
            ResolutionOutcome::Resolved(r) => r.score_delta,
            _ => 0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved(_))
    }
}

pub struct ResolutionEngine<R = SimpleRng> {
    grid: Grid,
    rules: Rules,
    rng: R,
    state: EngineState,
    detector: MatchDetector,
    validator: MoveValidator,
    deadlock: DeadlockDetector,
}

impl<R: RandomSource> ResolutionEngine<R> {
    /// Fresh random board: fill, sweep away matches, make sure a move exists.
    pub fn new(rules: Rules, rng: R) -> Result<Self> {
        rules.validate()?;
        let grid = Grid::new(rules.width, rules.height)?;
        let mut engine = Self::assemble(grid, rules, rng);
        engine.reset()?;
        Ok(engine)
    }

    /// Use `grid` as-is. Its dimensions must match the rules and every kind must
    /// be in the catalog.
    pub fn from_grid(grid: Grid, rules: Rules, rng: R) -> Result<Self> {
        rules.validate()?;
        if grid.width() != rules.width || grid.height() != rules.height {
            return Err(CoreError::DimensionMismatch {
                width: rules.width,
                height: rules.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        grid.check_catalog(rules.kind_count)?;
        Ok(Self::assemble(grid, rules, rng))
    }

    fn assemble(grid: Grid, rules: Rules, rng: R) -> Self {
        let detector = MatchDetector::new(rules.min_match);
        let validator = MoveValidator::new(detector);
        Self {
            grid,
            rules,
            rng,
            state: EngineState::Idle,
            detector,
            validator,
            deadlock: DeadlockDetector::new(validator),
        }
    }

    /// Refill the whole board and prepare it for play.
    pub fn reset(&mut self) -> Result<Settlement> {
        self.grid.initialize(&mut self.rng, self.rules.kind_count);
        self.prepare()
    }

    /// Sweep pre-existing matches off the current board and settle it.
    ///
    /// Sweep rerolls and any reshuffle done while settling emit no events; the
    /// board is new as a whole, so callers read it back through
    /// [`snapshot`](Self::snapshot) or [`grid`](Self::grid) afterwards.
    pub fn prepare(&mut self) -> Result<Settlement> {
        let changed = sweep(
            &mut self.grid,
            &self.detector,
            self.rules.kind_count,
            &mut self.rng,
        )?;
        trace!(changed, "board swept");
        let mut discarded = Vec::new();
        Ok(self.settle(&mut discarded))
    }

    /// Attempt to swap the tiles at `a` and `b`.
    pub fn request_swap(&mut self, a: Coord, b: Coord) -> Result<ResolutionOutcome> {
        for c in [a, b] {
            if !self.grid.in_bounds(c) {
                return Err(CoreError::OutOfBounds(c));
            }
        }
        if self.state != EngineState::Idle {
            return Ok(ResolutionOutcome::Rejected(RejectReason::NotIdle(self.state)));
        }
        if !a.is_adjacent(b) {
            return Ok(ResolutionOutcome::Rejected(RejectReason::NotAdjacent));
        }

        let result = self.run_swap(a, b);
        if result.is_err() {
            self.transition(EngineState::Idle);
        }
        result
    }

    fn run_swap(&mut self, a: Coord, b: Coord) -> Result<ResolutionOutcome> {
        let mut events = Vec::new();

        self.transition(EngineState::SwapPending);
        self.grid.swap(a, b)?;
        events.push(BoardEvent::Swapped { a, b });

        self.transition(EngineState::Validating);
        let eval = self.validator.evaluate_swapped(&self.grid, a, b)?;

        if !eval.valid {
            self.transition(EngineState::Reverting);
            self.grid.swap(a, b)?;
            events.push(BoardEvent::Reverted { a, b });
            self.transition(EngineState::Idle);
            return Ok(ResolutionOutcome::Reverted(events));
        }

        self.transition(EngineState::Resolving);
        let first = match self.rules.swap_policy {
            SwapMatchPolicy::PreferOrigin if eval.match_a.is_valid() => vec![eval.match_a],
            SwapMatchPolicy::PreferOrigin => vec![eval.match_b],
            SwapMatchPolicy::ResolveBoth => [eval.match_a, eval.match_b]
                .into_iter()
                .filter(Match::is_valid)
                .collect(),
        };

        let mut matches = Vec::new();
        let mut score_delta = self.clear(first, 0, &mut events, &mut matches)?;

        self.transition(EngineState::Cascading);
        let limit = self.rules.cascade_limit;
        let mut depth = 0usize;
        while let Some(next) = self.detector.first_match(&self.grid) {
            if depth >= limit {
                warn!(limit, "cascade limit exceeded");
                return Err(CoreError::CascadeLimitExceeded { limit });
            }
            depth += 1;
            let points = self.clear(vec![next], depth, &mut events, &mut matches)?;
            score_delta = score_delta.saturating_add(points);
        }
        debug!(depth, score_delta, "cascade settled");

        let settlement = self.settle(&mut events);
        Ok(ResolutionOutcome::Resolved(Resolution {
            events,
            score_delta,
            matches,
            settlement,
        }))
    }

    /// Remove `found` together, emit one `Cleared` per match, collapse and refill.
    fn clear(
        &mut self,
        found: Vec<Match>,
        depth: usize,
        events: &mut Vec<BoardEvent>,
        resolved: &mut Vec<ResolvedMatch>,
    ) -> Result<u32> {
        let mut cells: Vec<Coord> = Vec::new();
        let mut points = 0u32;

        for m in found {
            let Some(axis) = m.axis else { continue };
            let score = match_score(m.len(), self.rules.item_score);
            debug!(
                kind = m.kind.0,
                axis = axis.as_str(),
                len = m.len(),
                depth,
                "match resolved"
            );
            events.push(BoardEvent::Cleared {
                kind: m.kind,
                cells: m.cells.clone(),
            });
            for &c in &m.cells {
                if !cells.contains(&c) {
                    cells.push(c);
                }
            }
            points = points.saturating_add(score);
            resolved.push(ResolvedMatch {
                kind: m.kind,
                axis,
                cells: m.cells,
                score,
                depth,
            });
        }

        collapse(
            &mut self.grid,
            &cells,
            self.rules.kind_count,
            &mut self.rng,
            events,
        )?;
        Ok(points)
    }

    /// Check for a legal move; reshuffle when there is none.
    fn settle(&mut self, events: &mut Vec<BoardEvent>) -> Settlement {
        let legal_moves = self.deadlock.legal_moves(&self.grid).len();
        if legal_moves > 0 {
            self.transition(EngineState::Idle);
            return Settlement::Playable { legal_moves };
        }

        warn!("no legal move left, reshuffling");
        match self.reshuffle_into(events) {
            Ok(legal_moves) => Settlement::Playable { legal_moves },
            Err(attempts) => Settlement::Deadlocked { attempts },
        }
    }

    /// Shuffle until the board is match-free and playable, at most
    /// `max_reshuffles` times. Rejected candidates never touch the grid.
    fn reshuffle_into(&mut self, events: &mut Vec<BoardEvent>) -> std::result::Result<usize, u32> {
        let max = self.rules.max_reshuffles;
        for attempt in 1..=max {
            let mut candidate = self.grid.clone();
            let moves = shuffle(&mut candidate, &mut self.rng);

            if self.detector.has_any_match(&candidate) {
                debug!(attempt, "reshuffle rejected, board has a match");
                continue;
            }
            let legal_moves = self.deadlock.legal_moves(&candidate).len();
            if legal_moves == 0 {
                debug!(attempt, "reshuffle rejected, still deadlocked");
                continue;
            }

            debug!(attempt, legal_moves, "reshuffle accepted");
            self.grid = candidate;
            events.extend(moves.into_iter().map(BoardEvent::from));
            self.transition(EngineState::Idle);
            return Ok(legal_moves);
        }

        warn!(attempts = max, "reshuffle attempts exhausted");
        let next = if self.deadlock.is_deadlocked(&self.grid) {
            EngineState::Deadlocked
        } else {
            EngineState::Idle
        };
        self.transition(next);
        Err(max)
    }

    /// Shuffle the board on request (typically to leave `Deadlocked`).
    ///
    /// Returns the `Shuffled` events of the accepted permutation, or
    /// `DeadlockExhausted` when no attempt produced a playable board.
    pub fn reshuffle(&mut self) -> Result<Vec<BoardEvent>> {
        let mut events = Vec::new();
        match self.reshuffle_into(&mut events) {
            Ok(_) => Ok(events),
            Err(attempts) => Err(CoreError::DeadlockExhausted { attempts }),
        }
    }
}

impl<R> ResolutionEngine<R> {
    fn transition(&mut self, next: EngineState) {
        if self.state != next {
            trace!(from = self.state.as_str(), to = next.as_str(), "engine state");
            self.state = next;
        }
    }

    /// Every swap that would currently produce a match
    pub fn legal_moves(&self) -> Vec<Move> {
        self.deadlock.legal_moves(&self.grid)
    }

    /// First legal move in scan order
    pub fn hint(&self) -> Option<Move> {
        self.deadlock.first_move(&self.grid)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == EngineState::Idle
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.grid, self.state)
    }

    /// Refresh an existing snapshot without reallocating its cell buffer
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.update(&self.grid, self.state);
    }
}
