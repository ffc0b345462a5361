//! Game session - one player's run of rounds on top of the rules engine

use tracing::{debug, info};

use crate::core::{
    progress_ratio, BoardSnapshot, CoreError, EngineState, RandomSource, ResolutionEngine,
    ResolutionOutcome, Rules, Settlement, SimpleRng,
};
use crate::round::{RoundClock, RoundConfig};
use crate::selection::{Selection, Tap};
use crate::types::{BoardEvent, Coord, Direction, Move};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Paused, in the round intro, game over or the board is deadlocked
    #[error("session is not accepting input")]
    NotPlayable,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SessionError {
    /// Stable code for host protocols
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotPlayable => "not_playable",
            SessionError::Core(CoreError::OutOfBounds(_)) => "out_of_bounds",
            SessionError::Core(CoreError::DeadlockExhausted { .. }) => "deadlock_exhausted",
            SessionError::Core(CoreError::InvalidConfig(_)) => "invalid_config",
            SessionError::Core(_) => "engine_error",
        }
    }
}

/// Result of a tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(Coord),
    Deselected(Coord),
    Forbidden { from: Coord, to: Coord },
    Swapped(ResolutionOutcome),
    /// Tap arrived while input was refused; the selection was cleared
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub board: BoardSnapshot,
    pub level: u32,
    pub score: u32,
    pub target: u32,
    pub progress: f32,
    pub time_left_ms: u32,
    pub intro_left_ms: u32,
    pub paused: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub moves: u32,
    pub selected: Option<Coord>,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        !self.paused && !self.game_over && self.intro_left_ms == 0 && self.board.playable()
    }
}

pub struct GameSession<R = SimpleRng> {
    engine: ResolutionEngine<R>,
    config: RoundConfig,
    clock: RoundClock,
    selection: Selection,
    level: u32,
    score: u32,
    moves: u32,
    paused: bool,
    game_over: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
}

impl<R: RandomSource> GameSession<R> {
    /// Level 1 on a fresh board
    pub fn new(rules: Rules, config: RoundConfig, rng: R) -> Result<Self, SessionError> {
        let engine = ResolutionEngine::new(rules, rng)?;
        Ok(Self::from_engine(engine, config))
    }

    /// Level 1 on the engine's current board
    pub fn from_engine(engine: ResolutionEngine<R>, config: RoundConfig) -> Self {
        Self {
            engine,
            clock: RoundClock::new(&config),
            config,
            selection: Selection::new(),
            level: 1,
            score: 0,
            moves: 0,
            paused: false,
            game_over: false,
            episode_id: 0,
        }
    }

    /// Advance the round clock. Returns true when the round timed out on this tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        if self.clock.tick(elapsed_ms) {
            info!(level = self.level, score = self.score, "round timed out");
            self.game_over = true;
            self.selection.clear();
            return true;
        }
        false
    }

    pub fn playable(&self) -> bool {
        !self.paused && !self.game_over && !self.clock.in_intro() && self.engine.is_idle()
    }

    /// Tap a tile
    pub fn select(&mut self, at: Coord) -> Result<SelectOutcome, SessionError> {
        if !self.engine.grid().in_bounds(at) {
            return Err(CoreError::OutOfBounds(at).into());
        }
        if !self.playable() {
            self.selection.clear();
            return Ok(SelectOutcome::Ignored);
        }

        match self.selection.tap(at) {
            Tap::Selected(c) => Ok(SelectOutcome::Selected(c)),
            Tap::Deselected(c) => Ok(SelectOutcome::Deselected(c)),
            Tap::Forbidden { from, to } => {
                debug!(?from, ?to, "forbidden move");
                Ok(SelectOutcome::Forbidden { from, to })
            }
            Tap::Pair(a, b) => self.swap(a, b).map(SelectOutcome::Swapped),
        }
    }

    /// Swap the tile at `at` with its neighbour in `dir`
    pub fn swipe(&mut self, at: Coord, dir: Direction) -> Result<ResolutionOutcome, SessionError> {
        self.selection.clear();
        self.swap(at, at.step(dir))
    }

    /// Request a swap and bank its score
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<ResolutionOutcome, SessionError> {
        if !self.playable() {
            return Err(SessionError::NotPlayable);
        }
        let outcome = self.engine.request_swap(a, b)?;
        if let ResolutionOutcome::Resolved(res) = &outcome {
            self.score = self.score.saturating_add(res.score_delta);
            self.moves += 1;
            if let Settlement::Deadlocked { attempts } = res.settlement {
                info!(attempts, "board left deadlocked");
            }
            debug!(score = self.score, target = self.target(), "score updated");
        }
        Ok(outcome)
    }

    pub fn hint(&self) -> Option<Move> {
        if self.game_over {
            return None;
        }
        self.engine.hint()
    }

    /// Shuffle the board, typically to recover from a deadlock
    pub fn reshuffle(&mut self) -> Result<Vec<BoardEvent>, SessionError> {
        if self.paused || self.game_over {
            return Err(SessionError::NotPlayable);
        }
        Ok(self.engine.reshuffle()?)
    }

    /// Toggle pause. Returns the new paused state.
    pub fn pause(&mut self) -> bool {
        if !self.game_over {
            self.paused = !self.paused;
        }
        self.paused
    }

    /// Replay the current level on a new board
    pub fn restart(&mut self) -> Result<Settlement, SessionError> {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.begin_round()
    }

    /// Advance one level on a new board
    pub fn next_round(&mut self) -> Result<Settlement, SessionError> {
        self.level = self.level.saturating_add(1);
        self.begin_round()
    }

    fn begin_round(&mut self) -> Result<Settlement, SessionError> {
        let settlement = self.engine.reset()?;
        self.clock = RoundClock::new(&self.config);
        self.selection.clear();
        self.score = 0;
        self.moves = 0;
        self.paused = false;
        self.game_over = false;
        info!(level = self.level, episode = self.episode_id, "round started");
        Ok(settlement)
    }

    pub fn round_cleared(&self) -> bool {
        self.score >= self.target()
    }
}

impl<R> GameSession<R> {
    pub fn engine(&self) -> &ResolutionEngine<R> {
        &self.engine
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target(&self) -> u32 {
        self.config.target_for(self.level)
    }

    /// Fill ratio of the score bar
    pub fn progress(&self) -> f32 {
        progress_ratio(self.score, self.target())
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn in_intro(&self) -> bool {
        self.clock.in_intro()
    }

    pub fn time_left_ms(&self) -> u32 {
        self.clock.time_left_ms()
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selection.selected()
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.engine.snapshot(),
            level: self.level,
            score: self.score,
            target: self.target(),
            progress: self.progress(),
            time_left_ms: self.clock.time_left_ms(),
            intro_left_ms: self.clock.intro_left_ms(),
            paused: self.paused,
            game_over: self.game_over,
            episode_id: self.episode_id,
            moves: self.moves,
            selected: self.selection.selected(),
        }
    }
}
