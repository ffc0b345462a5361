//! Core rules module - pure, deterministic, and testable
//!
//! This crate contains every rule of the tile-matching game: the grid, match
//! detection, swap validation, resolution with gravity and cascades, deadlock
//! detection and reshuffling. It has **zero dependencies** on rendering, timing or
//! I/O, making it:
//!
//! - **Deterministic**: every random decision goes through an injected
//!   [`RandomSource`], so the same seed replays the same game
//! - **Testable**: boards are built from literal rows and refills can be scripted
//! - **Portable**: presentation layers consume the emitted [`BoardEvent`](types::BoardEvent)s
//!
//! # Module Structure
//!
//! - [`grid`]: dense board storage, bounds checks and board hashing
//! - [`matcher`]: straight-line run detection through a cell
//! - [`validator`]: would a swap produce a match?
//! - [`gravity`]: removal, column collapse and refill
//! - [`engine`]: the swap state machine, cascades and settlement
//! - [`deadlock`]: legal move enumeration
//! - [`shuffle`]: Fisher-Yates board permutation
//! - [`sweep`]: removes matches from a fresh board
//! - [`rng`]: random sources (seeded LCG, scripted)
//! - [`scoring`]: match points and level targets
//!
//! # Example
//!
//! ```
//! use match3_core::{Grid, ResolutionEngine, ResolutionOutcome, Rules, SimpleRng};
//! use match3_core::types::Coord;
//!
//! let grid = Grid::from_rows(&[
//!     [1u8, 2, 3, 4, 1],
//!     [2, 3, 0, 1, 2],
//!     [3, 4, 0, 2, 3],
//!     [4, 1, 2, 0, 4],
//!     [1, 2, 4, 3, 1],
//! ])
//! .unwrap();
//! let mut engine =
//!     ResolutionEngine::from_grid(grid, Rules::default(), SimpleRng::new(7)).unwrap();
//!
//! // Moving the 0 at (3, 3) left completes a vertical run in column 2.
//! let outcome = engine.request_swap(Coord::new(3, 3), Coord::new(2, 3)).unwrap();
//! assert!(outcome.is_resolved());
//! assert!(outcome.score_delta() >= 180);
//! ```

pub mod config;
pub mod deadlock;
pub mod engine;
pub mod error;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod shuffle;
pub mod snapshot;
pub mod sweep;
pub mod validator;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use config::{Rules, SwapMatchPolicy};
pub use deadlock::DeadlockDetector;
pub use engine::{
    EngineState, RejectReason, Resolution, ResolutionEngine, ResolutionOutcome, ResolvedMatch,
    Settlement,
};
pub use error::{CoreError, Result};
pub use grid::Grid;
pub use matcher::{Match, MatchBounds, MatchDetector};
pub use rng::{RandomSource, ScriptedRng, SimpleRng};
pub use scoring::{match_score, progress_ratio, target_score};
pub use shuffle::ShuffleMove;
pub use snapshot::BoardSnapshot;
pub use validator::{MoveValidator, SwapEvaluation};
