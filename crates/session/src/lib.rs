//! Session layer - score, round clock, levels and player input on top of the rules
//!
//! The rules engine knows nothing about time or players. [`GameSession`] adds what a
//! playable game needs around it:
//!
//! - **Rounds**: a countdown (two minutes by default) preceded by a short intro
//!   during which input is refused
//! - **Levels**: level `n` must reach `n * 1000` points
//! - **Input**: two-tap selection and swipes, both funneled into swap requests
//!
//! # Example
//!
//! ```
//! use match3_core::{Rules, SimpleRng};
//! use match3_session::{GameSession, RoundConfig};
//!
//! let mut session =
//!     GameSession::new(Rules::default(), RoundConfig::default(), SimpleRng::new(3)).unwrap();
//! assert!(session.in_intro());
//! session.tick(2_000);
//! assert_eq!(session.level(), 1);
//! assert_eq!(session.target(), 1000);
//! ```

pub mod round;
pub mod selection;
pub mod session;

pub use match3_core as core;
pub use match3_types as types;

pub use round::{RoundClock, RoundConfig};
pub use selection::{swipe_direction, Selection, Tap};
pub use session::{GameSession, SelectOutcome, SessionError, SessionSnapshot};
