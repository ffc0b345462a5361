//! Match-3 (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof: `match3::{types, core, session, adapter}`.
//! The binary adds a stdio host and a headless `autoplay` runner on top.

pub mod autoplay;

pub use match3_adapter as adapter;
pub use match3_core as core;
pub use match3_session as session;
pub use match3_types as types;
