//! Adapter module - host control of a match-3 session via line-delimited JSON
//!
//! This crate lets an out-of-process presentation layer (a renderer, a test
//! harness, a bot) drive one [`GameSession`](match3_session::GameSession) over
//! stdin/stdout. The rules stay in Rust; the client only replays the events it
//! is sent.
//!
//! # Protocol Overview
//!
//! 1. **Handshake**: client sends `hello`, host responds with `welcome`
//! 2. **Commanding**: client sends swaps, taps, swipes, clock ticks
//! 3. **Replies**: every command gets exactly one reply carrying the same `seq`
//!
//! `seq` must be strictly increasing. Coordinates are `[col, row]` with row 0 at
//! the bottom.
//!
//! # Message Types
//!
//! ## Client → Host
//!
//! - **hello**: handshake, with optional rule overrides and seed
//! - **swap** / **select** / **swipe**: player input
//! - **hint**, **tick**, **pause**, **restart**, **next_round**, **reshuffle**, **observe**
//!
//! ## Host → Client
//!
//! - **welcome**: rules and seed in effect
//! - **outcome**: `rejected`, `reverted`, `resolved` or `shuffled`, with board events
//! - **selection**: result of a tap that did not complete a swap
//! - **hint**: a legal move or `null`
//! - **observation**: full board and session state
//! - **ack**: command acknowledgment
//! - **error**: error response with code and message
//!
//! # Environment Variables
//!
//! - `MATCH3_SEED`: RNG seed (default 1)
//! - `MATCH3_WIDTH`, `MATCH3_HEIGHT`: board size (default 5x5)
//! - `MATCH3_KINDS`: tile kinds (default 5)
//! - `MATCH3_MIN_MATCH`: minimum run length (default 3)
//! - `MATCH3_ADAPTER_DISABLED`: set to "1" or "true" to skip the host entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Host: {"type":"hello","seq":1,"client":{"name":"viewer","version":"1.0"},"config":{"intro_ms":0}}
//! Host -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","game_id":"match3",...}
//! Client -> Host: {"type":"swap","seq":2,"a":[3,3],"b":[2,3]}
//! Host -> Client: {"type":"outcome","seq":2,"ts":1234567891,"result":"resolved","events":[{"event":"swapped",...}],...}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use match3_core as core;
pub use match3_session as session;
pub use match3_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{is_disabled, run_blocking, start_from_env};
pub use server::{run_stdio, serve, Host, ServerConfig, PROTOCOL_VERSION};
