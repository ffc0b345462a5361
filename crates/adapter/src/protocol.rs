//! Protocol module - JSON message types for the host adapter
//!
//! Line-delimited JSON, one message per line. Every message carries `type` and
//! `seq`; messages from the host also carry `ts` (timestamp in ms).
//! Coordinates travel as `[col, row]` pairs.

use serde::{Deserialize, Serialize};

use crate::core::{RejectReason, ResolutionOutcome, Settlement, SwapMatchPolicy};
use crate::session::{SelectOutcome, SessionSnapshot};
use crate::types::{BoardEvent, Coord, Direction, Move};

// ============== Shared Types ==============

/// Board coordinate on the wire: `[col, row]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireCoord(pub i32, pub i32);

impl From<Coord> for WireCoord {
    fn from(c: Coord) -> Self {
        Self(c.col, c.row)
    }
}

impl From<WireCoord> for Coord {
    fn from(c: WireCoord) -> Self {
        Coord::new(c.0, c.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionLower {
    Up,
    Right,
    Down,
    Left,
}

impl From<DirectionLower> for Direction {
    fn from(value: DirectionLower) -> Self {
        match value {
            DirectionLower::Up => Direction::Up,
            DirectionLower::Right => Direction::Right,
            DirectionLower::Down => Direction::Down,
            DirectionLower::Left => Direction::Left,
        }
    }
}

/// Board hash serialized as 16 lowercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardHash(pub u64);

impl Serialize for BoardHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut buf = [0u8; 16];
        let mut v = self.0;
        for i in 0..16 {
            buf[15 - i] = HEX[(v & 0x0f) as usize];
            v >>= 4;
        }
        let s = std::str::from_utf8(&buf).map_err(<S::Error as serde::ser::Error>::custom)?;
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for BoardHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(BoardHash)
            .map_err(serde::de::Error::custom)
    }
}

// ============== Client -> Host Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Rule overrides a client may request in `hello`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinds: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_match: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_time_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_ms: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    pub client: ClientInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<HelloConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMessage {
    pub seq: u64,
    pub a: WireCoord,
    pub b: WireCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectMessage {
    pub seq: u64,
    pub at: WireCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeMessage {
    pub seq: u64,
    pub at: WireCoord,
    pub dir: DirectionLower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickMessage {
    pub seq: u64,
    pub elapsed_ms: u32,
}

/// Message with no payload besides its sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BareMessage {
    pub seq: u64,
}

// ============== Host -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Welcome,
    Outcome,
    Selection,
    Hint,
    Observation,
    Ack,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "invalid_config")]
    InvalidConfig,
    #[serde(rename = "not_playable")]
    NotPlayable,
    #[serde(rename = "out_of_bounds")]
    OutOfBounds,
    #[serde(rename = "deadlock_exhausted")]
    DeadlockExhausted,
    #[serde(rename = "engine_error")]
    EngineError,
}

impl ErrorCode {
    /// Map a session error code string onto the wire enum
    pub fn from_session_code(code: &str) -> Self {
        match code {
            "invalid_config" => ErrorCode::InvalidConfig,
            "not_playable" => ErrorCode::NotPlayable,
            "out_of_bounds" => ErrorCode::OutOfBounds,
            "deadlock_exhausted" => ErrorCode::DeadlockExhausted,
            _ => ErrorCode::EngineError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub game_id: String,
    pub width: usize,
    pub height: usize,
    pub kinds: u8,
    pub min_match: usize,
    pub swap_policy: String,
    pub seed: u32,
}

/// One board event on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WireEvent {
    Swapped { a: WireCoord, b: WireCoord },
    Reverted { a: WireCoord, b: WireCoord },
    Cleared { kind: u8, cells: Vec<WireCoord> },
    Fell { from: WireCoord, to: WireCoord, kind: u8 },
    Spawned { from: WireCoord, to: WireCoord, kind: u8 },
    Shuffled { from: WireCoord, to: WireCoord, kind: u8 },
}

impl From<&BoardEvent> for WireEvent {
    fn from(ev: &BoardEvent) -> Self {
        match ev {
            BoardEvent::Swapped { a, b } => WireEvent::Swapped {
                a: (*a).into(),
                b: (*b).into(),
            },
            BoardEvent::Reverted { a, b } => WireEvent::Reverted {
                a: (*a).into(),
                b: (*b).into(),
            },
            BoardEvent::Cleared { kind, cells } => WireEvent::Cleared {
                kind: kind.0,
                cells: cells.iter().map(|&c| c.into()).collect(),
            },
            BoardEvent::Fell { from, to, kind } => WireEvent::Fell {
                from: (*from).into(),
                to: (*to).into(),
                kind: kind.0,
            },
            BoardEvent::Spawned { from, to, kind } => WireEvent::Spawned {
                from: (*from).into(),
                to: (*to).into(),
                kind: kind.0,
            },
            BoardEvent::Shuffled { from, to, kind } => WireEvent::Shuffled {
                from: (*from).into(),
                to: (*to).into(),
                kind: kind.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeResult {
    Rejected,
    Reverted,
    Resolved,
    /// Events of an explicit reshuffle
    Shuffled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WireSettlement {
    Playable { legal_moves: usize },
    Deadlocked { attempts: u32 },
}

impl From<Settlement> for WireSettlement {
    fn from(s: Settlement) -> Self {
        match s {
            Settlement::Playable { legal_moves } => WireSettlement::Playable { legal_moves },
            Settlement::Deadlocked { attempts } => WireSettlement::Deadlocked { attempts },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub ts: u64,
    pub result: OutcomeResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub events: Vec<WireEvent>,
    pub score_delta: u32,
    /// Session score after the outcome
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<WireSettlement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    Selected,
    Deselected,
    Forbidden,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub ts: u64,
    pub status: SelectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<WireCoord>,
    /// First tap of a forbidden pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<WireCoord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub ts: u64,
    #[serde(rename = "move")]
    pub mv: Option<[WireCoord; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub ts: u64,
    pub width: usize,
    pub height: usize,
    /// Kinds row by row, bottom row first
    pub rows: Vec<Vec<u8>>,
    pub board_hash: BoardHash,
    pub state: String,
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
    pub selected: Option<WireCoord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    pub paused: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Any message the host sends
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Welcome(WelcomeMessage),
    Outcome(OutcomeMessage),
    Selection(SelectionMessage),
    Hint(HintMessage),
    Observation(ObservationMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
}

impl OutboundMessage {
    pub fn seq(&self) -> u64 {
        match self {
            OutboundMessage::Welcome(m) => m.seq,
            OutboundMessage::Outcome(m) => m.seq,
            OutboundMessage::Selection(m) => m.seq,
            OutboundMessage::Hint(m) => m.seq,
            OutboundMessage::Observation(m) => m.seq,
            OutboundMessage::Ack(m) => m.seq,
            OutboundMessage::Error(m) => m.seq,
        }
    }
}

// ============== Message Parsing ==============

const KNOWN_TYPES: [&str; 11] = [
    "hello",
    "swap",
    "select",
    "swipe",
    "hint",
    "tick",
    "pause",
    "restart",
    "next_round",
    "observe",
    "reshuffle",
];

/// Parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Swap(SwapMessage),
    Select(SelectMessage),
    Swipe(SwipeMessage),
    Hint(BareMessage),
    Tick(TickMessage),
    Pause(BareMessage),
    Restart(BareMessage),
    NextRound(BareMessage),
    Observe(BareMessage),
    Reshuffle(BareMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Swap(m) => m.seq,
            ParsedMessage::Select(m) => m.seq,
            ParsedMessage::Swipe(m) => m.seq,
            ParsedMessage::Tick(m) => m.seq,
            ParsedMessage::Hint(m)
            | ParsedMessage::Pause(m)
            | ParsedMessage::Restart(m)
            | ParsedMessage::NextRound(m)
            | ParsedMessage::Observe(m)
            | ParsedMessage::Reshuffle(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum InboundMessage {
        Hello(HelloMessage),
        Swap(SwapMessage),
        Select(SelectMessage),
        Swipe(SwipeMessage),
        Hint(BareMessage),
        Tick(TickMessage),
        Pause(BareMessage),
        Restart(BareMessage),
        NextRound(BareMessage),
        Observe(BareMessage),
        Reshuffle(BareMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(m) => Ok(match m {
            InboundMessage::Hello(m) => ParsedMessage::Hello(m),
            InboundMessage::Swap(m) => ParsedMessage::Swap(m),
            InboundMessage::Select(m) => ParsedMessage::Select(m),
            InboundMessage::Swipe(m) => ParsedMessage::Swipe(m),
            InboundMessage::Hint(m) => ParsedMessage::Hint(m),
            InboundMessage::Tick(m) => ParsedMessage::Tick(m),
            InboundMessage::Pause(m) => ParsedMessage::Pause(m),
            InboundMessage::Restart(m) => ParsedMessage::Restart(m),
            InboundMessage::NextRound(m) => ParsedMessage::NextRound(m),
            InboundMessage::Observe(m) => ParsedMessage::Observe(m),
            InboundMessage::Reshuffle(m) => ParsedMessage::Reshuffle(m),
        }),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let head = serde_json::from_str::<TypeOnly>(json)?;
            let msg_type = head.msg_type.unwrap_or("unknown");
            if !KNOWN_TYPES.contains(&msg_type) {
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: head.seq.unwrap_or(0),
                }));
            }
            Err(e)
        }
    }
}

/// Pull `seq` out of a line that failed to parse, so the error can echo it.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    rules: &crate::core::Rules,
    seed: u32,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: MessageType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        game_id: "match3".to_string(),
        width: rules.width,
        height: rules.height,
        kinds: rules.kind_count,
        min_match: rules.min_match,
        swap_policy: rules.swap_policy.as_str().to_string(),
        seed,
    }
}

/// Build the reply to a swap or swipe
pub fn create_outcome(seq: u64, outcome: &ResolutionOutcome, score: u32) -> OutcomeMessage {
    let (result, reason, settlement) = match outcome {
        ResolutionOutcome::Rejected(reason) => {
            let text = match reason {
                RejectReason::NotIdle(state) => format!("not_idle:{}", state.as_str()),
                RejectReason::NotAdjacent => reason.as_str().to_string(),
            };
            (OutcomeResult::Rejected, Some(text), None)
        }
        ResolutionOutcome::Reverted(_) => (OutcomeResult::Reverted, None, None),
        ResolutionOutcome::Resolved(res) => {
            (OutcomeResult::Resolved, None, Some(res.settlement.into()))
        }
    };

    OutcomeMessage {
        msg_type: MessageType::Outcome,
        seq,
        ts: current_timestamp_ms(),
        result,
        reason,
        events: outcome.events().iter().map(WireEvent::from).collect(),
        score_delta: outcome.score_delta(),
        score,
        settlement,
    }
}

/// Build the reply to an explicit reshuffle
pub fn create_shuffle_outcome(
    seq: u64,
    events: &[BoardEvent],
    score: u32,
    legal_moves: usize,
) -> OutcomeMessage {
    OutcomeMessage {
        msg_type: MessageType::Outcome,
        seq,
        ts: current_timestamp_ms(),
        result: OutcomeResult::Shuffled,
        reason: None,
        events: events.iter().map(WireEvent::from).collect(),
        score_delta: 0,
        score,
        settlement: Some(WireSettlement::Playable { legal_moves }),
    }
}

/// Build the reply to a tap. Swaps are answered with an outcome instead.
pub fn create_selection(seq: u64, outcome: &SelectOutcome) -> Option<SelectionMessage> {
    let (status, at, from) = match *outcome {
        SelectOutcome::Selected(c) => (SelectionStatus::Selected, Some(c.into()), None),
        SelectOutcome::Deselected(c) => (SelectionStatus::Deselected, Some(c.into()), None),
        SelectOutcome::Forbidden { from, to } => {
            (SelectionStatus::Forbidden, Some(to.into()), Some(from.into()))
        }
        SelectOutcome::Ignored => (SelectionStatus::Ignored, None, None),
        SelectOutcome::Swapped(_) => return None,
    };
    Some(SelectionMessage {
        msg_type: MessageType::Selection,
        seq,
        ts: current_timestamp_ms(),
        status,
        at,
        from,
    })
}

pub fn create_hint(seq: u64, hint: Option<Move>) -> HintMessage {
    HintMessage {
        msg_type: MessageType::Hint,
        seq,
        ts: current_timestamp_ms(),
        mv: hint.map(|m| [m.a.into(), m.b.into()]),
    }
}

pub fn create_observation(seq: u64, snap: &SessionSnapshot) -> ObservationMessage {
    let board = &snap.board;
    ObservationMessage {
        msg_type: MessageType::Observation,
        seq,
        ts: current_timestamp_ms(),
        width: board.width,
        height: board.height,
        rows: board.rows().map(|r| r.to_vec()).collect(),
        board_hash: BoardHash(board.board_hash),
        state: board.state.as_str().to_string(),
        level: snap.level,
        score: snap.score,
        target: snap.target,
        progress: snap.progress,
        time_left_ms: snap.time_left_ms,
        intro_left_ms: snap.intro_left_ms,
        paused: snap.paused,
        game_over: snap.game_over,
        episode_id: snap.episode_id,
        moves: snap.moves,
        selected: snap.selected.map(WireCoord::from),
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64, paused: bool, game_over: bool) -> AckMessage {
    AckMessage {
        msg_type: MessageType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        paused,
        game_over,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: MessageType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Parse a swap policy name; `None` for an unknown name
pub fn parse_swap_policy(name: &str) -> Option<SwapMatchPolicy> {
    SwapMatchPolicy::from_str(name)
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileKind;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"client":{"name":"viewer","version":"0.3.0"},"config":{"width":6,"kinds":4},"seed":99}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "viewer");
                let cfg = msg.config.unwrap();
                assert_eq!(cfg.width, Some(6));
                assert_eq!(cfg.height, None);
                assert_eq!(cfg.kinds, Some(4));
                assert_eq!(msg.seed, Some(99));
            }
            other => panic!("Expected Hello message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_swap_and_swipe() {
        let msg = parse_message(r#"{"type":"swap","seq":2,"a":[3,3],"b":[2,3]}"#).unwrap();
        assert_eq!(
            msg,
            ParsedMessage::Swap(SwapMessage {
                seq: 2,
                a: WireCoord(3, 3),
                b: WireCoord(2, 3)
            })
        );

        let msg = parse_message(r#"{"type":"swipe","seq":3,"at":[0,1],"dir":"left"}"#).unwrap();
        match msg {
            ParsedMessage::Swipe(m) => {
                assert_eq!(Direction::from(m.dir), Direction::Left);
                assert_eq!(Coord::from(m.at), Coord::new(0, 1));
            }
            other => panic!("Expected Swipe message, got {:?}", other),
        }

        let msg = parse_message(r#"{"type":"next_round","seq":4}"#).unwrap();
        assert_eq!(msg, ParsedMessage::NextRound(BareMessage { seq: 4 }));
        assert_eq!(msg.seq(), 4);
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let msg = parse_message(r#"{"type":"teleport","seq":9}"#).unwrap();
        assert_eq!(msg, ParsedMessage::Unknown(UnknownMessage { seq: 9 }));
    }

    #[test]
    fn test_known_type_with_bad_payload_is_an_error() {
        assert!(parse_message(r#"{"type":"swap","seq":2,"a":[3]}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"type":"swap","seq": 17,"a":"#), Some(17));
        assert_eq!(extract_seq_best_effort(r#"{"type":"swap"}"#), None);
    }

    #[test]
    fn test_board_hash_is_hex() {
        let json = serde_json::to_string(&BoardHash(0xdead_beef)).unwrap();
        assert_eq!(json, "\"00000000deadbeef\"");
        let back: BoardHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BoardHash(0xdead_beef));
    }

    #[test]
    fn test_wire_event_shape() {
        let ev = BoardEvent::Fell {
            from: Coord::new(2, 4),
            to: Coord::new(2, 1),
            kind: TileKind(4),
        };
        let json = serde_json::to_value(WireEvent::from(&ev)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "fell", "from": [2, 4], "to": [2, 1], "kind": 4})
        );
    }

    #[test]
    fn test_create_error() {
        let error = create_error(5, ErrorCode::HandshakeRequired, "Send hello first");
        assert_eq!(error.msg_type, MessageType::Error);
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "handshake_required");
        assert_eq!(json["seq"], 5);
    }

    #[test]
    fn test_rejected_outcome_has_reason_and_no_events() {
        let outcome = ResolutionOutcome::Rejected(RejectReason::NotAdjacent);
        let msg = create_outcome(3, &outcome, 120);
        assert_eq!(msg.result, OutcomeResult::Rejected);
        assert_eq!(msg.reason.as_deref(), Some("not_adjacent"));
        assert!(msg.events.is_empty());
        assert_eq!(msg.score, 120);
        assert!(msg.settlement.is_none());
    }
}
