//! Stdio host for the JSON protocol
//!
//! One client drives one session over a pair of byte streams. The reader is any
//! `AsyncBufRead`, the writer any `AsyncWrite`; production wires them to
//! stdin/stdout, tests to `tokio::io::duplex`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::core::{CoreError, Rules, SimpleRng};
use crate::protocol::*;
use crate::session::{GameSession, RoundConfig, SelectOutcome, SessionError};

pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub protocol_version: String,
    pub rules: Rules,
    pub round: RoundConfig,
    pub seed: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            rules: Rules::default(),
            round: RoundConfig::default(),
            seed: 1,
        }
    }
}

impl ServerConfig {
    /// Create from `MATCH3_*` environment variables. Unset or unparsable values
    /// keep their defaults.
    pub fn from_env() -> Self {
        use std::env;

        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Rules::default();
        let width = var("MATCH3_WIDTH").unwrap_or(defaults.width);
        let height = var("MATCH3_HEIGHT").unwrap_or(defaults.height);

        let mut rules = Rules::with_size(width, height);
        if let Some(kinds) = var("MATCH3_KINDS") {
            rules.kind_count = kinds;
        }
        if let Some(min_match) = var("MATCH3_MIN_MATCH") {
            rules.min_match = min_match;
        }

        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            rules,
            round: RoundConfig::default(),
            seed: var("MATCH3_SEED").unwrap_or(1),
        }
    }

    /// Apply the overrides a client sent with `hello`
    pub fn with_overrides(&self, cfg: &HelloConfig) -> Result<(Rules, RoundConfig), String> {
        let width = cfg.width.unwrap_or(self.rules.width);
        let height = cfg.height.unwrap_or(self.rules.height);

        let mut rules = if width == self.rules.width && height == self.rules.height {
            self.rules.clone()
        } else {
            Rules {
                kind_count: self.rules.kind_count,
                min_match: self.rules.min_match,
                item_score: self.rules.item_score,
                max_reshuffles: self.rules.max_reshuffles,
                swap_policy: self.rules.swap_policy,
                ..Rules::with_size(width, height)
            }
        };
        if let Some(kinds) = cfg.kinds {
            rules.kind_count = kinds;
        }
        if let Some(min_match) = cfg.min_match {
            rules.min_match = min_match;
        }
        if let Some(name) = cfg.swap_policy.as_deref() {
            rules.swap_policy = parse_swap_policy(name)
                .ok_or_else(|| format!("unknown swap_policy: {}", name))?;
        }
        rules.validate().map_err(|e| e.to_string())?;

        let mut round = self.round;
        if let Some(ms) = cfg.round_time_ms {
            round.round_time_ms = ms;
        }
        if let Some(ms) = cfg.intro_ms {
            round.intro_ms = ms;
        }
        Ok((rules, round))
    }
}

/// Protocol state for one connection
pub struct Host {
    config: ServerConfig,
    session: Option<GameSession<SimpleRng>>,
    handshaken: bool,
    last_seq: Option<u64>,
    /// Seed of the current session, reported in `welcome`
    seed: u32,
}

impl Host {
    pub fn new(config: ServerConfig) -> Self {
        let seed = config.seed;
        Self {
            config,
            session: None,
            handshaken: false,
            last_seq: None,
            seed,
        }
    }

    /// Host around an existing session. A plain `hello` keeps it; a `hello` with
    /// `config` or `seed` replaces it.
    pub fn with_session(config: ServerConfig, session: GameSession<SimpleRng>) -> Self {
        let mut host = Self::new(config);
        host.session = Some(session);
        host
    }

    pub fn session(&self) -> Option<&GameSession<SimpleRng>> {
        self.session.as_ref()
    }

    pub fn is_handshaken(&self) -> bool {
        self.handshaken
    }

    fn check_and_update_seq(&mut self, seq: u64) -> bool {
        match self.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                self.last_seq = Some(seq);
                true
            }
        }
    }

    /// Handle one input line. Blank lines produce no reply.
    pub fn handle_line(&mut self, line: &str) -> Option<OutboundMessage> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let msg = match parse_message(trimmed) {
            Ok(msg) => msg,
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                debug!(seq, error = %e, "malformed message");
                return Some(OutboundMessage::Error(create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {}", e),
                )));
            }
        };

        let seq = msg.seq();
        if !self.handshaken && !matches!(msg, ParsedMessage::Hello(_)) {
            return Some(OutboundMessage::Error(create_error(
                seq,
                ErrorCode::HandshakeRequired,
                "Send hello first",
            )));
        }
        if !self.check_and_update_seq(seq) {
            return Some(OutboundMessage::Error(create_error(
                seq,
                ErrorCode::InvalidCommand,
                "seq must be strictly increasing",
            )));
        }

        Some(match self.dispatch(msg) {
            Ok(reply) => reply,
            Err(e) => session_error(seq, &e),
        })
    }

    fn dispatch(&mut self, msg: ParsedMessage) -> Result<OutboundMessage, SessionError> {
        let seq = msg.seq();

        if let ParsedMessage::Hello(hello) = msg {
            return Ok(self.hello(hello));
        }
        if let ParsedMessage::Unknown(_) = msg {
            return Ok(OutboundMessage::Error(create_error(
                seq,
                ErrorCode::InvalidCommand,
                "Unknown message type",
            )));
        }

        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::NotPlayable);
        };

        let reply = match msg {
            ParsedMessage::Swap(m) => {
                let outcome = session.swap(m.a.into(), m.b.into())?;
                OutboundMessage::Outcome(create_outcome(seq, &outcome, session.score()))
            }
            ParsedMessage::Swipe(m) => {
                let outcome = session.swipe(m.at.into(), m.dir.into())?;
                OutboundMessage::Outcome(create_outcome(seq, &outcome, session.score()))
            }
            ParsedMessage::Select(m) => {
                let tapped = session.select(m.at.into())?;
                match create_selection(seq, &tapped) {
                    Some(sel) => OutboundMessage::Selection(sel),
                    None => match tapped {
                        SelectOutcome::Swapped(outcome) => OutboundMessage::Outcome(
                            create_outcome(seq, &outcome, session.score()),
                        ),
                        _ => OutboundMessage::Ack(create_ack(
                            seq,
                            session.paused(),
                            session.game_over(),
                        )),
                    },
                }
            }
            ParsedMessage::Hint(_) => OutboundMessage::Hint(create_hint(seq, session.hint())),
            ParsedMessage::Tick(m) => {
                if session.tick(m.elapsed_ms) {
                    info!(score = session.score(), "round over");
                }
                OutboundMessage::Ack(create_ack(seq, session.paused(), session.game_over()))
            }
            ParsedMessage::Pause(_) => {
                let paused = session.pause();
                OutboundMessage::Ack(create_ack(seq, paused, session.game_over()))
            }
            ParsedMessage::Restart(_) => {
                session.restart()?;
                OutboundMessage::Ack(create_ack(seq, session.paused(), session.game_over()))
            }
            ParsedMessage::NextRound(_) => {
                session.next_round()?;
                OutboundMessage::Ack(create_ack(seq, session.paused(), session.game_over()))
            }
            ParsedMessage::Reshuffle(_) => {
                let events = session.reshuffle()?;
                let legal_moves = session.engine().legal_moves().len();
                OutboundMessage::Outcome(create_shuffle_outcome(
                    seq,
                    &events,
                    session.score(),
                    legal_moves,
                ))
            }
            ParsedMessage::Observe(_) => {
                OutboundMessage::Observation(create_observation(seq, &session.snapshot()))
            }
            ParsedMessage::Hello(_) | ParsedMessage::Unknown(_) => {
                return Err(SessionError::NotPlayable);
            }
        };
        Ok(reply)
    }

    fn hello(&mut self, hello: HelloMessage) -> OutboundMessage {
        let seq = hello.seq;
        let rebuild = self.session.is_none() || hello.config.is_some() || hello.seed.is_some();

        if rebuild {
            let (rules, round) = match hello.config.as_ref() {
                Some(cfg) => match self.config.with_overrides(cfg) {
                    Ok(v) => v,
                    Err(message) => {
                        warn!(%message, "rejected hello config");
                        return OutboundMessage::Error(create_error(
                            seq,
                            ErrorCode::InvalidConfig,
                            &message,
                        ));
                    }
                },
                None => (self.config.rules.clone(), self.config.round),
            };
            let seed = hello.seed.unwrap_or(self.config.seed);
            match GameSession::new(rules, round, SimpleRng::new(seed)) {
                Ok(session) => {
                    self.session = Some(session);
                    self.seed = seed;
                }
                Err(e) => return session_error(seq, &e),
            }
        }

        self.handshaken = true;
        info!(
            client = %hello.client.name,
            version = %hello.client.version,
            seed = self.seed,
            "client connected"
        );

        let rules = match self.session.as_ref() {
            Some(session) => session.engine().rules().clone(),
            None => self.config.rules.clone(),
        };
        OutboundMessage::Welcome(create_welcome(
            seq,
            &self.config.protocol_version,
            &rules,
            self.seed,
        ))
    }
}

fn session_error(seq: u64, err: &SessionError) -> OutboundMessage {
    let code = match err {
        SessionError::Core(CoreError::InvalidConfig(_)) => ErrorCode::InvalidConfig,
        other => ErrorCode::from_session_code(other.code()),
    };
    OutboundMessage::Error(create_error(seq, code, &err.to_string()))
}

/// Serve one client until the reader hits EOF.
pub async fn serve<R, W>(mut host: Host, reader: R, mut writer: W) -> anyhow::Result<Host>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut buf: Vec<u8> = Vec::with_capacity(4096);

    while let Some(line) = lines.next_line().await? {
        let Some(reply) = host.handle_line(&line) else {
            continue;
        };

        buf.clear();
        serde_json::to_writer(&mut buf, &reply)?;
        buf.push(b'\n');
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }

    debug!("input closed");
    Ok(host)
}

/// Serve the protocol on stdin/stdout
pub async fn run_stdio(config: ServerConfig) -> anyhow::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(Host::new(config), stdin, stdout).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_line(seq: u64) -> String {
        format!(
            r#"{{"type":"hello","seq":{},"client":{{"name":"test","version":"1"}},"config":{{"intro_ms":0}},"seed":5}}"#,
            seq
        )
    }

    #[test]
    fn test_command_before_hello_requires_handshake() {
        let mut host = Host::new(ServerConfig::default());
        let reply = host.handle_line(r#"{"type":"observe","seq":1}"#).unwrap();
        match reply {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::HandshakeRequired),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(!host.is_handshaken());
    }

    #[test]
    fn test_hello_then_observe() {
        let mut host = Host::new(ServerConfig::default());
        match host.handle_line(&hello_line(1)).unwrap() {
            OutboundMessage::Welcome(w) => {
                assert_eq!(w.seq, 1);
                assert_eq!(w.width, 5);
                assert_eq!(w.seed, 5);
                assert_eq!(w.swap_policy, "prefer_origin");
            }
            other => panic!("expected welcome, got {:?}", other),
        }

        match host.handle_line(r#"{"type":"observe","seq":2}"#).unwrap() {
            OutboundMessage::Observation(obs) => {
                assert_eq!(obs.rows.len(), 5);
                assert_eq!(obs.state, "idle");
                assert_eq!(obs.level, 1);
                assert_eq!(obs.intro_left_ms, 0);
            }
            other => panic!("expected observation, got {:?}", other),
        }
    }

    #[test]
    fn test_seq_must_increase() {
        let mut host = Host::new(ServerConfig::default());
        host.handle_line(&hello_line(3));
        match host.handle_line(r#"{"type":"hint","seq":3}"#).unwrap() {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::InvalidCommand),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(matches!(
            host.handle_line(r#"{"type":"hint","seq":4}"#),
            Some(OutboundMessage::Hint(_))
        ));
    }

    #[test]
    fn test_malformed_json_echoes_seq() {
        let mut host = Host::new(ServerConfig::default());
        match host.handle_line(r#"{"type":"swap","seq":12,"a":[0"#).unwrap() {
            OutboundMessage::Error(e) => {
                assert_eq!(e.code, ErrorCode::InvalidCommand);
                assert_eq!(e.seq, 12);
            }
            other => panic!("expected error, got {:?}", other),
        }
        assert!(host.handle_line("   ").is_none());
    }

    #[test]
    fn test_invalid_hello_config() {
        let mut host = Host::new(ServerConfig::default());
        let line = r#"{"type":"hello","seq":1,"client":{"name":"t"},"config":{"kinds":1}}"#;
        match host.handle_line(line).unwrap() {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::InvalidConfig),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(!host.is_handshaken());
    }

    #[test]
    fn test_oversized_hello_board_is_invalid_config() {
        let mut host = Host::new(ServerConfig::default());
        let line = r#"{"type":"hello","seq":1,"client":{"name":"t"},"config":{"width":2000000000,"height":2000000000}}"#;
        match host.handle_line(line).unwrap() {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::InvalidConfig),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(!host.is_handshaken());

        // The connection stays usable for a sane hello.
        match host.handle_line(&hello_line(2)).unwrap() {
            OutboundMessage::Welcome(_) => {}
            other => panic!("expected welcome, got {:?}", other),
        }
        assert!(host.is_handshaken());
    }

    #[test]
    fn test_input_during_intro_is_not_playable() {
        let mut host = Host::new(ServerConfig::default());
        host.handle_line(r#"{"type":"hello","seq":1,"client":{"name":"t"}}"#);
        match host.handle_line(r#"{"type":"swap","seq":2,"a":[0,0],"b":[1,0]}"#).unwrap() {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::NotPlayable),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_bounds_select() {
        let mut host = Host::new(ServerConfig::default());
        host.handle_line(&hello_line(1));
        match host.handle_line(r#"{"type":"select","seq":2,"at":[9,9]}"#).unwrap() {
            OutboundMessage::Error(e) => assert_eq!(e.code, ErrorCode::OutOfBounds),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_hello_overrides() {
        let cfg = ServerConfig::default();
        let (rules, round) = cfg
            .with_overrides(&HelloConfig {
                width: Some(7),
                height: Some(6),
                swap_policy: Some("resolve_both".into()),
                round_time_ms: Some(30_000),
                ..HelloConfig::default()
            })
            .unwrap();
        assert_eq!(rules.width, 7);
        assert_eq!(rules.height, 6);
        assert_eq!(rules.cascade_limit, 7 * 6 * 4);
        assert_eq!(rules.swap_policy.as_str(), "resolve_both");
        assert_eq!(round.round_time_ms, 30_000);

        assert!(cfg
            .with_overrides(&HelloConfig {
                swap_policy: Some("sideways".into()),
                ..HelloConfig::default()
            })
            .is_err());
    }
}
