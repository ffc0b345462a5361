use match3_types::Coord;

/// Errors raised by the rules engine.
///
/// `NotAdjacent` and `InvalidMove` are normally reported through
/// [`ResolutionOutcome`](crate::engine::ResolutionOutcome) rather than as errors; they
/// exist here so lower-level helpers can return them with `?`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("coordinate ({}, {}) is outside the board", .0.col, .0.row)]
    OutOfBounds(Coord),

    #[error("cells ({}, {}) and ({}, {}) are not adjacent", .0.col, .0.row, .1.col, .1.row)]
    NotAdjacent(Coord, Coord),

    #[error("swapping ({}, {}) and ({}, {}) makes no match", .0.col, .0.row, .1.col, .1.row)]
    InvalidMove(Coord, Coord),

    #[error("no legal move after {attempts} reshuffles")]
    DeadlockExhausted { attempts: u32 },

    #[error("cascade did not settle within {limit} steps")]
    CascadeLimitExceeded { limit: usize },

    #[error("initial sweep could not break the match at ({}, {})", .0.col, .0.row)]
    SweepExhausted(Coord),

    #[error("tile kind {kind} is outside the catalog of {kind_count} kinds")]
    UnknownKind { kind: u8, kind_count: u8 },

    #[error("board is {actual_width}x{actual_height}, rules expect {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::OutOfBounds(Coord::new(5, -1));
        assert_eq!(err.to_string(), "coordinate (5, -1) is outside the board");

        let err = CoreError::DeadlockExhausted { attempts: 10 };
        assert_eq!(err.to_string(), "no legal move after 10 reshuffles");

        let err = CoreError::InvalidConfig("kind_count must be >= 2".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: kind_count must be >= 2"
        );
    }
}
