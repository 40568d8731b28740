//! Crate-wide error type.
//!
//! Recoverable failures (malformed FEN input, unparseable or ambiguous
//! notation) surface as [`EngineError`]. Contract violations such as asking
//! for a best move on a finished position are panics, not errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("FEN has {0} fields, expected at least 5")]
    FenFieldCount(usize),
    #[error("FEN board has {0} ranks, expected 8")]
    FenRankCount(usize),
    #[error("FEN rank {0} does not describe 8 files")]
    FenRankWidth(usize),
    #[error("unknown piece character '{0}'")]
    UnknownPiece(char),
    #[error("unknown side to move '{0}'")]
    UnknownSide(String),
    #[error("unknown castling availability character '{0}'")]
    UnknownCastling(char),
    #[error("malformed square '{0}'")]
    MalformedSquare(String),
    #[error("malformed clock field '{0}'")]
    MalformedClock(String),
    #[error("cannot interpret notation '{0}'")]
    UnknownNotation(String),
    #[error("no legal move matches notation '{0}'")]
    NoMatchingMove(String),
    #[error("notation '{0}' is ambiguous")]
    AmbiguousNotation(String),
}
