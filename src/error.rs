//! Error types for the engine.

use crate::board::Player;
use crate::game::Move;
use std::fmt;
use thiserror::Error;

/// Main error type for the engine.
///
/// Every variant describes a caller bug: none of them is transient, so nothing here is
/// worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal move {mv}: {reason}")]
    IllegalMove {
        mv: Move,
        reason: IllegalMoveReason,
    },

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid position: {message}")]
    InvalidPosition { message: String },

    #[error("it is not a human player's turn ({player} is computer-controlled)")]
    NotHumanTurn { player: Player },

    #[error("it is not a computer player's turn ({player} is human-controlled)")]
    NotComputerTurn { player: Player },

    #[error("evaluation was cancelled")]
    Cancelled,
}

/// Why a move was rejected by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    /// The sub-board or cell index is not in `0..9`.
    OutOfRange,
    /// The game has already been won or drawn.
    GameOver,
    /// The target cell already holds a mark.
    CellOccupied,
    /// The target sub-board has already been won or drawn.
    SubBoardDecided,
    /// The mover is constrained to another sub-board.
    WrongSubBoard { expected: usize },
    /// The move was submitted for the player who is not on turn.
    WrongPlayer { expected: Player },
}

impl fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMoveReason::OutOfRange => write!(f, "index out of range (must be 0-8)"),
            IllegalMoveReason::GameOver => write!(f, "game already over"),
            IllegalMoveReason::CellOccupied => write!(f, "cell is already occupied"),
            IllegalMoveReason::SubBoardDecided => write!(f, "sub-board is already decided"),
            IllegalMoveReason::WrongSubBoard { expected } => {
                write!(f, "must play in sub-board {expected}")
            }
            IllegalMoveReason::WrongPlayer { expected } => write!(f, "it is {expected}'s turn"),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
