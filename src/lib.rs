//! Rules engine and computer opponent for Ultimate Tic-Tac-Toe.
//!
//! Nine small boards sit on a 3x3 master board. The cell index of every move names the
//! small board the opponent has to play next; winning three small boards in a line wins
//! the game. This crate enforces those rules and picks moves for a computer player by
//! combining quick tactical checks, random playouts and positional bonuses.
//!
//! # Example
//!
//! ```rust
//! use uttt_engine::config::Difficulty;
//! use uttt_engine::evaluator::MoveEvaluator;
//! use uttt_engine::game::{GameState, Move};
//! use uttt_engine::random::CustomNumberGenerator;
//!
//! // X opens in the centre of the centre board, sending O to board 4
//! let mut state = GameState::new();
//! state.play(Move::new(4, 4), state.current_player()).unwrap();
//!
//! // Let the computer answer for O
//! let mut evaluator = MoveEvaluator::builder(Difficulty::Easy.config())
//!     .with_random_generator(CustomNumberGenerator::new(42))
//!     .build()
//!     .unwrap();
//! let reply = evaluator.choose_move(&state).unwrap();
//! assert_eq!(reply.sub_board, 4);
//!
//! state.play(reply, state.current_player()).unwrap();
//! println!("{state}");
//! ```

/// Cells, sub-boards, the master board and win-line checks.
pub mod board;
/// Cooperative cancellation of long move decisions.
pub mod cancel;
/// Evaluator settings, difficulty presets and heuristic weights.
pub mod config;
pub mod error;
/// Scores candidate moves and picks the computer's move.
pub mod evaluator;
/// Game state, move legality and the single apply-move operation.
pub mod game;
/// Random continuation of a game to a terminal outcome.
pub mod playout;
/// Contains traits and implementations for random number generation.
pub mod random;
pub mod session;

pub use board::Player;
pub use config::{Difficulty, EvaluatorConfig};
pub use error::{Error, IllegalMoveReason, Result};
pub use evaluator::{MoveEvaluator, choose_move};
pub use game::{ActiveSubBoard, GameState, Move, MoveReport, Phase, new_game};
pub use playout::{simulate_playout, simulate_playout_with_buffer};
pub use session::{Controller, ScoreTally, Session};
