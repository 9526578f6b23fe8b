//! Evaluator configuration, difficulty presets and heuristic weights.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard the computer opponent tries.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Returns the evaluator settings for this difficulty.
    pub fn config(self) -> EvaluatorConfig {
        match self {
            Difficulty::Easy => EvaluatorConfig::preset(50, 0.40),
            Difficulty::Medium => EvaluatorConfig::preset(150, 0.15),
            Difficulty::Hard => EvaluatorConfig::preset(400, 0.05),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown difficulty '{other}' (expected easy, medium or hard)"),
            }),
        }
    }
}

/// Settings for a single move decision.
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Random playouts run per candidate move.
    pub simulations_per_move: u32,
    /// Probability in `[0, 1]` of ignoring all scores and picking a random legal move.
    pub randomness: f64,
    /// Run the playouts of different candidates on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

impl From<Difficulty> for EvaluatorConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

impl EvaluatorConfig {
    const fn preset(simulations_per_move: u32, randomness: f64) -> Self {
        Self {
            simulations_per_move,
            randomness,
            parallel: false,
        }
    }

    /// Creates a validated configuration.
    pub fn new(simulations_per_move: u32, randomness: f64) -> Result<Self> {
        let config = Self::preset(simulations_per_move, randomness);
        config.validate()?;
        Ok(config)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_simulations(mut self, simulations_per_move: u32) -> Self {
        self.simulations_per_move = simulations_per_move;
        self
    }

    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = randomness;
        self
    }

    /// Fails if `randomness` is not a finite probability.
    pub fn validate(&self) -> Result<()> {
        if !self.randomness.is_finite() || !(0.0..=1.0).contains(&self.randomness) {
            return Err(Error::InvalidConfiguration {
                message: format!("randomness {} must be within [0, 1]", self.randomness),
            });
        }
        Ok(())
    }
}

/// Score contributions used by the evaluator.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct HeuristicWeights {
    /// Move wins its sub-board for the mover.
    pub sub_board_win: i64,
    /// Move occupies a cell where the opponent would win the sub-board.
    pub sub_board_block: i64,
    /// Per playout won by the mover.
    pub playout_win: i64,
    /// Per drawn playout.
    pub playout_draw: i64,
    pub center_cell: i64,
    pub corner_cell: i64,
    /// Playing in the undecided center sub-board.
    pub center_sub_board: i64,
    /// Subtracted per winning cell available to the opponent in the sub-board they are
    /// sent to.
    pub gift_penalty: i64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            sub_board_win: 500,
            sub_board_block: 300,
            playout_win: 3,
            playout_draw: 1,
            center_cell: 50,
            corner_cell: 25,
            center_sub_board: 30,
            gift_penalty: 20,
        }
    }
}
