//! Turn loop for a UI: who controls each seat, the running game and the score tally.

use crate::board::Player;
use crate::cancel::CancellationToken;
use crate::config::EvaluatorConfig;
use crate::error::{Error, Result};
use crate::evaluator::MoveEvaluator;
use crate::game::{GameState, Move, MoveReport, Phase};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Who makes the moves for a seat.
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Computer(EvaluatorConfig),
}

impl Controller {
    pub fn is_computer(&self) -> bool {
        matches!(self, Controller::Computer(_))
    }
}

/// Cumulative results across games. Persisting it is up to the caller.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct ScoreTally {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl ScoreTally {
    /// Counts a finished game. Returns `false` and changes nothing for `InProgress`.
    pub fn record(&mut self, phase: Phase) -> bool {
        match phase {
            Phase::InProgress => return false,
            Phase::Won(Player::X) => self.x_wins += 1,
            Phase::Won(Player::O) => self.o_wins += 1,
            Phase::Drawn => self.draws += 1,
        }
        true
    }

    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// A sequence of games between two seats sharing one rule engine.
///
/// Human and computer moves go through the same [`GameState::play`]; the evaluator is only
/// consulted for computer-controlled seats.
pub struct Session<K: RandomGenerator = StandardRandomGenerator> {
    state: GameState,
    x: Controller,
    o: Controller,
    tally: ScoreTally,
    random: K,
    cancellation: Option<CancellationToken>,
}

impl Session<StandardRandomGenerator> {
    pub fn new(x: Controller, o: Controller) -> Self {
        Session::with_random_generator(x, o, StandardRandomGenerator)
    }

    /// Human plays X against the computer at the given settings, as in the single player
    /// mode.
    pub fn against_computer(config: EvaluatorConfig) -> Self {
        Session::new(Controller::Human, Controller::Computer(config))
    }
}

impl<K: RandomGenerator> Session<K> {
    pub fn with_random_generator(x: Controller, o: Controller, random: K) -> Self {
        Self {
            state: GameState::new(),
            x,
            o,
            tally: ScoreTally::default(),
            random,
            cancellation: None,
        }
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tally(&self) -> &ScoreTally {
        &self.tally
    }

    /// Restores a tally loaded by the caller.
    pub fn set_tally(&mut self, tally: ScoreTally) {
        self.tally = tally;
    }

    pub fn controller(&self, player: Player) -> &Controller {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    /// Replaces a seat's controller, e.g. when the difficulty changes mid-game.
    pub fn set_controller(&mut self, player: Player, controller: Controller) -> Result<()> {
        if let Controller::Computer(config) = &controller {
            config.validate()?;
        }
        match player {
            Player::X => self.x = controller,
            Player::O => self.o = controller,
        }
        Ok(())
    }

    /// Returns `true` when the game is running and the seat on turn is a computer.
    pub fn is_computer_turn(&self) -> bool {
        !self.state.is_terminal() && self.controller(self.state.current_player()).is_computer()
    }

    /// Plays a move for the human seat on turn.
    pub fn play_human(&mut self, mv: Move) -> Result<MoveReport> {
        let player = self.state.current_player();
        if self.controller(player).is_computer() {
            return Err(Error::NotHumanTurn { player });
        }
        self.apply(mv, player)
    }

    /// Lets the computer seat on turn choose and play its move.
    pub fn play_computer(&mut self) -> Result<MoveReport> {
        let player = self.state.current_player();
        let Controller::Computer(config) = *self.controller(player) else {
            return Err(Error::NotComputerTurn { player });
        };

        let mut builder = MoveEvaluator::builder(config).with_random_generator(self.random.fork());
        if let Some(token) = &self.cancellation {
            builder = builder.with_cancellation_token(token.clone());
        }
        let mv = builder.build()?.choose_move(&self.state)?;
        self.apply(mv, player)
    }

    /// Starts a new game with the same seats. The tally is kept.
    pub fn reset(&mut self) {
        self.state = GameState::new();
    }

    fn apply(&mut self, mv: Move, player: Player) -> Result<MoveReport> {
        let report = self.state.play(mv, player)?;
        if self.tally.record(report.phase) {
            info!(
                phase = %report.phase,
                x_wins = self.tally.x_wins,
                o_wins = self.tally.o_wins,
                draws = self.tally.draws,
                "game finished"
            );
        }
        Ok(report)
    }
}
