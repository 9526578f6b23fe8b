use crate::board::Player;
use crate::cancel::CancellationToken;
use crate::config::{EvaluatorConfig, HeuristicWeights};
use crate::error::{Error, Result};
use crate::game::{GameState, Move, Phase};
use crate::playout::{MAX_PLAYOUT_MOVES, simulate_playout_with_buffer};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use rayon::prelude::*;
use tracing::debug;

const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// A candidate move with its accumulated score.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i64,
}

/// Why the evaluator settled on a move.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum DecisionReason {
    /// It was the only legal move.
    OnlyMove,
    /// The exploration branch picked it uniformly at random.
    Random,
    /// It wins the whole game on the spot.
    WinsGame,
    /// It had the highest score.
    BestScore,
}

/// The outcome of one move decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub mv: Move,
    pub reason: DecisionReason,
    /// Scores of every candidate in enumeration order. Empty unless `reason` is
    /// [`DecisionReason::BestScore`].
    pub scores: Vec<ScoredMove>,
}

/// Playout results for one candidate, from the mover's point of view.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct PlayoutTally {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl PlayoutTally {
    fn record(&mut self, phase: Phase, mover: Player) {
        match phase {
            Phase::Won(winner) if winner == mover => self.wins += 1,
            Phase::Won(_) => self.losses += 1,
            _ => self.draws += 1,
        }
    }

    fn score(&self, weights: &HeuristicWeights) -> i64 {
        i64::from(self.wins) * weights.playout_win + i64::from(self.draws) * weights.playout_draw
    }
}

/// Picks moves for a computer-controlled player.
///
/// Holds the single random source every decision draws from.
pub struct MoveEvaluator<K: RandomGenerator> {
    config: EvaluatorConfig,
    weights: HeuristicWeights,
    random: K,
    cancellation: Option<CancellationToken>,
}

/// A builder for creating instances of `MoveEvaluator`.
pub struct MoveEvaluatorBuilder<K: RandomGenerator> {
    config: EvaluatorConfig,
    weights: HeuristicWeights,
    random_generator: K,
    cancellation: Option<CancellationToken>,
}

impl<K: RandomGenerator> MoveEvaluatorBuilder<K> {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            weights: HeuristicWeights::default(),
            random_generator: K::default(),
            cancellation: None,
        }
    }

    /// Sets the random number generator, e.g. a seeded one for reproducible play.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    pub fn with_weights(mut self, weights: HeuristicWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Lets another thread abort long decisions.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the evaluator, rejecting an invalid configuration.
    pub fn build(self) -> Result<MoveEvaluator<K>> {
        self.config.validate()?;
        Ok(MoveEvaluator {
            config: self.config,
            weights: self.weights,
            random: self.random_generator,
            cancellation: self.cancellation,
        })
    }
}

impl<K: RandomGenerator> MoveEvaluator<K> {
    /// Returns a new builder for `MoveEvaluator`.
    pub fn builder(config: EvaluatorConfig) -> MoveEvaluatorBuilder<K> {
        MoveEvaluatorBuilder::new(config)
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EvaluatorConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Picks the move to play for the player on turn.
    pub fn choose_move(&mut self, state: &GameState) -> Result<Move> {
        self.decide(state).map(|decision| decision.mv)
    }

    /// Picks the move to play and explains the choice.
    pub fn decide(&mut self, state: &GameState) -> Result<Decision> {
        let moves = state.legal_moves();
        let decision = match moves.as_slice() {
            [] => return Err(Error::NoLegalMoves),
            [only] => Decision {
                mv: *only,
                reason: DecisionReason::OnlyMove,
                scores: Vec::new(),
            },
            _ if self.random.chance(self.config.randomness) => {
                let index = self.random.next_range(0, moves.len());
                Decision {
                    mv: moves[index],
                    reason: DecisionReason::Random,
                    scores: Vec::new(),
                }
            }
            _ => self.score_and_pick(state, &moves)?,
        };

        debug!(
            mv = %decision.mv,
            reason = ?decision.reason,
            candidates = moves.len(),
            best_score = ?decision.scores.iter().map(|scored| scored.score).max(),
            "chose move"
        );
        Ok(decision)
    }

    fn score_and_pick(&mut self, state: &GameState, moves: &[Move]) -> Result<Decision> {
        let mover = state.current_player();
        let mut scores = Vec::with_capacity(moves.len());

        for &mv in moves {
            match self.tactical_score(state, mv, mover) {
                Tactic::WinsGame => {
                    return Ok(Decision {
                        mv,
                        reason: DecisionReason::WinsGame,
                        scores: Vec::new(),
                    });
                }
                Tactic::Score(score) => scores.push(ScoredMove { mv, score }),
            }
        }

        let tallies = self.run_playouts(state, moves, mover)?;
        for (scored, tally) in scores.iter_mut().zip(tallies.iter()) {
            scored.score += tally.score(&self.weights);
            scored.score += self.positional_score(state, scored.mv, mover);
        }

        let mut best = scores[0];
        for scored in &scores[1..] {
            if scored.score > best.score {
                best = *scored;
            }
        }

        Ok(Decision {
            mv: best.mv,
            reason: DecisionReason::BestScore,
            scores,
        })
    }

    /// Immediate win and block checks on the played sub-board.
    fn tactical_score(&self, state: &GameState, mv: Move, mover: Player) -> Tactic {
        let board = state.board();
        let sub_board = board.sub_board(mv.sub_board);
        let mut score = 0;

        if sub_board.would_win(mv.cell, mover) {
            if board.would_win_master(mv.sub_board, mover) {
                return Tactic::WinsGame;
            }
            score += self.weights.sub_board_win;
        }
        if sub_board.would_win(mv.cell, mover.opponent()) {
            score += self.weights.sub_board_block;
        }

        Tactic::Score(score)
    }

    /// Runs the configured playouts for every candidate.
    ///
    /// Each candidate gets its own child generator, forked in enumeration order, so the
    /// tallies are identical whether the batches run serially or on the thread pool.
    fn run_playouts(
        &mut self,
        state: &GameState,
        moves: &[Move],
        mover: Player,
    ) -> Result<Vec<PlayoutTally>> {
        let simulations = self.config.simulations_per_move;
        let cancellation = self.cancellation.as_ref();
        let jobs: Vec<(Move, K)> = moves.iter().map(|&mv| (mv, self.random.fork())).collect();

        if self.config.parallel {
            jobs.into_par_iter()
                .map(|(mv, mut random)| {
                    playout_batch(state, mv, mover, simulations, &mut random, cancellation)
                })
                .collect()
        } else {
            jobs.into_iter()
                .map(|(mv, mut random)| {
                    playout_batch(state, mv, mover, simulations, &mut random, cancellation)
                })
                .collect()
        }
    }

    fn positional_score(&self, state: &GameState, mv: Move, mover: Player) -> i64 {
        let board = state.board();
        let mut score = 0;

        if mv.cell == CENTER {
            score += self.weights.center_cell;
        }
        if CORNERS.contains(&mv.cell) {
            score += self.weights.corner_cell;
        }
        if mv.sub_board == CENTER && !board.outcome(CENTER).is_decided() {
            score += self.weights.center_sub_board;
        }

        // A decided target hands the opponent free choice and is not penalised.
        if !board.outcome(mv.cell).is_decided() {
            let gifts = board
                .sub_board(mv.cell)
                .count_winning_moves(mover.opponent());
            score -= gifts as i64 * self.weights.gift_penalty;
        }

        score
    }
}

impl MoveEvaluator<StandardRandomGenerator> {
    pub fn from_config(config: EvaluatorConfig) -> Result<Self> {
        MoveEvaluatorBuilder::new(config).build()
    }
}

enum Tactic {
    WinsGame,
    Score(i64),
}

fn playout_batch<K: RandomGenerator>(
    state: &GameState,
    mv: Move,
    mover: Player,
    simulations: u32,
    random: &mut K,
    cancellation: Option<&CancellationToken>,
) -> Result<PlayoutTally> {
    let mut tally = PlayoutTally::default();
    let mut moves = Vec::with_capacity(MAX_PLAYOUT_MOVES);
    for _ in 0..simulations {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled);
        }
        let phase = simulate_playout_with_buffer(state, mv, mover, random, &mut moves)?;
        tally.record(phase, mover);
    }
    Ok(tally)
}

/// Picks a move for the player on turn using the thread-local random source.
pub fn choose_move(state: &GameState, config: &EvaluatorConfig) -> Result<Move> {
    MoveEvaluator::from_config(*config)?.choose_move(state)
}
