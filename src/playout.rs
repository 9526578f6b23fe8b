use crate::board::{BOARD_SIZE, Player};
use crate::error::Result;
use crate::game::{GameState, Move, Phase};
use crate::random::RandomGenerator;
use tracing::warn;

/// Upper bound on moves in one playout: every cell can be played at most once.
pub const MAX_PLAYOUT_MOVES: usize = BOARD_SIZE * BOARD_SIZE;

/// Plays `first_move` for `first_player` on a private copy of `state`, then finishes the
/// game with uniformly random legal moves.
///
/// Returns the terminal phase. `state` is never modified. If the move cap is reached without
/// a result the playout counts as drawn.
pub fn simulate_playout<K: RandomGenerator>(
    state: &GameState,
    first_move: Move,
    first_player: Player,
    random: &mut K,
) -> Result<Phase> {
    let mut moves = Vec::with_capacity(MAX_PLAYOUT_MOVES);
    simulate_playout_with_buffer(state, first_move, first_player, random, &mut moves)
}

/// Same as [`simulate_playout`], but enumerates legal moves into `moves` so a batch of
/// playouts shares one buffer. The private copy of `state` is the only allocation once the
/// buffer has grown.
pub fn simulate_playout_with_buffer<K: RandomGenerator>(
    state: &GameState,
    first_move: Move,
    first_player: Player,
    random: &mut K,
    moves: &mut Vec<Move>,
) -> Result<Phase> {
    let mut board = state.clone();
    board.play(first_move, first_player)?;

    let mut played = 1;
    while !board.is_terminal() {
        if played >= MAX_PLAYOUT_MOVES {
            warn!(played, "playout hit the move cap without a result, scoring as draw");
            return Ok(Phase::Drawn);
        }

        board.legal_moves_into(moves);
        let Some(&random_move) = random.get_random_from_slice(moves) else {
            warn!(played, "playout ran out of legal moves in progress, scoring as draw");
            return Ok(Phase::Drawn);
        };
        let player = board.current_player();
        board.play(random_move, player)?;
        played += 1;
    }

    Ok(board.phase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::error::Error;
    use crate::game::ActiveSubBoard;
    use crate::random::CustomNumberGenerator;

    #[test]
    fn playout_reaches_terminal_phase_and_keeps_input() {
        // arrange
        let state = GameState::new();
        let snapshot = state.clone();
        let mut random = CustomNumberGenerator::default();

        // act
        for _ in 0..50 {
            let phase = simulate_playout(&state, Move::new(4, 4), Player::X, &mut random).unwrap();

            // assert
            assert!(phase.is_terminal());
        }
        assert_eq!(state, snapshot);
    }

    #[test]
    fn same_seed_same_result() {
        let state = GameState::new();
        let mut first = CustomNumberGenerator::new(11);
        let mut second = CustomNumberGenerator::new(11);
        for _ in 0..20 {
            assert_eq!(
                simulate_playout(&state, Move::new(0, 0), Player::X, &mut first),
                simulate_playout(&state, Move::new(0, 0), Player::X, &mut second)
            );
        }
    }

    #[test]
    fn shared_buffer_matches_fresh_allocation() {
        // arrange
        let state = GameState::new();
        let mut fresh = CustomNumberGenerator::new(5);
        let mut shared = CustomNumberGenerator::new(5);
        let mut moves = Vec::new();

        for _ in 0..20 {
            // act
            let expected = simulate_playout(&state, Move::new(2, 6), Player::X, &mut fresh);
            let actual = simulate_playout_with_buffer(
                &state,
                Move::new(2, 6),
                Player::X,
                &mut shared,
                &mut moves,
            );

            // assert
            assert_eq!(actual, expected);
        }
        assert!(moves.capacity() > 0);
    }

    #[test]
    fn winning_first_move_ends_playout() {
        // arrange
        const X: Cell = Some(Player::X);
        const O: Cell = Some(Player::O);
        let won = [X, X, X, O, O, None, None, None, None];
        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        cells[0] = won;
        cells[4] = won;
        cells[8] = [X, X, None, O, O, None, None, None, None];
        let state = GameState::from_parts(cells, ActiveSubBoard::Fixed(8), Player::X).unwrap();
        let mut random = CustomNumberGenerator::default();

        // act
        let phase = simulate_playout(&state, Move::new(8, 2), Player::X, &mut random).unwrap();

        // assert
        assert_eq!(phase, Phase::Won(Player::X));
    }

    #[test]
    fn illegal_first_move_is_reported() {
        let mut state = GameState::new();
        state.play(Move::new(1, 1), Player::X).unwrap();
        let mut random = CustomNumberGenerator::default();

        let result = simulate_playout(&state, Move::new(0, 0), Player::O, &mut random);

        assert!(matches!(result, Err(Error::IllegalMove { .. })));
    }
}
