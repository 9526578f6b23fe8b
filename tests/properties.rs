use uttt_engine::board::{BOARD_SIZE, Cell, SubBoardOutcome};
use uttt_engine::config::EvaluatorConfig;
use uttt_engine::evaluator::{DecisionReason, MoveEvaluator};
use uttt_engine::random::{CustomNumberGenerator, RandomGenerator};
use uttt_engine::{
    ActiveSubBoard, Error, GameState, IllegalMoveReason, Move, Phase, Player, simulate_playout,
};

const X: Cell = Some(Player::X);
const O: Cell = Some(Player::O);
const E: Cell = None;

fn all_moves() -> impl Iterator<Item = Move> {
    (0..BOARD_SIZE)
        .flat_map(|sub_board| (0..BOARD_SIZE).map(move |cell| Move::new(sub_board, cell)))
}

/// Plays random games, handing every intermediate state to `check`.
fn random_games(seed: u64, games: usize, mut check: impl FnMut(&GameState, &GameState, Move)) {
    let mut random = CustomNumberGenerator::new(seed);
    for _ in 0..games {
        let mut state = GameState::new();
        while !state.is_terminal() {
            let moves = state.legal_moves();
            let mv = *random.get_random_from_slice(&moves).unwrap();
            let before = state.clone();
            state.play(mv, state.current_player()).unwrap();
            check(&before, &state, mv);
        }
    }
}

#[test]
fn legal_moves_agree_with_legality_predicate() {
    random_games(1, 10, |before, _, _| {
        let listed = before.legal_moves();
        let accepted: Vec<Move> = all_moves().filter(|&mv| before.is_legal(mv)).collect();
        assert_eq!(listed, accepted);
    });
}

#[test]
fn active_sub_board_is_free_iff_target_decided() {
    random_games(2, 20, |_, after, mv| {
        let target_decided = after.board().outcome(mv.cell).is_decided();
        assert_eq!(after.active_sub_board() == ActiveSubBoard::Free, target_decided);
    });
}

#[test]
fn outcomes_stay_cached_and_never_revert() {
    random_games(3, 20, |before, after, _| {
        assert!(after.board().is_consistent());
        for index in 0..BOARD_SIZE {
            let old = before.board().outcome(index);
            if old.is_decided() {
                assert_eq!(after.board().outcome(index), old);
            }
        }
    });
}

#[test]
fn terminal_phase_rejects_every_move() {
    let mut finished = 0;
    random_games(4, 20, |_, after, _| {
        if after.is_terminal() {
            finished += 1;
            assert!(after.legal_moves().is_empty());
            for mv in all_moves() {
                let player = after.current_player();
                assert_eq!(
                    after.apply_move(mv, player),
                    Err(Error::IllegalMove {
                        mv,
                        reason: IllegalMoveReason::GameOver
                    })
                );
            }
        }
    });
    assert_eq!(finished, 20);
}

#[test]
fn player_alternates_until_game_ends() {
    random_games(5, 10, |before, after, _| {
        if after.is_terminal() {
            assert_eq!(after.current_player(), before.current_player());
        } else {
            assert_eq!(after.current_player(), before.current_player().opponent());
        }
    });
}

#[test]
fn rejected_moves_never_mutate() {
    random_games(6, 5, |_, after, _| {
        let snapshot = after.clone();
        for mv in all_moves().filter(|&mv| !after.is_legal(mv)) {
            let mut attempt = after.clone();
            assert!(attempt.play(mv, after.current_player()).is_err());
            assert_eq!(attempt, snapshot);
        }
    });
}

#[test]
fn playout_never_mutates_input() {
    let mut random = CustomNumberGenerator::new(7);
    random_games(7, 3, |_, after, _| {
        if after.is_terminal() {
            return;
        }
        let snapshot = after.clone();
        let first_move = after.legal_moves()[0];
        let phase =
            simulate_playout(after, first_move, after.current_player(), &mut random).unwrap();
        assert!(phase.is_terminal());
        assert_eq!(after, &snapshot);
    });
}

#[test]
fn center_opening_sends_opponent_to_center() {
    let state = GameState::new();
    let next = state.apply_move(Move::new(4, 4), Player::X).unwrap();
    assert_eq!(next.active_sub_board(), ActiveSubBoard::Fixed(4));
}

#[test]
fn top_row_completes_sub_board_and_master_line() {
    // arrange: X already owns sub-boards 0 and 1
    let won = [X, X, X, O, O, E, O, E, E];
    let mut cells = [[E; BOARD_SIZE]; BOARD_SIZE];
    cells[0] = won;
    cells[1] = won;
    cells[2] = [X, X, E, O, O, E, E, E, E];
    let state = GameState::from_parts(cells, ActiveSubBoard::Fixed(2), Player::X).unwrap();

    // act
    let next = state.apply_move(Move::new(2, 2), Player::X).unwrap();

    // assert
    assert_eq!(next.board().outcome(2), SubBoardOutcome::Won(Player::X));
    assert_eq!(next.phase(), Phase::Won(Player::X));
}

#[test]
fn drawn_sub_board_blocks_master_line() {
    // arrange: sub-boards 0 and 1 won by X, 2 about to be drawn
    let won = [X, X, X, O, O, E, E, E, E];
    let mut cells = [[E; BOARD_SIZE]; BOARD_SIZE];
    cells[0] = won;
    cells[1] = won;
    cells[2] = [X, O, X, X, O, O, O, X, E];
    let state = GameState::from_parts(cells, ActiveSubBoard::Fixed(2), Player::X).unwrap();

    // act
    let next = state.apply_move(Move::new(2, 8), Player::X).unwrap();

    // assert
    assert_eq!(next.board().outcome(2), SubBoardOutcome::Drawn);
    assert_eq!(next.phase(), Phase::InProgress);
}

#[test]
fn every_sub_board_decided_without_line_is_a_draw() {
    // arrange: outcomes X X O / O O X / X X _ with the last board one move from a draw
    let won_x = [X, X, X, O, O, E, E, E, E];
    let won_o = [O, O, O, X, X, E, E, E, E];
    let mut cells = [won_x, won_x, won_o, won_o, won_o, won_x, won_x, won_x, [E; BOARD_SIZE]];
    cells[8] = [X, O, X, X, O, O, O, X, E];
    let state = GameState::from_parts(cells, ActiveSubBoard::Fixed(8), Player::O).unwrap();
    assert_eq!(state.phase(), Phase::InProgress);

    // act
    let next = state.apply_move(Move::new(8, 8), Player::O).unwrap();

    // assert
    assert_eq!(next.board().outcome(8), SubBoardOutcome::Drawn);
    assert_eq!(next.phase(), Phase::Drawn);
}

#[test]
fn serialized_state_reproduces_legality() {
    random_games(8, 3, |_, after, _| {
        let json = serde_json::to_string(after).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        let rebuilt =
            GameState::from_parts(after.cells(), after.active_sub_board(), after.current_player())
                .unwrap();

        assert_eq!(&restored, after);
        assert_eq!(&rebuilt, after);
        for mv in all_moves() {
            assert_eq!(restored.is_legal(mv), after.is_legal(mv));
            assert_eq!(rebuilt.is_legal(mv), after.is_legal(mv));
        }
    });
}

#[test]
fn evaluator_takes_game_winning_move_without_randomness() {
    // arrange: O owns sub-boards 0 and 4 and can complete sub-board 8 at cell 8
    let won = [O, O, O, X, X, E, E, E, E];
    let mut cells = [[E; BOARD_SIZE]; BOARD_SIZE];
    cells[0] = won;
    cells[4] = won;
    cells[8] = [X, E, E, E, E, E, O, O, E];
    let state = GameState::from_parts(cells, ActiveSubBoard::Free, Player::O).unwrap();

    for seed in 0..10 {
        // act
        let decision = MoveEvaluator::builder(EvaluatorConfig::new(10, 0.0).unwrap())
            .with_random_generator(CustomNumberGenerator::new(seed))
            .build()
            .unwrap()
            .decide(&state)
            .unwrap();

        // assert
        assert_eq!(decision.mv, Move::new(8, 8));
        assert_eq!(decision.reason, DecisionReason::WinsGame);
    }
}

#[test]
fn evaluator_returns_single_legal_move_for_any_config() {
    let mut cells = [[E; BOARD_SIZE]; BOARD_SIZE];
    cells[3] = [O, X, O, O, X, X, X, E, O];
    let state = GameState::from_parts(cells, ActiveSubBoard::Fixed(3), Player::X).unwrap();

    for config in [
        EvaluatorConfig::new(0, 0.0).unwrap(),
        EvaluatorConfig::new(400, 1.0).unwrap(),
        EvaluatorConfig::new(50, 0.4).unwrap().with_parallel(true),
    ] {
        let mv = MoveEvaluator::builder(config)
            .with_random_generator(CustomNumberGenerator::default())
            .build()
            .unwrap()
            .choose_move(&state)
            .unwrap();
        assert_eq!(mv, Move::new(3, 7));
    }
}
