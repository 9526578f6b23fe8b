extern crate uttt_engine;

use uttt_engine::config::Difficulty;
use uttt_engine::evaluator::MoveEvaluator;
use uttt_engine::random::CustomNumberGenerator;
use uttt_engine::{GameState, Phase, Player};

fn main() {
    tracing_subscriber::fmt::init();

    // Easy computer plays X, medium computer plays O, both seeded so the game replays
    let mut x = MoveEvaluator::builder(Difficulty::Easy.config().with_parallel(true))
        .with_random_generator(CustomNumberGenerator::new(1))
        .build()
        .unwrap();
    let mut o = MoveEvaluator::builder(Difficulty::Medium.config().with_parallel(true))
        .with_random_generator(CustomNumberGenerator::new(2))
        .build()
        .unwrap();

    let mut state = GameState::new();
    let mut turn = 0;
    while !state.is_terminal() {
        let player = state.current_player();
        let evaluator = match player {
            Player::X => &mut x,
            Player::O => &mut o,
        };
        let decision = evaluator.decide(&state).unwrap();
        let report = state.play(decision.mv, player).unwrap();
        turn += 1;
        println!(
            "{turn:>2}. {player} plays {} ({:?}), sub-board {}",
            report.mv, decision.reason, report.sub_board_outcome
        );
    }

    println!("\n{state}");
    match state.phase() {
        Phase::Won(winner) => println!("{winner} wins after {turn} moves"),
        Phase::Drawn => println!("Draw after {turn} moves"),
        Phase::InProgress => unreachable!("loop only exits on a terminal phase"),
    }
}
