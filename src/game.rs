use crate::board::{BOARD_SIZE, Cell, MasterBoard, Player, SubBoardOutcome};
use crate::error::{Error, IllegalMoveReason, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// A move: the sub-board to play in and the cell inside it, both `0..9`.
///
/// The cell index also names the sub-board the opponent is sent to.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Move {
    pub sub_board: usize,
    pub cell: usize,
}

impl Move {
    pub const fn new(sub_board: usize, cell: usize) -> Self {
        Self { sub_board, cell }
    }

    pub fn is_in_range(&self) -> bool {
        self.sub_board < BOARD_SIZE && self.cell < BOARD_SIZE
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.sub_board, self.cell)
    }
}

/// Where the next mover is allowed to play.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default, Serialize, Deserialize)]
pub enum ActiveSubBoard {
    /// Any undecided sub-board may be played.
    #[default]
    Free,
    /// The mover must play in this sub-board.
    Fixed(usize),
}

impl ActiveSubBoard {
    pub fn allows(self, sub_board: usize) -> bool {
        match self {
            ActiveSubBoard::Free => true,
            ActiveSubBoard::Fixed(index) => index == sub_board,
        }
    }
}

/// Represents the phase of the whole game.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default, Serialize, Deserialize)]
pub enum Phase {
    /// The game is still ongoing.
    #[default]
    InProgress,
    /// The given player completed a line of sub-boards.
    Won(Player),
    /// Every sub-board is decided and nobody completed a line.
    Drawn,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        self != Phase::InProgress
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Phase::Won(player) => Some(player),
            _ => None,
        }
    }

    fn of(board: &MasterBoard) -> Phase {
        match board.winner() {
            Some(player) => Phase::Won(player),
            None if board.all_decided() => Phase::Drawn,
            None => Phase::InProgress,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::InProgress => write!(f, "in progress"),
            Phase::Won(player) => write!(f, "won by {player}"),
            Phase::Drawn => write!(f, "drawn"),
        }
    }
}

/// State change produced by a single applied move.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct MoveReport {
    pub mv: Move,
    pub player: Player,
    /// Outcome of the played sub-board after the move.
    pub sub_board_outcome: SubBoardOutcome,
    pub phase: Phase,
    /// Constraint for the next mover.
    pub active_sub_board: ActiveSubBoard,
}

/// The complete state of an Ultimate Tic-Tac-Toe game.
///
/// A state only ever changes through [`GameState::play`] (or its pure counterpart
/// [`GameState::apply_move`]); there is no undo.
///
/// Serialized as raw cells plus the active sub-board and the player on turn. Deserializing
/// goes through [`GameState::from_parts`], so the outcome cache and phase are rebuilt from
/// the cells and an invalid constraint is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GameStateParts", into = "GameStateParts")]
pub struct GameState {
    board: MasterBoard,
    active_sub_board: ActiveSubBoard,
    current_player: Player,
    phase: Phase,
}

/// Stored form of a [`GameState`].
#[derive(Serialize, Deserialize)]
struct GameStateParts {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    active_sub_board: ActiveSubBoard,
    current_player: Player,
}

impl TryFrom<GameStateParts> for GameState {
    type Error = Error;

    fn try_from(parts: GameStateParts) -> Result<Self> {
        GameState::from_parts(parts.cells, parts.active_sub_board, parts.current_player)
    }
}

impl From<GameState> for GameStateParts {
    fn from(state: GameState) -> Self {
        Self {
            cells: state.cells(),
            active_sub_board: state.active_sub_board,
            current_player: state.current_player,
        }
    }
}

impl Default for GameState {
    /// Creates an empty board with X to move anywhere.
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: MasterBoard::default(),
            active_sub_board: ActiveSubBoard::Free,
            current_player: Player::X,
            phase: Phase::InProgress,
        }
    }

    /// Reconstructs a state from raw cells, the active sub-board and the player on turn.
    ///
    /// Sub-board outcomes and the phase are derived from the cells. A constraint pointing
    /// at a decided sub-board is rejected.
    pub fn from_parts(
        cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
        active_sub_board: ActiveSubBoard,
        current_player: Player,
    ) -> Result<Self> {
        let board = MasterBoard::from_cells(cells);
        let phase = Phase::of(&board);
        if let ActiveSubBoard::Fixed(index) = active_sub_board {
            if index >= BOARD_SIZE {
                return Err(Error::InvalidPosition {
                    message: format!("active sub-board {index} is out of range"),
                });
            }
            if !phase.is_terminal() && board.outcome(index).is_decided() {
                return Err(Error::InvalidPosition {
                    message: format!("active sub-board {index} is already decided"),
                });
            }
        }

        Ok(Self {
            board,
            active_sub_board,
            current_player,
            phase,
        })
    }

    pub fn board(&self) -> &MasterBoard {
        &self.board
    }

    pub fn active_sub_board(&self) -> ActiveSubBoard {
        self.active_sub_board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Returns the cells of every sub-board, e.g. for handing the position to a renderer.
    pub fn cells(&self) -> [[Cell; BOARD_SIZE]; BOARD_SIZE] {
        std::array::from_fn(|index| *self.board.sub_board(index).cells())
    }

    /// Returns `true` if the player on turn may play somewhere in `sub_board`. UIs use this
    /// to highlight the boards in play.
    pub fn is_playable_sub_board(&self, sub_board: usize) -> bool {
        sub_board < BOARD_SIZE
            && !self.phase.is_terminal()
            && !self.board.outcome(sub_board).is_decided()
            && self.active_sub_board.allows(sub_board)
    }

    /// Returns `true` if `mv` may be played by the player on turn.
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legality(mv).is_ok()
    }

    /// Checks `mv` for `player`, reporting why it is illegal.
    pub fn check_move(&self, mv: Move, player: Player) -> Result<()> {
        self.legality(mv)
            .and_then(|()| {
                if player == self.current_player {
                    Ok(())
                } else {
                    Err(IllegalMoveReason::WrongPlayer {
                        expected: self.current_player,
                    })
                }
            })
            .map_err(|reason| Error::IllegalMove { mv, reason })
    }

    fn legality(&self, mv: Move) -> std::result::Result<(), IllegalMoveReason> {
        if !mv.is_in_range() {
            return Err(IllegalMoveReason::OutOfRange);
        }
        if self.phase.is_terminal() {
            return Err(IllegalMoveReason::GameOver);
        }
        if self.board.outcome(mv.sub_board).is_decided() {
            return Err(IllegalMoveReason::SubBoardDecided);
        }
        if let ActiveSubBoard::Fixed(expected) = self.active_sub_board {
            if expected != mv.sub_board {
                return Err(IllegalMoveReason::WrongSubBoard { expected });
            }
        }
        if self.board.cell(mv.sub_board, mv.cell).is_some() {
            return Err(IllegalMoveReason::CellOccupied);
        }
        Ok(())
    }

    /// Returns every legal move, ordered by sub-board then cell.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        self.legal_moves_into(&mut moves);
        moves
    }

    /// Fills `moves` with every legal move, reusing its allocation.
    pub fn legal_moves_into(&self, moves: &mut Vec<Move>) {
        moves.clear();
        if self.phase.is_terminal() {
            return;
        }

        let sub_boards = match self.active_sub_board {
            ActiveSubBoard::Fixed(index) => index..index + 1,
            ActiveSubBoard::Free => 0..BOARD_SIZE,
        };
        for sub_board in sub_boards {
            if self.board.outcome(sub_board).is_decided() {
                continue;
            }
            moves.extend(
                self.board
                    .sub_board(sub_board)
                    .empty_cells()
                    .map(|cell| Move::new(sub_board, cell)),
            );
        }
    }

    /// Applies `mv` for `player` in place.
    ///
    /// On error the state is left untouched.
    pub fn play(&mut self, mv: Move, player: Player) -> Result<MoveReport> {
        self.check_move(mv, player)?;

        let sub_board_outcome = self.board.place(mv.sub_board, mv.cell, player);
        if sub_board_outcome.is_decided() {
            self.phase = Phase::of(&self.board);
        }
        self.active_sub_board = if self.board.outcome(mv.cell).is_decided() {
            ActiveSubBoard::Free
        } else {
            ActiveSubBoard::Fixed(mv.cell)
        };
        if !self.phase.is_terminal() {
            self.current_player = player.opponent();
        }

        trace!(
            %mv,
            %player,
            %sub_board_outcome,
            phase = %self.phase,
            "applied move"
        );

        Ok(MoveReport {
            mv,
            player,
            sub_board_outcome,
            phase: self.phase,
            active_sub_board: self.active_sub_board,
        })
    }

    /// Returns the state after `mv` is played by `player`, leaving `self` unchanged.
    pub fn apply_move(&self, mv: Move, player: Player) -> Result<GameState> {
        let mut next = self.clone();
        next.play(mv, player)?;
        Ok(next)
    }
}

impl fmt::Display for GameState {
    /// Renders the 9x9 grid, sub-boards separated by lines, followed by a status line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            let mut line = String::with_capacity(24);
            for column in 0..BOARD_SIZE {
                if column > 0 && column % 3 == 0 {
                    line.push_str("| ");
                }
                let sub_board = (row / 3) * 3 + column / 3;
                let cell = (row % 3) * 3 + column % 3;
                let symbol = match self.board.cell(sub_board, cell) {
                    Some(Player::X) => 'X',
                    Some(Player::O) => 'O',
                    None => '.',
                };
                line.push(symbol);
                line.push(' ');
            }
            writeln!(f, "{}", line.trim_end())?;
        }

        match (self.phase, self.active_sub_board) {
            (Phase::InProgress, ActiveSubBoard::Free) => {
                write!(f, "{} to move, any sub-board", self.current_player)
            }
            (Phase::InProgress, ActiveSubBoard::Fixed(index)) => {
                write!(f, "{} to move in sub-board {index}", self.current_player)
            }
            (phase, _) => write!(f, "game {phase}"),
        }
    }
}

/// Starts a fresh game.
pub fn new_game() -> GameState {
    GameState::new()
}
