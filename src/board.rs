use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight winning lines of a 3x3 board: three rows, three columns and two diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Number of cells in a sub-board, and of sub-boards in the master board.
pub const BOARD_SIZE: usize = 9;

/// The two players of the game. X always moves first.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// A single cell: empty, or holding a player's mark. Once set it never changes.
pub type Cell = Option<Player>;

/// Represents the outcome of a single sub-board.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default, Serialize, Deserialize)]
pub enum SubBoardOutcome {
    /// Nobody has completed a line and there is still an empty cell.
    #[default]
    Undecided,
    /// The given player completed a line.
    Won(Player),
    /// Every cell is filled and no line was completed.
    Drawn,
}

impl SubBoardOutcome {
    /// Returns `true` once the sub-board has been won or drawn.
    pub fn is_decided(self) -> bool {
        self != SubBoardOutcome::Undecided
    }

    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            SubBoardOutcome::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl fmt::Display for SubBoardOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubBoardOutcome::Undecided => write!(f, "undecided"),
            SubBoardOutcome::Won(player) => write!(f, "won by {player}"),
            SubBoardOutcome::Drawn => write!(f, "drawn"),
        }
    }
}

/// Returns the player owning a complete line in `cells`, if any.
///
/// `owner` maps a slot to the player it counts for; slots mapping to `None` never complete
/// a line. The same check serves cells of a sub-board and outcomes of the master board.
pub fn line_winner<T: Copy>(
    cells: &[T; BOARD_SIZE],
    owner: impl Fn(T) -> Option<Player>,
) -> Option<Player> {
    WINNING_LINES.iter().find_map(|&[a, b, c]| {
        let first = owner(cells[a])?;
        (owner(cells[b]) == Some(first) && owner(cells[c]) == Some(first)).then_some(first)
    })
}

/// One of the nine small 3x3 boards. Cells are indexed 0-8 row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SubBoard {
    cells: [Cell; BOARD_SIZE],
}

impl SubBoard {
    /// Creates a sub-board from its nine cells.
    pub fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Returns the content of a cell.
    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Returns all nine cells.
    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Indices of the empty cells, ascending.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
    }

    /// Computes the outcome from the cell contents alone.
    pub fn outcome(&self) -> SubBoardOutcome {
        match line_winner(&self.cells, |cell| cell) {
            Some(player) => SubBoardOutcome::Won(player),
            None if self.is_full() => SubBoardOutcome::Drawn,
            None => SubBoardOutcome::Undecided,
        }
    }

    /// Returns `true` if `player` placing a mark at the empty `index` would complete a line.
    pub fn would_win(&self, index: usize, player: Player) -> bool {
        if self.cells[index].is_some() {
            return false;
        }
        let mut trial = self.cells;
        trial[index] = Some(player);
        line_winner(&trial, |cell| cell) == Some(player)
    }

    /// Counts the empty cells where `player` would immediately win this sub-board.
    pub fn count_winning_moves(&self, player: Player) -> usize {
        self.empty_cells()
            .filter(|&index| self.would_win(index, player))
            .count()
    }

    fn set(&mut self, index: usize, player: Player) {
        self.cells[index] = Some(player);
    }
}

/// The 3x3 arrangement of sub-boards together with the cached outcome of each.
///
/// The outcome cache is kept in sync on every placement, so master-level checks never
/// have to rescan the cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MasterBoard {
    sub_boards: [SubBoard; BOARD_SIZE],
    outcomes: [SubBoardOutcome; BOARD_SIZE],
}

impl MasterBoard {
    /// Builds a master board from raw cells, deriving every sub-board outcome.
    pub fn from_cells(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let sub_boards = cells.map(SubBoard::from_cells);
        let outcomes = sub_boards.map(|sub_board| sub_board.outcome());
        Self {
            sub_boards,
            outcomes,
        }
    }

    pub fn sub_board(&self, index: usize) -> &SubBoard {
        &self.sub_boards[index]
    }

    /// Returns the cached outcome of a sub-board.
    pub fn outcome(&self, index: usize) -> SubBoardOutcome {
        self.outcomes[index]
    }

    pub fn outcomes(&self) -> &[SubBoardOutcome; BOARD_SIZE] {
        &self.outcomes
    }

    pub fn cell(&self, sub_board: usize, cell: usize) -> Cell {
        self.sub_boards[sub_board].cell(cell)
    }

    /// Returns `true` when the outcome cache agrees with the cell contents.
    pub fn is_consistent(&self) -> bool {
        self.sub_boards
            .iter()
            .zip(self.outcomes.iter())
            .all(|(sub_board, &outcome)| sub_board.outcome() == outcome)
    }

    /// Writes a mark and refreshes the outcome of the affected sub-board.
    ///
    /// The caller guarantees the cell is empty and the sub-board undecided.
    pub(crate) fn place(
        &mut self,
        sub_board: usize,
        cell: usize,
        player: Player,
    ) -> SubBoardOutcome {
        self.sub_boards[sub_board].set(cell, player);
        let outcome = self.sub_boards[sub_board].outcome();
        self.outcomes[sub_board] = outcome;
        outcome
    }

    /// Player owning a complete line of won sub-boards, if any. Drawn sub-boards count for
    /// nobody.
    pub fn winner(&self) -> Option<Player> {
        line_winner(&self.outcomes, SubBoardOutcome::winner)
    }

    /// Returns `true` if every sub-board has been decided.
    pub fn all_decided(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.is_decided())
    }

    /// Returns `true` if `player` winning `sub_board` would also complete a master line.
    pub fn would_win_master(&self, sub_board: usize, player: Player) -> bool {
        let mut trial = self.outcomes;
        trial[sub_board] = SubBoardOutcome::Won(player);
        line_winner(&trial, SubBoardOutcome::winner) == Some(player)
    }
}
