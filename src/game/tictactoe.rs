//! Tic-tac-toe as a [`BoardState`].
//!
//! Small enough that tests can reason about every position, and complete
//! enough to drive the agent end to end. A finished line counts as
//! "checkmate" for the player who is left to move.
//!
//! Snapshot format: nine cells row by row (`X`, `O` or `.`), a space, then the
//! side to move, e.g. `"X...O.... X"`.

use std::fmt;

use crate::game::board_state::{BoardError, BoardState};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    fn from_symbol(symbol: char) -> Option<Mark> {
        match symbol {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Placement on a cell, 0-8 row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(pub u8);

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [Option<Mark>; 9],
    to_move: Mark,
    history: Vec<Cell>,
}

impl TicTacToe {
    /// Empty board, X to move.
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
            to_move: Mark::X,
            history: Vec::new(),
        }
    }

    /// The owner of a completed line, if any.
    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => Some(mark),
            _ => None,
        })
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            let line: String = row
                .iter()
                .map(|cell| cell.map_or('.', Mark::symbol))
                .collect();
            writeln!(f, "{}", line)?;
        }
        write!(f, "{} to move", self.to_move)
    }
}

impl BoardState for TicTacToe {
    type Move = Cell;
    type Player = Mark;

    fn serialize(&self) -> String {
        let mut snapshot: String = self
            .cells
            .iter()
            .map(|cell| cell.map_or('.', Mark::symbol))
            .collect();
        snapshot.push(' ');
        snapshot.push(self.to_move.symbol());
        snapshot
    }

    fn deserialize(snapshot: &str) -> Result<Self, BoardError> {
        let invalid = |reason: &str| BoardError::InvalidSnapshot {
            snapshot: snapshot.to_string(),
            reason: reason.to_string(),
        };

        let (grid, side) = snapshot
            .split_once(' ')
            .ok_or_else(|| invalid("missing side to move"))?;
        if grid.chars().count() != 9 {
            return Err(invalid("expected nine cells"));
        }

        let mut cells = [None; 9];
        for (slot, symbol) in cells.iter_mut().zip(grid.chars()) {
            *slot = match symbol {
                '.' => None,
                other => Some(Mark::from_symbol(other).ok_or_else(|| invalid("unknown cell symbol"))?),
            };
        }

        let mut side_chars = side.chars();
        let to_move = match (side_chars.next(), side_chars.next()) {
            (Some(symbol), None) => {
                Mark::from_symbol(symbol).ok_or_else(|| invalid("unknown side to move"))?
            }
            _ => return Err(invalid("side to move must be a single mark")),
        };

        Ok(Self {
            cells,
            to_move,
            history: Vec::new(),
        })
    }

    fn legal_moves(&self) -> Vec<Cell> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..9u8)
            .filter(|&idx| self.cells[idx as usize].is_none())
            .map(Cell)
            .collect()
    }

    fn apply_move(&mut self, mv: &Cell) -> Result<(), BoardError> {
        let idx = mv.0 as usize;
        if self.is_terminal() || idx >= 9 || self.cells[idx].is_some() {
            return Err(BoardError::IllegalMove(mv.to_string()));
        }
        self.cells[idx] = Some(self.to_move);
        self.to_move = self.to_move.opponent();
        self.history.push(*mv);
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    fn is_checkmate(&self) -> bool {
        self.winner() == Some(self.to_move.opponent())
    }

    fn side_to_move(&self) -> Mark {
        self.to_move
    }

    fn ply_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn move_history(&self) -> &[Cell] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = TicTacToe::new();
        assert_eq!(board.side_to_move(), Mark::X);
        assert_eq!(board.legal_moves().len(), 9);
        assert!(!board.is_terminal());
        assert!(!board.is_checkmate());
        assert_eq!(board.ply_count(), 0);
    }

    #[test]
    fn test_apply_move_switches_side_and_records_history() {
        let mut board = TicTacToe::new();
        board.apply_move(&Cell(4)).unwrap();
        board.apply_move(&Cell(0)).unwrap();

        assert_eq!(board.side_to_move(), Mark::X);
        assert_eq!(board.move_history(), &[Cell(4), Cell(0)]);
        assert_eq!(board.ply_count(), 2);
        assert_eq!(board.serialize(), "O...X.... X");
    }

    #[test]
    fn test_occupied_cell_is_illegal() {
        let mut board = TicTacToe::new();
        board.apply_move(&Cell(4)).unwrap();
        assert_eq!(
            board.apply_move(&Cell(4)),
            Err(BoardError::IllegalMove("4".to_string()))
        );
        assert!(board.apply_move(&Cell(9)).is_err());
    }

    #[test]
    fn test_completed_line_mates_side_to_move() {
        let mut board = TicTacToe::new();
        for cell in [0, 3, 1, 4, 2] {
            board.apply_move(&Cell(cell)).unwrap();
        }

        assert_eq!(board.winner(), Some(Mark::X));
        assert_eq!(board.side_to_move(), Mark::O);
        assert!(board.is_terminal());
        assert!(board.is_checkmate());
        assert!(board.legal_moves().is_empty());
        assert!(board.apply_move(&Cell(8)).is_err());
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = TicTacToe::deserialize("XOXXOOOXX X").unwrap();
        assert!(board.is_terminal());
        assert!(!board.is_checkmate());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_snapshot_round_trip_keeps_position() {
        let mut board = TicTacToe::new();
        for cell in [4, 0, 8] {
            board.apply_move(&Cell(cell)).unwrap();
        }
        let restored = TicTacToe::deserialize(&board.serialize()).unwrap();

        assert_eq!(restored.serialize(), board.serialize());
        assert_eq!(restored.legal_moves(), board.legal_moves());
        assert_eq!(restored.ply_count(), 3);
        assert!(restored.move_history().is_empty());
    }

    #[test]
    fn test_invalid_snapshots_rejected() {
        for snapshot in ["", "XXX", "XO.X.O.Z. X", "......... Q", "......... XO", "........ X"] {
            assert!(
                matches!(
                    TicTacToe::deserialize(snapshot),
                    Err(BoardError::InvalidSnapshot { .. })
                ),
                "snapshot {:?} should be rejected",
                snapshot
            );
        }
    }
}
