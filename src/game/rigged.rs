//! Tic-tac-toe whose behaviour inside rollout workers can be sabotaged.
//!
//! The mode travels in the snapshot as a one-letter prefix, so a worker that
//! rebuilds the board from the snapshot inherits it.

use std::time::Duration;

use crate::game::board_state::{BoardError, BoardState};
use crate::game::tictactoe::{Cell, Mark, TicTacToe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Normal,
    /// Every rebuild from a snapshot panics
    Panic,
    /// Every move takes 200ms
    Slow,
    /// Opening in the corner (cell 0) panics
    PoisonOpening,
    /// Answering in the corner (cell 0) on the second ply panics
    PoisonReply,
}

impl Mode {
    fn tag(self) -> char {
        match self {
            Mode::Normal => 'N',
            Mode::Panic => 'P',
            Mode::Slow => 'S',
            Mode::PoisonOpening => 'C',
            Mode::PoisonReply => 'R',
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Rigged {
    inner: TicTacToe,
    mode: Mode,
}

impl Rigged {
    pub(crate) fn new(mode: Mode) -> Self {
        Self {
            inner: TicTacToe::new(),
            mode,
        }
    }
}

impl BoardState for Rigged {
    type Move = Cell;
    type Player = Mark;

    fn serialize(&self) -> String {
        format!("{}{}", self.mode.tag(), self.inner.serialize())
    }

    fn deserialize(snapshot: &str) -> Result<Self, BoardError> {
        let mut chars = snapshot.chars();
        let mode = match chars.next() {
            Some('N') => Mode::Normal,
            Some('S') => Mode::Slow,
            Some('C') => Mode::PoisonOpening,
            Some('R') => Mode::PoisonReply,
            Some('P') => panic!("rigged board exploded"),
            _ => {
                return Err(BoardError::InvalidSnapshot {
                    snapshot: snapshot.to_string(),
                    reason: "missing tag".to_string(),
                })
            }
        };
        Ok(Self {
            inner: TicTacToe::deserialize(chars.as_str())?,
            mode,
        })
    }

    fn legal_moves(&self) -> Vec<Cell> {
        self.inner.legal_moves()
    }

    fn apply_move(&mut self, mv: &Cell) -> Result<(), BoardError> {
        match self.mode {
            Mode::Slow => std::thread::sleep(Duration::from_millis(200)),
            Mode::PoisonOpening if *mv == Cell(0) && self.inner.ply_count() == 0 => {
                panic!("corner opening is poisoned")
            }
            Mode::PoisonReply if *mv == Cell(0) && self.inner.ply_count() == 1 => {
                panic!("corner reply is poisoned")
            }
            _ => {}
        }
        self.inner.apply_move(mv)
    }

    fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    fn is_checkmate(&self) -> bool {
        self.inner.is_checkmate()
    }

    fn side_to_move(&self) -> Mark {
        self.inner.side_to_move()
    }

    fn ply_count(&self) -> usize {
        self.inner.ply_count()
    }

    fn move_history(&self) -> &[Cell] {
        self.inner.move_history()
    }
}
