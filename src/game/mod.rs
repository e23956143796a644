pub mod action_space;
pub mod board_state;
pub mod game_log;
#[cfg(test)]
pub(crate) mod rigged;
pub mod tictactoe;

pub use action_space::ActionSpace;
pub use board_state::{BoardError, BoardState};
pub use game_log::write_game_log;
pub use tictactoe::{Cell, Mark, TicTacToe};
