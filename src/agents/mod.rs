//! Move-selecting agents
//!
//! Every agent plays one side and answers [`Agent::select_action`] for the
//! positions where that side is to move.

pub mod mcts_agent;
pub mod random_agent;

pub use mcts_agent::{MctsAgent, SearchPhase};
pub use random_agent::RandomAgent;

use crate::game::board_state::BoardState;
use crate::Result;

pub trait Agent<B: BoardState> {
    /// The side this agent plays.
    fn player(&self) -> B::Player;

    /// Short strategy label for logs ("mcts", "random").
    fn strategy(&self) -> &'static str;

    /// Picks a move for `board`.
    ///
    /// # Errors
    /// [`crate::MctsError::InvalidTurn`] when `board` is not waiting on
    /// [`Agent::player`].
    fn select_action(&mut self, board: &B) -> Result<B::Move>;
}

/// Turn check shared by the agents.
pub(crate) fn ensure_turn<B: BoardState>(player: B::Player, board: &B) -> Result<()> {
    let to_move = board.side_to_move();
    if to_move != player {
        return Err(crate::MctsError::InvalidTurn {
            expected: player.to_string(),
            actual: to_move.to_string(),
        });
    }
    Ok(())
}
