use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::agents::{ensure_turn, Agent};
use crate::game::action_space::ActionSpace;
use crate::game::board_state::BoardState;
use crate::{MctsError, Result};

/// Baseline opponent: a uniformly random legal move.
pub struct RandomAgent<B: BoardState> {
    player: B::Player,
    action_space: ActionSpace<B>,
    rng: StdRng,
}

impl<B: BoardState> RandomAgent<B> {
    pub fn new(player: B::Player, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            player,
            action_space: ActionSpace::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Plays the side to move on `board`.
    pub fn from_board(board: &B, seed: Option<u64>) -> Self {
        Self::new(board.side_to_move(), seed)
    }
}

impl<B: BoardState> Agent<B> for RandomAgent<B> {
    fn player(&self) -> B::Player {
        self.player
    }

    fn strategy(&self) -> &'static str {
        "random"
    }

    fn select_action(&mut self, board: &B) -> Result<B::Move> {
        ensure_turn(self.player, board)?;
        self.action_space
            .legal_moves(board)
            .choose(&mut self.rng)
            .cloned()
            .ok_or(MctsError::EmptySelection)
    }
}
