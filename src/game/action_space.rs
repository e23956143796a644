use crate::game::board_state::BoardState;

/// Legal-move cache for a single position.
///
/// Keyed by the board snapshot: asking about a different position (or the
/// same board after a move) recomputes the moves.
#[derive(Debug, Clone)]
pub struct ActionSpace<B: BoardState> {
    last_state: Option<String>,
    moves: Vec<B::Move>,
}

impl<B: BoardState> ActionSpace<B> {
    pub fn new() -> Self {
        Self {
            last_state: None,
            moves: Vec::new(),
        }
    }

    pub fn legal_moves(&mut self, board: &B) -> &[B::Move] {
        let state = board.serialize();
        if !self.holds(&state) {
            self.moves = board.legal_moves();
            self.last_state = Some(state);
        }
        &self.moves
    }

    pub fn is_terminal(&self, board: &B) -> bool {
        board.is_terminal()
    }

    fn holds(&self, state: &str) -> bool {
        self.last_state.as_deref() == Some(state)
    }
}

impl<B: BoardState> Default for ActionSpace<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tictactoe::{Cell, TicTacToe};

    #[test]
    fn test_moves_cached_for_same_position() {
        let board = TicTacToe::new();
        let mut space: ActionSpace<TicTacToe> = ActionSpace::new();

        assert!(!space.holds(&board.serialize()));
        assert_eq!(space.legal_moves(&board).len(), 9);
        assert!(space.holds(&board.serialize()));
        assert_eq!(space.legal_moves(&board).len(), 9);
    }

    #[test]
    fn test_cache_invalidated_after_move() {
        let mut board = TicTacToe::new();
        let mut space: ActionSpace<TicTacToe> = ActionSpace::new();
        assert_eq!(space.legal_moves(&board).len(), 9);

        board.apply_move(&Cell(4)).unwrap();
        assert!(!space.holds(&board.serialize()));

        let moves = space.legal_moves(&board).to_vec();
        assert_eq!(moves.len(), 8);
        assert!(!moves.contains(&Cell(4)));
    }

    #[test]
    fn test_is_terminal_delegates_to_board() {
        let space: ActionSpace<TicTacToe> = ActionSpace::new();
        assert!(!space.is_terminal(&TicTacToe::new()));

        let won = TicTacToe::deserialize("XXXOO.... O").unwrap();
        assert!(space.is_terminal(&won));
    }
}
