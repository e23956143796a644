//! The board contract consumed by the search.
//!
//! The search never knows the rules of the game it plays. Everything it needs
//! from the rules engine goes through [`BoardState`]: move enumeration, move
//! application, terminal tests and a compact snapshot string that workers use
//! to rebuild a private copy of the position.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Errors reported by a [`BoardState`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board snapshot {snapshot:?}: {reason}")]
    InvalidSnapshot { snapshot: String, reason: String },

    #[error("illegal move {0}")]
    IllegalMove(String),
}

/// A game position that can be snapshotted, replayed and played forward.
///
/// Implementations are values: cloning gives an independent board, and
/// `deserialize(serialize())` must reproduce the position (move history may
/// be dropped by the snapshot, the position itself may not).
pub trait BoardState: Clone + Send + Sync + Sized + 'static {
    type Move: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;
    type Player: Copy + Eq + Debug + Display + Send + Sync + 'static;

    /// Compact snapshot of the position.
    fn serialize(&self) -> String;

    /// Rebuilds a position from [`BoardState::serialize`] output.
    fn deserialize(snapshot: &str) -> Result<Self, BoardError>;

    /// Fully legal moves for the side to move.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Moves that obey piece movement but may still break position-level
    /// rules. Defaults to the legal moves for games without such a split.
    fn pseudo_legal_moves(&self) -> Vec<Self::Move> {
        self.legal_moves()
    }

    fn apply_move(&mut self, mv: &Self::Move) -> Result<(), BoardError>;

    fn is_terminal(&self) -> bool;

    /// True when the side to move has been mated (has lost).
    fn is_checkmate(&self) -> bool;

    fn side_to_move(&self) -> Self::Player;

    /// True when `mv` is a pawn drop that delivers mate, which shogi forbids.
    fn is_illegal_pawn_drop_check(&self, _mv: &Self::Move) -> bool {
        false
    }

    fn ply_count(&self) -> usize;

    fn move_history(&self) -> &[Self::Move];
}
