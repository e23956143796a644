use crate::game::board_state::BoardState;
use crate::mcts::node::{NodeId, SearchTree};

/// Materializes the children of `node` from the legal moves of `board`.
///
/// A move already present anywhere in the tree is skipped with a warning, so
/// a move identifies at most one node. A node that is already expanded is
/// left untouched.
///
/// # Arguments
/// * `tree` - Tree of the current decision
/// * `node` - Node to expand
/// * `board` - Position `node` represents
///
/// # Returns
/// Number of children created
pub fn expand<B: BoardState>(tree: &mut SearchTree<B::Move>, node: NodeId, board: &B) -> usize {
    if tree.node(node).is_expanded() {
        return 0;
    }

    let mut created = 0;
    for legal_move in board.legal_moves() {
        if tree.find_by_move(&legal_move).is_some() {
            log::warn!("Already expanded this legal move somehow: {}", legal_move);
            continue;
        }
        tree.add_child(node, legal_move);
        created += 1;
    }
    tree.node_mut(node).mark_expanded();

    log::trace!("Expanded node {:?} with {} children", node, created);
    created
}
