//! UCB1 selection
//!
//! Every node below the root competes, not only the frontier: a deep,
//! well-visited node is scored against shallow unexplored ones with the same
//! formula. Candidates are scanned in arena (creation) order and the first
//! maximum wins, so shallower and older nodes take ties.

use crate::mcts::node::{NodeId, SearchTree};
use crate::{MctsError, Result};

/// UCB1 with a visit floor of one on both counts:
///
/// `value / max(n,1) + c × sqrt(ln(max(N,1)) / max(n,1))`
///
/// # Arguments
/// * `value` - Accumulated outcome of the node
/// * `visits` - Visits of the node (n)
/// * `tree_visits` - Visits of the root (N)
/// * `exploration_constant` - C, ≈√2 by default
pub fn ucb1_score(value: f64, visits: u64, tree_visits: u64, exploration_constant: f64) -> f64 {
    let visits = visits.max(1) as f64;
    let tree_visits = tree_visits.max(1) as f64;
    value / visits + exploration_constant * (tree_visits.ln() / visits).sqrt()
}

/// Picks the node to roll out next.
///
/// Nodes whose rollout failed earlier in the decision are left out; every
/// other node below the root competes. Scores are cached in `last_score` for
/// diagnostics and are never read back here.
///
/// # Arguments
/// * `tree` - Tree of the current decision
/// * `exploration_constant` - UCB1 exploration constant
///
/// # Returns
/// The candidate with the highest UCB1 score, the first one in creation
/// order on ties
///
/// # Errors
/// [`MctsError::EmptySelection`] when no candidate is left.
pub fn select_node<M: Clone + PartialEq>(
    tree: &mut SearchTree<M>,
    exploration_constant: f64,
) -> Result<NodeId> {
    let tree_visits = tree.root_node().visits();
    let mut best_score = f64::NEG_INFINITY;
    let mut best = None;

    let candidates: Vec<NodeId> = tree
        .nodes_below_root()
        .filter(|&id| !tree.is_failed(id))
        .collect();
    for id in candidates {
        let node = tree.node_mut(id);
        let score = ucb1_score(node.value(), node.visits(), tree_visits, exploration_constant);
        node.last_score = score;

        if best.is_none() || score > best_score {
            best_score = score;
            best = Some(id);
        }
    }

    best.ok_or(MctsError::EmptySelection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tree_with_children(stats: &[(u64, f64)], root_visits: u64) -> SearchTree<usize> {
        let mut tree = SearchTree::new();
        for (i, &(visits, value)) in stats.iter().enumerate() {
            let id = tree.add_child(tree.root(), i);
            tree.node_mut(id).set_stats(visits, value);
        }
        let root = tree.root();
        tree.node_mut(root).set_stats(root_visits, 0.0);
        tree
    }

    #[test]
    fn test_ucb1_floors() {
        // ln(1) = 0, so an untouched tree scores exploitation only
        assert_eq!(ucb1_score(0.0, 0, 0, 1.41), 0.0);
        assert_eq!(ucb1_score(3.0, 0, 0, 1.41), 3.0);

        let expected = 2.0 / 4.0 + 1.41 * ((10f64).ln() / 4.0).sqrt();
        assert!((ucb1_score(2.0, 4, 10, 1.41) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_tree_is_an_error() {
        let mut tree: SearchTree<usize> = SearchTree::new();
        assert_matches!(select_node(&mut tree, 1.41), Err(MctsError::EmptySelection));
    }

    #[test]
    fn test_matches_closed_form_argmax() {
        let stats = [(5, 2.0), (1, -1.0), (3, 3.0), (0, 0.0), (8, 1.0)];
        let mut tree = tree_with_children(&stats, 17);

        let expected = stats
            .iter()
            .enumerate()
            .map(|(i, &(n, w))| (i, ucb1_score(w, n, 17, 1.41)))
            .fold((usize::MAX, f64::NEG_INFINITY), |best, (i, s)| {
                if s > best.1 {
                    (i, s)
                } else {
                    best
                }
            });

        let selected = select_node(&mut tree, 1.41).unwrap();
        assert_eq!(tree.node(selected).mv(), Some(&expected.0));
    }

    #[test]
    fn test_ties_go_to_first_in_creation_order() {
        let mut tree = tree_with_children(&[(0, 0.0), (0, 0.0), (0, 0.0)], 0);
        let selected = select_node(&mut tree, 1.41).unwrap();
        assert_eq!(tree.node(selected).mv(), Some(&0));
    }

    #[test]
    fn test_failed_nodes_are_skipped() {
        let mut tree = tree_with_children(&[(0, 0.0), (0, 0.0), (0, 0.0)], 0);
        let children = tree.root_node().children().to_vec();

        tree.mark_failed(children[0]);
        assert_eq!(select_node(&mut tree, 1.41).unwrap(), children[1]);

        tree.mark_failed(children[1]);
        tree.mark_failed(children[2]);
        assert_matches!(select_node(&mut tree, 1.41), Err(MctsError::EmptySelection));
    }

    #[test]
    fn test_deep_nodes_compete_with_shallow_ones() {
        let mut tree = tree_with_children(&[(10, -5.0), (10, -5.0)], 20);
        let first = tree.root_node().children()[0];
        let deep = tree.add_child(first, 99);
        tree.node_mut(deep).set_stats(2, 2.0);

        let selected = select_node(&mut tree, 1.41).unwrap();
        assert_eq!(selected, deep);
    }

    #[test]
    fn test_scores_cached_without_feedback() {
        let mut tree = tree_with_children(&[(2, 1.0), (1, 1.0)], 3);

        let first = select_node(&mut tree, 1.41).unwrap();
        let cached: Vec<f64> = tree
            .nodes_below_root()
            .map(|id| tree.node(id).last_score)
            .collect();
        let second = select_node(&mut tree, 1.41).unwrap();

        assert_eq!(first, second);
        for (id, score) in tree.nodes_below_root().zip(cached) {
            assert_eq!(tree.node(id).last_score, score);
            assert!(score.is_finite());
        }
    }

    #[test]
    fn test_zero_exploration_is_greedy() {
        let mut tree = tree_with_children(&[(4, 1.0), (4, 3.0), (1, 0.0)], 9);
        let selected = select_node(&mut tree, 0.0).unwrap();
        assert_eq!(tree.node(selected).mv(), Some(&1));
    }
}
