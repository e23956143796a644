use crate::mcts::node::{NodeId, SearchTree};

/// Adds one visit and `outcome` to `leaf` and to every ancestor up to the root.
///
/// The outcome is agent-centric and is applied unchanged at every depth; there
/// is no sign flip between plies.
///
/// # Arguments
/// * `tree` - Tree of the current decision
/// * `leaf` - Node the rollout started from
/// * `outcome` - Rollout score for the agent: +1, 0 or -1
///
/// # Returns
/// Number of nodes updated
pub fn backpropagate<M: Clone + PartialEq>(
    tree: &mut SearchTree<M>,
    leaf: NodeId,
    outcome: f64,
) -> usize {
    let mut updated = 0;
    let mut current = Some(leaf);
    while let Some(id) = current {
        let node = tree.node_mut(id);
        node.record(outcome);
        updated += 1;
        current = node.parent();
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(depth: usize) -> (SearchTree<usize>, Vec<NodeId>) {
        let mut tree = SearchTree::new();
        let mut ids = vec![tree.root()];
        for d in 0..depth {
            let parent = *ids.last().unwrap();
            ids.push(tree.add_child(parent, d));
        }
        (tree, ids)
    }

    #[test]
    fn test_updates_every_ancestor_exactly_once() {
        let (mut tree, ids) = chain(4);
        let leaf = *ids.last().unwrap();

        let updated = backpropagate(&mut tree, leaf, -1.0);

        assert_eq!(updated, 5);
        for &id in &ids {
            assert_eq!(tree.node(id).visits(), 1);
            assert_eq!(tree.node(id).value(), -1.0);
        }
    }

    #[test]
    fn test_siblings_untouched() {
        let (mut tree, ids) = chain(2);
        let sibling = tree.add_child(ids[1], 42);

        backpropagate(&mut tree, ids[2], 1.0);

        assert_eq!(tree.node(sibling).visits(), 0);
        assert_eq!(tree.node(sibling).value(), 0.0);
        assert_eq!(tree.node(ids[1]).visits(), 1);
    }

    #[test]
    fn test_outcome_is_not_negated_per_ply() {
        let (mut tree, ids) = chain(3);
        backpropagate(&mut tree, ids[3], 1.0);
        backpropagate(&mut tree, ids[3], 1.0);
        backpropagate(&mut tree, ids[2], -1.0);

        assert_eq!(tree.node(ids[3]).value(), 2.0);
        assert_eq!(tree.node(ids[2]).value(), 1.0);
        assert_eq!(tree.node(ids[0]).visits(), 3);
        assert_eq!(tree.node(ids[0]).value(), 1.0);
    }

    #[test]
    fn test_root_only() {
        let mut tree: SearchTree<usize> = SearchTree::new();
        let root = tree.root();
        assert_eq!(backpropagate(&mut tree, root, 0.0), 1);
        assert_eq!(tree.root_node().visits(), 1);
    }
}
