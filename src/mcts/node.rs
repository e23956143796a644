//! Search tree storage
//!
//! Nodes live in an arena owned by [`SearchTree`] and refer to each other by
//! [`NodeId`]. Children are owned through the parent's id list; the parent
//! link is a plain index, so the tree has no reference cycles and is dropped
//! in one go when a decision finishes.
//!
//! Arena order is creation order. Node 0 is the root.

use std::collections::HashSet;

/// Index of a node inside its [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One position in the search tree, reached from the root by `mv`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<M> {
    mv: Option<M>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visits: u64,
    value: f64,
    expanded: bool,
    /// Last UCB1 score computed by selection (diagnostics only)
    pub last_score: f64,
}

impl<M> Node<M> {
    fn new(mv: Option<M>, parent: Option<NodeId>) -> Self {
        Self {
            mv,
            parent,
            children: Vec::new(),
            visits: 0,
            value: 0.0,
            expanded: false,
            last_score: f64::INFINITY,
        }
    }

    /// The move leading here; `None` only for the root.
    pub fn mv(&self) -> Option<&M> {
        self.mv.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Accumulated outcome, from the agent's point of view.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn record(&mut self, outcome: f64) {
        self.visits += 1;
        self.value += outcome;
    }

    pub(crate) fn mark_expanded(&mut self) {
        self.expanded = true;
    }

    #[cfg(test)]
    pub(crate) fn set_stats(&mut self, visits: u64, value: f64) {
        self.visits = visits;
        self.value = value;
    }
}

/// Per-decision instrumentation; not read by the search itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Rollout results merged into the tree
    pub games_simulated: u64,
    /// Rollouts completed by workers, merged or not
    pub rollouts: u64,
    /// Random-move draws made during rollouts
    pub positions_sampled: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.games_simulated += other.games_simulated;
        self.rollouts += other.rollouts;
        self.positions_sampled += other.positions_sampled;
    }
}

/// Arena of nodes built for one decision.
#[derive(Debug, Clone)]
pub struct SearchTree<M> {
    nodes: Vec<Node<M>>,
    /// Nodes whose rollout task failed during this decision
    failed: HashSet<NodeId>,
    pub stats: SearchStats,
}

impl<M: Clone + PartialEq> SearchTree<M> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None, None)],
            failed: HashSet::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root_node(&self) -> &Node<M> {
        &self.nodes[0]
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<M> {
        &mut self.nodes[id.0]
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every node except the root, in creation order.
    pub fn nodes_below_root(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..self.nodes.len()).map(NodeId)
    }

    /// Takes `id` out of selection for the rest of the decision. Its
    /// statistics are kept.
    pub(crate) fn mark_failed(&mut self, id: NodeId) {
        self.failed.insert(id);
    }

    pub fn is_failed(&self, id: NodeId) -> bool {
        self.failed.contains(&id)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, mv: M) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(mv), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Finds the node reached by `mv` anywhere below the root.
    pub fn find_by_move(&self, mv: &M) -> Option<NodeId> {
        self.nodes_below_root()
            .find(|&id| self.nodes[id.0].mv.as_ref() == Some(mv))
    }

    pub fn child_by_move(&self, parent: NodeId, mv: &M) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&id| self.nodes[id.0].mv.as_ref() == Some(mv))
    }

    /// Moves from the root down to `id`, in play order.
    pub fn path_to(&self, id: NodeId) -> Vec<M> {
        let mut moves = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            if let Some(mv) = &self.nodes[current.0].mv {
                moves.push(mv.clone());
            }
            current = parent;
        }
        moves.reverse();
        moves
    }

    /// Number of edges between the root and `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            depth += 1;
            current = parent;
        }
        depth
    }
}

impl<M: Clone + PartialEq> Default for SearchTree<M> {
    fn default() -> Self {
        Self::new()
    }
}
