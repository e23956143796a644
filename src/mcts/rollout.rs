//! Rollout simulation
//!
//! A rollout is split in two so the tree never leaves the coordinating
//! thread:
//!
//! - [`RolloutSimulator::prepare`] runs on the coordinator. It turns a
//!   selected node into a self-contained [`RolloutTask`] and, for a node that
//!   has been visited before, may expand it in the shared tree first.
//! - [`RolloutTask::run`] runs on a worker. It rebuilds a private board from
//!   the root snapshot, replays the move path and plays random moves until the
//!   game ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::game::board_state::BoardState;
use crate::mcts::config::ExpansionPolicy;
use crate::mcts::expansion::expand;
use crate::mcts::node::{NodeId, SearchTree};
use crate::{MctsError, Result};

/// Score of a finished game for `player`: +1 if the opponent is mated,
/// -1 if `player` is mated, 0 for anything else (draw, repetition, ply cap).
pub fn utility<B: BoardState>(board: &B, player: B::Player) -> f64 {
    if board.is_checkmate() {
        if board.side_to_move() != player {
            1.0
        } else {
            -1.0
        }
    } else {
        0.0
    }
}

/// Draws a uniformly random pseudo-legal move, redrawing past illegal pawn
/// drops.
///
/// Candidates are drawn without replacement, so the loop ends even when every
/// candidate is rejected; in that case any legal move is returned instead.
/// `None` only when the position has no legal move at all.
pub fn random_move<B, R>(board: &B, rng: &mut R) -> Option<B::Move>
where
    B: BoardState,
    R: Rng + ?Sized,
{
    let mut candidates = board.pseudo_legal_moves();
    while !candidates.is_empty() {
        let index = rng.random_range(0..candidates.len());
        let candidate = candidates.swap_remove(index);
        if !board.is_illegal_pawn_drop_check(&candidate) {
            return Some(candidate);
        }
    }

    log::warn!(
        "Every pseudo-legal move rejected as an illegal pawn drop; falling back to a legal move ({})",
        board.serialize()
    );
    board.legal_moves().choose(rng).cloned()
}

/// Plays random moves on `board` until the game ends and scores the result.
///
/// Returns `(outcome, positions_sampled)`. Reaching `max_plies` played moves
/// scores as a draw.
pub fn playout<B, R>(
    board: &mut B,
    player: B::Player,
    max_plies: Option<usize>,
    rng: &mut R,
    cancel: &AtomicBool,
) -> Result<(f64, u64)>
where
    B: BoardState,
    R: Rng + ?Sized,
{
    let mut plies = 0;
    let mut positions_sampled = 0;

    while !board.is_terminal() {
        if cancel.load(Ordering::Relaxed) {
            return Err(MctsError::WorkerFailure("rollout cancelled".to_string()));
        }
        if max_plies.is_some_and(|cap| plies >= cap) {
            return Ok((0.0, positions_sampled));
        }

        positions_sampled += 1;
        let Some(mv) = random_move(board, rng) else {
            log::warn!("No move available in a non-terminal position: {}", board.serialize());
            break;
        };
        board.apply_move(&mv)?;
        plies += 1;
    }

    Ok((utility(board, player), positions_sampled))
}

/// What a worker sends back: the rolled-out node's move and the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutReport<M> {
    pub mv: M,
    pub outcome: f64,
    pub positions_sampled: u64,
}

/// Everything a worker needs for one rollout; no reference to the tree.
#[derive(Debug, Clone)]
pub struct RolloutTask<B: BoardState> {
    pub snapshot: Arc<str>,
    pub path: Vec<B::Move>,
    pub player: B::Player,
    pub max_plies: Option<usize>,
    pub seed: u64,
}

impl<B: BoardState> RolloutTask<B> {
    pub fn target_move(&self) -> Option<&B::Move> {
        self.path.last()
    }

    pub fn run(&self, cancel: &AtomicBool) -> Result<RolloutReport<B::Move>> {
        let mv = self.target_move().cloned().ok_or_else(|| {
            MctsError::WorkerFailure("rollout task has an empty move path".to_string())
        })?;

        let mut board = B::deserialize(&self.snapshot)?;
        for step in &self.path {
            board.apply_move(step)?;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let (outcome, positions_sampled) =
            playout(&mut board, self.player, self.max_plies, &mut rng, cancel)?;

        Ok(RolloutReport {
            mv,
            outcome,
            positions_sampled,
        })
    }
}

/// Builds rollout tasks for the position being searched.
#[derive(Debug, Clone)]
pub struct RolloutSimulator<B: BoardState> {
    root: B,
    snapshot: Arc<str>,
    player: B::Player,
    max_plies: Option<usize>,
    expansion: ExpansionPolicy,
}

impl<B: BoardState> RolloutSimulator<B> {
    pub fn new(root: &B, player: B::Player, max_plies: Option<usize>) -> Self {
        Self {
            snapshot: Arc::from(root.serialize()),
            root: root.clone(),
            player,
            max_plies,
            expansion: ExpansionPolicy::default(),
        }
    }

    pub fn with_expansion(mut self, expansion: ExpansionPolicy) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    pub fn player(&self) -> B::Player {
        self.player
    }

    /// Board standing at `node`.
    pub fn board_at(&self, tree: &SearchTree<B::Move>, node: NodeId) -> Result<B> {
        let mut board = self.root.clone();
        for mv in tree.path_to(node) {
            board.apply_move(&mv)?;
        }
        Ok(board)
    }

    /// Turns `node` into a rollout task.
    ///
    /// Under [`ExpansionPolicy::VisitedNodes`] a node with prior visits is
    /// expanded first, using the board at the node itself (not its parent),
    /// so its children join the next selections. Under
    /// [`ExpansionPolicy::RootOnly`] the tree is left alone. Either way the
    /// rollout starts from `node`.
    ///
    /// # Arguments
    /// * `tree` - Tree of the current decision
    /// * `node` - Selected node; never the root
    /// * `seed` - Seed of the worker's RNG
    ///
    /// # Returns
    /// A task that owns everything the worker needs
    pub fn prepare(
        &self,
        tree: &mut SearchTree<B::Move>,
        node: NodeId,
        seed: u64,
    ) -> Result<RolloutTask<B>> {
        if node == tree.root() {
            return Err(MctsError::EmptySelection);
        }

        if self.expansion == ExpansionPolicy::VisitedNodes
            && tree.node(node).visits() > 0
            && !tree.node(node).is_expanded()
        {
            let board = self.board_at(tree, node)?;
            expand(tree, node, &board);
        }

        Ok(RolloutTask {
            snapshot: Arc::clone(&self.snapshot),
            path: tree.path_to(node),
            player: self.player,
            max_plies: self.max_plies,
            seed,
        })
    }
}
