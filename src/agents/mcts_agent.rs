//! Monte Carlo Tree Search agent
//!
//! One call to [`MctsAgent::select_action`] is one decision:
//!
//! 1. check that the agent's side is to move,
//! 2. throw away the previous tree and build a bare root,
//! 3. expand the root so selection always has candidates,
//! 4. run coordinator rounds until the time budget is spent (and the
//!    configured minimum number of rounds is done),
//! 5. play the root child with the most visits.
//!
//! ```
//! use mcts_agent::agents::{Agent, MctsAgent};
//! use mcts_agent::game::{BoardState, TicTacToe};
//! use mcts_agent::mcts::MctsConfig;
//!
//! let board = TicTacToe::new();
//! let config = MctsConfig { time_limit_ms: 50, num_workers: Some(2), ..Default::default() };
//! let mut agent = MctsAgent::from_board(&board, config).unwrap();
//!
//! let mv = agent.select_action(&board).unwrap();
//! assert!(board.legal_moves().contains(&mv));
//! ```

use std::time::Instant;

use crate::agents::{ensure_turn, Agent};
use crate::game::board_state::BoardState;
use crate::mcts::config::MctsConfig;
use crate::mcts::expansion::expand;
use crate::mcts::node::{NodeId, SearchStats, SearchTree};
use crate::mcts::parallel::ParallelCoordinator;
use crate::mcts::rollout::RolloutSimulator;
use crate::{MctsError, Result};

/// Where a decision currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    RootBuilt,
    RootExpanded,
    Searching,
    Finalizing,
    Done,
}

pub struct MctsAgent<B: BoardState> {
    player: B::Player,
    config: MctsConfig,
    coordinator: ParallelCoordinator,
    tree: SearchTree<B::Move>,
    phase: SearchPhase,
    totals: SearchStats,
}

impl<B: BoardState> MctsAgent<B> {
    pub fn new(player: B::Player, config: MctsConfig) -> Result<Self> {
        config.validate()?;
        let coordinator = ParallelCoordinator::new(config.worker_count(), config.seed)?;
        log::info!("🌲 MCTS agent for {} ({})", player, config.to_config_string());

        Ok(Self {
            player,
            config,
            coordinator,
            tree: SearchTree::new(),
            phase: SearchPhase::Idle,
            totals: SearchStats::default(),
        })
    }

    /// Agent playing the side to move on `board`.
    pub fn from_board(board: &B, config: MctsConfig) -> Result<Self> {
        Self::new(board.side_to_move(), config)
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Tree of the latest decision.
    pub fn tree(&self) -> &SearchTree<B::Move> {
        &self.tree
    }

    /// Rollouts merged into the tree of the latest decision.
    pub fn current_board_sims(&self) -> u64 {
        self.tree.root_node().visits()
    }

    /// Rollout results merged over the agent's lifetime.
    pub fn games_simulated(&self) -> u64 {
        self.totals.games_simulated
    }

    /// Rollouts completed over the agent's lifetime.
    pub fn rollouts(&self) -> u64 {
        self.totals.rollouts
    }

    /// Random-move draws over the agent's lifetime.
    pub fn positions_sampled(&self) -> u64 {
        self.totals.positions_sampled
    }

    pub fn stats(&self) -> SearchStats {
        self.totals
    }

    fn enter(&mut self, phase: SearchPhase) {
        log::trace!("MCTS phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn search(&mut self, board: &B) -> Result<B::Move> {
        ensure_turn(self.player, board)?;
        let start = Instant::now();

        self.tree = SearchTree::new();
        self.enter(SearchPhase::RootBuilt);

        let root = self.tree.root();
        expand(&mut self.tree, root, board);
        self.enter(SearchPhase::RootExpanded);

        let simulator = RolloutSimulator::new(board, self.player, self.config.max_rollout_plies)
            .with_expansion(self.config.expansion);
        let time_limit = self.config.time_limit();
        let mut rounds = 0;
        let mut merged = 0;
        let mut failed = 0;

        self.enter(SearchPhase::Searching);
        while start.elapsed() < time_limit || rounds < self.config.min_iterations {
            let remaining = time_limit.saturating_sub(start.elapsed());
            let wait = if remaining.is_zero() {
                self.config.round_timeout()
            } else {
                remaining
            };

            let report = match self.coordinator.run_round(
                &mut self.tree,
                &simulator,
                self.config.exploration_constant,
                wait,
            ) {
                Ok(report) => report,
                Err(MctsError::EmptySelection) if self.tree.failed_count() > 0 => {
                    log::warn!(
                        "Every candidate node failed ({}); stopping the search early",
                        self.tree.failed_count()
                    );
                    break;
                }
                Err(e) => return Err(e),
            };
            rounds += 1;
            merged += report.merged.len();
            failed += report.failed;

            log::debug!("{:?}", self.root_child_visits());
        }

        self.enter(SearchPhase::Finalizing);
        if merged == 0 && failed > 0 {
            return Err(MctsError::WorkerFailure(format!(
                "all {} rollouts failed over {} rounds",
                failed, rounds
            )));
        }

        let best = self.most_visited_child().ok_or(MctsError::EmptySelection)?;
        let mv = self
            .tree
            .node(best)
            .mv()
            .cloned()
            .ok_or(MctsError::EmptySelection)?;

        self.totals.merge(&self.tree.stats);
        log::info!(
            "Games simulated: {} in {} rounds ({:.2?})",
            self.tree.root_node().visits(),
            rounds,
            start.elapsed()
        );
        log::info!(
            "Selected move: {} (visits {}, mean {:+.3})",
            mv,
            self.tree.node(best).visits(),
            self.tree.node(best).mean_value()
        );
        self.enter(SearchPhase::Done);
        Ok(mv)
    }

    /// Root child with the most visits; the first one wins ties.
    fn most_visited_child(&self) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child in self.tree.root_node().children() {
            let better = match best {
                None => true,
                Some(current) => self.tree.node(child).visits() > self.tree.node(current).visits(),
            };
            if better {
                best = Some(child);
            }
        }
        best
    }

    fn root_child_visits(&self) -> Vec<u64> {
        self.tree
            .root_node()
            .children()
            .iter()
            .map(|&child| self.tree.node(child).visits())
            .collect()
    }
}

impl<B: BoardState> Agent<B> for MctsAgent<B> {
    fn player(&self) -> B::Player {
        self.player
    }

    fn strategy(&self) -> &'static str {
        "mcts"
    }

    fn select_action(&mut self, board: &B) -> Result<B::Move> {
        let result = self.search(board);
        if result.is_err() {
            self.enter(SearchPhase::Idle);
        }
        result
    }
}
