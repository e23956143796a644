//! Parallel rollout coordination
//!
//! One round selects a node per worker slot, hands each worker a
//! [`RolloutTask`] (snapshot string + move path, nothing shared), waits for the
//! reports up to a deadline and merges them one by one. Only the thread
//! calling [`ParallelCoordinator::run_round`] touches the tree.
//!
//! Reports that miss the deadline are dropped and their rollouts are told to
//! stop through a per-round cancel flag. A worker that errors or panics costs
//! the round one result; the failure is logged and counted, and its node is
//! left out of selection for the rest of the decision.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use rand::Rng;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::game::board_state::BoardState;
use crate::mcts::backpropagation::backpropagate;
use crate::mcts::node::{NodeId, SearchTree};
use crate::mcts::rollout::{RolloutReport, RolloutSimulator};
use crate::mcts::selection::select_node;
use crate::{MctsError, Result};

/// Seeds handed to rollout tasks.
#[derive(Debug, Clone)]
enum SeedSource {
    Sequence(u64),
    Entropy,
}

impl SeedSource {
    fn next_seed(&mut self) -> u64 {
        match self {
            SeedSource::Sequence(next) => {
                let seed = *next;
                *next = next.wrapping_add(1);
                seed
            }
            SeedSource::Entropy => rand::rng().random(),
        }
    }
}

/// Outcome of one coordination round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub dispatched: usize,
    /// Nodes that received a backpropagation, in merge order
    pub merged: Vec<NodeId>,
    pub failed: usize,
    pub timed_out: usize,
    /// Reports whose move no longer matched a node
    pub unmatched: usize,
}

/// Fans rollouts out to a dedicated rayon pool.
pub struct ParallelCoordinator {
    pool: ThreadPool,
    workers: usize,
    seeds: SeedSource,
}

impl ParallelCoordinator {
    pub fn new(workers: usize, seed: Option<u64>) -> Result<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rollout-worker-{}", i))
            .build()?;

        log::debug!("Rollout pool started with {} workers", workers);
        Ok(Self {
            pool,
            workers,
            seeds: seed.map_or(SeedSource::Entropy, SeedSource::Sequence),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs one select → rollout → merge round.
    ///
    /// # Arguments
    /// * `tree` - Tree of the current decision, mutated only on this thread
    /// * `simulator` - Builds the rollout task for each selected node
    /// * `exploration_constant` - UCB1 exploration constant
    /// * `wait` - How long to wait for reports before dropping the rest
    ///
    /// # Returns
    /// Counts of dispatched, merged, failed and late rollouts
    ///
    /// # Errors
    /// Selection and task preparation errors abort the round before anything
    /// is dispatched, including [`MctsError::EmptySelection`] once every
    /// candidate has failed. Worker errors never surface here; see
    /// [`RoundReport`].
    pub fn run_round<B: BoardState>(
        &mut self,
        tree: &mut SearchTree<B::Move>,
        simulator: &RolloutSimulator<B>,
        exploration_constant: f64,
        wait: Duration,
    ) -> Result<RoundReport> {
        let mut slots = Vec::with_capacity(self.workers);
        let mut tasks = Vec::with_capacity(self.workers);
        for _ in 0..self.workers {
            let node = select_node(tree, exploration_constant)?;
            tasks.push(simulator.prepare(tree, node, self.seeds.next_seed())?);
            slots.push(node);
        }

        let dispatched = tasks.len();
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<(usize, Result<RolloutReport<B::Move>>)>();

        for (slot, task) in tasks.into_iter().enumerate() {
            let tx = tx.clone();
            let cancel = Arc::clone(&cancel);
            self.pool.spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| task.run(&cancel)))
                    .unwrap_or_else(|payload| Err(MctsError::WorkerFailure(panic_message(payload))));
                // The receiver is gone once the round stopped waiting
                let _ = tx.send((slot, result));
            });
        }
        drop(tx);

        let deadline = Instant::now() + wait;
        let mut received = Vec::with_capacity(dispatched);
        while received.len() < dispatched {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match rx.recv_timeout(remaining) {
                Ok(message) => received.push(message),
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        let mut report = RoundReport {
            dispatched,
            timed_out: dispatched - received.len(),
            ..Default::default()
        };
        if report.timed_out > 0 {
            cancel.store(true, Ordering::Relaxed);
            log::warn!(
                "⏱️ {} of {} rollouts missed the round deadline ({:?}); results dropped",
                report.timed_out,
                dispatched,
                wait
            );
        }

        for (slot, result) in received {
            match result {
                Ok(rollout) => {
                    tree.stats.rollouts += 1;
                    tree.stats.positions_sampled += rollout.positions_sampled;
                    match tree.find_by_move(&rollout.mv) {
                        Some(node) => {
                            backpropagate(tree, node, rollout.outcome);
                            tree.stats.games_simulated += 1;
                            report.merged.push(node);
                        }
                        None => {
                            log::warn!("Rollout for unknown move {} ignored", rollout.mv);
                            report.unmatched += 1;
                        }
                    }
                }
                Err(e) => {
                    let node = slots[slot];
                    log::warn!(
                        "Rollout worker {} failed on {}: {}",
                        slot,
                        tree.node(node)
                            .mv()
                            .map_or_else(|| "root".to_string(), |mv| mv.to_string()),
                        e
                    );
                    tree.mark_failed(node);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("rollout panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("rollout panicked: {}", message)
    } else {
        "rollout panicked".to_string()
    }
}
