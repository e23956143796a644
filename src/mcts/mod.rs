//! Monte Carlo Tree Search engine
//!
//! Building blocks of one decision, in the order a round uses them:
//! [`selection`] picks nodes by UCB1, [`rollout`] turns them into
//! self-contained tasks, [`parallel`] runs the tasks on a worker pool and
//! [`backpropagation`] folds the outcomes back into the tree. [`expansion`]
//! grows the tree below visited nodes.

pub mod backpropagation;
pub mod config;
pub mod expansion;
pub mod node;
pub mod parallel;
pub mod rollout;
pub mod selection;

pub use backpropagation::backpropagate;
pub use config::{default_worker_count, ExpansionPolicy, MctsConfig};
pub use expansion::expand;
pub use node::{Node, NodeId, SearchStats, SearchTree};
pub use parallel::{ParallelCoordinator, RoundReport};
pub use rollout::{playout, random_move, utility, RolloutReport, RolloutSimulator, RolloutTask};
pub use selection::{select_node, ucb1_score};
