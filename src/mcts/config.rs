//! MCTS search configuration
//!
//! All knobs of a single decision: the wall-clock budget, the UCB1
//! exploration constant, the worker pool size and the rollout limits.
//! Loadable from JSON so experiments can be replayed from a file; any field
//! left out of the file takes its default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{MctsError, Result};

/// Which nodes grow children during the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    /// A node is expanded at its own position once it has been visited.
    #[default]
    VisitedNodes,
    /// Only the root is expanded; the tree stays one level deep and every
    /// rollout starts from a root move.
    RootOnly,
}

const FALLBACK_ROUND_TIMEOUT_MS: u64 = 1_000;

/// Search configuration for [`crate::agents::MctsAgent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Wall-clock budget per decision, in milliseconds.
    /// Default: 10000
    pub time_limit_ms: u64,

    /// UCB1 exploration constant C (≈√2).
    /// Default: 1.41
    pub exploration_constant: f64,

    /// Rollout workers. `None` uses all cores but two (at least one).
    pub num_workers: Option<usize>,

    /// Search rounds to complete even after the time budget is spent.
    /// Default: 0
    pub min_iterations: usize,

    /// Rollouts reaching this many plies stop and score as a draw.
    pub max_rollout_plies: Option<usize>,

    /// Wait bound for a round dispatched after the budget is spent
    /// (only happens while `min_iterations` is unmet). `None` reuses the
    /// time limit, or one second when the time limit is zero.
    pub round_timeout_ms: Option<u64>,

    /// Base seed for rollout RNGs. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Default: visited nodes
    pub expansion: ExpansionPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 10_000,
            exploration_constant: 1.41,
            num_workers: None,
            min_iterations: 0,
            max_rollout_plies: None,
            round_timeout_ms: None,
            seed: None,
            expansion: ExpansionPolicy::VisitedNodes,
        }
    }
}

impl MctsConfig {
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    pub fn round_timeout(&self) -> Duration {
        let fallback = if self.time_limit_ms == 0 {
            FALLBACK_ROUND_TIMEOUT_MS
        } else {
            self.time_limit_ms
        };
        Duration::from_millis(self.round_timeout_ms.unwrap_or(fallback))
    }

    /// Worker count actually used by the coordinator.
    pub fn worker_count(&self) -> usize {
        self.num_workers.unwrap_or_else(default_worker_count)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: MctsConfig = serde_json::from_str(&raw).map_err(|e| {
            MctsError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MctsError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MctsError::Config(format!(
                "exploration_constant must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        if self.time_limit_ms == 0 && self.min_iterations == 0 {
            return Err(MctsError::Config(
                "time_limit_ms and min_iterations cannot both be zero".to_string(),
            ));
        }
        if self.num_workers == Some(0) {
            return Err(MctsError::Config("num_workers must be at least 1".to_string()));
        }
        if self.max_rollout_plies == Some(0) {
            return Err(MctsError::Config(
                "max_rollout_plies must be at least 1".to_string(),
            ));
        }
        if self.round_timeout_ms == Some(0) {
            return Err(MctsError::Config(
                "round_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// One-line summary for logging
    pub fn to_config_string(&self) -> String {
        format!(
            "time[{}ms]_c[{:.2}]_workers[{}]_min_iter[{}]_plies[{}]_expansion[{:?}]",
            self.time_limit_ms,
            self.exploration_constant,
            self.worker_count(),
            self.min_iterations,
            self.max_rollout_plies
                .map_or_else(|| "none".to_string(), |p| p.to_string()),
            self.expansion,
        )
    }
}

/// All available cores but two, never less than one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(2)
        .max(1)
}
