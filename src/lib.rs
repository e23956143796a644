//! # MCTS Agent Library
//!
//! Monte Carlo Tree Search move selection for two-player, perfect-information
//! board games.
//!
//! ## Features
//!
//! - **Game abstraction**: any board implementing [`game::BoardState`] can be searched
//! - **Search engine**: UCB1 selection, expansion, random rollouts and backpropagation
//! - **Parallel rollouts**: a worker pool under a wall-clock budget per decision
//! - **Agents**: [`agents::MctsAgent`] and a [`agents::RandomAgent`] baseline
//!
//! ## Usage
//!
//! ```rust
//! use mcts_agent::{
//!     agents::{Agent, MctsAgent},
//!     game::TicTacToe,
//!     mcts::MctsConfig,
//! };
//!
//! let board = TicTacToe::new();
//! let config = MctsConfig { time_limit_ms: 20, ..Default::default() };
//! let mut agent = MctsAgent::from_board(&board, config)?;
//! let _mv = agent.select_action(&board)?;
//! # Ok::<(), mcts_agent::MctsError>(())
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Move-selecting agents
pub mod agents;

/// Board abstraction, the bundled tic-tac-toe board and game logs
pub mod game;

/// Logger setup for binaries
pub mod logging;

/// Monte Carlo Tree Search engine
pub mod mcts;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use agents::{Agent, MctsAgent, RandomAgent};
pub use game::{BoardError, BoardState};
pub use mcts::MctsConfig;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the MCTS agent library
#[derive(Debug, thiserror::Error)]
pub enum MctsError {
    #[error("Agent plays {expected} but {actual} is to move")]
    InvalidTurn { expected: String, actual: String },

    #[error("Nothing to select: the position has no candidate move")]
    EmptySelection,

    #[error("Worker failure: {0}")]
    WorkerFailure(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MctsError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
