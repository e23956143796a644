/// MCTS agent vs random baseline
///
/// Plays one game of tic-tac-toe between the MCTS agent and a uniformly
/// random opponent, logging every decision, then writes the move log.
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use mcts_agent::agents::{Agent, MctsAgent, RandomAgent};
use mcts_agent::game::{write_game_log, BoardState, Mark, TicTacToe};
use mcts_agent::logging::setup_logging;
use mcts_agent::mcts::{ExpansionPolicy, MctsConfig};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    X,
    O,
}

impl From<Side> for Mark {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Mark::X,
            Side::O => Mark::O,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mcts-agent",
    version,
    about = "Play the MCTS agent against a random opponent"
)]
struct Args {
    /// JSON search configuration; the flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Time budget per MCTS decision, in milliseconds
    #[arg(short, long)]
    time_limit_ms: Option<u64>,

    /// UCB1 exploration constant
    #[arg(long)]
    exploration: Option<f64>,

    /// Rollout workers (default: all cores but two)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Search rounds to finish even past the time budget
    #[arg(long)]
    min_iterations: Option<usize>,

    /// Cap on rollout length; capped rollouts score as draws
    #[arg(long)]
    max_plies: Option<usize>,

    /// Expand only the root, keeping the tree one level deep
    #[arg(long, default_value_t = false)]
    root_only: bool,

    /// RNG seed for reproducible games
    #[arg(short = 'r', long)]
    seed: Option<u64>,

    /// Side played by the MCTS agent (X moves first)
    #[arg(long, value_enum, default_value = "x")]
    mcts_side: Side,

    /// Where to write the move log
    #[arg(short, long, default_value = "game.txt")]
    output: PathBuf,

    /// Log to rotating files in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn search_config(&self) -> mcts_agent::Result<MctsConfig> {
        let mut config = match &self.config {
            Some(path) => MctsConfig::from_json_file(path)?,
            None => MctsConfig::default(),
        };

        if let Some(time_limit_ms) = self.time_limit_ms {
            config.time_limit_ms = time_limit_ms;
        }
        if let Some(c) = self.exploration {
            config.exploration_constant = c;
        }
        if self.workers.is_some() {
            config.num_workers = self.workers;
        }
        if let Some(min_iterations) = self.min_iterations {
            config.min_iterations = min_iterations;
        }
        if self.max_plies.is_some() {
            config.max_rollout_plies = self.max_plies;
        }
        if self.root_only {
            config.expansion = ExpansionPolicy::RootOnly;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let _logger = setup_logging(args.log_dir.as_deref(), "info")?;

    let config = args.search_config()?;
    let mcts_side = Mark::from(args.mcts_side);

    log::info!("🎮 MCTS ({}) vs random ({})", mcts_side, mcts_side.opponent());
    log::info!("   {}", config.to_config_string());

    let random_seed = config.seed.map(|seed| seed.wrapping_add(1));
    let mut mcts = MctsAgent::<TicTacToe>::new(mcts_side, config)?;
    let mut random = RandomAgent::<TicTacToe>::new(mcts_side.opponent(), random_seed);

    let mut board = TicTacToe::new();
    while !board.is_terminal() {
        let to_move = board.side_to_move();
        let mv = if to_move == mcts_side {
            mcts.select_action(&board)?
        } else {
            random.select_action(&board)?
        };
        board.apply_move(&mv)?;

        let strategy = if to_move == mcts_side {
            mcts.strategy()
        } else {
            random.strategy()
        };
        log::info!("{} ({}) plays {}\n{}", to_move, strategy, mv, board);
        if to_move == mcts_side {
            log::info!(
                "📊 sims this move: {}, games simulated: {}, rollouts: {}, positions sampled: {}",
                mcts.current_board_sims(),
                mcts.games_simulated(),
                mcts.rollouts(),
                mcts.positions_sampled()
            );
        }
    }

    match board.winner() {
        Some(mark) if mark == mcts_side => log::info!("🏆 MCTS ({}) wins", mark),
        Some(mark) => log::info!("🎲 Random ({}) wins", mark),
        None => log::info!("🤝 Draw"),
    }

    write_game_log(&args.output, board.move_history())?;
    log::info!("💾 Move log written to {}", args.output.display());
    Ok(())
}
