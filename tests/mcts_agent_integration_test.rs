//! End-to-end games through the public agent API

use mcts_agent::agents::{Agent, MctsAgent, RandomAgent};
use mcts_agent::game::{write_game_log, BoardState, Cell, Mark, TicTacToe};
use mcts_agent::mcts::MctsConfig;
use mcts_agent::MctsError;

fn fast_config(seed: u64) -> MctsConfig {
    MctsConfig {
        time_limit_ms: 40,
        num_workers: Some(2),
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_full_game_against_random_writes_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("game.txt");

    let mut board = TicTacToe::new();
    let mut mcts = MctsAgent::<TicTacToe>::new(Mark::X, fast_config(1)).unwrap();
    let mut random = RandomAgent::<TicTacToe>::new(Mark::O, Some(2));

    while !board.is_terminal() {
        let mv = if board.side_to_move() == Mark::X {
            mcts.select_action(&board).unwrap()
        } else {
            random.select_action(&board).unwrap()
        };
        assert!(board.legal_moves().contains(&mv));
        board.apply_move(&mv).unwrap();
    }

    assert!(mcts.games_simulated() > 0);
    assert!(mcts.rollouts() >= mcts.games_simulated());

    write_game_log(&log_path, board.move_history()).unwrap();
    let written = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(written.lines().count(), board.ply_count());
}

#[test]
fn test_agent_blocks_or_wins_against_obvious_threat() {
    // O to move: X threatens 0-1-2, O wins at 5 with 3-4-5
    let board = TicTacToe::deserialize("XX.OO.X.. O").unwrap();
    let config = MctsConfig {
        time_limit_ms: 300,
        ..fast_config(3)
    };
    let mut agent = MctsAgent::from_board(&board, config).unwrap();

    assert_eq!(agent.select_action(&board).unwrap(), Cell(5));
}

#[test]
fn test_wrong_side_is_rejected() {
    let board = TicTacToe::new();
    let mut agent = MctsAgent::<TicTacToe>::new(Mark::O, fast_config(4)).unwrap();

    let err = agent.select_action(&board).unwrap_err();
    assert!(matches!(err, MctsError::InvalidTurn { .. }));
}

#[test]
fn test_root_children_cover_legal_moves() {
    let mut board = TicTacToe::new();
    board.apply_move(&Cell(4)).unwrap();
    let mut agent = MctsAgent::from_board(&board, fast_config(5)).unwrap();

    agent.select_action(&board).unwrap();

    let tree = agent.tree();
    let root_moves: Vec<Cell> = tree
        .root_node()
        .children()
        .iter()
        .map(|&id| *tree.node(id).mv().unwrap())
        .collect();
    assert_eq!(root_moves, board.legal_moves());

    let child_visits: u64 = tree
        .root_node()
        .children()
        .iter()
        .map(|&id| tree.node(id).visits())
        .sum();
    assert_eq!(child_visits, tree.root_node().visits());
    assert_eq!(agent.current_board_sims(), tree.root_node().visits());
}
