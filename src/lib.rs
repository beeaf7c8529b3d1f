//! Crate root module declarations for the Plum Scout board watcher.
//!
//! This file exposes all top-level subsystems (board snapshots, move
//! detection, engine analysis, operator control, the watch loop, and utility
//! helpers) so the binary, benches, and tests can import stable module paths.

pub mod errors;

pub mod board_state {
    pub mod board_state;
    pub mod chess_types;
    pub mod move_delta;
}

pub mod detection {
    pub mod move_detector;
    pub mod move_notation;
    pub mod turn_tracker;
}

pub mod analysis {
    pub mod evaluation;
    pub mod position_analyzer;
}

pub mod engines {
    pub mod engine_trait;
    pub mod uci_engine;
    pub mod uci_parse;
}

pub mod control {
    pub mod depth_listener;
    pub mod shared_control;
}

pub mod watch {
    pub mod replay_source;
    pub mod retry_policy;
    pub mod snapshot_source;
    pub mod watch_config;
    pub mod watch_loop;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_board;
}
