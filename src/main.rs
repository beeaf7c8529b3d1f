use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use plum_scout::analysis::position_analyzer::PositionAnalyzer;
use plum_scout::control::depth_listener::{
    operator_help, spawn_operator_listener, DEFAULT_DEPTH_TRIGGER,
};
use plum_scout::control::shared_control::{SharedControl, DEFAULT_DEPTH};
use plum_scout::detection::turn_tracker::TurnInference;
use plum_scout::engines::uci_engine::{EngineConfig, UciEngineLauncher};
use plum_scout::errors::ScoutResult;
use plum_scout::watch::replay_source::ReplaySource;
use plum_scout::watch::retry_policy::RetryPolicy;
use plum_scout::watch::watch_config::WatchConfig;
use plum_scout::watch::watch_loop::WatchLoop;

#[derive(Parser, Debug)]
#[command(
    name = "plum-scout",
    about = "Watch a chess board feed, narrate each move and ask a UCI engine for the reply"
)]
struct Args {
    /// Snapshot script to watch (one FEN placement or `pieces` line per poll)
    #[arg(long)]
    replay: PathBuf,

    /// UCI engine executable
    #[arg(long, default_value = "stockfish")]
    engine: PathBuf,

    /// Argument passed to the engine executable (repeatable)
    #[arg(long = "engine-arg")]
    engine_args: Vec<String>,

    /// Initial search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Delay between polls in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_ms: u64,

    /// Side-to-move inference: first-piece or ply-parity
    #[arg(long, default_value_t = TurnInference::FirstPiece)]
    turn_inference: TurnInference,

    /// Snapshot reads per cycle before giving up on it
    #[arg(long, default_value_t = 5)]
    max_snapshot_attempts: u32,

    /// Optional: fail an engine query when no output arrives within this many milliseconds
    #[arg(long)]
    engine_timeout_ms: Option<u64>,

    /// Engine hash table size in MB
    #[arg(long, default_value_t = 64)]
    hash_mb: usize,

    /// Engine search threads
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Operator line that opens the depth prompt
    #[arg(long, default_value = DEFAULT_DEPTH_TRIGGER)]
    depth_trigger: String,
}

fn main() {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(args) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> ScoutResult<()> {
    let engine_config = EngineConfig {
        executable: args.engine,
        args: args.engine_args,
        initial_depth: args.depth,
        response_timeout: args.engine_timeout_ms.map(Duration::from_millis),
        options: vec![
            ("Hash".to_owned(), args.hash_mb.to_string()),
            ("Threads".to_owned(), args.threads.to_string()),
        ],
    };
    let watch_config = WatchConfig {
        poll_interval: Duration::from_millis(args.poll_ms),
        snapshot_retry: RetryPolicy {
            max_attempts: args.max_snapshot_attempts,
            ..RetryPolicy::default()
        },
        turn_inference: args.turn_inference,
    };

    let control = Arc::new(SharedControl::new(engine_config.initial_depth.max(1)));
    let source = ReplaySource::from_path(&args.replay, Arc::clone(&control))?;
    let analyzer = PositionAnalyzer::start(
        Box::new(UciEngineLauncher::new(engine_config)),
        Arc::clone(&control),
    )?;

    // The listener blocks on stdin and is left detached at exit.
    spawn_operator_listener(Arc::clone(&control), args.depth_trigger.clone())?;
    info!("{}", operator_help(&args.depth_trigger));

    WatchLoop::new(source, analyzer, control, watch_config).run();
    Ok(())
}
