//! Errors used throughout the scout.
//!
//! `ScoutError` is the single error type returned by parsing helpers, the
//! engine session and the operator control channel. Snapshot acquisition has
//! its own retry-status type (`SnapshotError`) which converts into it.

use std::time::Duration;

use crate::watch::snapshot_source::SnapshotError;

/// Unified error type for the scout.
///
/// Input-related variants (`InvalidSquare`, `InvalidPieceCode`,
/// `InvalidPlacement`, `InvalidDepth`) are recoverable and suitable for
/// presenting to the operator. Engine variants are recovered by restarting the
/// engine session.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// An algebraic square or `square-XY` token could not be parsed.
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    /// File or rank index outside `0..=7`.
    #[error("Square indices out of range: file {file}, rank {rank}")]
    SquareOutOfRange { file: u8, rank: u8 },

    /// A piece tag was not one of the twelve `w`/`b` x `prnbqk` codes.
    #[error("Invalid piece code: {0}")]
    InvalidPieceCode(String),

    /// A FEN placement field was malformed.
    #[error("Invalid FEN placement: {message}")]
    InvalidPlacement { message: String },

    /// A long algebraic move (engine output) was malformed or did not fit the board.
    #[error("Invalid engine move {mv}: {message}")]
    InvalidEngineMove { mv: String, message: String },

    /// The engine executable could not be launched.
    #[error("Failed to start engine at {path}: {source}")]
    EngineSpawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the engine process or the operator console failed.
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The engine answered with something the session could not use.
    #[error("Engine protocol error: {message}")]
    EngineProtocol { message: String },

    /// The engine did not produce the awaited line in time.
    #[error("Engine did not answer within {0:?}")]
    EngineTimeout(Duration),

    /// The engine closed its output stream.
    #[error("Engine process exited")]
    EngineExited,

    /// Analysis was requested while no engine session exists.
    #[error("No engine session is running")]
    EngineNotRunning,

    /// Operator depth input was rejected; the current depth is unchanged.
    #[error("Invalid depth input {input:?}: {reason}")]
    InvalidDepth { input: String, reason: &'static str },

    /// The replay script could not be read.
    #[error("Failed to read replay script {path}: {source}")]
    ReplayRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The replay script contained an unparseable line.
    #[error("Replay script line {line}: {message}")]
    ReplayScript { line: usize, message: String },

    /// The board snapshot could not be acquired.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result type alias for scout operations.
pub type ScoutResult<T> = Result<T, ScoutError>;
