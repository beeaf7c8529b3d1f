//! Interfaces to whatever renders the board (a browser page, a replay file).

use crate::board_state::board_state::BoardState;

/// Outcome of a failed snapshot read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The page was mid-render or elements went stale; reading again may work.
    #[error("transient snapshot failure: {0}")]
    Transient(String),
    /// Reading again in this cycle is pointless.
    #[error("snapshot source failed: {0}")]
    Fatal(String),
}

impl SnapshotError {
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, SnapshotError::Transient(_))
    }
}

/// A live board feed consumed by the watch loop.
pub trait BoardSource: Send {
    /// Whether a game is in progress and worth polling.
    fn game_started(&mut self) -> bool;

    /// Read every piece position at this instant.
    fn snapshot(&mut self) -> Result<BoardState, SnapshotError>;

    /// Release the underlying session (browser, file handle, ...).
    fn close(&mut self) {}
}
