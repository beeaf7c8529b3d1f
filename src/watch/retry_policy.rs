//! Bounded retry with doubling backoff for snapshot reads.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::board_state::board_state::BoardState;
use crate::control::shared_control::SharedControl;
use crate::watch::snapshot_source::{BoardSource, SnapshotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(300),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt number `attempt` (1-based), before jitter.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << shift)
            .min(self.max_backoff)
    }

    /// Backoff plus up to 10% random jitter.
    fn jittered_backoff(&self, attempt: u32) -> Duration {
        let base = self.backoff_for(attempt);
        let spread = base.as_millis() as u64 / 10;
        if spread == 0 {
            return base;
        }
        base + Duration::from_millis(rand::rng().random_range(0..=spread))
    }
}

/// Read a snapshot, retrying transient failures within the policy.
///
/// Stops early on a fatal error or when shutdown is requested.
pub fn acquire_snapshot<S: BoardSource + ?Sized>(
    source: &mut S,
    policy: &RetryPolicy,
    control: &SharedControl,
) -> Result<BoardState, SnapshotError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match source.snapshot() {
            Ok(board) => return Ok(board),
            Err(err) if !err.is_transient() || attempt >= attempts => return Err(err),
            Err(err) => {
                debug!(attempt, "retrying board read: {err}");
                if control.shutdown_requested() {
                    return Err(SnapshotError::Fatal("shutdown requested".to_owned()));
                }
                std::thread::sleep(policy.jittered_backoff(attempt));
                attempt += 1;
            }
        }
    }
}
