use std::time::Duration;

use crate::detection::turn_tracker::TurnInference;
use crate::watch::retry_policy::RetryPolicy;

#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Delay between cycles, whatever state the loop is in.
    pub poll_interval: Duration,
    pub snapshot_retry: RetryPolicy,
    pub turn_inference: TurnInference,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            snapshot_retry: RetryPolicy::default(),
            turn_inference: TurnInference::default(),
        }
    }
}
