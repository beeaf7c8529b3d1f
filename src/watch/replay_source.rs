//! Board source that plays back a recorded script of snapshots.
//!
//! One step per non-blank line:
//!
//! ```text
//! # comment
//! wait                                      no game in progress this cycle
//! tear                                      transient read failure
//! rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/...  FEN placement (extra fields ignored)
//! pieces piece wk square-51; piece bk square-58
//! ```
//!
//! `pieces` lines carry the class lists of rendered piece elements separated
//! by `;`. Once every step is consumed the source requests shutdown and keeps
//! reporting the last board.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::board_state::board_state::BoardState;
use crate::control::shared_control::SharedControl;
use crate::errors::{ScoutError, ScoutResult};
use crate::utils::fen_parser::parse_placement;
use crate::watch::snapshot_source::{BoardSource, SnapshotError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplayStep {
    Wait,
    Tear,
    Snapshot(BoardState),
}

pub struct ReplaySource {
    steps: VecDeque<ReplayStep>,
    last: Option<BoardState>,
    control: Arc<SharedControl>,
}

impl ReplaySource {
    pub fn from_script(script: &str, control: Arc<SharedControl>) -> ScoutResult<Self> {
        let steps = script
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| parse_step(idx + 1, line).transpose())
            .collect::<ScoutResult<VecDeque<_>>>()?;
        info!("replay script loaded with {} steps", steps.len());
        Ok(Self {
            steps,
            last: None,
            control,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, control: Arc<SharedControl>) -> ScoutResult<Self> {
        let path = path.as_ref();
        let script = fs::read_to_string(path).map_err(|source| ScoutError::ReplayRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_script(&script, control)
    }

    /// Steps not yet played.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    fn finish(&mut self) -> Result<BoardState, SnapshotError> {
        if !self.control.shutdown_requested() {
            info!("replay finished");
            self.control.request_shutdown();
        }
        self.last
            .clone()
            .ok_or_else(|| SnapshotError::Fatal("replay script has no snapshots".to_owned()))
    }
}

impl BoardSource for ReplaySource {
    fn game_started(&mut self) -> bool {
        if self.steps.front() == Some(&ReplayStep::Wait) {
            self.steps.pop_front();
            return false;
        }
        true
    }

    fn snapshot(&mut self) -> Result<BoardState, SnapshotError> {
        // Leading waits only matter to `game_started`.
        while self.steps.front() == Some(&ReplayStep::Wait) {
            self.steps.pop_front();
        }
        match self.steps.pop_front() {
            Some(ReplayStep::Snapshot(board)) => {
                self.last = Some(board.clone());
                Ok(board)
            }
            Some(ReplayStep::Tear) => Err(SnapshotError::Transient(
                "board was mid-render".to_owned(),
            )),
            Some(ReplayStep::Wait) | None => self.finish(),
        }
    }

    fn close(&mut self) {
        self.steps.clear();
    }
}

fn parse_step(line_no: usize, line: &str) -> ScoutResult<Option<ReplayStep>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let step = match line {
        "wait" => ReplayStep::Wait,
        "tear" => ReplayStep::Tear,
        _ => match line.strip_prefix("pieces") {
            Some(rest) => ReplayStep::Snapshot(BoardState::from_class_lists(
                rest.split(';').filter(|classes| !classes.trim().is_empty()),
            )),
            None => ReplayStep::Snapshot(parse_placement(line).map_err(|err| {
                ScoutError::ReplayScript {
                    line: line_no,
                    message: err.to_string(),
                }
            })?),
        },
    };
    Ok(Some(step))
}
