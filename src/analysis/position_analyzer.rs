//! Depth-bounded engine queries with session recovery.
//!
//! The analyzer owns the engine session. Any failure during a query drops that
//! query, logs the position, quits the session and launches a fresh one with
//! the same launcher before control returns to the watch loop.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::analysis::evaluation::Evaluation;
use crate::board_state::board_state::BoardState;
use crate::board_state::chess_types::Color;
use crate::control::shared_control::SharedControl;
use crate::engines::engine_trait::{AnalysisEngine, EngineLauncher};
use crate::errors::{ScoutError, ScoutResult};
use crate::utils::fen_generator::generate_fen_with_side;
use crate::utils::long_algebraic::long_algebraic_to_short;

/// The engine's advice for one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub side_to_move: Color,
    pub depth: u32,
    pub fen: String,
    /// Long algebraic, as reported by the engine.
    pub best_move: String,
    /// Short algebraic description against the analyzed board.
    pub description: String,
    pub evaluation: Option<Evaluation>,
    /// Deepest iteration the engine reported, which can stop short of `depth`.
    pub depth_reached: Option<u32>,
}

impl Recommendation {
    pub fn narrate(&self) -> String {
        let mut details = Vec::new();
        if let Some(eval) = self.evaluation {
            details.push(format!("eval: {eval}"));
        }
        if let Some(reached) = self.depth_reached {
            details.push(format!("depth {reached}"));
        }
        if details.is_empty() {
            format!("Engine recommends: {}", self.description)
        } else {
            format!("Engine recommends: {} ({})", self.description, details.join(", "))
        }
    }
}

pub struct PositionAnalyzer {
    launcher: Box<dyn EngineLauncher>,
    engine: Option<Box<dyn AnalysisEngine>>,
    control: Arc<SharedControl>,
    restarts: u32,
}

impl PositionAnalyzer {
    /// Launch the first session; failing here is fatal to startup.
    pub fn start(launcher: Box<dyn EngineLauncher>, control: Arc<SharedControl>) -> ScoutResult<Self> {
        let engine = launcher.launch()?;
        info!("engine session started: {}", launcher.describe());
        Ok(Self {
            launcher,
            engine: Some(engine),
            control,
            restarts: 0,
        })
    }

    /// Number of session restarts performed after failures.
    #[inline]
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    #[inline]
    pub fn has_session(&self) -> bool {
        self.engine.is_some()
    }

    /// Ask the engine about `board` with `side_to_move` to play.
    ///
    /// Returns `None` when the engine failed (the session is restarted) or
    /// had no move to offer.
    pub fn analyze(&mut self, board: &BoardState, side_to_move: Color) -> Option<Recommendation> {
        let depth = self.control.depth();
        let fen = generate_fen_with_side(board, side_to_move);
        info!("{} to move: with depth {depth}", side_to_move.name());

        let outcome = match self.engine.as_mut() {
            Some(engine) => engine.analyze(&fen, depth),
            None => Err(ScoutError::EngineNotRunning),
        };

        let analysis = match outcome {
            Ok(analysis) => analysis,
            Err(err) => {
                error!("engine analysis failed: {err}");
                error!(fen = %fen, "position at failure");
                self.restart();
                return None;
            }
        };

        let Some(best_move) = analysis.best_move else {
            match analysis.score {
                Some(eval) => info!("engine has no move to offer (eval: {eval})"),
                None => info!("engine has no move to offer"),
            }
            return None;
        };

        let description = long_algebraic_to_short(&best_move, board).unwrap_or_else(|err| {
            warn!("could not describe engine move {best_move}: {err}");
            best_move.clone()
        });

        let recommendation = Recommendation {
            side_to_move,
            depth,
            fen,
            best_move,
            description,
            evaluation: analysis.score,
            depth_reached: analysis.depth_reached,
        };
        info!("{}", recommendation.narrate());
        Some(recommendation)
    }

    /// Discard the current session and launch a new one.
    fn restart(&mut self) {
        if let Some(mut old) = self.engine.take() {
            if let Err(err) = old.quit() {
                warn!("failed to quit broken engine session: {err}");
            }
        }

        self.restarts += 1;
        match self.launcher.launch() {
            Ok(engine) => {
                warn!("engine session restarted ({} so far)", self.restarts);
                self.engine = Some(engine);
            }
            Err(err) => {
                error!("engine restart failed, will retry on next query: {err}");
            }
        }
    }

    /// Quit the session; called once when the watch loop ends.
    pub fn shutdown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            if let Err(err) = engine.quit() {
                warn!("engine shutdown failed: {err}");
            }
        }
    }
}

impl Drop for PositionAnalyzer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
