//! Engine abstraction layer used by the position analyzer.
//!
//! Defines the analysis payload and the session/launcher traits so the
//! analyzer can restart sessions without knowing how they are created.

use crate::analysis::evaluation::Evaluation;
use crate::errors::ScoutResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineAnalysis {
    /// First move of the principal variation, long algebraic.
    pub best_move: Option<String>,
    pub score: Option<Evaluation>,
    pub depth_reached: Option<u32>,
}

/// A live analysis session.
pub trait AnalysisEngine: Send {
    /// Search `fen` to `depth` plies and report the best move and score.
    fn analyze(&mut self, fen: &str, depth: u32) -> ScoutResult<EngineAnalysis>;

    /// Release the session and any process behind it.
    fn quit(&mut self) -> ScoutResult<()>;
}

/// Starts analysis sessions; called once at startup and again after failures.
pub trait EngineLauncher: Send {
    fn launch(&self) -> ScoutResult<Box<dyn AnalysisEngine>>;

    fn describe(&self) -> String {
        "engine".to_owned()
    }
}

impl<F> EngineLauncher for F
where
    F: Fn() -> ScoutResult<Box<dyn AnalysisEngine>> + Send,
{
    fn launch(&self) -> ScoutResult<Box<dyn AnalysisEngine>> {
        self()
    }
}
