//! Polling loop: waits for a game, diffs successive snapshots, and asks the
//! analyzer about every changed position.
//!
//! Each cycle, in order:
//!
//! 1. pause gate set: skip the cycle entirely (`Paused`);
//! 2. no game in progress: `WaitingForGame`;
//! 3. otherwise `Polling`: read a snapshot (bounded retry), compare it with
//!    the stored previous one, and on change run detection then analysis.
//!
//! A failed read leaves `previous` untouched. Only a shutdown request ends
//! the loop, after which the engine session and the board source are closed.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::analysis::position_analyzer::{PositionAnalyzer, Recommendation};
use crate::board_state::board_state::BoardState;
use crate::control::shared_control::SharedControl;
use crate::detection::move_detector::{DetectionReport, MoveDetector};
use crate::watch::retry_policy::acquire_snapshot;
use crate::watch::snapshot_source::BoardSource;
use crate::watch::watch_config::WatchConfig;

/// Longest uninterrupted sleep, so shutdown is noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    WaitingForGame,
    Polling,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Paused,
    WaitingForGame,
    /// First snapshot of the session; stored without detection.
    Baseline,
    Unchanged,
    ReadFailed,
    Moved {
        report: DetectionReport,
        recommendation: Option<Recommendation>,
    },
}

pub struct WatchLoop<S: BoardSource> {
    source: S,
    detector: MoveDetector,
    analyzer: PositionAnalyzer,
    control: Arc<SharedControl>,
    config: WatchConfig,
    previous: Option<BoardState>,
    state: WatchState,
    wait_announced: bool,
}

impl<S: BoardSource> WatchLoop<S> {
    pub fn new(
        source: S,
        analyzer: PositionAnalyzer,
        control: Arc<SharedControl>,
        config: WatchConfig,
    ) -> Self {
        Self {
            source,
            detector: MoveDetector::new(config.turn_inference),
            analyzer,
            control,
            config,
            previous: None,
            state: WatchState::WaitingForGame,
            wait_announced: false,
        }
    }

    #[inline]
    pub fn state(&self) -> WatchState {
        self.state
    }

    #[inline]
    pub fn previous(&self) -> Option<&BoardState> {
        self.previous.as_ref()
    }

    pub fn analyzer(&self) -> &PositionAnalyzer {
        &self.analyzer
    }

    /// Run one cycle without the inter-cycle delay.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if self.control.is_paused() {
            self.state = WatchState::Paused;
            return CycleOutcome::Paused;
        }

        if !self.source.game_started() {
            if !self.wait_announced {
                info!("Waiting for a game to start...");
                self.wait_announced = true;
            }
            self.state = WatchState::WaitingForGame;
            return CycleOutcome::WaitingForGame;
        }
        self.state = WatchState::Polling;
        self.wait_announced = false;

        let current =
            match acquire_snapshot(&mut self.source, &self.config.snapshot_retry, &self.control) {
                Ok(board) => board,
                Err(err) => {
                    warn!("Board read failed, retrying next cycle: {err}");
                    return CycleOutcome::ReadFailed;
                }
            };

        let Some(previous) = self.previous.as_ref() else {
            info!(pieces = current.len(), "board found, watching for moves");
            self.previous = Some(current);
            return CycleOutcome::Baseline;
        };

        if *previous == current {
            return CycleOutcome::Unchanged;
        }

        let report = self.detector.detect(previous, &current);
        let recommendation = self.analyzer.analyze(&current, report.side_to_move);
        self.previous = Some(current);

        CycleOutcome::Moved {
            report,
            recommendation,
        }
    }

    /// Cycle until shutdown is requested, then release every session.
    pub fn run(mut self) {
        info!("Watching for moves...");
        while !self.control.shutdown_requested() {
            self.run_cycle();
            self.pause_between_cycles();
        }
        self.shutdown();
    }

    fn pause_between_cycles(&self) {
        let deadline = Instant::now() + self.config.poll_interval;
        loop {
            let now = Instant::now();
            if now >= deadline || self.control.shutdown_requested() {
                return;
            }
            thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }

    fn shutdown(&mut self) {
        self.analyzer.shutdown();
        self.source.close();
        info!("Exiting. Thanks for playing!");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::{CycleOutcome, WatchLoop, WatchState};
    use crate::analysis::evaluation::Evaluation;
    use crate::analysis::position_analyzer::tests::{answer, fake_analyzer, FakeEngineLog};
    use crate::board_state::board_state::BoardState;
    use crate::board_state::chess_types::Color;
    use crate::control::shared_control::SharedControl;
    use crate::detection::move_detector::Detection;
    use crate::utils::fen_parser::parse_placement;
    use crate::watch::retry_policy::RetryPolicy;
    use crate::watch::snapshot_source::{BoardSource, SnapshotError};
    use crate::watch::watch_config::WatchConfig;

    enum Step {
        NoGame,
        Read(Result<BoardState, SnapshotError>),
    }

    struct ScriptedSource {
        steps: VecDeque<Step>,
        reads: Arc<std::sync::atomic::AtomicUsize>,
        closed: Arc<AtomicBool>,
    }

    impl BoardSource for ScriptedSource {
        fn game_started(&mut self) -> bool {
            if matches!(self.steps.front(), Some(Step::NoGame)) {
                self.steps.pop_front();
                return false;
            }
            true
        }

        fn snapshot(&mut self) -> Result<BoardState, SnapshotError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match self.steps.pop_front() {
                Some(Step::Read(result)) => result,
                _ => Err(SnapshotError::Fatal("script exhausted".to_owned())),
            }
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn placement(fen: &str) -> BoardState {
        parse_placement(fen).expect("placement should parse")
    }

    fn quick_config() -> WatchConfig {
        WatchConfig {
            poll_interval: Duration::ZERO,
            snapshot_retry: RetryPolicy {
                max_attempts: 1,
                initial_backoff: Duration::ZERO,
                max_backoff: Duration::ZERO,
            },
            ..WatchConfig::default()
        }
    }

    struct Harness {
        watcher: WatchLoop<ScriptedSource>,
        control: Arc<SharedControl>,
        log: Arc<FakeEngineLog>,
        reads: Arc<std::sync::atomic::AtomicUsize>,
        closed: Arc<AtomicBool>,
    }

    fn harness(steps: Vec<Step>) -> Harness {
        let control = Arc::new(SharedControl::default());
        let log = Arc::new(FakeEngineLog::default());
        let reads = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let closed = Arc::new(AtomicBool::new(false));
        let source = ScriptedSource {
            steps: steps.into(),
            reads: Arc::clone(&reads),
            closed: Arc::clone(&closed),
        };
        let analyzer = fake_analyzer(&log, &control);
        Harness {
            watcher: WatchLoop::new(source, analyzer, Arc::clone(&control), quick_config()),
            control,
            log,
            reads,
            closed,
        }
    }

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
    const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR";

    #[test]
    fn waits_then_polls_and_analyzes_moves() {
        let mut h = harness(vec![
            Step::NoGame,
            Step::Read(Ok(placement(START))),
            Step::Read(Ok(placement(START))),
            Step::Read(Ok(placement(AFTER_E4))),
        ]);
        h.log
            .script
            .lock()
            .expect("script lock")
            .push_back(answer("c7c5", Evaluation::Centipawns(-30)));

        assert_eq!(h.watcher.state(), WatchState::WaitingForGame);
        assert_eq!(h.watcher.run_cycle(), CycleOutcome::WaitingForGame);
        assert_eq!(h.watcher.run_cycle(), CycleOutcome::Baseline);
        assert_eq!(h.watcher.state(), WatchState::Polling);
        assert_eq!(h.watcher.run_cycle(), CycleOutcome::Unchanged);

        let CycleOutcome::Moved {
            report,
            recommendation,
        } = h.watcher.run_cycle()
        else {
            panic!("expected a detected move");
        };
        let Detection::SimpleMove(event) = &report.detection else {
            panic!("expected a simple move");
        };
        assert_eq!(event.notation, "e4");
        assert_eq!(report.side_to_move, Color::Dark);
        let recommendation = recommendation.expect("engine answered");
        assert_eq!(recommendation.description, "c5");
        assert_eq!(h.watcher.previous(), Some(&placement(AFTER_E4)));

        // Only the changed position reached the engine.
        assert_eq!(h.log.queries.lock().expect("queries lock").len(), 1);
    }

    #[test]
    fn paused_cycles_skip_reading() {
        let mut h = harness(vec![Step::Read(Ok(placement(START)))]);

        let guard = h.control.pause();
        assert_eq!(h.watcher.run_cycle(), CycleOutcome::Paused);
        assert_eq!(h.watcher.state(), WatchState::Paused);
        assert_eq!(h.reads.load(Ordering::SeqCst), 0);
        drop(guard);

        assert_eq!(h.watcher.run_cycle(), CycleOutcome::Baseline);
        assert_eq!(h.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_read_keeps_previous() {
        let mut h = harness(vec![
            Step::Read(Ok(placement(START))),
            Step::Read(Err(SnapshotError::Transient("stale element".to_owned()))),
            Step::Read(Ok(placement(AFTER_E4))),
        ]);

        assert_eq!(h.watcher.run_cycle(), CycleOutcome::Baseline);
        assert_eq!(h.watcher.run_cycle(), CycleOutcome::ReadFailed);
        assert_eq!(h.watcher.previous(), Some(&placement(START)));
        assert!(matches!(h.watcher.run_cycle(), CycleOutcome::Moved { .. }));
    }

    #[test]
    fn engine_failure_does_not_stop_the_loop() {
        let mut h = harness(vec![
            Step::Read(Ok(placement(START))),
            Step::Read(Ok(placement(AFTER_E4))),
            Step::Read(Ok(placement(START))),
        ]);
        h.log
            .script
            .lock()
            .expect("script lock")
            .push_back(Err(crate::errors::ScoutError::EngineExited));

        h.watcher.run_cycle();
        let CycleOutcome::Moved { recommendation, .. } = h.watcher.run_cycle() else {
            panic!("expected a detected move");
        };
        assert!(recommendation.is_none());
        assert_eq!(h.watcher.analyzer().restarts(), 1);

        // The next change is still detected and analyzed.
        assert!(matches!(h.watcher.run_cycle(), CycleOutcome::Moved { .. }));
        assert_eq!(h.log.queries.lock().expect("queries lock").len(), 2);
    }

    #[test]
    fn castling_is_analyzed_with_the_guessed_side() {
        let mut h = harness(vec![
            Step::Read(Ok(placement("4k3/8/8/8/8/8/8/4K2R"))),
            Step::Read(Ok(placement("4k3/8/8/8/8/8/8/5RK1"))),
        ]);

        assert_eq!(h.watcher.run_cycle(), CycleOutcome::Baseline);
        let CycleOutcome::Moved { report, .. } = h.watcher.run_cycle() else {
            panic!("expected a detected change");
        };

        // The e1 king is sampled as the last mover, so Black is to move.
        assert!(report.detection.is_ambiguous());
        assert_eq!(report.side_to_move, Color::Dark);
        assert_eq!(
            *h.log.queries.lock().expect("queries lock"),
            [("4k3/8/8/8/8/8/8/5RK1 b - - 0 1".to_owned(), 5)]
        );
    }

    #[test]
    fn in_place_capture_is_analyzed_for_the_other_side() {
        let mut h = harness(vec![
            Step::Read(Ok(placement(
                "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR",
            ))),
            Step::Read(Ok(placement(
                "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR",
            ))),
        ]);

        assert_eq!(h.watcher.run_cycle(), CycleOutcome::Baseline);
        let CycleOutcome::Moved { report, .. } = h.watcher.run_cycle() else {
            panic!("expected a detected change");
        };

        let Detection::InPlaceCaptures(events) = &report.detection else {
            panic!("expected an in-place capture, got {:?}", report.detection);
        };
        assert_eq!(events[0].notation, "exd5");
        assert_eq!(report.side_to_move, Color::Dark);
        assert_eq!(
            *h.log.queries.lock().expect("queries lock"),
            [(
                "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b - - 0 1".to_owned(),
                5
            )]
        );
    }

    #[test]
    fn run_stops_on_shutdown_and_releases_sessions() {
        let h = harness(vec![Step::Read(Ok(placement(START)))]);
        h.control.request_shutdown();
        h.watcher.run();

        assert!(h.closed.load(Ordering::SeqCst));
        assert_eq!(h.log.live.load(Ordering::SeqCst), 0);
    }
}
