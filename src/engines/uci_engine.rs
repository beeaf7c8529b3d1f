//! UCI engine session over a child process.
//!
//! Drives an external engine (Stockfish or any UCI engine) through its
//! stdin/stdout: handshake on start, `position fen` + `go depth` per query,
//! `quit` on teardown. Engine output is read on a dedicated thread and handed
//! over a channel so a response timeout can be applied when configured.

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::control::shared_control::DEFAULT_DEPTH;
use crate::engines::engine_trait::{AnalysisEngine, EngineAnalysis, EngineLauncher};
use crate::engines::uci_parse::{parse_bestmove, parse_info_line};
use crate::errors::{ScoutError, ScoutResult};

/// How long a quitting engine gets before it is killed.
const QUIT_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub executable: PathBuf,
    /// Command-line arguments passed to the executable.
    pub args: Vec<String>,
    pub initial_depth: u32,
    /// Per-line read timeout; `None` waits as long as the search takes.
    pub response_timeout: Option<Duration>,
    /// `setoption` pairs sent after the handshake.
    pub options: Vec<(String, String)>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("stockfish"),
            args: Vec::new(),
            initial_depth: DEFAULT_DEPTH,
            response_timeout: None,
            options: vec![
                ("Hash".to_owned(), "64".to_owned()),
                ("Threads".to_owned(), "1".to_owned()),
            ],
        }
    }
}

pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<io::Result<String>>,
    reader: Option<JoinHandle<()>>,
    response_timeout: Option<Duration>,
    closed: bool,
}

impl UciEngine {
    pub fn start(config: &EngineConfig) -> ScoutResult<Self> {
        let path = config.executable.display().to_string();
        let mut child = Command::new(&config.executable)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ScoutError::EngineSpawn {
                path: path.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ScoutError::EngineProtocol {
                message: "engine pipes unavailable".to_owned(),
            });
        };

        let (line_tx, line_rx) = channel::<io::Result<String>>();
        let reader = thread::Builder::new()
            .name("uci-reader".to_owned())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let failed = line.is_err();
                    if line_tx.send(line).is_err() || failed {
                        break;
                    }
                }
            });
        let reader = match reader {
            Ok(handle) => handle,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(err.into());
            }
        };

        let mut engine = Self {
            child,
            stdin,
            lines: line_rx,
            reader: Some(reader),
            response_timeout: config.response_timeout,
            closed: false,
        };

        if let Err(err) = engine.handshake(config) {
            let _ = engine.quit();
            return Err(err);
        }

        debug!(path = %path, pid = engine.child.id(), "engine session started");
        Ok(engine)
    }

    fn handshake(&mut self, config: &EngineConfig) -> ScoutResult<()> {
        self.send("uci")?;
        self.wait_for("uciok")?;
        for (name, value) in &config.options {
            self.send(&format!("setoption name {name} value {value}"))?;
        }
        self.send("ucinewgame")?;
        self.sync()
    }

    fn sync(&mut self) -> ScoutResult<()> {
        self.send("isready")?;
        self.wait_for("readyok")
    }

    fn send(&mut self, command: &str) -> ScoutResult<()> {
        trace!(">> {command}");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> ScoutResult<String> {
        let received = match self.response_timeout {
            Some(timeout) => self.lines.recv_timeout(timeout).map_err(|err| match err {
                RecvTimeoutError::Timeout => ScoutError::EngineTimeout(timeout),
                RecvTimeoutError::Disconnected => ScoutError::EngineExited,
            })?,
            None => self.lines.recv().map_err(|_| ScoutError::EngineExited)?,
        };
        let line = received?;
        trace!("<< {line}");
        Ok(line)
    }

    fn wait_for(&mut self, prefix: &str) -> ScoutResult<()> {
        loop {
            if self.read_line()?.trim().starts_with(prefix) {
                return Ok(());
            }
        }
    }

    fn reap(&mut self) -> ScoutResult<()> {
        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            if self.child.try_wait()?.is_some() {
                break;
            }
            if Instant::now() >= deadline {
                warn!(pid = self.child.id(), "engine ignored quit; killing it");
                self.child.kill()?;
                self.child.wait()?;
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        Ok(())
    }
}

impl AnalysisEngine for UciEngine {
    fn analyze(&mut self, fen: &str, depth: u32) -> ScoutResult<EngineAnalysis> {
        if self.closed {
            return Err(ScoutError::EngineNotRunning);
        }

        self.sync()?;
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go depth {depth}"))?;

        let mut analysis = EngineAnalysis::default();
        loop {
            let line = self.read_line()?;
            let trimmed = line.trim();

            if let Some(best_move) = parse_bestmove(trimmed) {
                analysis.best_move = best_move;
                break;
            }

            let Some(info) = parse_info_line(trimmed) else {
                continue;
            };
            if info.multipv.unwrap_or(1) != 1 {
                continue;
            }
            if info.score.is_some() {
                analysis.score = info.score;
            }
            if info.depth.is_some() {
                analysis.depth_reached = info.depth;
            }
            if let Some(first) = info.pv.first() {
                analysis.best_move = Some(first.clone());
            }
        }

        Ok(analysis)
    }

    fn quit(&mut self) -> ScoutResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // The process may already be gone; reaping below covers that.
        let _ = self.send("quit");
        self.reap()
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        if let Err(err) = self.quit() {
            warn!("engine teardown failed: {err}");
        }
    }
}

/// Launches `UciEngine` sessions from a fixed configuration.
#[derive(Debug, Clone)]
pub struct UciEngineLauncher {
    config: EngineConfig,
}

impl UciEngineLauncher {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl EngineLauncher for UciEngineLauncher {
    fn launch(&self) -> ScoutResult<Box<dyn AnalysisEngine>> {
        Ok(Box::new(UciEngine::start(&self.config)?))
    }

    fn describe(&self) -> String {
        self.config.executable.display().to_string()
    }
}
