//! Operator control channel.
//!
//! Reads operator lines on its own thread. The trigger line opens a depth
//! prompt while the watch loop is paused; `q`/`quit` requests shutdown.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::control::shared_control::{parse_depth, SharedControl};
use crate::errors::{ScoutError, ScoutResult};

pub const DEFAULT_DEPTH_TRIGGER: &str = "d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    ChangeDepth,
    Quit,
    Ignored(String),
}

/// One-line usage shown at startup and after unknown input.
pub fn operator_help(depth_trigger: &str) -> String {
    format!(
        "Type '{depth_trigger}' to change depth, 'q' to quit cleanly (Ctrl+C skips engine teardown)"
    )
}

pub fn parse_operator_command(line: &str, depth_trigger: &str) -> OperatorCommand {
    let trimmed = line.trim();
    if trimmed == depth_trigger {
        OperatorCommand::ChangeDepth
    } else if trimmed == "q" || trimmed == "quit" {
        OperatorCommand::Quit
    } else {
        OperatorCommand::Ignored(trimmed.to_owned())
    }
}

/// Prompt for a new depth, holding the pause gate for the whole exchange.
///
/// Invalid input prints a rejection and leaves the depth unchanged.
pub fn prompt_for_depth<R: BufRead, W: Write>(
    control: &SharedControl,
    input: &mut R,
    out: &mut W,
) -> ScoutResult<u32> {
    let _pause = control.pause();

    write!(out, "\nSet new analysis depth: ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ScoutError::InvalidDepth {
            input: String::new(),
            reason: "input closed",
        });
    }

    let depth = match parse_depth(&line).and_then(|depth| {
        control.set_depth(depth)?;
        Ok(depth)
    }) {
        Ok(depth) => depth,
        Err(err) => {
            writeln!(out, "Invalid input. Please enter a number.")?;
            return Err(err);
        }
    };

    writeln!(out, "Analysis depth set to {depth}")?;
    Ok(depth)
}

/// Serve operator commands until `quit` or end of input.
pub fn run_operator_listener<R: BufRead, W: Write>(
    control: &SharedControl,
    depth_trigger: &str,
    mut input: R,
    mut out: W,
) -> ScoutResult<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("operator input closed");
            return Ok(());
        }

        match parse_operator_command(&line, depth_trigger) {
            OperatorCommand::ChangeDepth => {
                if let Err(err) = prompt_for_depth(control, &mut input, &mut out) {
                    warn!("depth unchanged: {err}");
                }
            }
            OperatorCommand::Quit => {
                control.request_shutdown();
                return Ok(());
            }
            OperatorCommand::Ignored(text) if text.is_empty() => {}
            OperatorCommand::Ignored(text) => {
                writeln!(
                    out,
                    "Unknown command '{text}'. {}",
                    operator_help(depth_trigger)
                )?;
            }
        }
    }
}

/// Spawn the listener on stdin/stdout.
pub fn spawn_operator_listener(
    control: Arc<SharedControl>,
    depth_trigger: String,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("operator".to_owned())
        .spawn(move || {
            let stdin = io::stdin();
            let result = run_operator_listener(
                &control,
                &depth_trigger,
                stdin.lock(),
                io::stdout(),
            );
            if let Err(err) = result {
                warn!("operator listener stopped: {err}");
            }
        })
}
