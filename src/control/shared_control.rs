//! Shared control state between the watch loop and the operator listener.
//!
//! The search depth and the pause gate are plain atomics: the listener writes
//! whole values, the loop and analyzer read them once per cycle. A depth read
//! that is one cycle stale is acceptable.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::errors::{ScoutError, ScoutResult};

pub const DEFAULT_DEPTH: u32 = 5;

#[derive(Debug)]
pub struct SharedControl {
    depth: AtomicU32,
    paused: AtomicBool,
    shutdown: AtomicBool,
}

impl Default for SharedControl {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl SharedControl {
    pub fn new(depth: u32) -> Self {
        Self {
            depth: AtomicU32::new(depth.max(1)),
            paused: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth.load(Ordering::Acquire)
    }

    /// Replace the depth; zero is rejected and leaves the depth unchanged.
    pub fn set_depth(&self, depth: u32) -> ScoutResult<()> {
        if depth == 0 {
            return Err(ScoutError::InvalidDepth {
                input: depth.to_string(),
                reason: "depth must be a positive integer",
            });
        }
        self.depth.store(depth, Ordering::Release);
        Ok(())
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Hold the pause gate until the returned guard is dropped.
    pub fn pause(&self) -> PauseGuard<'_> {
        self.paused.store(true, Ordering::Release);
        PauseGuard { control: self }
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    #[inline]
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

/// Releases the pause gate on every exit path, including unwinding.
#[must_use = "the watch loop resumes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PauseGuard<'a> {
    control: &'a SharedControl,
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        self.control.paused.store(false, Ordering::Release);
    }
}

/// Parse operator depth input: digits only, strictly positive.
pub fn parse_depth(input: &str) -> ScoutResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScoutError::InvalidDepth {
            input: trimmed.to_owned(),
            reason: "not a number",
        });
    }
    match trimmed.parse::<u32>() {
        Ok(0) => Err(ScoutError::InvalidDepth {
            input: trimmed.to_owned(),
            reason: "depth must be a positive integer",
        }),
        Ok(depth) => Ok(depth),
        Err(_) => Err(ScoutError::InvalidDepth {
            input: trimmed.to_owned(),
            reason: "number too large",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_depth, SharedControl, DEFAULT_DEPTH};

    #[test]
    fn pause_guard_releases_on_drop() {
        let control = SharedControl::default();
        assert!(!control.is_paused());
        {
            let _guard = control.pause();
            assert!(control.is_paused());
        }
        assert!(!control.is_paused());
    }

    #[test]
    fn pause_guard_releases_on_panic() {
        let control = SharedControl::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = control.pause();
            panic!("prompt failed");
        }));
        assert!(result.is_err());
        assert!(!control.is_paused());
    }

    #[test]
    fn depth_updates_and_rejects_zero() {
        let control = SharedControl::default();
        assert_eq!(control.depth(), DEFAULT_DEPTH);
        control.set_depth(12).expect("12 is a valid depth");
        assert_eq!(control.depth(), 12);
        assert!(control.set_depth(0).is_err());
        assert_eq!(control.depth(), 12);
    }

    #[test]
    fn parse_depth_accepts_digits_only() {
        assert_eq!(parse_depth(" 7\n").expect("7 should parse"), 7);
        assert!(parse_depth("abc").is_err());
        assert!(parse_depth("-3").is_err());
        assert!(parse_depth("4.5").is_err());
        assert!(parse_depth("0").is_err());
        assert!(parse_depth("").is_err());
        assert!(parse_depth("99999999999").is_err());
    }
}
