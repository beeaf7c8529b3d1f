//! Move inference from two successive board snapshots.
//!
//! The detector diffs `previous` against `current` and classifies the change:
//!
//! - exactly one square emptied and one filled: a simple move by the piece now
//!   on the filled square;
//! - otherwise, squares whose occupant changed in place: one capture each;
//! - otherwise: ambiguous (castling, en passant, several pieces at once). The
//!   last mover is then guessed by the `TurnTracker`.
//!
//! Legality is never checked. The side to move for analysis is always the
//! opposite of the (known or guessed) last mover.

use tracing::{debug, info};

use crate::board_state::board_state::BoardState;
use crate::board_state::chess_types::{Color, PieceCode, Square};
use crate::board_state::move_delta::MoveDelta;
use crate::detection::move_notation::{capture_notation, quiet_move_notation};
use crate::detection::turn_tracker::{TurnInference, TurnTracker};
use crate::utils::render_board::render_board;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    Capture { captured: PieceCode },
}

/// One inferred ply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEvent {
    pub kind: MoveKind,
    /// The piece now standing on `to`.
    pub piece: PieceCode,
    pub from: Option<Square>,
    pub to: Square,
    pub notation: String,
}

impl MoveEvent {
    #[inline]
    pub fn mover(&self) -> Color {
        self.piece.color
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture { .. })
    }

    /// Human-readable one-liner for the console.
    pub fn narrate(&self) -> String {
        match self.kind {
            MoveKind::Quiet => format!(
                "{} {} played {}",
                self.piece.glyph(),
                self.mover().name(),
                self.notation
            ),
            MoveKind::Capture { captured } => format!(
                "{} {} captured {} at {} ({})",
                self.piece.glyph(),
                self.mover().name(),
                captured.glyph(),
                self.to,
                self.notation
            ),
        }
    }
}

/// Classification of one board change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    SimpleMove(MoveEvent),
    InPlaceCaptures(Vec<MoveEvent>),
    /// No single clear move; `guessed_last_mover` is a heuristic.
    Ambiguous { guessed_last_mover: Color },
}

impl Detection {
    pub fn events(&self) -> &[MoveEvent] {
        match self {
            Detection::SimpleMove(event) => std::slice::from_ref(event),
            Detection::InPlaceCaptures(events) => events,
            Detection::Ambiguous { .. } => &[],
        }
    }

    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Detection::Ambiguous { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionReport {
    pub detection: Detection,
    /// The side that has not just moved; passed on to analysis.
    pub side_to_move: Color,
}

/// Classify the change without touching any cross-cycle state.
///
/// Returns `None` when the change needs a last-mover guess.
pub fn classify_move(previous: &BoardState, current: &BoardState) -> Option<Detection> {
    let delta = MoveDelta::between(previous, current);

    if let Some(((from, _), (to, piece))) = delta.single_pair() {
        let (kind, notation) = match previous.piece_at(to) {
            Some(captured) => (
                MoveKind::Capture { captured },
                capture_notation(piece, Some(from.file_char()), to),
            ),
            None => (MoveKind::Quiet, quiet_move_notation(piece, to)),
        };
        return Some(Detection::SimpleMove(MoveEvent {
            kind,
            piece,
            from: Some(from),
            to,
            notation,
        }));
    }

    if !delta.changed.is_empty() {
        let events = delta
            .changed
            .iter()
            .map(|(to, (before, after))| {
                let from = unique_origin(&delta, *after);
                MoveEvent {
                    kind: MoveKind::Capture { captured: *before },
                    piece: *after,
                    from,
                    to: *to,
                    notation: capture_notation(*after, from.map(Square::file_char), *to),
                }
            })
            .collect();
        return Some(Detection::InPlaceCaptures(events));
    }

    None
}

/// The emptied square that held `piece`, if exactly one did.
fn unique_origin(delta: &MoveDelta, piece: PieceCode) -> Option<Square> {
    let mut candidates = delta
        .removed
        .iter()
        .filter(|(_, removed)| **removed == piece)
        .map(|(sq, _)| *sq);
    match (candidates.next(), candidates.next()) {
        (Some(origin), None) => Some(origin),
        _ => None,
    }
}

/// Stateful detector: classifies changes, narrates them, and keeps the
/// last-mover history needed for ambiguous cycles.
#[derive(Debug, Clone, Default)]
pub struct MoveDetector {
    turns: TurnTracker,
}

impl MoveDetector {
    pub fn new(inference: TurnInference) -> Self {
        Self {
            turns: TurnTracker::new(inference),
        }
    }

    pub fn detect(&mut self, previous: &BoardState, current: &BoardState) -> DetectionReport {
        let detection = match classify_move(previous, current) {
            Some(detection) => {
                for event in detection.events() {
                    info!("{}", event.narrate());
                }
                if let Some(last) = detection.events().last() {
                    self.turns.record(last.mover());
                }
                detection
            }
            None => {
                info!("No clear single move detected (maybe a castle or special move?)");
                debug!("board after unclassified change:\n{}", render_board(current));
                Detection::Ambiguous {
                    guessed_last_mover: self.turns.guess_last_mover(previous),
                }
            }
        };

        let last_mover = match &detection {
            Detection::Ambiguous { guessed_last_mover } => *guessed_last_mover,
            other => other
                .events()
                .last()
                .map(MoveEvent::mover)
                .unwrap_or(Color::Dark),
        };

        DetectionReport {
            detection,
            side_to_move: last_mover.opposite(),
        }
    }
}
