//! Square-level difference between two snapshots.

use std::collections::BTreeMap;

use crate::board_state::board_state::BoardState;
use crate::board_state::chess_types::{PieceCode, Square};

/// Squares that emptied, filled, or changed occupant between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveDelta {
    /// Occupied before, empty after (with the piece that left).
    pub removed: BTreeMap<Square, PieceCode>,
    /// Empty before, occupied after (with the piece that arrived).
    pub added: BTreeMap<Square, PieceCode>,
    /// Occupied in both with a different piece, as `(before, after)`.
    pub changed: BTreeMap<Square, (PieceCode, PieceCode)>,
}

impl MoveDelta {
    pub fn between(previous: &BoardState, current: &BoardState) -> Self {
        let mut delta = Self::default();

        for (square, before) in previous.iter() {
            match current.piece_at(square) {
                None => {
                    delta.removed.insert(square, before);
                }
                Some(after) if after != before => {
                    delta.changed.insert(square, (before, after));
                }
                Some(_) => {}
            }
        }

        for (square, after) in current.iter() {
            if !previous.contains(square) {
                delta.added.insert(square, after);
            }
        }

        delta
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }

    /// The `(from, to)` pair when exactly one square emptied and exactly one filled.
    pub fn single_pair(&self) -> Option<((Square, PieceCode), (Square, PieceCode))> {
        if self.removed.len() != 1 || self.added.len() != 1 {
            return None;
        }
        let from = self.removed.iter().next().map(|(sq, p)| (*sq, *p))?;
        let to = self.added.iter().next().map(|(sq, p)| (*sq, *p))?;
        Some((from, to))
    }
}
