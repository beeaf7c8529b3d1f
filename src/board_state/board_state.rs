//! Snapshot of the observed board.
//!
//! A `BoardState` is produced fresh on every poll and never edited afterwards;
//! the watch loop replaces its previous snapshot wholesale.

use std::collections::BTreeMap;

use crate::board_state::chess_types::{PieceCode, Square};

/// Mapping from square to piece code, at most one piece per square.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pieces: BTreeMap<Square, PieceCode>,
}

impl BoardState {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from the class lists of rendered piece elements.
    ///
    /// Each item is one element's whitespace-separated class attribute, e.g.
    /// `"piece wp square-52"`. Elements without both a piece tag and a
    /// `square-XY` token are skipped. A later element on the same square wins.
    pub fn from_class_lists<I, S>(class_lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        class_lists
            .into_iter()
            .filter_map(|classes| parse_piece_classes(classes.as_ref()))
            .collect()
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<PieceCode> {
        self.pieces.get(&square).copied()
    }

    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        self.pieces.contains_key(&square)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, PieceCode)> + '_ {
        self.pieces.iter().map(|(sq, piece)| (*sq, *piece))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// The first piece in square order, used as a color sample when no move
    /// could be classified.
    pub fn first_piece(&self) -> Option<(Square, PieceCode)> {
        self.iter().next()
    }
}

impl FromIterator<(Square, PieceCode)> for BoardState {
    fn from_iter<T: IntoIterator<Item = (Square, PieceCode)>>(iter: T) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

fn parse_piece_classes(classes: &str) -> Option<(Square, PieceCode)> {
    let mut piece = None;
    let mut square = None;
    for token in classes.split_whitespace() {
        if piece.is_none() {
            piece = token.parse::<PieceCode>().ok();
        }
        if square.is_none() {
            square = Square::from_square_class(token).ok();
        }
    }
    Some((square?, piece?))
}
