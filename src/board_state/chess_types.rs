//! Value types for observed boards: colors, piece kinds, piece codes and squares.
//!
//! Piece codes use the two-symbol tag rendered by the board page (`wp`, `bk`,
//! ...). Squares are zero-based `(file, rank)` pairs with `a1 == (0, 0)`.

use std::fmt;
use std::str::FromStr;

use crate::errors::{ScoutError, ScoutResult};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Side owning a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Color symbol used in piece codes and the FEN side-to-move field.
    #[inline]
    pub const fn code(self) -> char {
        match self {
            Color::Light => 'w',
            Color::Dark => 'b',
        }
    }

    #[inline]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'w' => Some(Color::Light),
            'b' => Some(Color::Dark),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::Light => "White",
            Color::Dark => "Black",
        }
    }
}

/// Piece kind (color is carried separately in `PieceCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase letter used in piece codes and FEN.
    #[inline]
    pub const fn code(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    #[inline]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Uppercase letter used in move notation; pawns have none.
    #[inline]
    pub const fn notation_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }
}

/// A colored piece as rendered on the page, e.g. `wp` or `bq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceCode {
    pub color: Color,
    pub kind: PieceKind,
}

impl PieceCode {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for Light, lowercase for Dark.
    #[inline]
    pub fn fen_char(self) -> char {
        match self.color {
            Color::Light => self.kind.code().to_ascii_uppercase(),
            Color::Dark => self.kind.code(),
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_code(ch.to_ascii_lowercase())?;
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else {
            Color::Dark
        };
        Some(Self::new(color, kind))
    }

    /// Unicode glyph for narration.
    pub const fn glyph(self) -> char {
        match (self.color, self.kind) {
            (Color::Light, PieceKind::Pawn) => '♙',
            (Color::Light, PieceKind::Knight) => '♘',
            (Color::Light, PieceKind::Bishop) => '♗',
            (Color::Light, PieceKind::Rook) => '♖',
            (Color::Light, PieceKind::Queen) => '♕',
            (Color::Light, PieceKind::King) => '♔',
            (Color::Dark, PieceKind::Pawn) => '♟',
            (Color::Dark, PieceKind::Knight) => '♞',
            (Color::Dark, PieceKind::Bishop) => '♝',
            (Color::Dark, PieceKind::Rook) => '♜',
            (Color::Dark, PieceKind::Queen) => '♛',
            (Color::Dark, PieceKind::King) => '♚',
        }
    }
}

impl FromStr for PieceCode {
    type Err = ScoutError;

    fn from_str(s: &str) -> ScoutResult<Self> {
        let mut chars = s.chars();
        let (Some(c), Some(k), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ScoutError::InvalidPieceCode(s.to_owned()));
        };
        match (Color::from_code(c), PieceKind::from_code(k)) {
            (Some(color), Some(kind)) => Ok(Self::new(color, kind)),
            _ => Err(ScoutError::InvalidPieceCode(s.to_owned())),
        }
    }
}

impl fmt::Display for PieceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.code(), self.kind.code())
    }
}

/// Board coordinate, both indices in `0..=7`.
///
/// Ordering is file-major (`a1 < a2 < ... < h8`), which fixes the iteration
/// order of `BoardState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> ScoutResult<Self> {
        if file > 7 || rank > 7 {
            return Err(ScoutError::SquareOutOfRange { file, rank });
        }
        Ok(Self { file, rank })
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub fn file_char(self) -> char {
        char::from(b'a' + self.file)
    }

    /// Parse the page's `square-XY` class token (one-based file then rank).
    pub fn from_square_class(token: &str) -> ScoutResult<Self> {
        let digits = token
            .strip_prefix("square-")
            .ok_or_else(|| ScoutError::InvalidSquare(token.to_owned()))?;
        let bytes = digits.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| (b'1'..=b'8').contains(b)) {
            return Err(ScoutError::InvalidSquare(token.to_owned()));
        }
        Self::new(bytes[0] - b'1', bytes[1] - b'1')
    }
}

impl FromStr for Square {
    type Err = ScoutError;

    fn from_str(s: &str) -> ScoutResult<Self> {
        algebraic_to_square(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&square_to_algebraic(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, PieceCode, PieceKind, Square};

    #[test]
    fn piece_codes_parse_all_twelve_tags() {
        let mut seen = 0;
        for color in ["w", "b"] {
            for kind in ["p", "r", "n", "b", "q", "k"] {
                let tag = format!("{color}{kind}");
                let code: PieceCode = tag.parse().expect("tag should parse");
                assert_eq!(code.to_string(), tag);
                seen += 1;
            }
        }
        assert_eq!(seen, 12);

        assert!("xp".parse::<PieceCode>().is_err());
        assert!("wz".parse::<PieceCode>().is_err());
        assert!("wpp".parse::<PieceCode>().is_err());
    }

    #[test]
    fn fen_chars_follow_color_case() {
        let white_knight = PieceCode::new(Color::Light, PieceKind::Knight);
        let black_queen = PieceCode::new(Color::Dark, PieceKind::Queen);
        assert_eq!(white_knight.fen_char(), 'N');
        assert_eq!(black_queen.fen_char(), 'q');
        assert_eq!(PieceCode::from_fen_char('N'), Some(white_knight));
        assert_eq!(PieceCode::from_fen_char('x'), None);
    }

    #[test]
    fn square_class_tokens_are_one_based() {
        let e2 = Square::from_square_class("square-52").expect("square-52 should parse");
        assert_eq!((e2.file(), e2.rank()), (4, 1));
        assert_eq!(e2.to_string(), "e2");

        assert!(Square::from_square_class("square-90").is_err());
        assert!(Square::from_square_class("piece").is_err());
        assert!(Square::new(8, 0).is_err());
    }
}
