//! Engine move text (long algebraic, `e2e4` / `e7e8q`) and its short form.
//!
//! The short form is a best-effort description against the observed board:
//! no disambiguation and no check markers, since legality is never tracked.

use crate::board_state::board_state::BoardState;
use crate::board_state::chess_types::{PieceKind, Square};
use crate::errors::{ScoutError, ScoutResult};
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongAlgebraicMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

pub fn parse_long_algebraic(long_algebraic: &str) -> ScoutResult<LongAlgebraicMove> {
    let bad = |message: &str| ScoutError::InvalidEngineMove {
        mv: long_algebraic.to_owned(),
        message: message.to_owned(),
    };

    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(bad("expected 4 or 5 characters"));
    }

    let from = algebraic_to_square(&long_algebraic[0..2])?;
    let to = algebraic_to_square(&long_algebraic[2..4])?;
    let promotion = match long_algebraic[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_code(ch) {
            Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                Some(kind)
            }
            _ => return Err(bad("invalid promotion piece")),
        },
    };

    Ok(LongAlgebraicMove {
        from,
        to,
        promotion,
    })
}

/// Describe an engine move in short algebraic form using the board it applies to.
pub fn long_algebraic_to_short(long_algebraic: &str, board: &BoardState) -> ScoutResult<String> {
    let mv = parse_long_algebraic(long_algebraic)?;
    let piece = board
        .piece_at(mv.from)
        .ok_or_else(|| ScoutError::InvalidEngineMove {
            mv: long_algebraic.to_owned(),
            message: format!("no piece on {}", mv.from),
        })?;

    let file_delta = i16::from(mv.to.file()) - i16::from(mv.from.file());
    if piece.kind == PieceKind::King && file_delta.abs() == 2 && mv.from.rank() == mv.to.rank() {
        return Ok(if file_delta > 0 { "O-O" } else { "O-O-O" }.to_owned());
    }

    let lands_on_piece = board.piece_at(mv.to).is_some();
    let mut out = String::new();

    match piece.kind.notation_letter() {
        None => {
            // A diagonal pawn step onto an empty square is en passant.
            let is_capture = lands_on_piece || file_delta != 0;
            if is_capture {
                out.push(mv.from.file_char());
                out.push('x');
            }
            out.push_str(&mv.to.to_string());
            if let Some(promotion) = mv.promotion.and_then(PieceKind::notation_letter) {
                out.push('=');
                out.push(promotion);
            }
        }
        Some(letter) => {
            out.push(letter);
            if lands_on_piece {
                out.push('x');
            }
            out.push_str(&mv.to.to_string());
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{long_algebraic_to_short, parse_long_algebraic};
    use crate::board_state::chess_types::PieceKind;
    use crate::utils::fen_parser::parse_placement;

    const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn describes_quiet_moves_from_start() {
        let board = parse_placement(STARTING_PLACEMENT).expect("placement should parse");
        assert_eq!(long_algebraic_to_short("e2e4", &board).expect("e2e4"), "e4");
        assert_eq!(long_algebraic_to_short("g1f3", &board).expect("g1f3"), "Nf3");
    }

    #[test]
    fn describes_captures_castling_and_promotion() {
        let board = parse_placement("r3k3/1P6/8/3p4/4P3/8/8/4K2R").expect("placement should parse");
        assert_eq!(long_algebraic_to_short("e4d5", &board).expect("e4d5"), "exd5");
        assert_eq!(long_algebraic_to_short("e1g1", &board).expect("e1g1"), "O-O");
        assert_eq!(long_algebraic_to_short("b7a8q", &board).expect("b7a8q"), "bxa8=Q");
        assert_eq!(long_algebraic_to_short("h1h8", &board).expect("h1h8"), "Rh8");
    }

    #[test]
    fn rejects_moves_that_do_not_fit() {
        let board = parse_placement("4k3/8/8/8/8/8/8/4K3").expect("placement should parse");
        assert!(long_algebraic_to_short("a2a4", &board).is_err());
        assert!(parse_long_algebraic("e7e8k").is_err());
        assert!(parse_long_algebraic("e7").is_err());
        assert_eq!(
            parse_long_algebraic("e7e8n").expect("e7e8n").promotion,
            Some(PieceKind::Knight)
        );
    }
}
