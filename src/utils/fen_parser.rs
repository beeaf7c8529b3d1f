//! FEN placement-to-BoardState parser.
//!
//! Decodes the piece-placement field of a Forsyth-Edwards Notation string.
//! Side-to-move, castling and clock fields are ignored since the watcher
//! never tracks them.

use crate::board_state::board_state::BoardState;
use crate::board_state::chess_types::{PieceCode, Square};
use crate::errors::{ScoutError, ScoutResult};

/// Parse a placement field, or a full FEN string whose first field is one.
pub fn parse_placement(fen: &str) -> ScoutResult<BoardState> {
    let board_part = fen
        .split_whitespace()
        .next()
        .ok_or_else(|| invalid("missing board layout"))?;

    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    let mut pieces = Vec::new();

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7u8 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(invalid("board rank has too many files"));
                }
                continue;
            }

            let piece = PieceCode::from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;

            if file >= 8 {
                return Err(invalid("board rank has too many files"));
            }

            pieces.push((Square::new(file, board_rank)?, piece));
            file += 1;
        }

        if file != 8 {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(pieces.into_iter().collect())
}

fn invalid(message: &str) -> ScoutError {
    ScoutError::InvalidPlacement {
        message: message.to_owned(),
    }
}
