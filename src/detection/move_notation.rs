//! Short notation and narration for moves inferred from board diffs.

use crate::board_state::chess_types::{PieceCode, Square};

/// `e4` for pawns, `Nf3` for pieces.
pub fn quiet_move_notation(piece: PieceCode, to: Square) -> String {
    match piece.kind.notation_letter() {
        None => to.to_string(),
        Some(letter) => format!("{letter}{to}"),
    }
}

/// `exd5` / `xd5` for pawns (origin file when known), `Nxd5` for pieces.
pub fn capture_notation(piece: PieceCode, origin_file: Option<char>, to: Square) -> String {
    match piece.kind.notation_letter() {
        None => match origin_file {
            Some(file) => format!("{file}x{to}"),
            None => format!("x{to}"),
        },
        Some(letter) => format!("{letter}x{to}"),
    }
}
