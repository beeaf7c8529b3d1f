//! Terminal-oriented Unicode board renderer.
//!
//! Creates a human-readable view of a snapshot for debug logging when a
//! board change cannot be classified.

use crate::board_state::board_state::BoardState;
use crate::board_state::chess_types::Square;

/// Render the board to a Unicode string, rank 8 at the top.
pub fn render_board(board: &BoardState) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            let piece = Square::new(file, rank)
                .ok()
                .and_then(|square| board.piece_at(square));
            match piece {
                Some(piece) => out.push(piece.glyph()),
                None => out.push('·'),
            }

            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

#[cfg(test)]
mod tests {
    use super::render_board;
    use crate::utils::fen_parser::parse_placement;

    #[test]
    fn renders_pieces_in_place() {
        let board = parse_placement("4k3/8/8/8/8/8/8/4K3").expect("placement should parse");
        let rendered = render_board(&board);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "8 · · · · ♚ · · · 8");
        assert_eq!(lines[8], "1 · · · · ♔ · · · 1");
    }
}
