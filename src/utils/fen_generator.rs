use crate::board_state::{board_state::BoardState, chess_types::*};

/// Castling, en-passant and clock fields; the watcher does not track them.
pub const PLACEHOLDER_STATE_FIELDS: &str = "- - 0 1";

/// Encode a snapshot as FEN with the placeholder side to move (`w`).
pub fn generate_fen(board: &BoardState) -> String {
    generate_fen_with_side(board, Color::Light)
}

/// Encode a snapshot as FEN with an explicit side to move.
pub fn generate_fen_with_side(board: &BoardState, side_to_move: Color) -> String {
    format!(
        "{} {} {}",
        generate_board_field(board),
        side_to_move.code(),
        PLACEHOLDER_STATE_FIELDS
    )
}

/// The piece-placement field alone: eight ranks from 8 down to 1.
pub fn generate_board_field(board: &BoardState) -> String {
    let mut grid = [[None::<PieceCode>; 8]; 8];
    for (square, piece) in board.iter() {
        grid[usize::from(square.rank())][usize::from(square.file())] = Some(piece);
    }

    let mut out = String::new();

    for rank in (0..8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8 {
            if let Some(piece) = grid[rank][file] {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.fen_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{generate_board_field, generate_fen, generate_fen_with_side};
    use crate::board_state::board_state::BoardState;
    use crate::board_state::chess_types::Color;
    use crate::utils::fen_parser::parse_placement;

    const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn empty_board_still_has_eight_ranks() {
        let fen = generate_fen(&BoardState::new_empty());
        assert_eq!(fen, "8/8/8/8/8/8/8/8 w - - 0 1");
        assert_eq!(fen.split(' ').next().map(|f| f.split('/').count()), Some(8));
    }

    #[test]
    fn round_trip_starting_placement() {
        let board = parse_placement(STARTING_PLACEMENT).expect("starting placement should parse");
        assert_eq!(board.len(), 32);
        assert_eq!(generate_board_field(&board), STARTING_PLACEMENT);
        assert_eq!(
            generate_fen_with_side(&board, Color::Dark),
            format!("{STARTING_PLACEMENT} b - - 0 1")
        );
    }

    #[test]
    fn round_trip_sparse_middlegame_placement() {
        let placement = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1";
        let board = parse_placement(placement).expect("placement should parse");
        let encoded = generate_board_field(&board);
        assert_eq!(encoded, placement);

        let reparsed = parse_placement(&encoded).expect("encoded placement should parse");
        assert_eq!(reparsed, board);
    }

    #[test]
    fn encoding_is_idempotent() {
        let board = parse_placement("8/8/3k4/8/4P3/8/8/4K3").expect("placement should parse");
        assert_eq!(generate_fen(&board), generate_fen(&board));
        assert_eq!(generate_fen(&board), "8/8/3k4/8/4P3/8/8/4K3 w - - 0 1");
    }
}
