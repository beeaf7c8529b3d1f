use std::fmt;

/// Engine score from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Hundredths of a pawn.
    Centipawns(i32),
    /// Forced mate; the distance as reported by the engine, negative when
    /// the side to move is being mated.
    Mate(i32),
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => write!(f, "{:.1}", f64::from(*cp) / 100.0),
            Evaluation::Mate(distance) => write!(f, "mate in {distance}"),
        }
    }
}
