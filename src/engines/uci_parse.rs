//! Parsing of engine-to-GUI UCI lines (`info ...`, `bestmove ...`).

use crate::analysis::evaluation::Evaluation;

/// The fields of an `info` line the analyzer cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    pub multipv: Option<u32>,
    pub score: Option<Evaluation>,
    pub pv: Vec<String>,
}

/// Parse an `info` line. `info string ...` and non-info lines yield `None`.
pub fn parse_info_line(line: &str) -> Option<InfoLine> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "info" {
        return None;
    }

    let mut info = InfoLine::default();
    while let Some(token) = tokens.next() {
        match token {
            "string" => return None,
            "depth" => info.depth = tokens.next().and_then(|v| v.parse().ok()),
            "multipv" => info.multipv = tokens.next().and_then(|v| v.parse().ok()),
            "score" => {
                let kind = tokens.next();
                let value = tokens.next().and_then(|v| v.parse::<i32>().ok());
                info.score = match (kind, value) {
                    (Some("cp"), Some(cp)) => Some(Evaluation::Centipawns(cp)),
                    (Some("mate"), Some(distance)) => Some(Evaluation::Mate(distance)),
                    _ => None,
                };
            }
            // `pv` is always the last field of an info line.
            "pv" => {
                info.pv = tokens.by_ref().map(str::to_owned).collect();
            }
            _ => {}
        }
    }

    Some(info)
}

/// Parse a `bestmove` line: `Some(Some(mv))`, `Some(None)` for `(none)` or
/// `0000`, and `None` for any other line.
pub fn parse_bestmove(line: &str) -> Option<Option<String>> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "bestmove" {
        return None;
    }
    match tokens.next() {
        None | Some("(none)") | Some("0000") => Some(None),
        Some(mv) => Some(Some(mv.to_owned())),
    }
}
