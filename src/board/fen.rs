use super::fen_tables::{CHAR_TO_PIECE, piece_to_char};
use super::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Figure, Position};
use crate::moves::types::{Move, MoveKind};
use crate::square::Square;

impl Position {
    /// Rebuilds this position from a FEN record.
    ///
    /// The four mandatory fields are required; halfmove/fullmove counters
    /// are accepted and ignored since the engine carries no draw-rule
    /// bookkeeping.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let mut pos = Position::new_empty();
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or("FEN missing piece placement")?;
        let side = fields.next().ok_or("FEN missing side to move")?;
        let castling = fields.next().ok_or("FEN missing castling rights")?;
        let enpassant = fields.next().ok_or("FEN missing en-passant square")?;

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(format!("FEN has {} ranks, expected 8", ranks.len()));
        }
        for (row, rank_str) in ranks.iter().enumerate() {
            // FEN lists rank 8 first
            let rank = 7 - row as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(format!("bad empty-run digit {c:?} in FEN"));
                    }
                    file += skip as u8;
                } else {
                    let piece = *CHAR_TO_PIECE
                        .get(c as usize)
                        .filter(|p| p.is_some())
                        .ok_or_else(|| format!("unknown piece glyph {c:?} in FEN"))?;
                    if file > 7 {
                        return Err(format!("rank {} overflows 8 files", rank + 1));
                    }
                    pos.put(Square::new(rank, file), piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(format!("rank {} covers {} files, expected 8", rank + 1, file));
            }
        }

        match side {
            "w" => pos.set_side_to_move(Color::White),
            "b" => pos.set_side_to_move(Color::Black),
            other => return Err(format!("bad side to move {other:?}")),
        }

        if castling != "-" {
            let mut mask = 0;
            for c in castling.chars() {
                mask |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(format!("bad castling flag {other:?}")),
                };
            }
            pos.set_castling_ability(mask);
        }

        if enpassant != "-" {
            let sq: Square = enpassant.parse()?;
            if sq.rank() != 2 && sq.rank() != 5 {
                return Err(format!("en-passant square {sq} not on rank 3 or 6"));
            }
            pos.set_enpassant_square(sq);
        }

        pos.validate()?;
        *self = pos;
        Ok(())
    }

    /// Renders the position as FEN. The halfmove/fullmove counters are
    /// not tracked and print as `0 1`.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let piece = self.get(Square::new(rank, file));
                if piece.is_none() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    fen.push((b'0' + empty) as char);
                    empty = 0;
                }
                fen.push(piece_to_char(piece));
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castle == 0 {
            fen.push('-');
        } else {
            for (bit, c) in [
                (CASTLE_WK, 'K'),
                (CASTLE_WQ, 'Q'),
                (CASTLE_BK, 'k'),
                (CASTLE_BQ, 'q'),
            ] {
                if self.castle & bit != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        if self.enpassant == Square::A1 {
            fen.push('-');
        } else {
            fen.push_str(&self.enpassant.to_string());
        }

        fen.push_str(" 0 1");
        fen
    }
}

/// Parses one EPD record, returning the position and the operands of its
/// `bm` (best move) operation. Other operations are ignored; `bm` is the
/// only one the engine consumes.
pub fn parse_epd(line: &str) -> Result<(Position, Vec<String>), String> {
    let line = line.trim();
    let mut fields = line.split_whitespace();
    let mut fen = String::new();
    for _ in 0..4 {
        let field = fields.next().ok_or("EPD record shorter than 4 fields")?;
        fen.push_str(field);
        fen.push(' ');
    }
    let pos: Position = fen.trim_end().parse()?;

    let ops = fields.collect::<Vec<_>>().join(" ");
    let mut best_moves = Vec::new();
    for op in ops.split(';') {
        let op = op.trim();
        if let Some(rest) = op.strip_prefix("bm ") {
            best_moves.extend(rest.split_whitespace().map(str::to_string));
        }
    }
    if best_moves.is_empty() {
        return Err(format!("EPD record has no bm operation: {line:?}"));
    }
    Ok((pos, best_moves))
}

/// Lenient comparison of a searched move against one `bm` operand.
///
/// Accepts the engine's own long-algebraic form directly. SAN operands
/// are matched on destination square, moving figure, and promotion only;
/// disambiguation characters are ignored and full SAN parsing stays
/// outside the core.
pub fn matches_bm(mv: Move, token: &str) -> bool {
    if token == mv.to_uci() {
        return true;
    }

    let stripped: String = token
        .chars()
        .filter(|c| !matches!(c, '+' | '#' | 'x' | '!' | '?'))
        .collect();

    if stripped == "O-O" || stripped == "0-0" {
        return mv.kind == MoveKind::Castling && mv.to.file() == 6;
    }
    if stripped == "O-O-O" || stripped == "0-0-0" {
        return mv.kind == MoveKind::Castling && mv.to.file() == 2;
    }

    let (core, promo) = match stripped.find('=') {
        Some(i) => (&stripped[..i], stripped[i + 1..].chars().next()),
        None => (stripped.as_str(), None),
    };
    if core.len() < 2 {
        return false;
    }
    let Ok(dest) = core[core.len() - 2..].parse::<Square>() else {
        return false;
    };
    let figure = match core.chars().next() {
        Some('N') => Figure::Knight,
        Some('B') => Figure::Bishop,
        Some('R') => Figure::Rook,
        Some('Q') => Figure::Queen,
        Some('K') => Figure::King,
        _ => Figure::Pawn,
    };

    if dest != mv.to || figure != mv.moving_piece().figure() {
        return false;
    }
    match promo {
        Some(c) => {
            mv.kind == MoveKind::Promotion
                && matches_bm_promo_figure(c) == Some(mv.target.figure())
        }
        None => mv.kind != MoveKind::Promotion,
    }
}

fn matches_bm_promo_figure(c: char) -> Option<Figure> {
    match c.to_ascii_uppercase() {
        'N' => Some(Figure::Knight),
        'B' => Some(Figure::Bishop),
        'R' => Some(Figure::Rook),
        'Q' => Some(Figure::Queen),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWI_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn fen_round_trip() {
        let pos: Position = KIWI_FEN.parse().expect("valid FEN");
        assert_eq!(pos.to_fen(), KIWI_FEN);
    }

    #[test]
    fn fen_without_counters_is_accepted() {
        let pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6".parse().expect("valid FEN");
        assert_eq!(pos.enpassant, "d6".parse().unwrap());
    }

    #[test]
    fn bad_fens_are_rejected() {
        assert!("8/8/8/8/8/8/8 w - -".parse::<Position>().is_err());
        assert!("9/8/8/8/8/8/8/8 w - -".parse::<Position>().is_err());
        assert!(KIWI_FEN.replace(" w ", " x ").parse::<Position>().is_err());
        // no kings
        assert!("8/8/8/8/8/8/8/8 w - -".parse::<Position>().is_err());
    }

    #[test]
    fn epd_bm_extraction() {
        let (pos, bm) = parse_epd(
            "1k5r/pP3ppp/3p2b1/1BN1n3/1Q2P3/P1B5/KP3P1P/7q w - - bm Nd7; id \"test.001\";",
        )
        .expect("valid EPD");
        assert_eq!(pos.to_move, Color::White);
        assert_eq!(bm, vec!["Nd7".to_string()]);
    }
}
