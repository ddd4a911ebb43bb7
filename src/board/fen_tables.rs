// O(1) FEN glyph <-> piece maps.

use super::{Color, Figure, Piece};

pub(super) const CHAR_TO_PIECE: [Piece; 128] = {
    let mut table = [Piece::NONE; 128];

    // Uppercase = White
    table[b'P' as usize] = Piece::new(Color::White, Figure::Pawn);
    table[b'N' as usize] = Piece::new(Color::White, Figure::Knight);
    table[b'B' as usize] = Piece::new(Color::White, Figure::Bishop);
    table[b'R' as usize] = Piece::new(Color::White, Figure::Rook);
    table[b'Q' as usize] = Piece::new(Color::White, Figure::Queen);
    table[b'K' as usize] = Piece::new(Color::White, Figure::King);

    // Lowercase = Black
    table[b'p' as usize] = Piece::new(Color::Black, Figure::Pawn);
    table[b'n' as usize] = Piece::new(Color::Black, Figure::Knight);
    table[b'b' as usize] = Piece::new(Color::Black, Figure::Bishop);
    table[b'r' as usize] = Piece::new(Color::Black, Figure::Rook);
    table[b'q' as usize] = Piece::new(Color::Black, Figure::Queen);
    table[b'k' as usize] = Piece::new(Color::Black, Figure::King);

    table
};

pub(super) fn piece_to_char(piece: Piece) -> char {
    let glyph = match piece.figure() {
        Figure::Pawn => 'p',
        Figure::Knight => 'n',
        Figure::Bishop => 'b',
        Figure::Rook => 'r',
        Figure::Queen => 'q',
        Figure::King => 'k',
    };
    match piece.color() {
        Color::White => glyph.to_ascii_uppercase(),
        Color::Black => glyph,
    }
}
