//! Static evaluation: material, piece-square tables, and a few
//! structural bonuses. Returns centipawns from White's point of view;
//! the search converts with the side-to-move weight.

use crate::bitboard::pop_lsb;
use crate::board::{COLORS, Color, FIGURES, Figure, Position};
use crate::search::psqt::{FIGURE_VALUE, PSQT};

const BISHOP_PAIR_BONUS: i32 = 40;
// Closed-ish positions favor knights over rooks: every pawn above five
// on our side nudges the minor/major balance.
const KNIGHT_PAWN_ADJUST: i32 = 6;
const ROOK_PAWN_ADJUST: i32 = 12;

pub fn evaluate(pos: &Position) -> i32 {
    let mut total = 0;

    for &color in &COLORS {
        let mut side = 0;

        for figure in FIGURES {
            let mut bb = pos.pieces(figure, color);
            side += FIGURE_VALUE[figure as usize] * bb.count_ones() as i32;

            let table = &PSQT[figure as usize];
            while bb != 0 {
                let sq = pop_lsb(&mut bb) as usize;
                let idx = match color {
                    Color::White => sq,
                    Color::Black => sq ^ 56, // rank flip
                };
                side += table[idx];
            }
        }

        if pos.pieces(Figure::Bishop, color).count_ones() >= 2 {
            side += BISHOP_PAIR_BONUS;
        }

        let extra_pawns = pos.pieces(Figure::Pawn, color).count_ones() as i32 - 5;
        let knights = pos.pieces(Figure::Knight, color).count_ones() as i32;
        let rooks = pos.pieces(Figure::Rook, color).count_ones() as i32;
        side += extra_pawns * KNIGHT_PAWN_ADJUST * knights;
        side -= extra_pawns * ROOK_PAWN_ADJUST * rooks;

        total += color.weight() * side;
    }

    total
}
