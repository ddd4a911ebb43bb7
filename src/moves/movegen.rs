//! Staged pseudo-legal move generation.
//!
//! Moves that leave the own king in check are *not* filtered here; the
//! search drops them after `do_move` via the own-king attack test. The
//! one exception is castling, which is refused while in check, through
//! check, or into check, because the standard post-move test cannot see
//! the king's path.

use crate::bitboard::{Bitboard, RANK_1, RANK_2, RANK_7, RANK_8, pop_lsb};
use crate::board::{
    CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, CastleBits, Color, Figure, Piece, Position,
};
use crate::moves::attacks::AttackTables;
use crate::moves::square_control::castling_is_safe;
use crate::moves::types::{Move, MoveBuffer, MoveKind};
use crate::square::Square;

/// Fan-out order for promotions.
const PROMOTION_FIGURES: [Figure; 4] = [Figure::Queen, Figure::Rook, Figure::Bishop, Figure::Knight];

/// Builds a move record carrying the position's pre-move castle and
/// en-passant snapshot, making it self-contained for `undo_move`.
#[inline(always)]
fn record(pos: &Position, kind: MoveKind, from: u8, to: u8, capture: Piece, target: Piece) -> Move {
    Move {
        from: Square::from_index(from),
        to: Square::from_index(to),
        kind,
        capture,
        target,
        saved_castle: pos.castle,
        saved_enpassant: pos.enpassant,
    }
}

/// Pushes one pawn arrival; destinations on rank 1/8 expand into the
/// four promotion moves.
#[inline(always)]
fn push_pawn_move(pos: &Position, from: u8, to: u8, capture: Piece, buf: &mut impl MoveBuffer) {
    let us = pos.to_move;
    if to / 8 == 0 || to / 8 == 7 {
        for &figure in &PROMOTION_FIGURES {
            buf.push(record(
                pos,
                MoveKind::Promotion,
                from,
                to,
                capture,
                Piece::new(us, figure),
            ));
        }
    } else {
        buf.push(record(
            pos,
            MoveKind::Normal,
            from,
            to,
            capture,
            Piece::new(us, Figure::Pawn),
        ));
    }
}

// ===== Stage 1: pawn en-passant captures =====

fn gen_pawn_enpassant(pos: &Position, tables: &AttackTables, buf: &mut impl MoveBuffer) {
    if pos.enpassant == Square::A1 {
        return;
    }
    let us = pos.to_move;
    let them = us.opposite();
    let ep = pos.enpassant.index();

    // pawns that attack the target = mirrored pattern from the target
    let mut attackers = tables.pawn[them as usize][ep as usize] & pos.pieces(Figure::Pawn, us);
    while attackers != 0 {
        let from = pop_lsb(&mut attackers);
        buf.push(record(
            pos,
            MoveKind::EnPassant,
            from,
            ep,
            Piece::new(them, Figure::Pawn),
            Piece::new(us, Figure::Pawn),
        ));
    }
}

// ===== Stage 2: pawn diagonal captures (incl. promotion captures) =====

fn gen_pawn_captures(pos: &Position, tables: &AttackTables, buf: &mut impl MoveBuffer) {
    let us = pos.to_move;
    let enemy = pos.occupancy(us.opposite());

    let mut pawns = pos.pieces(Figure::Pawn, us);
    while pawns != 0 {
        let from = pop_lsb(&mut pawns);
        let mut targets = tables.pawn[us as usize][from as usize] & enemy;
        while targets != 0 {
            let to = pop_lsb(&mut targets);
            push_pawn_move(pos, from, to, pos.get(Square::from_index(to)), buf);
        }
    }
}

// ===== Stages 3..8: piece moves against a target mask =====

/// Emits moves for every piece of `figure` whose attack set is produced
/// by `attacks`; `mask` restricts the destinations (not-own for the full
/// generator, enemy-occupied for the violent one).
fn gen_figure_moves(
    pos: &Position,
    figure: Figure,
    attacks: impl Fn(usize) -> Bitboard,
    mask: Bitboard,
    buf: &mut impl MoveBuffer,
) {
    let us = pos.to_move;
    let piece = Piece::new(us, figure);
    let mut bb = pos.pieces(figure, us);
    while bb != 0 {
        let from = pop_lsb(&mut bb);
        let mut targets = attacks(from as usize) & mask;
        while targets != 0 {
            let to = pop_lsb(&mut targets);
            buf.push(record(
                pos,
                MoveKind::Normal,
                from,
                to,
                pos.get(Square::from_index(to)),
                piece,
            ));
        }
    }
}

// ===== Stage 9: castling =====

struct CastleLane {
    right: CastleBits,
    king_to: Square,
    between: Bitboard,
}

const WHITE_LANES: [CastleLane; 2] = [
    CastleLane {
        right: CASTLE_WK,
        king_to: Square::G1,
        between: 0x0000_0000_0000_0060, // f1, g1
    },
    CastleLane {
        right: CASTLE_WQ,
        king_to: Square::C1,
        between: 0x0000_0000_0000_000E, // b1, c1, d1
    },
];

const BLACK_LANES: [CastleLane; 2] = [
    CastleLane {
        right: CASTLE_BK,
        king_to: Square::G8,
        between: 0x6000_0000_0000_0000, // f8, g8
    },
    CastleLane {
        right: CASTLE_BQ,
        king_to: Square::C8,
        between: 0x0E00_0000_0000_0000, // b8, c8, d8
    },
];

fn gen_castling(pos: &Position, tables: &AttackTables, buf: &mut impl MoveBuffer) {
    let us = pos.to_move;
    let (lanes, king_from) = match us {
        Color::White => (&WHITE_LANES, Square::E1),
        Color::Black => (&BLACK_LANES, Square::E8),
    };
    let occupied = pos.occupied();
    let king = Piece::new(us, Figure::King);

    for lane in lanes {
        if pos.castle & lane.right != 0
            && occupied & lane.between == 0
            && castling_is_safe(pos, lane.king_to, tables)
        {
            buf.push(record(
                pos,
                MoveKind::Castling,
                king_from.index(),
                lane.king_to.index(),
                Piece::NONE,
                king,
            ));
        }
    }
}

// ===== Stages 10/11: pawn advances =====

fn single_push_targets(pos: &Position) -> Bitboard {
    let pawns = pos.pieces(Figure::Pawn, pos.to_move);
    let empty = !pos.occupied();
    match pos.to_move {
        Color::White => (pawns << 8) & empty,
        Color::Black => (pawns >> 8) & empty,
    }
}

fn gen_pawn_single_advances(pos: &Position, buf: &mut impl MoveBuffer) {
    let us = pos.to_move;
    let mut pushed = single_push_targets(pos);
    while pushed != 0 {
        let to = pop_lsb(&mut pushed);
        let from = match us {
            Color::White => to - 8,
            Color::Black => to + 8,
        };
        push_pawn_move(pos, from, to, Piece::NONE, buf);
    }
}

fn gen_pawn_double_advances(pos: &Position, buf: &mut impl MoveBuffer) {
    let us = pos.to_move;
    let pawns = pos.pieces(Figure::Pawn, us);
    let empty = !pos.occupied();
    let pawn = Piece::new(us, Figure::Pawn);

    let mut pushed = match us {
        Color::White => ((((pawns & RANK_2) << 8) & empty) << 8) & empty,
        Color::Black => ((((pawns & RANK_7) >> 8) & empty) >> 8) & empty,
    };
    while pushed != 0 {
        let to = pop_lsb(&mut pushed);
        let from = match us {
            Color::White => to - 16,
            Color::Black => to + 16,
        };
        buf.push(record(pos, MoveKind::Normal, from, to, Piece::NONE, pawn));
    }
}

/// Quiet promotion pushes only; the violent generator's stand-in for the
/// advance stages.
fn gen_pawn_promotion_pushes(pos: &Position, buf: &mut impl MoveBuffer) {
    let us = pos.to_move;
    let promo_rank = match us {
        Color::White => RANK_8,
        Color::Black => RANK_1,
    };
    let mut pushed = single_push_targets(pos) & promo_rank;
    while pushed != 0 {
        let to = pop_lsb(&mut pushed);
        let from = match us {
            Color::White => to - 8,
            Color::Black => to + 8,
        };
        push_pawn_move(pos, from, to, Piece::NONE, buf);
    }
}

/// Appends every pseudo-legal move in the fixed stage order: en-passant
/// captures, pawn captures, knights, bishops, rooks, queen diagonals,
/// queen lines, king steps, castling, single advances, double advances.
pub fn generate_moves(pos: &Position, tables: &AttackTables, buf: &mut impl MoveBuffer) {
    let occupied = pos.occupied();
    let mask = !pos.occupancy(pos.to_move);

    gen_pawn_enpassant(pos, tables, buf);
    gen_pawn_captures(pos, tables, buf);
    gen_figure_moves(pos, Figure::Knight, |sq| tables.knight[sq], mask, buf);
    gen_figure_moves(pos, Figure::Bishop, |sq| tables.bishop_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::Rook, |sq| tables.rook_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::Queen, |sq| tables.bishop_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::Queen, |sq| tables.rook_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::King, |sq| tables.king[sq], mask, buf);
    gen_castling(pos, tables, buf);
    gen_pawn_single_advances(pos, buf);
    gen_pawn_double_advances(pos, buf);
}

/// Appends a superset of the capture moves plus every promotion, for
/// quiescence search. Destination masks are restricted to enemy-occupied
/// squares; quiet promotions are the deliberate non-capture leak.
pub fn generate_violent_moves(pos: &Position, tables: &AttackTables, buf: &mut impl MoveBuffer) {
    let occupied = pos.occupied();
    let mask = pos.occupancy(pos.to_move.opposite());

    gen_pawn_enpassant(pos, tables, buf);
    gen_pawn_captures(pos, tables, buf);
    gen_pawn_promotion_pushes(pos, buf);
    gen_figure_moves(pos, Figure::Knight, |sq| tables.knight[sq], mask, buf);
    gen_figure_moves(pos, Figure::Bishop, |sq| tables.bishop_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::Rook, |sq| tables.rook_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::Queen, |sq| tables.bishop_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::Queen, |sq| tables.rook_attacks(sq, occupied), mask, buf);
    gen_figure_moves(pos, Figure::King, |sq| tables.king[sq], mask, buf);
}
