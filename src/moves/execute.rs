//! Reversible move execution. `do_move`/`undo_move` are exact inverses:
//! the same derivations run in both directions, so a do/undo pair leaves
//! the position bitwise identical, Zobrist key included.

use crate::bitboard::BitboardExt;
use crate::board::{Figure, LOST_CASTLE_RIGHTS, Piece, Position};
use crate::moves::attacks::AttackTables;
use crate::moves::movegen::generate_moves;
use crate::moves::square_control::in_check;
use crate::moves::types::{Move, MoveBuffer, MoveKind};
use crate::square::Square;

/// Rook start and end squares for a castle, keyed by the king's
/// destination.
#[inline(always)]
fn rook_castle_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        Square::C8 => (Square::A8, Square::D8),
        _ => panic!("castling king destination {king_to} is not g1/c1/g8/c8"),
    }
}

/// Applies `m` to `pos`. Feeding it a move that is inconsistent with the
/// position (wrong side, claimed capture of an empty square) is a
/// programmer error and aborts.
pub fn do_move(pos: &mut Position, m: Move) {
    let us = pos.to_move;
    let moving = m.moving_piece();
    if moving.color() != us {
        panic!("do_move: {m} moves a {:?} piece on {us:?}'s turn", moving.color());
    }

    // Any move touching a king or rook home square strips the rights.
    let lost = LOST_CASTLE_RIGHTS[m.from.index() as usize] | LOST_CASTLE_RIGHTS[m.to.index() as usize];
    pos.set_castling_ability(pos.castle & !lost);

    if m.kind == MoveKind::Castling {
        let (rook_from, rook_to) = rook_castle_squares(m.to);
        let rook = Piece::new(us, Figure::Rook);
        pos.remove(rook_from, rook);
        pos.put(rook_to, rook);
    }

    // A double advance exposes the midpoint square; everything else
    // clears the target (A1 is the sentinel).
    if moving.figure() == Figure::Pawn && m.from.index().abs_diff(m.to.index()) == 16 {
        pos.set_enpassant_square(Square::from_index((m.from.index() + m.to.index()) / 2));
    } else {
        pos.set_enpassant_square(Square::A1);
    }

    let capture_sq = m.capture_square();
    if m.capture.is_some() && !pos.occupied().has(capture_sq) {
        panic!("do_move: {m} captures on empty square {capture_sq}");
    }

    pos.remove(m.from, moving);
    pos.remove(capture_sq, m.capture);
    pos.put(m.to, m.target);
    pos.set_side_to_move(us.opposite());

    #[cfg(debug_assertions)]
    pos.assert_hash();
}

/// Reverses `do_move(pos, m)`, restoring castle and en-passant state from
/// the snapshot inside `m`.
pub fn undo_move(pos: &mut Position, m: Move) {
    let us = m.target.color();

    pos.set_side_to_move(us);
    pos.remove(m.to, m.target);
    pos.put(m.from, m.moving_piece());
    pos.put(m.capture_square(), m.capture);

    if m.kind == MoveKind::Castling {
        let (rook_from, rook_to) = rook_castle_squares(m.to);
        let rook = Piece::new(us, Figure::Rook);
        pos.remove(rook_to, rook);
        pos.put(rook_from, rook);
    }

    pos.set_enpassant_square(m.saved_enpassant);
    pos.set_castling_ability(m.saved_castle);

    #[cfg(debug_assertions)]
    pos.assert_hash();
}

/// True if the pseudo-legal `m` does not leave the own king in check.
#[inline]
pub fn is_legal(pos: &mut Position, m: Move, tables: &AttackTables) -> bool {
    let mover = pos.to_move;
    do_move(pos, m);
    let legal = !in_check(pos, mover, tables);
    undo_move(pos, m);
    legal
}

/// Fills `moves` with the strictly legal moves, using `scratch` for the
/// pseudo-legal stage.
pub fn generate_legal(
    pos: &mut Position,
    tables: &AttackTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    scratch.clear();
    generate_moves(pos, tables, scratch);
    moves.clear();

    for i in 0..scratch.len() {
        let m = scratch[i];
        if is_legal(pos, m, tables) {
            moves.push(m);
        }
    }
}
