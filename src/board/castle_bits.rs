/// Castling-rights bit mask, one bit per side/wing.
pub type CastleBits = u8;

pub const CASTLE_WK: CastleBits = 0b0001;
pub const CASTLE_WQ: CastleBits = 0b0010;
pub const CASTLE_BK: CastleBits = 0b0100;
pub const CASTLE_BQ: CastleBits = 0b1000;
pub const CASTLE_ALL: CastleBits = 0b1111;

/// Rights stripped when a square is the source or destination of a move.
///
/// Any move touching a king or rook starting square invalidates the
/// associated rights, including captures of an unmoved rook.
pub const LOST_CASTLE_RIGHTS: [CastleBits; 64] = {
    let mut table = [0; 64];
    table[0] = CASTLE_WQ; // a1
    table[4] = CASTLE_WK | CASTLE_WQ; // e1
    table[7] = CASTLE_WK; // h1
    table[56] = CASTLE_BQ; // a8
    table[60] = CASTLE_BK | CASTLE_BQ; // e8
    table[63] = CASTLE_BK; // h8
    table
};
