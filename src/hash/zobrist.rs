use crate::board::{COLORS, FIGURES, PIECE_SLOTS, Piece};
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

// Fixed seeds, one per key stream, so the tables (and therefore every
// position hash) are identical across builds.
const PIECE_SEED: u64 = 0x9E37_79B9_7F4A_7C15;
const CASTLE_SEED: u64 = 0xC2B2_AE3D_27D4_EB4F;
const ENPASSANT_SEED: u64 = 0x1656_67B1_9E37_79F9;
const SIDE_SEED: u64 = 0x27D4_EB2F_1656_67C5;

/// Zobrist key tables. A position hash is the XOR of one piece key per
/// occupied square, the castle key for the current rights mask, the
/// en-passant key for the target square, and the side-to-move key.
pub struct ZobristKeys {
    /// Indexed by [`Piece::index`] then square. Rows for invalid piece
    /// encodings are all-zero, so sentinel pieces hash to nothing.
    pub piece: [[u64; 64]; PIECE_SLOTS],
    /// Indexed by the 4-bit castling-rights mask.
    pub castle: [u64; 16],
    /// Indexed by square. The A1 slot is all-zero: A1 is the
    /// "no en-passant" sentinel and must not contribute to the hash.
    pub enpassant: [u64; 64],
    /// Indexed by `Color`; slot 0 is unused and zero.
    pub side: [u64; 3],
}

/// Process-wide keys, generated once on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(generate_keys)
}

fn non_zero(rng: &mut StdRng) -> u64 {
    // zero keys would make distinct states collide with the empty hash
    let mut v = rng.next_u64();
    while v == 0 {
        v = rng.next_u64();
    }
    v
}

fn generate_keys() -> ZobristKeys {
    let mut keys = ZobristKeys {
        piece: [[0u64; 64]; PIECE_SLOTS],
        castle: [0u64; 16],
        enpassant: [0u64; 64],
        side: [0u64; 3],
    };

    let mut rng = StdRng::seed_from_u64(PIECE_SEED);
    for &color in &COLORS {
        for figure in FIGURES {
            let row = Piece::new(color, figure).index();
            for sq in 0..64 {
                keys.piece[row][sq] = non_zero(&mut rng);
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(CASTLE_SEED);
    for mask in 0..16 {
        keys.castle[mask] = non_zero(&mut rng);
    }

    let mut rng = StdRng::seed_from_u64(ENPASSANT_SEED);
    for sq in 1..64 {
        keys.enpassant[sq] = non_zero(&mut rng);
    }

    let mut rng = StdRng::seed_from_u64(SIDE_SEED);
    keys.side[1] = non_zero(&mut rng);
    keys.side[2] = non_zero(&mut rng);

    keys
}
