//! Precomputed attack tables: knight/king jump tables, pawn attack
//! tables, magic slider lookups, and the superpiece union used as the
//! fast no-attack rejection in `is_attacked_by`.

use crate::bitboard::{Bitboard, FILE_A, FILE_H};
use crate::board::Color;
use crate::moves::magic::{MAGIC_SEED, Slider, SliderMagics, generate_slider_magics};
use once_cell::sync::OnceCell;
use rand::{SeedableRng, rngs::StdRng};

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn jump_table(offsets: &[(isize, isize); 8]) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    for (sq, entry) in table.iter_mut().enumerate() {
        let rank = (sq / 8) as isize;
        let file = (sq % 8) as isize;
        for &(dr, df) in offsets {
            let (r, f) = (rank + dr, file + df);
            if (0..=7).contains(&r) && (0..=7).contains(&f) {
                *entry |= 1 << (r * 8 + f);
            }
        }
    }
    table
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    let bb = 1u64 << sq;
    match color {
        Color::White => ((bb << 7) & !FILE_H) | ((bb << 9) & !FILE_A),
        Color::Black => ((bb >> 7) & !FILE_A) | ((bb >> 9) & !FILE_H),
    }
}

/// All precomputed attack data, built once at startup.
pub struct AttackTables {
    pub knight: [Bitboard; 64],
    pub king: [Bitboard; 64],
    /// `pawn[color as usize][sq]`; slot 0 is the sentinel color and unused.
    pub pawn: [[Bitboard; 64]; 3],
    pub bishop: SliderMagics,
    pub rook: SliderMagics,
    /// Union of knight, king, and empty-board slider attacks per square.
    /// If no enemy non-pawn piece sits inside `superpiece[sq]`, nothing
    /// but a pawn can possibly attack `sq`.
    pub superpiece: [Bitboard; 64],
}

impl AttackTables {
    /// Generates every table. Deterministic for a fixed seed; an error
    /// here means the magic search failed and the engine cannot run.
    pub fn generate(seed: u64) -> Result<AttackTables, String> {
        let mut rng = StdRng::seed_from_u64(seed);
        let rook = generate_slider_magics(Slider::Rook, &mut rng)?;
        let bishop = generate_slider_magics(Slider::Bishop, &mut rng)?;

        let knight = jump_table(&KNIGHT_OFFSETS);
        let king = jump_table(&KING_OFFSETS);

        let mut pawn = [[0u64; 64]; 3];
        for sq in 0..64u8 {
            pawn[Color::White as usize][sq as usize] = pawn_attacks(sq, Color::White);
            pawn[Color::Black as usize][sq as usize] = pawn_attacks(sq, Color::Black);
        }

        let mut superpiece = [0u64; 64];
        for sq in 0..64 {
            superpiece[sq] =
                knight[sq] | king[sq] | bishop.attacks(sq, 0) | rook.attacks(sq, 0);
        }

        Ok(AttackTables {
            knight,
            king,
            pawn,
            bishop,
            rook,
            superpiece,
        })
    }

    #[inline(always)]
    pub fn bishop_attacks(&self, sq: usize, occupancy: Bitboard) -> Bitboard {
        self.bishop.attacks(sq, occupancy)
    }

    #[inline(always)]
    pub fn rook_attacks(&self, sq: usize, occupancy: Bitboard) -> Bitboard {
        self.rook.attacks(sq, occupancy)
    }

    #[inline(always)]
    pub fn queen_attacks(&self, sq: usize, occupancy: Bitboard) -> Bitboard {
        self.bishop.attacks(sq, occupancy) | self.rook.attacks(sq, occupancy)
    }
}

/// Process-wide tables, generated from the fixed seed on first use.
/// A magic-search failure aborts: the engine cannot run without them.
pub fn attack_tables() -> &'static AttackTables {
    static TABLES: OnceCell<AttackTables> = OnceCell::new();
    TABLES.get_or_init(|| {
        AttackTables::generate(MAGIC_SEED).expect("attack table initialization failed")
    })
}
