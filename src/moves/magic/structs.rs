use crate::bitboard::Bitboard;

/// One square's magic lookup: `table[((occ & mask) * magic) >> shift]`
/// yields the attack set for any blocker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicEntry {
    /// Multiplier hashing masked blockers into table indices.
    pub magic: u64,

    /// Right shift applied after the multiplication.
    pub shift: u32,

    /// The relevant-blocker mask for this square (attack rays minus the
    /// outer border squares).
    pub mask: Bitboard,

    /// Dense attack table, one slot per hash index.
    pub table: Box<[Bitboard]>,
}

/// Per-square magic entries for one slider kind (bishop or rook).
#[derive(Debug)]
pub struct SliderMagics {
    pub entries: Vec<MagicEntry>,
}

impl SliderMagics {
    /// Attack bitboard for `square` under the given occupancy.
    #[inline(always)]
    pub fn attacks(&self, square: usize, occupancy: Bitboard) -> Bitboard {
        let entry = &self.entries[square];
        let index = ((occupancy & entry.mask).wrapping_mul(entry.magic) >> entry.shift) as usize;
        entry.table[index]
    }

    /// Total number of stored attack-table slots, across all squares.
    pub fn table_slots(&self) -> usize {
        self.entries.iter().map(|e| e.table.len()).sum()
    }
}
