//! The random search for magic multipliers.

use crate::bitboard::Bitboard;
use rand::RngCore;

/// A sparse 64-bit candidate: AND-ing three draws keeps the popcount low,
/// which is what workable magic multipliers look like.
#[inline(always)]
pub fn random_sparse_u64<R: RngCore>(rng: &mut R) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// Fills the candidate table for one magic. `((blockers * magic) >>
/// shift)` must be collision-free over all subsets; two subsets mapping
/// to the same index are allowed only when they produce the same attack
/// set. Returns false at the first conflicting collision.
///
/// Slots written by this candidate carry `attempt` in `stamp`; anything
/// with an older stamp is leftover from a failed candidate and ignored,
/// so callers can reuse the buffers without clearing them.
fn fill_candidate(
    blockers: &[Bitboard],
    attacks: &[Bitboard],
    magic: u64,
    shift: u32,
    attempt: u32,
    table: &mut [Bitboard],
    stamp: &mut [u32],
) -> bool {
    for (&blocker, &attack) in blockers.iter().zip(attacks) {
        let index = (blocker.wrapping_mul(magic) >> shift) as usize;
        if stamp[index] != attempt {
            stamp[index] = attempt;
            table[index] = attack;
        } else if table[index] != attack {
            return false;
        }
    }
    true
}

/// Searches for a magic multiplier valid at the given shift. Deterministic
/// for a fixed `rng` state; `None` after `attempts` failures.
pub fn find_magic<R: RngCore>(
    blockers: &[Bitboard],
    attacks: &[Bitboard],
    shift: u32,
    rng: &mut R,
    attempts: u32,
) -> Option<(u64, Vec<Bitboard>)> {
    let size = 1usize << (64 - shift);
    let mut table = vec![0u64; size];
    let mut stamp = vec![0u32; size];

    for attempt in 1..=attempts {
        let magic = random_sparse_u64(rng);
        if fill_candidate(blockers, attacks, magic, shift, attempt, &mut table, &mut stamp) {
            // zero the slots this candidate never touched
            for (slot, &s) in table.iter_mut().zip(&stamp) {
                if s != attempt {
                    *slot = 0;
                }
            }
            return Some((magic, table));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn sparse_candidates_have_low_popcount_on_average() {
        let mut rng = StdRng::seed_from_u64(7);
        let total: u32 = (0..256).map(|_| random_sparse_u64(&mut rng).count_ones()).sum();
        // expectation is 8 set bits; allow generous slack
        assert!(total / 256 < 16);
    }

    #[test]
    fn candidate_rejects_conflicting_attack_sets() {
        // magic 0 collapses both blocker sets onto index 0, and they map
        // to different attacks, so the candidate must be rejected
        let blockers = [0b01u64, 0b10u64];
        let attacks = [0xF0u64, 0x0Fu64];
        let mut table = vec![0u64; 2];
        let mut stamp = vec![0u32; 2];
        assert!(!fill_candidate(&blockers, &attacks, 0, 63, 1, &mut table, &mut stamp));
    }

    #[test]
    fn candidate_accepts_benign_collisions() {
        let blockers = [0b01u64, 0b10u64];
        let attacks = [0xF0u64, 0xF0u64];
        let mut table = vec![0u64; 2];
        let mut stamp = vec![0u32; 2];
        assert!(fill_candidate(&blockers, &attacks, 0, 63, 1, &mut table, &mut stamp));
        assert_eq!(table[0], 0xF0);
    }

    #[test]
    fn find_magic_builds_a_collision_free_table() {
        // four distinct blocker subsets of a 2-bit mask, four distinct
        // attack sets: the table must come back perfect
        let blockers = [0b00u64, 0b01, 0b10, 0b11];
        let attacks = [1u64, 2, 3, 4];
        let mut rng = StdRng::seed_from_u64(7);

        let (magic, table) =
            find_magic(&blockers, &attacks, 62, &mut rng, 1_000_000).expect("a magic exists");
        for (&blocker, &attack) in blockers.iter().zip(&attacks) {
            let index = (blocker.wrapping_mul(magic) >> 62) as usize;
            assert_eq!(table[index], attack);
        }
    }
}
