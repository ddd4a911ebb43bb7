//! Builds the per-square magic tables: relevant-blocker masks, subset
//! enumeration, and the search for a working multiplier per square.

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic;
use super::structs::{MagicEntry, SliderMagics};
use crate::bitboard::Bitboard;
use rand::RngCore;
use tracing::debug;

/// Fixed seed for the magic search, so the generated tables are identical
/// across builds and perft fixtures stay stable.
pub const MAGIC_SEED: u64 = 0xD6E8_FEB8_6659_FD93;

// Index-bit budgets per square. The natural width is the popcount of the
// relevant mask (at most 12 for rooks, 9 for bishops); one extra bit of
// slack lets a stubborn square trade table size for search time.
const ROOK_MAX_INDEX_BITS: u32 = 13;
const BISHOP_MAX_INDEX_BITS: u32 = 9;

const ATTEMPTS_PER_WIDTH: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Bishop,
    Rook,
}

/// Relevant rook blockers: the rays without their final border square.
/// A blocker on the edge cannot change the attack set.
fn rook_mask(square: usize) -> Bitboard {
    let rank = (square / 8) as isize;
    let file = (square % 8) as isize;
    let mut mask = 0u64;

    let mut r = rank + 1;
    while r <= 6 {
        mask |= 1 << (r * 8 + file);
        r += 1;
    }
    let mut r = rank - 1;
    while r >= 1 {
        mask |= 1 << (r * 8 + file);
        r -= 1;
    }
    let mut f = file + 1;
    while f <= 6 {
        mask |= 1 << (rank * 8 + f);
        f += 1;
    }
    let mut f = file - 1;
    while f >= 1 {
        mask |= 1 << (rank * 8 + f);
        f -= 1;
    }
    mask
}

/// Relevant bishop blockers: the diagonals clipped off the outer border.
fn bishop_mask(square: usize) -> Bitboard {
    let rank = (square / 8) as isize;
    let file = (square % 8) as isize;
    let mut mask = 0u64;

    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (rank + dr, file + df);
        while (1..=6).contains(&r) && (1..=6).contains(&f) {
            mask |= 1 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Every subset of `mask`, enumerated with the Carry-Rippler trick.
/// The empty set comes first; `1 << popcount(mask)` subsets in total.
pub fn subsets_of(mask: Bitboard) -> Vec<Bitboard> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

/// Finds a magic for every square of one slider kind.
///
/// Per square: start at the natural index width and widen within the
/// budget until the random search succeeds. Failure is unrecoverable for
/// the engine; the caller treats it as fatal.
pub fn generate_slider_magics<R: RngCore>(
    slider: Slider,
    rng: &mut R,
) -> Result<SliderMagics, String> {
    let budget = match slider {
        Slider::Bishop => BISHOP_MAX_INDEX_BITS,
        Slider::Rook => ROOK_MAX_INDEX_BITS,
    };

    let mut entries = Vec::with_capacity(64);
    for square in 0..64 {
        let mask = match slider {
            Slider::Bishop => bishop_mask(square),
            Slider::Rook => rook_mask(square),
        };
        let blockers = subsets_of(mask);
        let attacks: Vec<Bitboard> = blockers
            .iter()
            .map(|&b| match slider {
                Slider::Bishop => bishop_attacks_per_square(square, b),
                Slider::Rook => rook_attacks_per_square(square, b),
            })
            .collect();

        let natural = mask.count_ones();
        let mut entry = None;
        for bits in natural..=budget {
            let shift = 64 - bits;
            if let Some((magic, table)) = find_magic(&blockers, &attacks, shift, rng, ATTEMPTS_PER_WIDTH)
            {
                debug!(?slider, square, bits, magic, "magic found");
                entry = Some(MagicEntry {
                    magic,
                    shift,
                    mask,
                    table: table.into_boxed_slice(),
                });
                break;
            }
        }

        match entry {
            Some(e) => entries.push(e),
            None => {
                return Err(format!(
                    "no {slider:?} magic for square {square} within {budget} index bits"
                ));
            }
        }
    }
    Ok(SliderMagics { entries })
}
