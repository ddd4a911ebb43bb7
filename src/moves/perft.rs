//! Perft: exhaustive legal-move tree counts, the standard correctness
//! fixture for the move generator and do/undo pair.

use crate::board::Position;
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{do_move, generate_legal, undo_move};
use crate::moves::types::{Move, MoveKind};
use tracing::{debug, instrument};

const MAX_PERFT_DEPTH: usize = 16;

/// Per-move-kind tallies over the walked edges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
}

impl PerftCounters {
    pub fn add(&mut self, other: &PerftCounters) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.ep_captures += other.ep_captures;
        self.castles += other.castles;
        self.promotions += other.promotions;
    }
}

// Per-ply reusable buffers; allocation happens once per driver call.
fn move_buffers() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn perft_recursive(
    pos: &mut Position,
    tables: &AttackTables,
    depth: u32,
    ply: usize,
    legal: &mut [Vec<Move>],
    scratch: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    {
        let (moves, pseudo) = (&mut legal[ply], &mut scratch[ply]);
        generate_legal(pos, tables, moves, pseudo);
    }

    if depth == 1 {
        return legal[ply].len() as u64;
    }

    let mut nodes = 0;
    for i in 0..legal[ply].len() {
        let m = legal[ply][i];
        do_move(pos, m);
        nodes += perft_recursive(pos, tables, depth - 1, ply + 1, legal, scratch);
        undo_move(pos, m);
    }
    nodes
}

/// Number of leaves reachable in exactly `depth` plies.
#[instrument(skip(pos, tables))]
pub fn perft(pos: &mut Position, tables: &AttackTables, depth: u32) -> u64 {
    assert!(
        (depth as usize) < MAX_PERFT_DEPTH,
        "perft depth {depth} exceeds {MAX_PERFT_DEPTH}"
    );
    let mut legal = move_buffers();
    let mut scratch = move_buffers();
    perft_recursive(pos, tables, depth, 0, &mut legal, &mut scratch)
}

/// Perft split per root move; prints one line per move plus the total.
#[instrument(skip(pos, tables))]
pub fn perft_divide(pos: &mut Position, tables: &AttackTables, depth: u32) -> u64 {
    assert!(
        depth >= 1 && (depth as usize) < MAX_PERFT_DEPTH,
        "divide depth {depth} out of range"
    );
    let mut legal = move_buffers();
    let mut scratch = move_buffers();

    {
        let (moves, pseudo) = (&mut legal[0], &mut scratch[0]);
        generate_legal(pos, tables, moves, pseudo);
    }

    let mut total = 0;
    for i in 0..legal[0].len() {
        let m = legal[0][i];
        do_move(pos, m);
        let count = perft_recursive(pos, tables, depth - 1, 1, &mut legal, &mut scratch);
        undo_move(pos, m);

        debug!(%m, nodes = count, "divide: root move");
        println!("{m}: {count}");
        total += count;
    }
    println!("Total: {total}");
    total
}

fn perft_count_recursive(
    pos: &mut Position,
    tables: &AttackTables,
    depth: u32,
    ply: usize,
    out: &mut PerftCounters,
    legal: &mut [Vec<Move>],
    scratch: &mut [Vec<Move>],
) {
    if depth == 0 {
        out.nodes += 1;
        return;
    }

    {
        let (moves, pseudo) = (&mut legal[ply], &mut scratch[ply]);
        generate_legal(pos, tables, moves, pseudo);
    }

    for i in 0..legal[ply].len() {
        let m = legal[ply][i];

        // Edge tallies count at the ply the move is played, matching the
        // published perft tables.
        if depth == 1 {
            if m.is_capture() {
                out.captures += 1;
                if m.kind == MoveKind::EnPassant {
                    out.ep_captures += 1;
                }
            }
            if m.kind == MoveKind::Castling {
                out.castles += 1;
            }
            if m.kind == MoveKind::Promotion {
                out.promotions += 1;
            }
        }

        do_move(pos, m);
        perft_count_recursive(pos, tables, depth - 1, ply + 1, out, legal, scratch);
        undo_move(pos, m);
    }
}

/// Perft with the per-kind breakdown used by the published fixtures.
pub fn perft_with_breakdown(
    pos: &mut Position,
    tables: &AttackTables,
    depth: u32,
) -> PerftCounters {
    assert!(
        (depth as usize) < MAX_PERFT_DEPTH,
        "perft depth {depth} exceeds {MAX_PERFT_DEPTH}"
    );
    let mut out = PerftCounters::default();
    let mut legal = move_buffers();
    let mut scratch = move_buffers();
    perft_count_recursive(pos, tables, depth, 0, &mut out, &mut legal, &mut scratch);
    out
}
