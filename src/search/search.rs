//! Negamax alpha-beta search with iterative deepening, transposition
//! table, quiescence, and cooperative time control.

use crate::board::Position;
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{do_move, undo_move};
use crate::moves::movegen::{generate_moves, generate_violent_moves};
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use crate::search::eval::evaluate;
use crate::search::ordering::order_moves;
use crate::search::tt::{Bound, HashTable};
use arrayvec::ArrayVec;
use std::time::{Duration, Instant};
use tracing::debug;

pub const INF: i32 = 32_000;
pub const MATE_SCORE: i32 = 31_000;
/// Scores at or beyond this are mate-in-N; they carry a ply distance and
/// need adjustment when crossing the transposition table.
pub const MATE_THRESHOLD: i32 = 30_000;
pub const MAX_DEPTH: i32 = 64;

const MAX_QUIESCE_PLY: i32 = 100;
// nodes between wall-clock polls; node limits are checked every node
const CLOCK_POLL_MASK: u64 = 1023;

/// How long the search may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeControl {
    /// On the clock: budget = remaining / max(moves_to_go, 1) + inc / 2.
    OnClock {
        remaining: Duration,
        increment: Duration,
        moves_to_go: u32,
    },
    /// Iterate from `min_depth` to `max_depth`, no wall-clock bound.
    FixedDepth { min_depth: i32, max_depth: i32 },
    /// Stop once the node count passes the bound.
    FixedNodes { nodes: u64 },
}

impl TimeControl {
    fn depth_range(self) -> (i32, i32) {
        match self {
            TimeControl::FixedDepth { min_depth, max_depth } => {
                (min_depth.clamp(1, MAX_DEPTH), max_depth.clamp(1, MAX_DEPTH))
            }
            _ => (1, MAX_DEPTH),
        }
    }

    fn budget(self) -> Option<Duration> {
        match self {
            TimeControl::OnClock {
                remaining,
                increment,
                moves_to_go,
            } => Some(remaining / moves_to_go.max(1) + increment / 2),
            _ => None,
        }
    }

    fn node_limit(self) -> Option<u64> {
        match self {
            TimeControl::FixedNodes { nodes } => Some(nodes),
            _ => None,
        }
    }
}

/// Cooperative stop signal: polled between nodes, never preemptive.
pub struct TimeManager {
    start_time: Instant,
    budget: Option<Duration>,
    node_limit: Option<u64>,
    stopped: bool,
}

impl TimeManager {
    pub fn new(tc: TimeControl) -> Self {
        TimeManager {
            start_time: Instant::now(),
            budget: tc.budget(),
            node_limit: tc.node_limit(),
            stopped: false,
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
        self.stopped = false;
    }

    /// True once the budget is exhausted. The wall clock is only read
    /// every `CLOCK_POLL_MASK + 1` nodes; the stop latches.
    #[inline(always)]
    pub fn should_stop(&mut self, nodes: u64) -> bool {
        if self.stopped {
            return true;
        }
        if let Some(limit) = self.node_limit
            && nodes >= limit
        {
            self.stopped = true;
            return true;
        }
        if nodes & CLOCK_POLL_MASK == 0
            && let Some(budget) = self.budget
            && self.start_time.elapsed() >= budget
        {
            self.stopped = true;
        }
        self.stopped
    }

    #[inline(always)]
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }
}

/// Root search result plus counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    /// Side-to-move centipawns (or a mate score) at the deepest
    /// completed iteration.
    pub score: i32,
    pub depth: i32,
    pub nodes: u64,
    pub tt_hits: u64,
    pub tt_misses: u64,
}

struct SearchState {
    nodes: u64,
    time: TimeManager,
}

// Mate scores are stored relative to the node, not the root, so they
// translate when a TT entry is reused at a different ply.
fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

/// Captures-and-promotions search at the horizon, to keep the evaluation
/// away from unstable positions.
fn quiescence(
    pos: &mut Position,
    tables: &AttackTables,
    state: &mut SearchState,
    ply: i32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    state.nodes += 1;
    if state.time.should_stop(state.nodes) {
        return alpha;
    }

    let stand_pat = pos.to_move.weight() * evaluate(pos);
    if ply >= MAX_QUIESCE_PLY {
        return stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generate_violent_moves(pos, tables, &mut moves);
    order_moves(&mut moves, None);

    let us = pos.to_move;
    for i in 0..moves.len() {
        let m = moves[i];
        do_move(pos, m);
        if in_check(pos, us, tables) {
            undo_move(pos, m);
            continue;
        }
        let score = -quiescence(pos, tables, state, ply + 1, -beta, -alpha);
        undo_move(pos, m);

        if state.time.stopped() {
            return alpha;
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }
    alpha
}

fn negamax(
    pos: &mut Position,
    tables: &AttackTables,
    tt: &mut HashTable,
    state: &mut SearchState,
    depth: i32,
    ply: i32,
    mut alpha: i32,
    beta: i32,
) -> (i32, Option<Move>) {
    if state.time.should_stop(state.nodes) {
        return (0, None);
    }

    if depth <= 0 {
        return (quiescence(pos, tables, state, ply, alpha, beta), None);
    }
    state.nodes += 1;

    let lock = pos.zobrist;
    let mut hash_move = None;

    if let Some(entry) = tt.probe(lock) {
        hash_move = entry.mv;
        if entry.depth as i32 >= depth {
            let score = score_from_tt(entry.score as i32, ply);
            match entry.kind {
                Bound::Exact => return (score, entry.mv),
                Bound::FailedHigh if score >= beta => return (beta, entry.mv),
                Bound::FailedLow if score <= alpha => return (alpha, entry.mv),
                _ => {}
            }
        }
    }

    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generate_moves(pos, tables, &mut moves);
    order_moves(&mut moves, hash_move);

    let us = pos.to_move;
    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = None;
    let mut legal_moves = 0u32;

    for i in 0..moves.len() {
        let m = moves[i];
        do_move(pos, m);
        // pseudo-legal: drop anything that left our king hanging
        if in_check(pos, us, tables) {
            undo_move(pos, m);
            continue;
        }
        legal_moves += 1;

        let (value, _) = negamax(pos, tables, tt, state, depth - 1, ply + 1, -beta, -alpha);
        let score = -value;
        undo_move(pos, m);

        if state.time.stopped() {
            return (0, None);
        }

        if score > best_score {
            best_score = score;
            if score > alpha {
                alpha = score;
                best_move = Some(m);
            }
        }
        if score >= beta {
            tt.store(lock, Some(m), score_to_tt(beta, ply), depth as i16, Bound::FailedHigh);
            return (beta, Some(m));
        }
    }

    if legal_moves == 0 {
        // mate is worse the earlier it happens; ply-adjust so shorter
        // mates outrank longer ones
        return if in_check(pos, us, tables) {
            (-(MATE_SCORE - ply), None)
        } else {
            (0, None)
        };
    }

    let kind = if best_score > original_alpha {
        Bound::Exact
    } else {
        Bound::FailedLow
    };
    tt.store(lock, best_move, score_to_tt(best_score, ply), depth as i16, kind);

    (best_score, best_move)
}

/// Root entry point: iterative deepening under the given time control.
/// Returns the best move of the deepest *completed* iteration; an
/// exhausted budget mid-iteration discards that iteration's partial
/// result.
pub fn play(
    pos: &mut Position,
    tables: &AttackTables,
    tt: &mut HashTable,
    tc: TimeControl,
) -> SearchReport {
    let (min_depth, max_depth) = tc.depth_range();
    let mut state = SearchState {
        nodes: 0,
        time: TimeManager::new(tc),
    };
    state.time.start();

    let (hits_before, misses_before) = (tt.hits, tt.misses);
    let mut report = SearchReport {
        best_move: None,
        score: 0,
        depth: 0,
        nodes: 0,
        tt_hits: 0,
        tt_misses: 0,
    };
    let mut last_iteration = Duration::ZERO;

    for depth in min_depth..=max_depth {
        // don't start an iteration that cannot finish: the next depth
        // typically costs a few times the previous one
        if depth > min_depth
            && let Some(budget) = state.time.budget()
            && state.time.elapsed() + last_iteration * 3 > budget
        {
            break;
        }

        let iteration_start = Instant::now();
        let (score, best_move) = negamax(pos, tables, tt, &mut state, depth, 0, -INF, INF);
        last_iteration = iteration_start.elapsed();

        if state.time.stopped() {
            break;
        }

        report.score = score;
        report.best_move = best_move;
        report.depth = depth;
        debug!(depth, score, nodes = state.nodes, "iteration complete");

        if let Some(m) = best_move {
            let score_str = if score.abs() >= MATE_THRESHOLD {
                let moves_to_mate = (MATE_SCORE - score.abs() + 1) / 2;
                format!("mate {}", moves_to_mate * score.signum())
            } else {
                format!("cp {score}")
            };
            println!(
                "info depth {} score {} nodes {} time {} pv {}",
                depth,
                score_str,
                state.nodes,
                state.time.elapsed().as_millis(),
                m.to_uci()
            );
        }

        // a found mate cannot improve with depth
        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    report.nodes = state.nodes;
    report.tt_hits = tt.hits - hits_before;
    report.tt_misses = tt.misses - misses_before;
    report
}
