use galena::board::{Position, matches_bm, parse_epd};
use galena::logger::init_logging;
use galena::moves::attacks::{AttackTables, attack_tables};
use galena::moves::execute::{do_move, generate_legal};
use galena::moves::perft::{perft, perft_divide};
use galena::moves::types::Move;
use galena::search::search::{MAX_DEPTH, TimeControl, play};
use galena::search::tt::{DEFAULT_HASH_MIB, HashTable};
use std::io::{self, BufRead};
use std::time::Duration;
use tracing::info;

fn main() {
    init_logging("logs/galena.log", "info");

    // magic + attack table generation happens here, once
    let tables = attack_tables();
    info!("attack tables ready");

    let mut pos = Position::new();
    let mut tt = HashTable::new(DEFAULT_HASH_MIB);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "uci" => handle_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => {
                pos = Position::new();
                tt.clear();
            }
            "setoption" => handle_setoption(&parts, &mut tt),
            "position" => {
                if let Some(new_pos) = handle_position(&parts, tables) {
                    pos = new_pos;
                }
            }
            "go" => handle_go(&parts, &mut pos, tables, &mut tt),
            "perft" => {
                let depth = parts.get(1).and_then(|d| d.parse().ok()).unwrap_or(1);
                println!("{}", perft(&mut pos, tables, depth));
            }
            "divide" => {
                let depth = parts.get(1).and_then(|d| d.parse().ok()).unwrap_or(1);
                perft_divide(&mut pos, tables, depth);
            }
            "puzzle" => {
                if let Some(path) = parts.get(1) {
                    run_puzzles(path, tables);
                } else {
                    eprintln!("usage: puzzle <epd-file>");
                }
            }
            "d" | "display" | "fen" => println!("{pos}"),
            "quit" => break,
            _ => {}
        }
    }
}

fn handle_uci() {
    println!("id name galena {}", env!("CARGO_PKG_VERSION"));
    println!("id author galena contributors");
    println!("option name Hash type spin default {DEFAULT_HASH_MIB} min 1 max 1024");
    println!("uciok");
}

fn handle_setoption(parts: &[&str], tt: &mut HashTable) {
    // setoption name Hash value <MiB>
    let name = parts.iter().position(|&p| p == "name").map(|i| parts.get(i + 1));
    let value = parts.iter().position(|&p| p == "value").map(|i| parts.get(i + 1));
    if let (Some(Some(&"Hash")), Some(Some(v))) = (name, value)
        && let Ok(mib) = v.parse::<usize>()
    {
        *tt = HashTable::new(mib.clamp(1, 1024));
        info!(mib, entries = tt.capacity(), "hash table resized");
    }
}

fn handle_position(parts: &[&str], tables: &AttackTables) -> Option<Position> {
    let mut pos = if parts.get(1) == Some(&"fen") {
        let end = parts
            .iter()
            .position(|&p| p == "moves")
            .unwrap_or(parts.len());
        let fen = parts[2..end].join(" ");
        match fen.parse::<Position>() {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("bad fen: {err}");
                return None;
            }
        }
    } else {
        Position::new()
    };

    if let Some(moves_at) = parts.iter().position(|&p| p == "moves") {
        for token in &parts[moves_at + 1..] {
            match find_legal_move(&mut pos, token, tables) {
                Some(m) => do_move(&mut pos, m),
                None => {
                    eprintln!("illegal move in position command: {token}");
                    return None;
                }
            }
        }
    }
    Some(pos)
}

/// Resolves a long-algebraic token against the legal moves.
fn find_legal_move(pos: &mut Position, token: &str, tables: &AttackTables) -> Option<Move> {
    let mut legal: Vec<Move> = Vec::new();
    let mut scratch: Vec<Move> = Vec::new();
    generate_legal(pos, tables, &mut legal, &mut scratch);
    legal.into_iter().find(|m| m.to_uci() == token)
}

fn handle_go(parts: &[&str], pos: &mut Position, tables: &AttackTables, tt: &mut HashTable) {
    let field = |name: &str| -> Option<u64> {
        parts
            .iter()
            .position(|&p| p == name)
            .and_then(|i| parts.get(i + 1))
            .and_then(|v| v.parse().ok())
    };

    let tc = if let Some(depth) = field("depth") {
        TimeControl::FixedDepth {
            min_depth: 1,
            max_depth: depth as i32,
        }
    } else if let Some(nodes) = field("nodes") {
        TimeControl::FixedNodes { nodes }
    } else if let Some(ms) = field("movetime") {
        TimeControl::OnClock {
            remaining: Duration::from_millis(ms),
            increment: Duration::ZERO,
            moves_to_go: 1,
        }
    } else {
        let (time_field, inc_field) = match pos.to_move {
            galena::board::Color::White => ("wtime", "winc"),
            galena::board::Color::Black => ("btime", "binc"),
        };
        match field(time_field) {
            Some(ms) => TimeControl::OnClock {
                remaining: Duration::from_millis(ms),
                increment: Duration::from_millis(field(inc_field).unwrap_or(0)),
                moves_to_go: field("movestogo").unwrap_or(30) as u32,
            },
            // bare "go" / "go infinite"
            None => TimeControl::FixedDepth {
                min_depth: 1,
                max_depth: MAX_DEPTH,
            },
        }
    };

    let report = play(pos, tables, tt, tc);
    info!(
        depth = report.depth,
        score = report.score,
        nodes = report.nodes,
        tt_hits = report.tt_hits,
        tt_misses = report.tt_misses,
        "search finished"
    );
    match report.best_move {
        Some(m) => println!("bestmove {}", m.to_uci()),
        None => println!("bestmove 0000"),
    }
}

/// Runs an EPD best-move suite: one position per line with a `bm`
/// operation, searched at fixed depth and compared leniently.
fn run_puzzles(path: &str, tables: &AttackTables) {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            return;
        }
    };

    let mut solved = 0u32;
    let mut total = 0u32;
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let (mut pos, best_moves) = match parse_epd(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                eprintln!("skipping bad EPD line: {err}");
                continue;
            }
        };
        total += 1;

        let mut tt = HashTable::new(DEFAULT_HASH_MIB);
        let report = play(
            &mut pos,
            tables,
            &mut tt,
            TimeControl::FixedDepth {
                min_depth: 1,
                max_depth: 6,
            },
        );

        let found = report
            .best_move
            .map(|m| best_moves.iter().any(|bm| matches_bm(m, bm)))
            .unwrap_or(false);
        if found {
            solved += 1;
        }
        let played = report.best_move.map_or("(none)".into(), |m| m.to_uci());
        println!(
            "{} expected [{}] got {} -> {}",
            pos.to_fen(),
            best_moves.join(" "),
            played,
            if found { "ok" } else { "MISS" }
        );
    }
    println!("solved {solved}/{total}");
}
