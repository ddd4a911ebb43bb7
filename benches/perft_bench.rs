use criterion::{Criterion, criterion_group, criterion_main};
use galena::board::Position;
use galena::moves::attacks::attack_tables;
use galena::moves::movegen::generate_moves;
use galena::moves::perft::perft;
use galena::moves::types::Move;

const KIWI_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_perft(c: &mut Criterion) {
    let tables = attack_tables();

    let mut startpos = Position::new();
    c.bench_function("perft_startpos_d3", |b| {
        b.iter(|| perft(&mut startpos, tables, 3))
    });

    let mut kiwipete: Position = KIWI_FEN.parse().unwrap();
    c.bench_function("perft_kiwipete_d2", |b| {
        b.iter(|| perft(&mut kiwipete, tables, 2))
    });
}

fn bench_movegen(c: &mut Criterion) {
    let tables = attack_tables();

    let startpos = Position::new();
    c.bench_function("movegen_startpos", |b| {
        b.iter(|| {
            let mut moves: Vec<Move> = Vec::with_capacity(64);
            generate_moves(&startpos, tables, &mut moves);
            moves.len()
        })
    });

    let kiwipete: Position = KIWI_FEN.parse().unwrap();
    c.bench_function("movegen_kiwipete", |b| {
        b.iter(|| {
            let mut moves: Vec<Move> = Vec::with_capacity(64);
            generate_moves(&kiwipete, tables, &mut moves);
            moves.len()
        })
    });
}

criterion_group!(benches, bench_perft, bench_movegen);
criterion_main!(benches);
