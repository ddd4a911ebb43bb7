use galena::board::{Color, Figure, Piece};
use galena::moves::types::{Move, MoveKind};
use galena::search::tt::{Bound, HashEntry, HashTable};
use galena::square::Square;

fn some_move(from: u8, to: u8) -> Move {
    Move {
        from: Square::from_index(from),
        to: Square::from_index(to),
        kind: MoveKind::Normal,
        capture: Piece::NONE,
        target: Piece::new(Color::White, Figure::Knight),
        saved_castle: 0,
        saved_enpassant: Square::A1,
    }
}

#[test]
fn capacity_is_a_power_of_two_within_budget() {
    for mib in [1, 2, 8, 32] {
        let tt = HashTable::new(mib);
        let capacity = tt.capacity();
        assert!(capacity.is_power_of_two());
        assert!(capacity * std::mem::size_of::<HashEntry>() <= mib * 1024 * 1024);
        assert!(
            capacity * 2 * std::mem::size_of::<HashEntry>() > mib * 1024 * 1024,
            "capacity should be the largest fitting power of two"
        );
    }
}

#[test]
fn store_then_probe_returns_the_entry() {
    let mut tt = HashTable::new(1);
    let lock = 0xDEAD_BEEF_0123_4567;
    let m = some_move(1, 18);

    assert!(tt.probe(lock).is_none());
    tt.store(lock, Some(m), 42, 5, Bound::Exact);

    let entry = tt.probe(lock).expect("stored entry must probe back");
    assert_eq!(entry.lock, lock);
    assert_eq!(entry.score, 42);
    assert_eq!(entry.depth, 5);
    assert_eq!(entry.mv, Some(m));
    assert_eq!(entry.kind, Bound::Exact);
}

#[test]
fn probe_counts_hits_and_misses() {
    let mut tt = HashTable::new(1);
    let lock = 0x1234_5678_9ABC_DEF0;

    assert!(tt.probe(lock).is_none());
    assert_eq!((tt.hits, tt.misses), (0, 1));

    tt.store(lock, None, 0, 1, Bound::Exact);
    tt.probe(lock);
    tt.probe(lock);
    assert_eq!((tt.hits, tt.misses), (2, 1));
}

#[test]
fn colliding_lock_is_a_silent_miss() {
    let mut tt = HashTable::new(1);
    let capacity = tt.capacity() as u64;
    let lock_a = 77;
    let lock_b = 77 + capacity; // same slot, different lock

    tt.store(lock_a, None, 10, 8, Bound::Exact);
    assert!(tt.probe(lock_b).is_none(), "collision must read as a miss");

    let entry = tt.probe(lock_a).expect("original entry intact");
    assert_eq!(entry.score, 10);
}

#[test]
fn shallow_result_does_not_evict_a_much_deeper_one() {
    let mut tt = HashTable::new(1);
    let capacity = tt.capacity() as u64;
    let deep_lock = 99;
    let shallow_lock = 99 + capacity;

    tt.store(deep_lock, Some(some_move(1, 18)), 55, 9, Bound::Exact);
    // depth 3 < 9 - 1: the write is refused
    tt.store(shallow_lock, None, -20, 3, Bound::FailedLow);

    let entry = tt.probe(deep_lock).expect("deep entry survives");
    assert_eq!(entry.score, 55);
    assert!(tt.probe(shallow_lock).is_none());
}

#[test]
fn near_depth_result_replaces_per_policy() {
    let mut tt = HashTable::new(1);
    let capacity = tt.capacity() as u64;
    let old_lock = 41;
    let new_lock = 41 + capacity;

    tt.store(old_lock, None, 1, 6, Bound::Exact);
    // depth 5 >= 6 - 1: replace-always-plus-depth lets this in
    tt.store(new_lock, None, 2, 5, Bound::FailedHigh);

    assert!(tt.probe(old_lock).is_none());
    let entry = tt.probe(new_lock).expect("newer entry won the slot");
    assert_eq!(entry.score, 2);
    assert_eq!(entry.kind, Bound::FailedHigh);
}

#[test]
fn same_lock_always_refreshes_but_keeps_a_move() {
    let mut tt = HashTable::new(1);
    let lock = 31337;
    let m = some_move(12, 28);

    tt.store(lock, Some(m), 5, 9, Bound::Exact);
    // same position, shallower bound-only result: still written, but the
    // known best move is preserved
    tt.store(lock, None, 7, 2, Bound::FailedHigh);

    let entry = tt.probe(lock).expect("entry present");
    assert_eq!(entry.depth, 2);
    assert_eq!(entry.kind, Bound::FailedHigh);
    assert_eq!(entry.mv, Some(m));
}

#[test]
fn clear_resets_entries_and_counters() {
    let mut tt = HashTable::new(1);
    tt.store(123, None, 9, 3, Bound::Exact);
    tt.probe(123);
    tt.clear();
    assert_eq!((tt.hits, tt.misses), (0, 0));
    assert!(tt.probe(123).is_none());
}
