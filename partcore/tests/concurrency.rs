use std::sync::Mutex;
use std::thread;

use partcore::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

const WORKERS: u64 = 16;
const ATTEMPTS: usize = 200;

#[test]
fn racing_commits_never_oversubscribe_a_block() {
    let shared = SharedTable::new(BlockTable::from_capacities(&[1000]).unwrap(), Box::new(FirstFit));
    let granted = Mutex::new(Vec::new());

    thread::scope(|s| {
        for w in 0..WORKERS {
            let shared = &shared;
            let granted = &granted;
            s.spawn(move || {
                let mut rng = StdRng::seed_from_u64(w);
                for _ in 0..ATTEMPTS {
                    let amount = rng.gen_range(1..=40);
                    let res = shared.transact(|table, _| table.commit(1, amount)).unwrap();
                    if let Ok(c) = res {
                        assert_eq!(c.amount, amount);
                        granted.lock().unwrap().push(c);
                    }
                }
            });
        }
    });

    let granted = granted.into_inner().unwrap();
    let total: Units = granted.iter().map(|c| c.amount).sum();
    let table = shared.snapshot().unwrap();
    assert!(total <= 1000);
    assert_eq!(table.total_free(), 1000 - total);

    // Every granted range is disjoint from every other one.
    let mut ranges: Vec<(Units, Units)> = granted.iter()
        .map(|c| (c.start_offset, c.start_offset + c.amount))
        .collect();
    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
}

#[test]
fn racing_placements_keep_every_block_consistent() {
    let caps = vec![64; 12];
    let shared = SharedTable::new(BlockTable::from_capacities(&caps).unwrap(), Box::new(NextFit::new()));
    let granted = Mutex::new(vec![0; caps.len()]);

    thread::scope(|s| {
        for w in 0..WORKERS {
            let shared = &shared;
            let granted = &granted;
            s.spawn(move || {
                let mut rng = StdRng::seed_from_u64(100 + w);
                for _ in 0..ATTEMPTS {
                    let size = rng.gen_range(1..=70);
                    if let Placement::Placed(c) = shared.place(size).unwrap() {
                        granted.lock().unwrap()[c.block - 1] += c.amount;
                    }
                }
            });
        }
    });

    let granted = granted.into_inner().unwrap();
    let table = shared.teardown().unwrap();
    for b in table.snapshot().iter() {
        assert!(granted[b.id() - 1] <= b.capacity());
        assert_eq!(b.free(), b.capacity() - granted[b.id() - 1]);
    }
}

#[test]
fn concurrent_engine_matches_the_table() {
    let config = SimConfig {
        execution:  Execution::Concurrent,
        seed:       Some(9),
        ..SimConfig::default()
    };
    let engine = AllocationEngine::new(BlockTable::initialize(256, 16).unwrap(), &config);
    let sizes = [40, 17, 90, 33, 20, 12, 44];
    let (processes, report) = engine.run(&sizes).unwrap();

    // Within a process, segments stay in order.
    for (pid, records) in report.by_process() {
        let ids: Vec<usize> = records.iter().map(|r| r.segment_id).collect();
        let expected: Vec<usize> = (1..=processes[pid - 1].segments.len()).collect();
        assert_eq!(ids, expected);
    }
    assert!(processes.iter().all(Process::is_settled));

    let table = engine.shared().teardown().unwrap();
    assert_eq!(table.total_free(), 256 - report.committed_total());
    let placed: Units = report.placed().map(|r| r.segment_size).sum();
    assert_eq!(placed, report.committed_total());
}

#[test]
fn teardown_is_idempotent() {
    let shared = SharedTable::new(BlockTable::initialize(96, 16).unwrap(), Box::new(BestFit));
    shared.place(10).unwrap();
    assert!(!shared.is_torn_down());

    let released = shared.teardown().unwrap();
    assert_eq!(released.total_free(), 86);
    assert!(shared.is_torn_down());
    assert!(shared.teardown().is_none());
    assert_eq!(shared.place(1), Err(ResourceError::TornDown));
    assert_eq!(shared.listing(), Err(ResourceError::TornDown));
}

#[test]
fn a_panicking_worker_poisons_the_table() {
    let shared = SharedTable::new(BlockTable::initialize(96, 16).unwrap(), Box::new(BestFit));
    let res = thread::scope(|s| {
        s.spawn(|| {
            let _: Result<(), _> = shared.transact(|_, _| panic!("worker died mid-transaction"));
        })
        .join()
    });
    assert!(res.is_err());
    assert_eq!(shared.total_free(), Err(ResourceError::Poisoned));
    // Cleanup still goes through.
    assert!(shared.teardown().is_some());
    assert!(shared.is_torn_down());
}
