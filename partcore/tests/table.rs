use partcore::*;

#[test]
fn initialize_carves_equal_partitions() {
    let t = BlockTable::initialize(96, 16).unwrap();
    assert_eq!(t.len(), 6);
    assert_eq!(t.total_free(), 96);
    for (idx, b) in t.snapshot().iter().enumerate() {
        assert_eq!(b.id(), idx + 1);
        assert_eq!(b.capacity(), 16);
        assert_eq!(b.free(), 16);
        assert_eq!(b.start_offset(), idx * 16);
    }
}

#[test]
fn initialize_rejects_indivisible_sizes() {
    assert_eq!(
        BlockTable::initialize(100, 16),
        Err(ConfigError::Indivisible { total: 100, partition: 16 })
    );
    assert_eq!(
        BlockTable::initialize(0, 16),
        Err(ConfigError::Indivisible { total: 0, partition: 16 })
    );
    assert_eq!(BlockTable::initialize(96, 0), Err(ConfigError::ZeroPartition));
}

#[test]
fn explicit_capacities_are_laid_out_back_to_back() {
    let t = BlockTable::from_capacities(&[100, 500, 200]).unwrap();
    let offsets: Vec<Units> = t.snapshot().iter().map(|b| b.start_offset()).collect();
    assert_eq!(offsets, vec![0, 100, 600]);
    assert_eq!(t.total_capacity(), 800);

    assert_eq!(BlockTable::from_capacities(&[]), Err(ConfigError::NoBlocks));
    assert_eq!(BlockTable::from_capacities(&[4, 0]), Err(ConfigError::ZeroCapacity(2)));
}

#[test]
fn commit_shrinks_the_block_and_moves_its_offset() {
    let mut t = BlockTable::from_capacities(&[100, 500]).unwrap();
    let c = t.commit(2, 120).unwrap();
    assert_eq!(c, Commit {
        block:          2,
        amount:         120,
        free_before:    500,
        free_after:     380,
        start_offset:   100,
    });

    let c = t.commit(2, 80).unwrap();
    assert_eq!(c.start_offset, 220);
    assert_eq!(t.snapshot().get(2).unwrap().start_offset(), 300);
    assert_eq!(t.snapshot().get(2).unwrap().used(), 200);
    assert_eq!(t.total_free(), 400);
}

#[test]
fn commit_rejects_what_does_not_fit() {
    let mut t = BlockTable::from_capacities(&[16]).unwrap();
    t.commit(1, 10).unwrap();
    let before = t.clone();

    assert_eq!(
        t.commit(1, 7),
        Err(CommitError::Insufficient { block: 1, requested: 7, free: 6 })
    );
    assert_eq!(t.commit(1, 0), Err(CommitError::ZeroAmount));
    assert_eq!(t.commit(2, 1), Err(CommitError::UnknownBlock(2)));
    assert_eq!(t.commit(0, 1), Err(CommitError::UnknownBlock(0)));
    assert_eq!(t, before);

    // Exactly what is left is fine.
    let c = t.commit(1, 6).unwrap();
    assert_eq!(c.free_after, 0);
}

#[test]
fn clamping_is_opt_in() {
    let mut t = BlockTable::from_capacities(&[20, 20])
        .unwrap()
        .with_policy(CommitPolicy::ClampToZero);
    let c = t.commit(1, 30).unwrap();
    assert_eq!(c.amount, 20);
    assert_eq!(c.free_before, 20);
    assert_eq!(c.free_after, 0);
    assert_eq!(t.snapshot().get(1).unwrap().start_offset(), 20);
    assert_eq!(t.total_free(), 20);

    assert_eq!(BlockTable::from_capacities(&[1]).unwrap().policy(), CommitPolicy::Reject);
}

#[test]
fn commits_never_exceed_capacity() {
    let mut t = BlockTable::initialize(128, 16).unwrap();
    let mut committed = vec![0; t.len()];
    for step in 0..400 {
        let block = step % t.len() + 1;
        let amount = step % 7 + 1;
        if let Ok(c) = t.commit(block, amount) {
            committed[block - 1] += c.amount;
        }
    }
    for b in t.snapshot().iter() {
        assert!(committed[b.id() - 1] <= b.capacity());
        assert_eq!(b.free(), b.capacity() - committed[b.id() - 1]);
    }
}

#[test]
fn listing_marks_exhausted_blocks() {
    let mut t = BlockTable::from_capacities(&[16, 16]).unwrap();
    t.commit(1, 16).unwrap();
    t.commit(2, 4).unwrap();
    assert_eq!(t.listing(), vec![
        BlockRow { id: 1, free: 0,  start_offset: 16, allocated: true },
        BlockRow { id: 2, free: 12, start_offset: 20, allocated: false },
    ]);
    assert_eq!(t.to_string(), "[0, 12]");
}

#[test]
fn split_never_yields_empty_segments() {
    assert_eq!(split(37, 16), vec![16, 16, 5]);
    assert_eq!(split(32, 16), vec![16, 16]);
    assert_eq!(split(16, 16), vec![16]);
    assert_eq!(split(1, 16), vec![1]);
    assert!(split(0, 16).is_empty());
    for size in 1..200 {
        let parts = split(size, 16);
        assert_eq!(parts.iter().sum::<Units>(), size);
        assert!(parts.iter().all(|&p| p > 0 && p <= 16));
    }
}

#[test]
#[should_panic(expected = "zero partition size")]
fn split_refuses_zero_partitions() {
    split(37, 0);
}

#[test]
fn processes_own_their_segments() {
    let p = Process::new(3, 37, 16, Segmentation::Partitioned);
    let ids: Vec<usize> = p.segments.iter().map(|s| s.id).collect();
    let sizes: Vec<Units> = p.segments.iter().map(|s| s.size).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(sizes, vec![16, 16, 5]);
    assert!(p.segments.iter().all(|s| s.state() == SegmentState::Unassigned));
    assert_eq!(p.pending_size(), 37);
    assert!(!p.is_settled());

    let whole = Process::new(1, 37, 16, Segmentation::Whole);
    assert_eq!(whole.segments.len(), 1);
    assert_eq!(whole.segments[0].size, 37);
}
