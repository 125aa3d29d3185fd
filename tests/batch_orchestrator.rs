mod common;

use common::{FakeSolver, positions};
use edax_batch::{BatchOrchestrator, Error, ExecutionError, PositionRecord, solve_batch};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Fields that do not depend on where the position sat in its report.
fn outcome(r: &PositionRecord) -> (u32, Option<u8>, i32, u64, Option<u64>, Vec<String>) {
    (r.depth, r.selectivity, r.score, r.nodes, r.nodes_per_second, r.pv.clone())
}

#[test]
fn output_matches_input_order() {
    let solver = Arc::new(FakeSolver {
        reverse_delay: true,
        ..FakeSolver::new()
    });
    let input = positions(20);
    let records = solve_batch(solver.clone(), &input, 5).unwrap();

    assert_eq!(records.len(), 20);
    assert_eq!(solver.calls.load(Ordering::SeqCst), 5);
    for (pos, rec) in input.iter().zip(&records) {
        let alone = FakeSolver::report(std::slice::from_ref(pos));
        let alone = edax_batch::parse_report(&alone).unwrap();
        assert_eq!(outcome(rec), outcome(&alone.records[0]), "position {pos}");
    }
}

#[test]
fn partition_invariance() {
    let input = positions(37);
    let single = solve_batch(FakeSolver::new(), &input, 1).unwrap();
    for p in [2, 3, 8, 64] {
        let chunked = solve_batch(FakeSolver::new(), &input, p).unwrap();
        let a: Vec<_> = single.iter().map(outcome).collect();
        let b: Vec<_> = chunked.iter().map(outcome).collect();
        assert_eq!(a, b, "parallelism {p}");
    }
}

#[test]
fn sequence_index_is_local_to_chunk() {
    let records = solve_batch(FakeSolver::new(), &positions(6), 2).unwrap();
    let indices: Vec<u32> = records.iter().map(|r| r.sequence_index).collect();
    assert_eq!(indices, [1, 2, 3, 1, 2, 3]);
}

#[test]
fn chunks_run_concurrently() {
    // Each call waits until all three are in flight, which only happens if
    // the chunks really run side by side.
    let solver = Arc::new(FakeSolver {
        rendezvous: Some(3),
        ..FakeSolver::new()
    });
    let records = solve_batch(solver.clone(), &positions(12), 3).unwrap();
    assert_eq!(records.len(), 12);
    assert!(!solver.rendezvous_missed.load(Ordering::SeqCst));
    assert_eq!(solver.max_in_flight.load(Ordering::SeqCst), 3);
}

#[test]
fn in_flight_bounded_by_parallelism() {
    let solver = Arc::new(FakeSolver {
        delay: Duration::from_millis(30),
        ..FakeSolver::new()
    });
    let orch = BatchOrchestrator::with_parallelism(solver.clone(), 3).unwrap();
    // Two batches of three chunks compete for the same three workers.
    std::thread::scope(|s| {
        for _ in 0..2 {
            s.spawn(|| orch.solve(&positions(12)).unwrap());
        }
    });
    assert_eq!(solver.calls.load(Ordering::SeqCst), 6);
    let max = solver.max_in_flight.load(Ordering::SeqCst);
    assert!((1..=3).contains(&max), "max in flight {max}");
}

#[test]
fn single_position() {
    let orch = BatchOrchestrator::with_parallelism(FakeSolver::new(), 4).unwrap();
    let records = orch.solve_one("p42").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(orch.solver().calls.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_batch_skips_solver() {
    let orch = BatchOrchestrator::with_parallelism(FakeSolver::new(), 4).unwrap();
    assert!(orch.solve(&[]).unwrap().is_empty());
    assert_eq!(orch.solver().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failing_chunk_fails_batch() {
    let solver = Arc::new(FakeSolver {
        fail_on: Some("p7".into()),
        ..FakeSolver::new()
    });
    let err = solve_batch(solver.clone(), &positions(12), 4).unwrap_err();
    match err {
        Error::Execution(ExecutionError::Exit { stderr, .. }) => assert!(stderr.contains("p7")),
        other => panic!("unexpected error: {other:?}"),
    }
    // Siblings are not cancelled.
    assert_eq!(solver.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn lowest_failing_chunk_wins() {
    struct FailAll;
    impl edax_batch::Solver for FailAll {
        fn run(&self, positions: &[String]) -> Result<String, ExecutionError> {
            Err(ExecutionError::Exit {
                status: "exit status: 2".into(),
                stderr: positions[0].clone(),
            })
        }
    }
    let err = solve_batch(FailAll, &positions(8), 4).unwrap_err();
    assert!(err.to_string().contains("p0"), "{err}");
}

#[test]
fn record_count_mismatch() {
    let solver = FakeSolver {
        drop_last_line: true,
        ..FakeSolver::new()
    };
    let err = solve_batch(solver, &positions(4), 2).unwrap_err();
    assert!(matches!(
        err,
        Error::RecordCountMismatch {
            chunk: 0,
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn invalid_position_rejected_before_solving() {
    let orch = BatchOrchestrator::with_parallelism(FakeSolver::new(), 2).unwrap();
    let err = orch.solve(&["p1".to_string(), "p2\np3".to_string()]).unwrap_err();
    assert!(matches!(err, Error::InvalidPosition { .. }));
    assert_eq!(orch.solver().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn detailed_report_per_chunk() {
    let orch = BatchOrchestrator::with_parallelism(FakeSolver::new(), 3).unwrap();
    let out = orch.solve_detailed(&positions(8)).unwrap();
    assert_eq!(out.records.len(), 8);
    let ranges: Vec<(usize, usize)> = out
        .report
        .chunk_reports
        .iter()
        .map(|c| (c.start, c.end))
        .collect();
    assert_eq!(ranges, [(0, 3), (3, 6), (6, 8)]);
    assert_eq!(out.report.total_nodes(), 3000);
}

#[test]
fn solve_report_is_one_invocation() {
    let orch = BatchOrchestrator::with_parallelism(FakeSolver::new(), 4).unwrap();
    let summary = orch.solve_report(&positions(9)).unwrap();
    assert_eq!(summary.records.len(), 9);
    assert_eq!(summary.nodes_per_second, Some(100000));
    assert_eq!(orch.solver().calls.load(Ordering::SeqCst), 1);
}
