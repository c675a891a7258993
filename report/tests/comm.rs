use std::thread;

use proptest::prelude::*;
use report::{local_group, reduce_timing, Communicator, Error, ReduceOp, ReductionResult, SoloComm};

/// Run `reduce_timing` on a thread-backed group, one value per rank.
fn reduce_across(values: &[f64]) -> Vec<ReductionResult> {
    let group = local_group(values.len());
    thread::scope(|scope| {
        let handles: Vec<_> = group
            .iter()
            .zip(values)
            .map(|(comm, &v)| scope.spawn(move || reduce_timing(comm, v).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// A stand-in for a remote group: this rank's value plus fixed peer values.
struct MockComm {
    rank: usize,
    peers: Vec<f64>,
}

impl Communicator for MockComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len() + 1
    }

    fn all_reduce(&self, value: f64, op: ReduceOp) -> Result<f64, Error> {
        Ok(self.peers.iter().fold(value, |acc, &v| op.apply(acc, v)))
    }
}

#[test]
fn test_solo_reduction_is_identity() {
    let r = reduce_timing(&SoloComm, 0.125).unwrap();
    assert_eq!(r, ReductionResult { min: 0.125, max: 0.125, avg: 0.125 });
}

#[test]
fn test_single_member_group_is_identity() {
    let r = reduce_across(&[3.5]);
    assert_eq!(r, vec![ReductionResult { min: 3.5, max: 3.5, avg: 3.5 }]);
}

#[test]
fn test_group_reduction_matches_on_every_rank() {
    let results = reduce_across(&[0.4, 0.1, 0.7, 0.2]);
    assert_eq!(results.len(), 4);
    for r in &results {
        assert_eq!(r.min, 0.1);
        assert_eq!(r.max, 0.7);
        assert!((r.avg - 0.35).abs() < 1e-12);
        assert_eq!(r, &results[0]);
    }
}

#[test]
fn test_repeated_collectives_do_not_mix_rounds() {
    let group = local_group(3);
    let sums: Vec<Vec<f64>> = thread::scope(|scope| {
        let handles: Vec<_> = group
            .iter()
            .map(|comm| {
                scope.spawn(move || {
                    (0..50)
                        .map(|round| {
                            let v = (comm.rank() * 100 + round) as f64;
                            comm.all_reduce(v, ReduceOp::Sum).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for per_rank in &sums {
        for (round, &s) in per_rank.iter().enumerate() {
            assert_eq!(s, (300 + 3 * round) as f64);
        }
    }
}

#[test]
fn test_identical_values_give_identical_mean() {
    // 0.1 + 0.1 + 0.1 rounds above 0.3, so the raw mean overshoots 0.1.
    for r in reduce_across(&[0.1, 0.1, 0.1]) {
        assert_eq!(r, ReductionResult { min: 0.1, max: 0.1, avg: 0.1 });
    }
}

#[test]
fn test_departed_peer_is_a_comm_error() {
    let mut group = local_group(2);
    drop(group.pop());
    let survivor = &group[0];

    match survivor.all_reduce(1.0, ReduceOp::Sum) {
        Err(Error::Comm(msg)) => assert!(msg.contains("rank 0")),
        other => panic!("expected comm error, got {:?}", other),
    }
}

#[test]
fn test_mock_group_reduction() {
    let comm = MockComm { rank: 2, peers: vec![1.0, 5.0, 3.0] };
    let r = reduce_timing(&comm, 3.0).unwrap();
    assert_eq!(r.min, 1.0);
    assert_eq!(r.max, 5.0);
    assert_eq!(r.avg, 3.0);
}

#[test]
fn test_reduce_op_apply() {
    assert_eq!(ReduceOp::Min.apply(2.0, 1.0), 1.0);
    assert_eq!(ReduceOp::Max.apply(2.0, 1.0), 2.0);
    assert_eq!(ReduceOp::Sum.apply(2.0, 1.0), 3.0);
}

proptest! {
    #[test]
    fn test_min_avg_max_ordering(values in prop::collection::vec(0.0f64..1.0e3, 1..6)) {
        let results = reduce_across(&values);
        for r in &results {
            prop_assert!(r.min <= r.avg);
            prop_assert!(r.avg <= r.max);
            prop_assert_eq!(r, &results[0]);
        }
    }
}
