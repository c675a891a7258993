use std::sync::{Arc, Barrier};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, trace};

use crate::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Min,
    Max,
    Sum,
}

impl ReduceOp {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ReduceOp::Min => a.min(b),
            ReduceOp::Max => a.max(b),
            ReduceOp::Sum => a + b,
        }
    }
}

/// A fixed group of cooperating processes.
///
/// `all_reduce` is collective: every member must call it the same number of
/// times, in the same order. A member that skips a call leaves the rest
/// blocked for good.
pub trait Communicator {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;
    fn all_reduce(&self, value: f64, op: ReduceOp) -> Result<f64, Error>;
}

/// Non-distributed execution: one process, nothing to exchange.
#[derive(Copy, Clone, Debug, Default)]
pub struct SoloComm;

impl Communicator for SoloComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_reduce(&self, value: f64, _op: ReduceOp) -> Result<f64, Error> {
        Ok(value)
    }
}

/// One member of an in-process group built by [`local_group`].
pub struct LocalComm {
    rank: usize,
    size: usize,
    // Every other member, by rank. This member's own contribution never
    // crosses a channel.
    peers: Vec<(usize, Sender<(usize, f64)>)>,
    inbox: Receiver<(usize, f64)>,
    barrier: Arc<Barrier>,
}

/// Build a group of `size` ranks that talk over channels. Hand each member to
/// its own thread.
pub fn local_group(size: usize) -> Vec<LocalComm> {
    let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();
    let barrier = Arc::new(Barrier::new(size.max(1)));

    receivers
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| LocalComm {
            rank,
            size,
            peers: senders
                .iter()
                .enumerate()
                .filter(|&(peer, _)| peer != rank)
                .map(|(peer, tx)| (peer, tx.clone()))
                .collect(),
            inbox,
            barrier: barrier.clone(),
        })
        .collect()
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn all_reduce(&self, value: f64, op: ReduceOp) -> Result<f64, Error> {
        debug!(rank = self.rank, size = self.size, ?op, value, "all_reduce");

        for (peer, tx) in &self.peers {
            tx.send((self.rank, value)).map_err(|_| {
                Error::Comm(format!("rank {} lost peer {} during send", self.rank, peer))
            })?;
        }

        let mut slots: Vec<Option<f64>> = vec![None; self.size];
        slots[self.rank] = Some(value);
        for _ in 0..self.peers.len() {
            // Only fails once every other member is gone.
            let (from, v) = self
                .inbox
                .recv()
                .map_err(|_| Error::Comm(format!("rank {} inbox disconnected", self.rank)))?;
            trace!(rank = self.rank, from, v, "all_reduce_recv");
            match slots.get_mut(from) {
                Some(slot) if slot.is_none() => *slot = Some(v),
                _ => {
                    return Err(Error::Comm(format!(
                        "rank {} got an unexpected contribution from rank {}",
                        self.rank, from
                    )))
                }
            }
        }

        // Fold in rank order so every member computes the same bits.
        let result = slots
            .into_iter()
            .flatten()
            .reduce(|acc, v| op.apply(acc, v))
            .unwrap_or(value);

        // Nobody may post the next round until everyone has drained this one.
        self.barrier.wait();
        Ok(result)
    }
}

/// Spread of one timing value across the group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReductionResult {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Min, max and mean of `value` over every rank. Collective.
pub fn reduce_timing<C: Communicator + ?Sized>(comm: &C, value: f64) -> Result<ReductionResult, Error> {
    let size = comm.size();
    if size <= 1 {
        return Ok(ReductionResult {
            min: value,
            max: value,
            avg: value,
        });
    }

    let min = comm.all_reduce(value, ReduceOp::Min)?;
    let max = comm.all_reduce(value, ReduceOp::Max)?;
    let sum = comm.all_reduce(value, ReduceOp::Sum)?;
    // Rounding in the sum can push the mean just past the extremes.
    let avg = (sum / size as f64).max(min).min(max);

    debug!(rank = comm.rank(), min, max, avg, "reduce_timing");
    Ok(ReductionResult { min, max, avg })
}
