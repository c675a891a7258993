use report_types::{MatrixStats, Phase, TimingSample};

/// Floating-point operation counts for a whole CG run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpCounts {
    pub total: f64,
    pub ddot: f64,
    pub waxpby: f64,
    pub sparsemv: f64,
    pub precond: f64,
}

impl OpCounts {
    pub fn compute(niters: u64, matrix: &MatrixStats) -> Self {
        let fniters = niters as f64;
        let fnrow = matrix.total_rows;
        let fnnz = matrix.total_nonzeros;

        // 3 ddots, nrow adds + nrow mults each
        let ddot = fniters * 6.0 * fnrow;
        // 3 waxpbys, same shape
        let waxpby = fniters * 6.0 * fnrow;
        // 1 spmv, nnz adds + nnz mults
        let sparsemv = fniters * 2.0 * fnnz;
        // two GS sweeps, only the lower triangle counts for the first
        let precond = fniters * 3.0 * fnnz;

        Self {
            total: ddot + waxpby + sparsemv + precond,
            ddot,
            waxpby,
            sparsemv,
            precond,
        }
    }
}

/// Millions of operations per second.
///
/// Returns `None` when the quotient is not a finite number, which covers a zero
/// elapsed time. Callers report that as undefined rather than a clamped value.
pub fn rate(ops: f64, seconds: f64) -> Option<f64> {
    let r = ops / seconds / 1.0E6;
    r.is_finite().then_some(r)
}

/// `part` as a percentage of `whole`, with the same sentinel rule as [`rate`].
pub fn percent(part: f64, whole: f64) -> Option<f64> {
    let p = part / whole * 100.0;
    p.is_finite().then_some(p)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rates {
    pub total: Option<f64>,
    pub ddot: Option<f64>,
    pub waxpby: Option<f64>,
    pub sparsemv: Option<f64>,
    pub precond: Option<f64>,
}

impl Rates {
    pub fn compute(ops: &OpCounts, times: &TimingSample) -> Self {
        Self {
            total: rate(ops.total, times.get(Phase::Total)),
            ddot: rate(ops.ddot, times.get(Phase::Ddot)),
            waxpby: rate(ops.waxpby, times.get(Phase::Waxpby)),
            sparsemv: rate(ops.sparsemv, times.get(Phase::SparseMv)),
            precond: rate(ops.precond, times.get(Phase::Precond)),
        }
    }
}

/// Sparse MV cost once halo exchange and setup are charged to it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SparseMvOverheads {
    pub total_time: f64,
    pub mflops_with_overhead: Option<f64>,
    pub overhead_time: f64,
    pub overhead_pct: Option<f64>,
    pub setup_time: f64,
    pub setup_pct: Option<f64>,
    pub exchange_time: f64,
    pub exchange_pct: Option<f64>,
}

impl SparseMvOverheads {
    pub fn compute(ops: &OpCounts, times: &TimingSample) -> Self {
        let setup_time = times.get(Phase::Setup);
        let exchange_time = times.get(Phase::BoundaryExchange);
        let total_time = times.get(Phase::SparseMv) + exchange_time + setup_time;
        let overhead_time = setup_time + exchange_time;

        Self {
            total_time,
            mflops_with_overhead: rate(ops.sparsemv, total_time),
            overhead_time,
            overhead_pct: percent(overhead_time, total_time),
            setup_time,
            setup_pct: percent(setup_time, total_time),
            exchange_time,
            exchange_pct: percent(exchange_time, total_time),
        }
    }
}
