use report_types::{MatrixStats, Phase, ReportConfig, RunContext, TimingSample};
use tracing::{debug, info, info_span};

use crate::comm::{reduce_timing, Communicator, ReductionResult};
use crate::metrics::{OpCounts, Rates, SparseMvOverheads};
use crate::tree::Report;
use crate::writer::writer_for;
use crate::Error;

/// Rank that assembles and emits the report.
pub const REPORT_OWNER: usize = 0;

/// End-of-run summary. Every rank must call this: it contains a collective.
///
/// Returns the serialized report on rank 0 and `None` everywhere else. The
/// DDOT timing spread and the sparse MV overhead sections only appear when
/// `ctx.process_count > 1`.
pub fn report_results<C: Communicator + ?Sized>(
    comm: &C,
    ctx: &RunContext,
    matrix: &MatrixStats,
    niters: u64,
    normr: f64,
    times: &TimingSample,
    config: &ReportConfig,
) -> Result<Option<String>, Error> {
    let _span = info_span!("report_results", rank = ctx.rank).entered();

    if ctx.rank != comm.rank() || ctx.process_count != comm.size() {
        return Err(Error::InvalidConfig(format!(
            "run context says rank {} of {}, communicator says rank {} of {}",
            ctx.rank,
            ctx.process_count,
            comm.rank(),
            comm.size()
        )));
    }

    let variations = reduce_timing(comm, times.get(Phase::DdotAllreduce))?;

    if ctx.rank != REPORT_OWNER {
        debug!("not the report owner");
        return Ok(None);
    }

    let variations = (ctx.process_count > 1).then_some(&variations);
    let report = build_report(ctx, matrix, niters, normr, times, variations, config)?;
    let text = writer_for(config.format).write(&report)?;

    info!(bytes = text.len(), format = ?config.format, "report_emitted");
    if config.echo {
        print!("{}", text);
    }
    Ok(Some(text))
}

pub fn build_report(
    ctx: &RunContext,
    matrix: &MatrixStats,
    niters: u64,
    normr: f64,
    times: &TimingSample,
    variations: Option<&ReductionResult>,
    config: &ReportConfig,
) -> Result<Report, Error> {
    let ops = OpCounts::compute(niters, matrix);
    let rates = Rates::compute(&ops, times);
    debug!(?ops, "derived_metrics");

    let mut doc = Report::new(config.name.as_str(), config.version.as_str());
    let root = &mut doc.root;

    root.add_section("Machine Summary", |s| {
        s.add("Distributed Processes", ctx.process_count)?;
        s.add("Threaded Processes   ", ctx.threads_per_process)
    })?;

    root.add_section("Dimensions", |s| {
        s.add("nx", ctx.nx)?;
        s.add("ny", ctx.ny)?;
        s.add("nz", ctx.nz)
    })?;

    root.add("Number of iterations: ", niters)?;
    root.add("Final residual: ", normr)?;
    root.add("********** Performance Summary (times in sec) ***********", "")?;

    root.add_section("Time Summary", |s| {
        s.add("Total   ", times.get(Phase::Total))?;
        s.add("DDOT    ", times.get(Phase::Ddot))?;
        s.add("WAXPBY  ", times.get(Phase::Waxpby))?;
        s.add("SPARSEMV", times.get(Phase::SparseMv))?;
        s.add("PRECOND ", times.get(Phase::Precond))
    })?;

    root.add_section("FLOPS Summary", |s| {
        s.add("Total   ", ops.total)?;
        s.add("DDOT    ", ops.ddot)?;
        s.add("WAXPBY  ", ops.waxpby)?;
        s.add("SPARSEMV", ops.sparsemv)?;
        s.add("PRECOND ", ops.precond)
    })?;

    root.add_section("MFLOPS Summary", |s| {
        s.add("Total   ", rates.total)?;
        s.add("DDOT    ", rates.ddot)?;
        s.add("WAXPBY  ", rates.waxpby)?;
        s.add("SPARSEMV", rates.sparsemv)?;
        s.add("PRECOND ", rates.precond)
    })?;

    if let Some(v) = variations {
        root.add_section("DDOT Timing Variations", |s| {
            s.add("Min DDOT MPI_Allreduce time", v.min)?;
            s.add("Max DDOT MPI_Allreduce time", v.max)?;
            s.add("Avg DDOT MPI_Allreduce time", v.avg)
        })?;

        let o = SparseMvOverheads::compute(&ops, times);
        root.add_section("SPARSEMV OVERHEADS", |s| {
            s.add("SPARSEMV MFLOPS W OVERHEAD", o.mflops_with_overhead)?;
            s.add("SPARSEMV PARALLEL OVERHEAD Time", o.overhead_time)?;
            s.add("SPARSEMV PARALLEL OVERHEAD Pct", o.overhead_pct)?;
            s.add("SPARSEMV PARALLEL OVERHEAD Setup Time", o.setup_time)?;
            s.add("SPARSEMV PARALLEL OVERHEAD Setup Pct", o.setup_pct)?;
            s.add("SPARSEMV PARALLEL OVERHEAD Bdry Exch Time", o.exchange_time)?;
            s.add("SPARSEMV PARALLEL OVERHEAD Bdry Exch Pct", o.exchange_pct)
        })?;
    }

    Ok(doc)
}
