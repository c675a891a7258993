use serde::{Deserialize, Serialize};

/// Solver phases tracked in a `TimingSample`, by slot index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Total = 0,
    Ddot = 1,
    Waxpby = 2,
    SparseMv = 3,
    // Per-call cost of the DDOT allreduce; the only slot reduced across ranks.
    DdotAllreduce = 4,
    Precond = 5,
    BoundaryExchange = 6,
    Setup = 7,
}

pub const PHASE_COUNT: usize = 8;

/// Elapsed seconds per phase for one process. Owned by the caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimingSample(pub [f64; PHASE_COUNT]);

impl TimingSample {
    pub fn get(&self, phase: Phase) -> f64 {
        self.0[phase as usize]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunContext {
    pub process_count: usize,
    pub rank: usize,
    pub threads_per_process: usize,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixStats {
    pub total_rows: f64,
    pub total_nonzeros: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub name: String,
    pub version: String,
    pub format: ReportFormat,
    /// Also write the serialized report to stdout on the report owner.
    pub echo: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            name: "benchmark-hpcg".into(),
            version: "0.1".into(),
            format: ReportFormat::Yaml,
            echo: false,
        }
    }
}

/// A finished solver run as recorded on disk, one timing sample per rank.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunInput {
    pub threads_per_process: usize,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub matrix: MatrixStats,
    pub niters: u64,
    pub normr: f64,
    pub timings: Vec<TimingSample>,
}

impl RunInput {
    pub fn process_count(&self) -> usize {
        self.timings.len()
    }

    pub fn context_for(&self, rank: usize) -> RunContext {
        RunContext {
            process_count: self.process_count(),
            rank,
            threads_per_process: self.threads_per_process,
            nx: self.nx,
            ny: self.ny,
            nz: self.nz,
        }
    }
}
