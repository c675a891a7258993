pub use report_types::{
    MatrixStats, Phase, ReportConfig, ReportFormat, RunContext, RunInput, TimingSample,
};

pub mod comm;
pub mod input;
pub mod metrics;
pub mod reporter;
pub mod tree;
pub mod writer;

pub use crate::comm::{local_group, reduce_timing, Communicator, LocalComm, ReduceOp, ReductionResult, SoloComm};
pub use crate::metrics::{rate, OpCounts, Rates, SparseMvOverheads};
pub use crate::reporter::{build_report, report_results, REPORT_OWNER};
pub use crate::tree::{Report, ReportNode, Section, Value};
pub use crate::writer::{writer_for, JsonWriter, ReportWriter, YamlWriter};

#[derive(Debug)]
pub enum Error {
    InvalidConfig(String),
    Comm(String),
    DuplicateKey(String),
    Io(std::io::Error),
    Serialize(serde_json::Error),
    Format(std::fmt::Error),
}
