#![warn(missing_docs)]
//! zkbench Core - Benchmark Model
//!
//! Types shared by every stage of a benchmark run:
//! - `Phase` lifecycle (compile → setup → prove → verify)
//! - `Command` / `CommandSequence` with phase-order and artifact checks
//! - `ConfigLabel` identifying one configuration on disk and in tables
//! - Statement workloads and their fixed input/output constants
//! - `RunMetrics` measured for a single command
//! - The `Integration` trait implemented once per proof system

mod command;
mod integration;
mod label;
mod metrics;
mod phase;
mod statement;

pub use command::{Command, CommandSequence, CommandSequenceBuilder, SequenceError, Step};
pub use integration::{
    ArtifactRoot, ExecutableInterface, Integration, IntegrationError, ProviderContext, RunWorkspace,
    required_axis,
};
pub use label::ConfigLabel;
pub use metrics::{Metric, RunMetrics};
pub use phase::Phase;
pub use statement::{HashFunction, SignatureScheme, StatementConfig, StatementInstance, StatementIo};

/// Re-exported so integrations and tests can name configurations without a direct dependency
pub use zkbench_logic::{ConfigurationSpace, ResolvedConfiguration};
