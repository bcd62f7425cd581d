#![warn(missing_docs)]
//! # zkbench
//!
//! Benchmark harness for zero-knowledge proof-system toolchains.
//!
//! zkbench measures how long each lifecycle phase of a proof system takes
//! and how much memory it needs:
//! - **Configuration Spaces**: every combination of curve, scheme, backend, ... is enumerated
//! - **Integrations**: one adapter per toolchain (ZoKrates, gnark) turns a configuration into commands
//! - **Sandboxed Measurement**: commands run under BenchExec's `runexec`, or directly with `wait4`
//! - **Exact Statistics**: mean and population standard deviation in decimal arithmetic
//! - **Phase Tables**: one CSV per phase, one row per configuration
//!
//! ## Quick Start
//!
//! ```text
//! zkbench init > zkbench.toml
//! zkbench list
//! zkbench run --repeats 5 --system gnark
//! ```

// Re-export core types
pub use zkbench_core::{
    ArtifactRoot, Command, CommandSequence, CommandSequenceBuilder, ConfigLabel,
    ConfigurationSpace, ExecutableInterface, HashFunction, Integration, IntegrationError, Metric,
    Phase, ProviderContext, ResolvedConfiguration, RunMetrics, RunWorkspace, SequenceError,
    SignatureScheme, StatementConfig, StatementInstance, StatementIo, Step, required_axis,
};

// Re-export measurement
pub use zkbench_sandbox::{ReportParser, RunError, RunPaths, SandboxInvocation, parse_report};

// Re-export stats
pub use zkbench_stats::{
    PhaseStatistics, RepeatAccumulator, RepeatSample, StatsError, SummaryStatistics,
    compute_summary,
};

// Re-export reporting
pub use zkbench_report::{CSV_HEADER, ConfigResult, PhaseTables, Report, RunStatus, format_row};

// Re-export orchestration
pub use zkbench_cli::{
    BenchConfig, CommandRunner, DirectRunner, ExecutionConfig, ExecutionPlan, Executor,
    SandboxRunner, SupervisorError, build_plan, build_report,
};

/// Registered proof-system integrations
pub mod systems {
    pub use zkbench_systems::{Gnark, Zokrates, find, names, registry};
}

/// Run the zkbench CLI.
///
/// ```ignore
/// fn main() {
///     zkbench::run().unwrap();
/// }
/// ```
pub use zkbench_cli::run;
