#![warn(missing_docs)]
//! zkbench Sandbox - runexec Protocol
//!
//! Everything needed to talk to BenchExec's `runexec`:
//! - Building the sandboxed command line (read-only root, overlay home, log, working dir)
//! - Incrementally parsing the `key=value` resource report it prints on stdout
//! - The error taxonomy for a single measured run

mod error;
mod invocation;
mod report;

pub use error::RunError;
pub use invocation::{RunPaths, SandboxInvocation};
pub use report::{ReportParser, parse_report};

/// Default sandbox executable
pub const RUNEXEC: &str = "runexec";
