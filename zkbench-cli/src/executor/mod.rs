//! Benchmark Executor
//!
//! Runs planned configurations one after another and turns their
//! measurements into table rows and a run report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ExecutionPlan (from the planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Acquire toolchain, build sequence, run N repeats,
//! └──────┬──────┘  append per-phase rows
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Merge executed and rejected configurations
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Sequential execution and statistics
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod execution;
mod formatting;
mod metadata;
mod report;

pub use execution::{ExecutionConfig, Executor};
pub use formatting::format_human_output;
pub use metadata::build_report_meta;
pub use report::build_report;
