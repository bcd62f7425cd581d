//! Run errors

use thiserror::Error;

/// Why a single measured command did not produce metrics
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// The measured tool (or the sandbox) exited with a non-zero code
    #[error("Process exited with code {code}")]
    NonZeroExit {
        /// Exit code
        code: i32,
    },

    /// The measured tool was killed by a signal
    #[error("Process terminated by signal {signal}")]
    SignalTermination {
        /// Signal number
        signal: i32,
    },

    /// The sandbox stopped the tool (time or memory limit, ...)
    #[error("Sandbox terminated the process: {reason}")]
    SandboxTermination {
        /// Reason reported by the sandbox
        reason: String,
    },

    /// A report line does not follow the expected grammar
    #[error("Malformed report line `{line}`: {reason}")]
    MalformedReport {
        /// Offending line
        line: String,
        /// What is wrong with it
        reason: String,
    },

    /// A required metric was missing or reported more than once
    #[error("Incomplete report: {0}")]
    IncompleteReport(String),

    /// The command could not be started or its log not written
    #[error("Failed to launch command: {0}")]
    Spawn(#[from] std::io::Error),
}

impl RunError {
    /// Short machine-readable kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::NonZeroExit { .. } => "non-zero-exit",
            RunError::SignalTermination { .. } => "signal-termination",
            RunError::SandboxTermination { .. } => "sandbox-termination",
            RunError::MalformedReport { .. } => "malformed-report",
            RunError::IncompleteReport(_) => "incomplete-report",
            RunError::Spawn(_) => "spawn",
        }
    }

    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        RunError::MalformedReport {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
