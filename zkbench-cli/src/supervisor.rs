//! Command Supervisor
//!
//! Runs one measured command and returns its metrics.
//!
//! - [`SandboxRunner`] wraps the command in `runexec` and parses the report
//!   it prints on stdout while the command's own output goes to the log file.
//! - [`DirectRunner`] runs the command itself and takes CPU time and peak
//!   memory from `wait4`. It is meant for machines without the sandbox.

use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, trace};
use zkbench_core::{Command, IntegrationError, Phase, RunMetrics};
use zkbench_sandbox::{ReportParser, RunError, RunPaths, SandboxInvocation};
use zkbench_stats::StatsError;

/// Why a configuration produced no rows
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SupervisorError {
    /// The toolchain shared by this configuration could not be acquired
    #[error("{system} toolchain unavailable: {message}")]
    Provider {
        /// System name
        system: &'static str,
        /// Acquisition error
        message: String,
    },

    /// The integration rejected the configuration
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    /// The configuration's directory could not be created
    #[error("Failed to create {path}: {source}")]
    Workspace {
        /// Directory
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A measured command failed
    #[error("Repeat {repeat}, command {index} ({phase}): {source}")]
    Run {
        /// 1-based repeat number
        repeat: u32,
        /// Command index in the sequence
        index: usize,
        /// Command phase
        phase: Phase,
        /// Run error
        source: RunError,
    },

    /// Measurements too large for exact statistics
    #[error(transparent)]
    Statistics(#[from] StatsError),

    /// Result rows could not be written
    #[error("Failed to write result tables: {0}")]
    Table(io::Error),
}

impl SupervisorError {
    /// Short machine-readable kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            SupervisorError::Provider { .. } => "provider-acquisition",
            SupervisorError::Integration(e) => e.kind(),
            SupervisorError::Workspace { .. } => "workspace",
            SupervisorError::Run { source, .. } => source.kind(),
            SupervisorError::Statistics(_) => "statistics-overflow",
            SupervisorError::Table(_) => "table",
        }
    }
}

/// Executes one command and measures it
pub trait CommandRunner {
    /// Run `command` with its output and artifacts placed according to `paths`
    fn run(&mut self, command: &Command, paths: &RunPaths) -> Result<RunMetrics, RunError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&mut self, command: &Command, paths: &RunPaths) -> Result<RunMetrics, RunError> {
        (**self).run(command, paths)
    }
}

/// Runs commands under `runexec`
#[derive(Debug, Clone, Default)]
pub struct SandboxRunner {
    invocation: SandboxInvocation,
}

impl SandboxRunner {
    /// Runner using the given sandbox settings
    pub fn new(invocation: SandboxInvocation) -> Self {
        Self { invocation }
    }
}

impl CommandRunner for SandboxRunner {
    fn run(&mut self, command: &Command, paths: &RunPaths) -> Result<RunMetrics, RunError> {
        let mut process = self.invocation.command(paths, &command.argv);
        process
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        debug!("Spawning {:?}", process);
        let mut child = process.spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("sandbox stdout not captured"))?;

        // Drain the whole report so the sandbox never blocks on a full pipe
        let mut parser = ReportParser::new();
        let mut first_error = None;
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    // The child is always reaped, even when its stdout breaks
                    let _ = child.kill();
                    child.wait()?;
                    return Err(e.into());
                }
            }
            if first_error.is_some() {
                continue;
            }
            let result = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    trace!("report: {}", line.trim_end());
                    parser.feed_line(line)
                }
                Err(_) => Err(RunError::MalformedReport {
                    line: String::from_utf8_lossy(&buf).trim_end().to_string(),
                    reason: "not valid UTF-8".to_string(),
                }),
            };
            if let Err(e) = result {
                first_error = Some(e);
            }
        }

        let status = child.wait()?;
        if let Some(e) = first_error {
            return Err(e);
        }
        if !status.success() {
            return Err(match (status.code(), status.signal()) {
                (Some(code), _) => RunError::NonZeroExit { code },
                (None, Some(signal)) => RunError::SignalTermination { signal },
                (None, None) => RunError::SandboxTermination {
                    reason: status.to_string(),
                },
            });
        }

        parser.finish()
    }
}

/// Runs commands without a sandbox, measuring with `wait4`
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRunner;

impl CommandRunner for DirectRunner {
    fn run(&mut self, command: &Command, paths: &RunPaths) -> Result<RunMetrics, RunError> {
        let program = command.program().ok_or_else(|| {
            RunError::Spawn(io::Error::new(io::ErrorKind::InvalidInput, "empty command"))
        })?;

        let log = File::create(&paths.log)?;
        let log_err = log.try_clone()?;

        let start = Instant::now();
        let child = std::process::Command::new(program)
            .args(command.args())
            .current_dir(&paths.working_dir)
            .stdin(Stdio::null())
            .stdout(log)
            .stderr(log_err)
            .spawn()?;

        let (status, usage) = wait_with_usage(child.id() as libc::pid_t)?;
        let elapsed = start.elapsed();

        if libc::WIFSIGNALED(status) {
            return Err(RunError::SignalTermination {
                signal: libc::WTERMSIG(status),
            });
        }
        if libc::WIFEXITED(status) && libc::WEXITSTATUS(status) != 0 {
            return Err(RunError::NonZeroExit {
                code: libc::WEXITSTATUS(status),
            });
        }

        let cpu_micros = timeval_micros(usage.ru_utime) + timeval_micros(usage.ru_stime);
        Ok(RunMetrics::new(
            Decimal::new(cpu_micros, 6),
            Decimal::new(elapsed.as_micros() as i64, 6),
            // ru_maxrss is in kilobytes on Linux
            Decimal::from(usage.ru_maxrss) * Decimal::from(1024),
        ))
    }
}

fn timeval_micros(tv: libc::timeval) -> i64 {
    tv.tv_sec as i64 * 1_000_000 + tv.tv_usec as i64
}

/// Reap `pid` and return its wait status and resource usage
fn wait_with_usage(pid: libc::pid_t) -> io::Result<(libc::c_int, libc::rusage)> {
    let mut status: libc::c_int = 0;
    // SAFETY: rusage is plain old data; all-zero is a valid value
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    loop {
        // SAFETY: both out-pointers are valid for the duration of the call
        let ret = unsafe { libc::wait4(pid, &mut status, 0, &mut usage) };
        if ret == pid {
            return Ok((status, usage));
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}
