//! Sandboxed command line
//!
//! ```text
//! runexec --read-only-dir / --overlay-dir /home
//!         --output <log> --output-directory <dir> --dir <dir>
//!         -- <program> <args...>
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Paths scoped to one (configuration, repeat, command) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// File receiving the tool's stdout and stderr
    pub log: PathBuf,
    /// Directory the sandbox writes result files to
    pub output_dir: PathBuf,
    /// Working directory of the tool
    pub working_dir: PathBuf,
}

impl RunPaths {
    /// Paths for the `index`-th command of a repeat inside `dir`.
    ///
    /// The log is named `<repeat>_<index>_<phase>.log` so every run keeps its own.
    pub fn in_dir(dir: &Path, repeat: u32, index: usize, phase: &str) -> Self {
        Self {
            log: dir.join(format!("{}_{}_{}.log", repeat, index, phase)),
            output_dir: dir.to_path_buf(),
            working_dir: dir.to_path_buf(),
        }
    }
}

/// How to invoke the sandbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxInvocation {
    /// Sandbox executable
    pub executable: PathBuf,
    /// Directory mounted read-only
    pub read_only_dir: PathBuf,
    /// Directory mounted with a writable overlay
    pub overlay_dir: PathBuf,
}

impl Default for SandboxInvocation {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(crate::RUNEXEC),
            read_only_dir: PathBuf::from("/"),
            overlay_dir: PathBuf::from("/home"),
        }
    }
}

impl SandboxInvocation {
    /// Arguments passed to the sandbox executable
    pub fn args(&self, paths: &RunPaths, argv: &[String]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--read-only-dir".into(),
            self.read_only_dir.clone().into(),
            "--overlay-dir".into(),
            self.overlay_dir.clone().into(),
            "--output".into(),
            paths.log.clone().into(),
            "--output-directory".into(),
            paths.output_dir.clone().into(),
            "--dir".into(),
            paths.working_dir.clone().into(),
            "--".into(),
        ];
        args.extend(argv.iter().map(OsString::from));
        args
    }

    /// Process builder for one sandboxed run
    pub fn command(&self, paths: &RunPaths, argv: &[String]) -> Command {
        let mut command = Command::new(&self.executable);
        command.args(self.args(paths, argv));
        command
    }
}
