//! Toolchain builds shared by the integrations

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::info;
use zkbench_core::IntegrationError;

/// Run a build command to completion, failing on a non-zero exit
pub(crate) fn run_build(
    system: &'static str,
    program: &Path,
    args: &[&str],
) -> Result<(), IntegrationError> {
    info!("Building {} toolchain: {} {}", system, program.display(), args.join(" "));

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| IntegrationError::ProviderAcquisition {
            system,
            message: format!("failed to start {}: {}", program.display(), e),
        })?;

    if !status.success() {
        return Err(IntegrationError::ProviderAcquisition {
            system,
            message: format!("{} exited with {}", program.display(), status),
        });
    }

    info!("Built {} toolchain", system);
    Ok(())
}

/// Fail unless the built executable exists
pub(crate) fn require_executable(system: &'static str, path: &Path) -> Result<(), IntegrationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(IntegrationError::ProviderAcquisition {
            system,
            message: format!("executable does not exist at {}", path.display()),
        })
    }
}
