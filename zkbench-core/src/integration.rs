//! Integration Trait
//!
//! One adapter per proof system. The orchestrator drives every adapter
//! through the same calls:
//!
//! ```text
//! is_valid_configuration ──no──▶ skipped, nothing on disk
//!        │yes
//!        ▼
//! statement_instance ──UnsupportedStatement──▶ skipped
//!        │
//!        ▼
//! acquire_interface (once per provider key, failure sticks)
//!        │
//!        ▼
//! label ──▶ RunWorkspace ──▶ build_command_sequence
//! ```

use crate::command::{CommandSequence, CommandSequenceBuilder, SequenceError};
use crate::label::ConfigLabel;
use crate::statement::{StatementConfig, StatementInstance};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zkbench_logic::ResolvedConfiguration;

/// Errors raised by integrations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntegrationError {
    /// The system has no program for this statement
    #[error("{system} does not support statement {statement}")]
    UnsupportedStatement {
        /// System name
        system: &'static str,
        /// Statement description
        statement: String,
    },

    /// No fixed values are known for the statement on this curve
    #[error("No constants for statement {statement} on curve {curve}")]
    MissingConstants {
        /// Statement description
        statement: String,
        /// Curve name
        curve: String,
    },

    /// A statement value cannot be encoded the way the system expects
    #[error("Cannot encode `{value}` for statement {statement}")]
    InvalidStatementValue {
        /// Statement description
        statement: String,
        /// Offending value
        value: String,
    },

    /// A required axis is not bound in the configuration
    #[error("Configuration has no `{0}` axis")]
    MissingAxis(String),

    /// Building or locating the toolchain failed
    #[error("Failed to acquire {system} toolchain: {message}")]
    ProviderAcquisition {
        /// System name
        system: &'static str,
        /// Failure description
        message: String,
    },

    /// The produced sequence is malformed
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl IntegrationError {
    /// Short machine-readable kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            IntegrationError::UnsupportedStatement { .. } => "unsupported-statement",
            IntegrationError::MissingConstants { .. } => "missing-constants",
            IntegrationError::InvalidStatementValue { .. } => "invalid-statement-value",
            IntegrationError::MissingAxis(_) => "missing-axis",
            IntegrationError::ProviderAcquisition { .. } => "provider-acquisition",
            IntegrationError::Sequence(_) => "invalid-sequence",
        }
    }
}

/// Handle to a built toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableInterface {
    /// Executable invoked by every command
    pub executable: PathBuf,
    /// Toolchain directory (programs, standard library)
    pub root: PathBuf,
}

/// Input to `Integration::acquire_interface`
#[derive(Debug, Clone)]
pub struct ProviderContext {
    /// Directory holding every system's sources and build scripts
    pub systems_dir: PathBuf,
    /// Configuration projected onto the integration's provider axes
    pub config: ResolvedConfiguration,
}

/// Per-system results directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRoot {
    dir: PathBuf,
}

impl ArtifactRoot {
    /// Root for `system` under the results directory
    pub fn new(results_dir: &Path, system: &str) -> Self {
        Self {
            dir: results_dir.join(system),
        }
    }

    /// Root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Workspace of one configuration
    pub fn workspace(&self, label: ConfigLabel) -> RunWorkspace {
        let dir = self.dir.join(label.to_path());
        RunWorkspace { label, dir }
    }
}

/// Label and directory of one configuration's artifacts and logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWorkspace {
    label: ConfigLabel,
    dir: PathBuf,
}

impl RunWorkspace {
    /// Configuration label
    pub fn label(&self) -> &ConfigLabel {
        &self.label
    }

    /// Directory for artifacts and logs
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path of a named artifact, as a command argument
    pub fn artifact(&self, name: &str) -> String {
        self.dir.join(name).to_string_lossy().into_owned()
    }

    /// Sequence builder sharing this workspace's label
    pub fn builder(&self) -> CommandSequenceBuilder {
        CommandSequenceBuilder::new(self.label.clone())
    }
}

/// Adapter for one proof-system toolchain
pub trait Integration: Send + Sync {
    /// Registry name, also the first column of every result row
    fn name(&self) -> &'static str;

    /// System-specific name of a statement
    fn statement_name(&self, statement: &StatementConfig) -> Result<String, IntegrationError>;

    /// Whether the system can run this configuration at all
    fn is_valid_configuration(
        &self,
        config: &ResolvedConfiguration,
        statement: &StatementConfig,
    ) -> bool;

    /// Axes whose values select a distinct toolchain build
    fn provider_axes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Build or locate the toolchain. Called once per provider key.
    fn acquire_interface(
        &self,
        context: &ProviderContext,
    ) -> Result<ExecutableInterface, IntegrationError>;

    /// Statement with concrete values for this configuration
    fn statement_instance(
        &self,
        statement: &StatementConfig,
        config: &ResolvedConfiguration,
    ) -> Result<StatementInstance, IntegrationError> {
        let name = self.statement_name(statement)?;
        let io = statement.io(config.get_str("curve"))?;
        Ok(StatementInstance::new(name, io))
    }

    /// Label identifying this configuration
    fn label(
        &self,
        config: &ResolvedConfiguration,
        statement: &StatementInstance,
    ) -> Result<ConfigLabel, IntegrationError>;

    /// Ordered commands for one configuration, with artifacts under `workspace`
    fn build_command_sequence(
        &self,
        config: &ResolvedConfiguration,
        statement: &StatementInstance,
        interface: &ExecutableInterface,
        workspace: &RunWorkspace,
    ) -> Result<CommandSequence, IntegrationError>;
}

/// Fetch a required scalar axis, failing with `MissingAxis`
pub fn required_axis<'a>(
    config: &'a ResolvedConfiguration,
    axis: &str,
) -> Result<&'a str, IntegrationError> {
    config
        .get_str(axis)
        .ok_or_else(|| IntegrationError::MissingAxis(axis.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;
    use crate::command::Step;
    use crate::statement::{HashFunction, SignatureScheme, StatementIo};

    struct Echo;

    impl Integration for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn statement_name(&self, statement: &StatementConfig) -> Result<String, IntegrationError> {
            match statement {
                StatementConfig::Hash { function } => Ok(function.as_str().to_string()),
                other => Err(IntegrationError::UnsupportedStatement {
                    system: "echo",
                    statement: other.to_string(),
                }),
            }
        }

        fn is_valid_configuration(&self, config: &ResolvedConfiguration, _: &StatementConfig) -> bool {
            config.get_str("curve").is_some()
        }

        fn acquire_interface(&self, context: &ProviderContext) -> Result<ExecutableInterface, IntegrationError> {
            Ok(ExecutableInterface {
                executable: PathBuf::from("echo"),
                root: context.systems_dir.clone(),
            })
        }

        fn label(&self, config: &ResolvedConfiguration, statement: &StatementInstance) -> Result<ConfigLabel, IntegrationError> {
            Ok(ConfigLabel::new([statement.name.as_str(), required_axis(config, "curve")?]))
        }

        fn build_command_sequence(
            &self,
            _config: &ResolvedConfiguration,
            statement: &StatementInstance,
            interface: &ExecutableInterface,
            workspace: &RunWorkspace,
        ) -> Result<CommandSequence, IntegrationError> {
            let exe = interface.executable.to_string_lossy().into_owned();
            let out = workspace.artifact("out");
            let mut prove = vec![exe.clone(), out.clone()];
            prove.extend(statement.input.iter().cloned());

            let mut builder = workspace.builder();
            builder
                .push(Step::new(Phase::Compile, [exe, out]).produces(["out"]))
                .push(Step::new(Phase::Prove, prove).consumes(["out"]));
            Ok(builder.build()?)
        }
    }

    #[test]
    fn test_default_statement_instance_uses_curve() {
        let config = ResolvedConfiguration::from_pairs([("curve", "bn254")]);
        let statement = StatementConfig::Hash {
            function: HashFunction::Mimc,
        };

        let instance = Echo.statement_instance(&statement, &config).unwrap();
        assert_eq!(instance.name, "mimc");
        assert_eq!(instance.output, statement.io(Some("bn254")).unwrap().output);
    }

    #[test]
    fn test_unsupported_statement() {
        let config = ResolvedConfiguration::from_pairs([("curve", "bn254")]);
        let statement = StatementConfig::Signature {
            scheme: SignatureScheme::Eddsa,
        };
        assert!(matches!(
            Echo.statement_instance(&statement, &config),
            Err(IntegrationError::UnsupportedStatement { system: "echo", .. })
        ));
    }

    #[test]
    fn test_workspace_paths_follow_label() {
        let root = ArtifactRoot::new(Path::new("/results"), "echo");
        let config = ResolvedConfiguration::from_pairs([("curve", "bn254")]);
        let instance = StatementInstance::new("mimc", StatementIo::default());
        let label = Echo.label(&config, &instance).unwrap();
        let workspace = root.workspace(label);

        assert_eq!(workspace.dir(), Path::new("/results/echo/mimc/bn254"));
        assert_eq!(workspace.artifact("out"), "/results/echo/mimc/bn254/out");

        let interface = Echo
            .acquire_interface(&ProviderContext {
                systems_dir: PathBuf::from("/systems"),
                config: ResolvedConfiguration::new(),
            })
            .unwrap();
        let sequence = Echo
            .build_command_sequence(&config, &instance, &interface, &workspace)
            .unwrap();
        assert_eq!(sequence.label(), workspace.label());
        assert_eq!(sequence.phases(), [Phase::Compile, Phase::Prove]);
    }
}
