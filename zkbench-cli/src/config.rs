//! Configuration loading from zkbench.toml
//!
//! The benchmark configuration names the systems to benchmark with their
//! configuration spaces, the statements to prove, and how runs are measured.
//! It is discovered by walking up from the current directory, or passed with
//! `--config`. Files ending in `.json` are read as JSON, everything else as TOML.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zkbench_core::{ConfigurationSpace, StatementConfig};
use zkbench_sandbox::SandboxInvocation;

/// File name looked up by `BenchConfig::discover`
pub const CONFIG_FILE: &str = "zkbench.toml";

/// Errors loading or validating a configuration
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// JSON syntax or schema error
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// `profiler.repeats` is zero
    #[error("profiler.repeats must be at least 1")]
    ZeroRepeats,

    /// No `[[systems]]` entry
    #[error("No systems configured")]
    NoSystems,

    /// No `[[statements]]` entry
    #[error("No statements configured")]
    NoStatements,

    /// A system name has no integration
    #[error("Unknown system `{name}` (available: {available})")]
    UnknownSystem {
        /// Configured name
        name: String,
        /// Registered names
        available: String,
    },

    /// The same system appears in two `[[systems]]` entries
    #[error("System `{0}` is configured more than once")]
    DuplicateSystem(String),

    /// The same statement appears in two `[[statements]]` entries
    #[error("Statement `{0}` is configured more than once")]
    DuplicateStatement(String),
}

/// zkbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Measurement settings
    #[serde(default)]
    pub profiler: ProfilerConfig,
    /// Sandbox settings
    #[serde(default)]
    pub sandbox: SandboxConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Toolchain locations
    #[serde(default)]
    pub paths: PathsConfig,
    /// Systems under test
    #[serde(default)]
    pub systems: Vec<SystemEntry>,
    /// Statements proved by every system
    #[serde(default)]
    pub statements: Vec<StatementConfig>,
}

/// Measurement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Runs of every configuration's full command sequence
    #[serde(default = "default_repeats")]
    pub repeats: u32,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
        }
    }
}

fn default_repeats() -> u32 {
    1
}

/// How measured commands are isolated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IsolationMode {
    /// Run every command under `runexec` (default)
    #[default]
    Sandbox,
    /// Run commands directly, measuring with `wait4`
    Direct,
}

impl IsolationMode {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            IsolationMode::Sandbox => "sandbox",
            IsolationMode::Direct => "direct",
        }
    }
}

/// Sandbox settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Isolation mode: "sandbox" or "direct"
    #[serde(default)]
    pub isolation: IsolationMode,
    /// Sandbox executable
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    /// Directory mounted read-only inside the sandbox
    #[serde(default = "default_read_only_dir")]
    pub read_only_dir: PathBuf,
    /// Directory given a writable overlay inside the sandbox
    #[serde(default = "default_overlay_dir")]
    pub overlay_dir: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            isolation: IsolationMode::default(),
            executable: default_executable(),
            read_only_dir: default_read_only_dir(),
            overlay_dir: default_overlay_dir(),
        }
    }
}

impl SandboxConfig {
    /// Sandbox command builder for these settings
    pub fn invocation(&self) -> SandboxInvocation {
        SandboxInvocation {
            executable: self.executable.clone(),
            read_only_dir: self.read_only_dir.clone(),
            overlay_dir: self.overlay_dir.clone(),
        }
    }
}

fn default_executable() -> PathBuf {
    PathBuf::from(zkbench_sandbox::RUNEXEC)
}
fn default_read_only_dir() -> PathBuf {
    PathBuf::from("/")
}
fn default_overlay_dir() -> PathBuf {
    PathBuf::from("/home")
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Results directory; tables go to `<directory>/csv`
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// Summary format: human or json
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            format: default_format(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_format() -> String {
    "human".to_string()
}

/// Toolchain locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `zokrates/`, `gnark/`, ...
    #[serde(default = "default_systems_dir")]
    pub systems: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            systems: default_systems_dir(),
        }
    }
}

fn default_systems_dir() -> PathBuf {
    PathBuf::from("systems")
}

/// One system under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemEntry {
    /// Integration name
    pub name: String,
    /// Axes to enumerate
    #[serde(default)]
    pub space: ConfigurationSpace,
}

impl BenchConfig {
    /// Load configuration from a TOML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Find `zkbench.toml` by walking up from the current directory
    pub fn discover() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Check the configuration against the registered integrations.
    ///
    /// Empty axes are already rejected while parsing.
    pub fn validate(&self, available: &[&str]) -> Result<(), ConfigError> {
        if self.profiler.repeats == 0 {
            return Err(ConfigError::ZeroRepeats);
        }
        if self.systems.is_empty() {
            return Err(ConfigError::NoSystems);
        }
        if self.statements.is_empty() {
            return Err(ConfigError::NoStatements);
        }
        for (i, system) in self.systems.iter().enumerate() {
            if !available.contains(&system.name.as_str()) {
                return Err(ConfigError::UnknownSystem {
                    name: system.name.clone(),
                    available: available.join(", "),
                });
            }
            if self.systems[..i].iter().any(|s| s.name == system.name) {
                return Err(ConfigError::DuplicateSystem(system.name.clone()));
            }
        }
        for (i, statement) in self.statements.iter().enumerate() {
            if self.statements[..i].contains(statement) {
                return Err(ConfigError::DuplicateStatement(statement.to_string()));
            }
        }
        Ok(())
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# zkbench Configuration

[profiler]
# Runs of every configuration; reported values are the mean and
# population standard deviation across runs
repeats = 3

[sandbox]
# "sandbox" measures through runexec, "direct" runs commands unsandboxed
isolation = "sandbox"
executable = "runexec"
read_only_dir = "/"
overlay_dir = "/home"

[output]
# Artifacts and logs go to <directory>/<system>/<label>, tables to <directory>/csv
directory = "results"
# Summary format: human or json
format = "human"

[paths]
# Toolchain sources and build scripts
systems = "systems"

[[systems]]
name = "zokrates"
[systems.space]
curve = ["bn254", "bls12_381", "bls12_377", "bw6_761"]
scheme = ["g16", "gm17", "marlin"]
backend = ["ark", "bellman"]

[[systems]]
name = "gnark"
[systems.space]
curve = ["bn254", "bls12_377", "bls12_381", "bls24_315", "bls24_317", "bw6_761", "bw6_633"]

[[statements]]
name = "hash"
function = "mimc"

[[statements]]
name = "signature"
type = "eddsa"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkbench_core::HashFunction;

    const AVAILABLE: &[&str] = &["zokrates", "gnark"];

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.profiler.repeats, 1);
        assert_eq!(config.sandbox.isolation, IsolationMode::Sandbox);
        assert_eq!(config.sandbox.executable, PathBuf::from("runexec"));
        assert_eq!(config.output.directory, PathBuf::from("results"));
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [profiler]
            repeats = 2

            [[systems]]
            name = "gnark"
            [systems.space]
            curve = ["bn254", "bls12_381"]

            [[statements]]
            name = "hash"
            function = "mimc"
        "#;

        let config: BenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profiler.repeats, 2);
        assert_eq!(config.systems[0].space.combinations(), 2);
        assert_eq!(
            config.statements,
            [StatementConfig::Hash {
                function: HashFunction::Mimc
            }]
        );
        // Defaults should still apply
        assert_eq!(config.sandbox.overlay_dir, PathBuf::from("/home"));
        assert!(config.validate(AVAILABLE).is_ok());
    }

    #[test]
    fn test_empty_axis_rejected() {
        let toml_str = r#"
            [[systems]]
            name = "gnark"
            [systems.space]
            curve = []
        "#;
        assert!(toml::from_str::<BenchConfig>(toml_str).is_err());
    }

    #[test]
    fn test_validate() {
        let mut config: BenchConfig = toml::from_str(&BenchConfig::default_toml()).unwrap();
        assert!(config.validate(AVAILABLE).is_ok());

        config.profiler.repeats = 0;
        assert!(matches!(config.validate(AVAILABLE), Err(ConfigError::ZeroRepeats)));
        config.profiler.repeats = 1;

        config.systems.push(config.systems[0].clone());
        assert!(matches!(
            config.validate(AVAILABLE),
            Err(ConfigError::DuplicateSystem(ref name)) if name == "zokrates"
        ));
        config.systems.pop();

        config.statements.push(config.statements[0]);
        assert!(matches!(config.validate(AVAILABLE), Err(ConfigError::DuplicateStatement(_))));
        config.statements.pop();

        config.systems[0].name = "libsnark".to_string();
        assert!(matches!(
            config.validate(AVAILABLE),
            Err(ConfigError::UnknownSystem { ref name, .. }) if name == "libsnark"
        ));

        config.systems.clear();
        assert!(matches!(config.validate(AVAILABLE), Err(ConfigError::NoSystems)));
    }

    #[test]
    fn test_default_toml_parses() {
        let config: BenchConfig = toml::from_str(&BenchConfig::default_toml()).unwrap();
        assert_eq!(config.profiler.repeats, 3);
        assert_eq!(config.systems.len(), 2);
        assert_eq!(config.systems[0].space.combinations(), 24);
        assert_eq!(config.statements.len(), 2);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("bench.json");
        std::fs::write(
            &json_path,
            r#"{
                "profiler": {"repeats": 4},
                "sandbox": {"isolation": "direct"},
                "systems": [{"name": "gnark", "space": {"curve": ["bn254"]}}],
                "statements": [{"name": "signature", "type": "eddsa"}]
            }"#,
        )
        .unwrap();
        let config = BenchConfig::load(&json_path).unwrap();
        assert_eq!(config.profiler.repeats, 4);
        assert_eq!(config.sandbox.isolation, IsolationMode::Direct);

        let toml_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&toml_path, "[profiler]\nrepeats = \"many\"\n").unwrap();
        assert!(matches!(
            BenchConfig::load(&toml_path),
            Err(ConfigError::Toml { .. })
        ));

        assert!(matches!(
            BenchConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
