//! gnark Integration
//!
//! A single Go binary runs one phase per invocation:
//!
//! ```text
//! gnark <phase> <statement> <curve-id> <artifact-dir> [args...]
//! ```
//!
//! Curves are passed as gnark-crypto `ecc.ID` values. Only Groth16 is
//! benchmarked, and the tool implements the MiMC scenario alone.

use crate::toolchain::{require_executable, run_build};
use std::path::Path;
use zkbench_core::{
    CommandSequence, ConfigLabel, ExecutableInterface, HashFunction, Integration,
    IntegrationError, Phase, ProviderContext, ResolvedConfiguration, RunWorkspace,
    StatementConfig, StatementInstance, Step, required_axis,
};

const NAME: &str = "gnark";

/// Curve name and its `ecc.ID`
const CURVE_IDS: [(&str, u8); 7] = [
    ("bn254", 1),
    ("bls12_377", 2),
    ("bls12_381", 4),
    ("bls24_315", 5),
    ("bls24_317", 6),
    ("bw6_761", 7),
    ("bw6_633", 8),
];

const CONSTRAINT_SYSTEM: &str = "constraint_system";
const PROVING_KEY: &str = "proving.key";
const VERIFICATION_KEY: &str = "verification.key";
const PROOF: &str = "proof";
const WITNESS: &str = "witness";

/// gnark toolchain
#[derive(Debug, Clone, Copy, Default)]
pub struct Gnark;

fn curve_id(curve: &str) -> Option<u8> {
    CURVE_IDS.iter().find(|(c, _)| *c == curve).map(|(_, id)| *id)
}

impl Integration for Gnark {
    fn name(&self) -> &'static str {
        NAME
    }

    fn statement_name(&self, statement: &StatementConfig) -> Result<String, IntegrationError> {
        match statement {
            StatementConfig::Hash {
                function: HashFunction::Mimc,
            } => Ok("mimc".to_string()),
            other => Err(IntegrationError::UnsupportedStatement {
                system: NAME,
                statement: other.to_string(),
            }),
        }
    }

    fn is_valid_configuration(
        &self,
        config: &ResolvedConfiguration,
        _statement: &StatementConfig,
    ) -> bool {
        let scheme_ok = config.get_str("scheme").is_none_or(|s| s == "groth16");
        config.get_str("curve").and_then(curve_id).is_some() && scheme_ok
    }

    fn acquire_interface(
        &self,
        context: &ProviderContext,
    ) -> Result<ExecutableInterface, IntegrationError> {
        let root = context.systems_dir.join(NAME);
        let root_arg = root.to_string_lossy().into_owned();
        run_build(
            NAME,
            Path::new("go"),
            &["build", "-C", &root_arg, "-o", "build/gnark"],
        )?;

        let executable = root.join("build/gnark");
        require_executable(NAME, &executable)?;
        Ok(ExecutableInterface { executable, root })
    }

    fn label(
        &self,
        config: &ResolvedConfiguration,
        statement: &StatementInstance,
    ) -> Result<ConfigLabel, IntegrationError> {
        Ok(ConfigLabel::new([
            statement.name.as_str(),
            required_axis(config, "curve")?,
        ]))
    }

    fn build_command_sequence(
        &self,
        config: &ResolvedConfiguration,
        statement: &StatementInstance,
        interface: &ExecutableInterface,
        workspace: &RunWorkspace,
    ) -> Result<CommandSequence, IntegrationError> {
        let curve = required_axis(config, "curve")?;
        let id = curve_id(curve)
            .ok_or_else(|| IntegrationError::MissingAxis("curve".to_string()))?
            .to_string();

        let exe = interface.executable.to_string_lossy().into_owned();
        let dir = workspace.dir().to_string_lossy().into_owned();
        let invocation = |phase: Phase| {
            vec![
                exe.clone(),
                phase.as_str().to_string(),
                statement.name.clone(),
                id.clone(),
                dir.clone(),
            ]
        };

        let mut prove = invocation(Phase::Prove);
        prove.extend(statement.input.iter().cloned());
        prove.extend(statement.output.iter().cloned());

        let mut builder = workspace.builder();
        builder
            .push(Step::new(Phase::Compile, invocation(Phase::Compile)).produces([CONSTRAINT_SYSTEM]))
            .push(
                Step::new(Phase::Setup, invocation(Phase::Setup))
                    .consumes([CONSTRAINT_SYSTEM])
                    .produces([PROVING_KEY, VERIFICATION_KEY]),
            )
            .push(
                Step::new(Phase::Prove, prove)
                    .consumes([CONSTRAINT_SYSTEM, PROVING_KEY])
                    .produces([PROOF, WITNESS]),
            )
            .push(
                Step::new(Phase::Verify, invocation(Phase::Verify))
                    .consumes([PROOF, VERIFICATION_KEY, WITNESS]),
            );
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use zkbench_core::{ArtifactRoot, SignatureScheme};

    const MIMC: StatementConfig = StatementConfig::Hash {
        function: HashFunction::Mimc,
    };

    fn curve(name: &str) -> ResolvedConfiguration {
        ResolvedConfiguration::from_pairs([("curve", name)])
    }

    #[test]
    fn test_curve_ids() {
        assert_eq!(curve_id("bn254"), Some(1));
        assert_eq!(curve_id("bls12_381"), Some(4));
        assert_eq!(curve_id("bw6_633"), Some(8));
        assert_eq!(curve_id("bn128"), None);
    }

    #[test]
    fn test_validity() {
        assert!(Gnark.is_valid_configuration(&curve("bls24_317"), &MIMC));
        assert!(!Gnark.is_valid_configuration(&curve("pallas"), &MIMC));
        assert!(!Gnark.is_valid_configuration(&ResolvedConfiguration::new(), &MIMC));

        let mut plonk = curve("bn254");
        plonk.set("scheme", "plonk");
        assert!(!Gnark.is_valid_configuration(&plonk, &MIMC));
    }

    #[test]
    fn test_only_mimc_is_supported() {
        let sha = StatementConfig::Hash {
            function: HashFunction::Sha256,
        };
        let eddsa = StatementConfig::Signature {
            scheme: SignatureScheme::Eddsa,
        };
        for statement in [sha, eddsa] {
            assert!(matches!(
                Gnark.statement_instance(&statement, &curve("bn254")),
                Err(IntegrationError::UnsupportedStatement { system: "gnark", .. })
            ));
        }
        assert_eq!(Gnark.statement_instance(&MIMC, &curve("bn254")).unwrap().name, "mimc");
    }

    #[test]
    fn test_sequence() {
        let config = curve("bls12_381");
        let instance = Gnark.statement_instance(&MIMC, &config).unwrap();
        let label = Gnark.label(&config, &instance).unwrap();
        assert_eq!(label.to_string(), "mimc/bls12_381");

        let workspace = ArtifactRoot::new(Path::new("/results"), NAME).workspace(label);
        let interface = ExecutableInterface {
            executable: PathBuf::from("/systems/gnark/build/gnark"),
            root: PathBuf::from("/systems/gnark"),
        };
        let sequence = Gnark
            .build_command_sequence(&config, &instance, &interface, &workspace)
            .unwrap();

        assert_eq!(sequence.phases(), Phase::ALL);
        assert_eq!(
            sequence.commands()[0].argv,
            [
                "/systems/gnark/build/gnark",
                "compile",
                "mimc",
                "4",
                "/results/gnark/mimc/bls12_381"
            ]
        );

        let prove = &sequence.commands()[2].argv;
        assert_eq!(prove.len(), 5 + instance.input.len() + instance.output.len());
        assert_eq!(prove[5], instance.input[0]);
        assert_eq!(prove[prove.len() - 1], instance.output[0]);
    }
}
