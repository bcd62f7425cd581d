//! ZoKrates Integration
//!
//! ```text
//! compile ──▶ out, abi.json
//!   [universal-setup ──▶ universal_setup.dat]      (marlin only)
//! setup ──▶ proving.key, verification.key
//! compute-witness ──▶ witness
//! generate-proof ──▶ proof.json
//! verify
//! ```
//!
//! One ZoKrates build serves every curve, scheme and backend.

use crate::toolchain::{require_executable, run_build};
use num_bigint::BigUint;
use zkbench_core::{
    CommandSequence, ConfigLabel, ExecutableInterface, Integration, IntegrationError, Phase,
    ProviderContext, ResolvedConfiguration, RunWorkspace, SignatureScheme, StatementConfig,
    StatementInstance, Step, required_axis,
};

const NAME: &str = "zokrates";

const CURVES: [&str; 4] = ["bn254", "bls12_381", "bls12_377", "bw6_761"];
const SCHEMES: [&str; 3] = ["g16", "gm17", "marlin"];

/// Size exponent of the universal setup
const UNIVERSAL_SETUP_SIZE: &str = "18";

/// Words per EdDSA message (two `u32[8]` arrays)
const MESSAGE_WORDS: usize = 16;

/// ZoKrates toolchain
#[derive(Debug, Clone, Copy, Default)]
pub struct Zokrates;

fn backend_supports(backend: &str, curve: &str, scheme: &str) -> bool {
    match backend {
        "ark" => CURVES.contains(&curve) && SCHEMES.contains(&scheme),
        "bellman" => matches!(curve, "bn254" | "bls12_381") && scheme == "g16",
        _ => false,
    }
}

fn is_universal(scheme: &str) -> bool {
    scheme == "marlin"
}

/// ZoKrates names BN254 after its embedding degree
fn curve_arg(curve: &str) -> &str {
    if curve == "bn254" { "bn128" } else { curve }
}

/// Split a message into big-endian 32-bit words
fn message_words(message: &str) -> Option<Vec<String>> {
    let value = BigUint::parse_bytes(message.as_bytes(), 10)?;
    let mut words = value.to_u32_digits();
    if words.len() > MESSAGE_WORDS {
        return None;
    }
    words.resize(MESSAGE_WORDS, 0);
    Some(words.iter().rev().map(|w| w.to_string()).collect())
}

fn opt(argv: &mut Vec<String>, flag: &str, value: impl Into<String>) {
    argv.push(format!("--{}", flag));
    argv.push(value.into());
}

impl Integration for Zokrates {
    fn name(&self) -> &'static str {
        NAME
    }

    fn statement_name(&self, statement: &StatementConfig) -> Result<String, IntegrationError> {
        Ok(match statement {
            StatementConfig::Hash { function } => format!("{}.zok", function.as_str()),
            StatementConfig::Signature { scheme } => format!("{}.zok", scheme.as_str()),
        })
    }

    fn is_valid_configuration(
        &self,
        config: &ResolvedConfiguration,
        _statement: &StatementConfig,
    ) -> bool {
        match (
            config.get_str("curve"),
            config.get_str("scheme"),
            config.get_str("backend"),
        ) {
            (Some(curve), Some(scheme), Some(backend)) => backend_supports(backend, curve, scheme),
            _ => false,
        }
    }

    fn acquire_interface(
        &self,
        context: &ProviderContext,
    ) -> Result<ExecutableInterface, IntegrationError> {
        let root = context.systems_dir.join(NAME);
        run_build(NAME, &root.join("install.sh"), &[])?;

        let executable = root.join("source/target/release/zokrates");
        require_executable(NAME, &executable)?;
        Ok(ExecutableInterface { executable, root })
    }

    fn statement_instance(
        &self,
        statement: &StatementConfig,
        config: &ResolvedConfiguration,
    ) -> Result<StatementInstance, IntegrationError> {
        let name = self.statement_name(statement)?;
        let mut io = statement.io(config.get_str("curve"))?;

        if let StatementConfig::Signature {
            scheme: SignatureScheme::Eddsa,
        } = statement
        {
            if let Some(message) = io.input.pop() {
                let words = message_words(&message).ok_or_else(|| {
                    IntegrationError::InvalidStatementValue {
                        statement: statement.to_string(),
                        value: message.clone(),
                    }
                })?;
                io.input.extend(words);
            }
        }

        Ok(StatementInstance::new(name, io))
    }

    fn label(
        &self,
        config: &ResolvedConfiguration,
        statement: &StatementInstance,
    ) -> Result<ConfigLabel, IntegrationError> {
        Ok(ConfigLabel::new([
            statement.name.as_str(),
            required_axis(config, "backend")?,
            required_axis(config, "scheme")?,
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
        let scheme = required_axis(config, "scheme")?;
        let backend = required_axis(config, "backend")?;

        let exe = interface.executable.to_string_lossy().into_owned();
        let root = &interface.root;
        let action = |name: &str| vec![exe.clone(), name.to_string()];

        let out = workspace.artifact("out");
        let abi = workspace.artifact("abi.json");
        let universal = workspace.artifact("universal_setup.dat");
        let pk = workspace.artifact("proving.key");
        let vk = workspace.artifact("verification.key");
        let witness = workspace.artifact("witness");
        let proof = workspace.artifact("proof.json");

        let mut builder = workspace.builder();

        let mut compile = action("compile");
        opt(
            &mut compile,
            "input",
            root.join("programs").join(&statement.name).to_string_lossy(),
        );
        opt(&mut compile, "curve", curve_arg(curve));
        opt(
            &mut compile,
            "stdlib-path",
            root.join("source/zokrates_stdlib/stdlib/").to_string_lossy(),
        );
        opt(&mut compile, "r1cs", "/dev/null");
        opt(&mut compile, "output", out.clone());
        opt(&mut compile, "abi-spec", abi.clone());
        builder.push(Step::new(Phase::Compile, compile).produces(["out", "abi.json"]));

        let mut setup = action("setup");
        opt(&mut setup, "input", out.clone());
        opt(&mut setup, "backend", backend);
        opt(&mut setup, "proving-scheme", scheme);
        opt(&mut setup, "proving-key-path", pk.clone());
        opt(&mut setup, "verification-key-path", vk.clone());

        if is_universal(scheme) {
            let mut universal_setup = action("universal-setup");
            opt(&mut universal_setup, "curve", curve_arg(curve));
            opt(&mut universal_setup, "proving-scheme", scheme);
            opt(&mut universal_setup, "size", UNIVERSAL_SETUP_SIZE);
            opt(&mut universal_setup, "universal-setup-path", universal.clone());
            builder.push(Step::new(Phase::Setup, universal_setup).produces(["universal_setup.dat"]));

            opt(&mut setup, "universal-setup-path", universal);
            builder.push(
                Step::new(Phase::Setup, setup)
                    .consumes(["out", "universal_setup.dat"])
                    .produces(["proving.key", "verification.key"]),
            );
        } else {
            builder.push(
                Step::new(Phase::Setup, setup)
                    .consumes(["out"])
                    .produces(["proving.key", "verification.key"]),
            );
        }

        let mut compute_witness = action("compute-witness");
        opt(&mut compute_witness, "input", out.clone());
        opt(&mut compute_witness, "abi-spec", abi);
        opt(&mut compute_witness, "output", witness.clone());
        compute_witness.push("--arguments".to_string());
        compute_witness.extend(statement.input.iter().cloned());
        builder.push(
            Step::new(Phase::Prove, compute_witness)
                .consumes(["out", "abi.json"])
                .produces(["witness"]),
        );

        let mut generate_proof = action("generate-proof");
        opt(&mut generate_proof, "input", out);
        opt(&mut generate_proof, "backend", backend);
        opt(&mut generate_proof, "proving-scheme", scheme);
        opt(&mut generate_proof, "proving-key-path", pk);
        opt(&mut generate_proof, "witness", witness);
        opt(&mut generate_proof, "proof-path", proof.clone());
        builder.push(
            Step::new(Phase::Prove, generate_proof)
                .consumes(["out", "proving.key", "witness"])
                .produces(["proof.json"]),
        );

        let mut verify = action("verify");
        opt(&mut verify, "backend", backend);
        opt(&mut verify, "proof-path", proof);
        opt(&mut verify, "verification-key-path", vk);
        builder.push(Step::new(Phase::Verify, verify).consumes(["proof.json", "verification.key"]));

        Ok(builder.build()?)
    }
}
