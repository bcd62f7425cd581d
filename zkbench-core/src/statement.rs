//! Statement Workloads
//!
//! A statement is the relation a proof system proves, independent of the
//! system. Each statement carries fixed public inputs and expected outputs.
//! MiMC digests depend on the scalar field, so its expected output is looked
//! up by curve.

use crate::integration::IntegrationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash functions available as statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    /// SHA-256
    Sha256,
    /// MiMC over the curve's scalar field
    Mimc,
}

impl HashFunction {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            HashFunction::Sha256 => "sha256",
            HashFunction::Mimc => "mimc",
        }
    }
}

/// Signature schemes available as statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// EdDSA over the curve's twisted Edwards companion
    Eddsa,
}

impl SignatureScheme {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureScheme::Eddsa => "eddsa",
        }
    }
}

/// System-independent statement selection, as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum StatementConfig {
    /// Prove knowledge of a hash preimage
    Hash {
        /// Hash function
        function: HashFunction,
    },
    /// Prove a valid signature
    Signature {
        /// Signature scheme
        #[serde(rename = "type")]
        scheme: SignatureScheme,
    },
}

impl fmt::Display for StatementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementConfig::Hash { function } => write!(f, "hash/{}", function.as_str()),
            StatementConfig::Signature { scheme } => write!(f, "signature/{}", scheme.as_str()),
        }
    }
}

/// Concrete statement values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementIo {
    /// Inputs, in argument order
    pub input: Vec<String>,
    /// Expected outputs, in argument order
    pub output: Vec<String>,
}

/// A statement as one proof system understands it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementInstance {
    /// System-specific statement name (program file, circuit id)
    pub name: String,
    /// Inputs, in argument order
    pub input: Vec<String>,
    /// Expected outputs, in argument order
    pub output: Vec<String>,
}

impl StatementInstance {
    /// Combine a system-specific name with statement values
    pub fn new(name: impl Into<String>, io: StatementIo) -> Self {
        Self {
            name: name.into(),
            input: io.input,
            output: io.output,
        }
    }
}

const SHA256_INPUT: &str = "alsdkjkf";
const SHA256_OUTPUT: &str = "aolsdjf";

const MIMC_PREIMAGE: &str =
    "2500529438769068184939310842255337777019455354716472599427671106327738757593";

/// MiMC image of `MIMC_PREIMAGE` per curve scalar field
const MIMC_IMAGES: &[(&str, &str)] = &[
    (
        "bls12_377",
        "1683808678237589890991940660402320082539960358730885270986867502922067028343",
    ),
    (
        "bls12_381",
        "9609944517377197017437138930324005647583071543726368180316669152326447041177",
    ),
    (
        "bls24_315",
        "8292564672613974561778331694868743899755316462218397557784097073783444491614",
    ),
    (
        "bls24_317",
        "18620627322597581227961491848331383812143930512558561572383082896994412368445",
    ),
    (
        "bn254",
        "13248831399819789889404171255535350089059524493356144500109438146102501272052",
    ),
    (
        "bw6_633",
        "36965077899919274687803581679180675583437477955815006193859650118462307729421763313661869955637",
    ),
    (
        "bw6_761",
        "160432259944223943634951850830609913414856793063347309293008303627868452429703157366913315547528893131012420194897",
    ),
];

/// EdDSA test vector: public key (x, y), signature R (x, y), S, message
const EDDSA_INPUT: [&str; 6] = [
    "10041775272610680597649138558111867140088287599035431170728241228669634925671",
    "19045584355489137154300255038437027652180257880634202059955435891798466344432",
    "14517916597883362893064608394843629693674165114908520112595055382047085957383",
    "14897476871502190904409029696666322856887678969656209656241038339251270171395",
    "16668832459046858928951622951481252834155254151733002984053501254009901876174",
    "11908494008557430893638745225033142136929183395599991460993160940994523916657640981651909087138130190920320833227914842955780438350735473049230499968480372",
];

impl StatementConfig {
    /// Fixed statement values for the given curve.
    ///
    /// Only MiMC needs the curve; other statements ignore it.
    pub fn io(&self, curve: Option<&str>) -> Result<StatementIo, IntegrationError> {
        match self {
            StatementConfig::Hash {
                function: HashFunction::Sha256,
            } => Ok(StatementIo {
                input: vec![SHA256_INPUT.to_string()],
                output: vec![SHA256_OUTPUT.to_string()],
            }),
            StatementConfig::Hash {
                function: HashFunction::Mimc,
            } => {
                let curve = curve.ok_or_else(|| IntegrationError::MissingAxis("curve".to_string()))?;
                let image = MIMC_IMAGES
                    .iter()
                    .find(|(c, _)| *c == curve)
                    .map(|(_, image)| *image)
                    .ok_or_else(|| IntegrationError::MissingConstants {
                        statement: self.to_string(),
                        curve: curve.to_string(),
                    })?;
                Ok(StatementIo {
                    input: vec![MIMC_PREIMAGE.to_string()],
                    output: vec![image.to_string()],
                })
            }
            StatementConfig::Signature {
                scheme: SignatureScheme::Eddsa,
            } => Ok(StatementIo {
                input: EDDSA_INPUT.iter().map(|s| s.to_string()).collect(),
                output: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Statements {
        statements: Vec<StatementConfig>,
    }

    #[test]
    fn test_parse_statements_toml() {
        let parsed: Statements = toml::from_str(
            r#"
            [[statements]]
            name = "hash"
            function = "mimc"

            [[statements]]
            name = "signature"
            type = "eddsa"
            "#,
        )
        .unwrap();

        assert_eq!(
            parsed.statements,
            [
                StatementConfig::Hash {
                    function: HashFunction::Mimc
                },
                StatementConfig::Signature {
                    scheme: SignatureScheme::Eddsa
                },
            ]
        );
    }

    #[test]
    fn test_unknown_hash_rejected() {
        let result: Result<StatementConfig, _> =
            serde_json::from_str(r#"{"name": "hash", "function": "poseidon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_mimc_output_depends_on_curve() {
        let mimc = StatementConfig::Hash {
            function: HashFunction::Mimc,
        };
        let bn = mimc.io(Some("bn254")).unwrap();
        let bls = mimc.io(Some("bls12_381")).unwrap();

        assert_eq!(bn.input, bls.input);
        assert_ne!(bn.output, bls.output);
        assert!(bn.output[0].starts_with("1324883"));
    }

    #[test]
    fn test_mimc_requires_known_curve() {
        let mimc = StatementConfig::Hash {
            function: HashFunction::Mimc,
        };
        assert!(matches!(mimc.io(None), Err(IntegrationError::MissingAxis(_))));
        assert!(matches!(
            mimc.io(Some("pallas")),
            Err(IntegrationError::MissingConstants { .. })
        ));
    }

    #[test]
    fn test_eddsa_ignores_curve() {
        let eddsa = StatementConfig::Signature {
            scheme: SignatureScheme::Eddsa,
        };
        let io = eddsa.io(None).unwrap();
        assert_eq!(io.input.len(), 6);
        assert!(io.output.is_empty());
        assert_eq!(eddsa.to_string(), "signature/eddsa");
    }
}
