//! Benchmark phases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle phase of a proof system, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Circuit compilation
    Compile,
    /// Key generation (trusted or universal setup)
    Setup,
    /// Witness computation and proof generation
    Prove,
    /// Proof verification
    Verify,
}

impl Phase {
    /// Every phase, in order
    pub const ALL: [Phase; 4] = [Phase::Compile, Phase::Setup, Phase::Prove, Phase::Verify];

    /// Lowercase name, also used for table and log file names
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Compile => "compile",
            Phase::Setup => "setup",
            Phase::Prove => "prove",
            Phase::Verify => "verify",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown phase: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert!(Phase::Compile < Phase::Setup);
        assert!(Phase::Setup < Phase::Prove);
        assert!(Phase::Prove < Phase::Verify);

        let mut sorted = Phase::ALL;
        sorted.sort();
        assert_eq!(sorted, Phase::ALL);
    }

    #[test]
    fn test_phase_names() {
        for phase in Phase::ALL {
            assert_eq!(phase.as_str().parse::<Phase>().unwrap(), phase);
        }
        assert!("witness".parse::<Phase>().is_err());
        assert_eq!(serde_json::to_string(&Phase::Prove).unwrap(), "\"prove\"");
    }
}
