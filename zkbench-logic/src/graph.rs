//! Artifact Graph
//!
//! Tracks which command of a sequence produces and consumes which file
//! artifact, so a sequence can be rejected when a command reads something no
//! earlier command wrote.

use fxhash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// Errors from artifact dependency checks
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    /// A command consumes an artifact nothing produces.
    #[error("Command {command} consumes `{artifact}`, which no command produces")]
    UnknownArtifact {
        /// Index of the consuming command
        command: usize,
        /// Artifact name
        artifact: String,
    },

    /// A command consumes an artifact that is only produced by itself or a later command.
    #[error("Command {command} consumes `{artifact}` before command {producer} produces it")]
    ProducedLater {
        /// Index of the consuming command
        command: usize,
        /// Artifact name
        artifact: String,
        /// Earliest producing command
        producer: usize,
    },
}

/// Producer/consumer relation between the commands of one sequence
#[derive(Debug, Default)]
pub struct ArtifactGraph {
    /// Artifact -> indices of producing commands, ascending
    producers: FxHashMap<String, Vec<usize>>,
    /// Command index -> consumed artifacts
    consumers: Vec<Vec<String>>,
}

impl ArtifactGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next command; returns its index
    pub fn add_command<P, C>(&mut self, produces: P, consumes: C) -> usize
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let index = self.consumers.len();
        for artifact in produces {
            self.producers.entry(artifact.into()).or_default().push(index);
        }
        self.consumers
            .push(consumes.into_iter().map(Into::into).collect());
        index
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    /// Whether no command is registered
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Commands whose output the given command reads
    pub fn dependencies(&self, command: usize) -> FxHashSet<usize> {
        let mut deps = FxHashSet::default();
        if let Some(consumed) = self.consumers.get(command) {
            for artifact in consumed {
                if let Some(producers) = self.producers.get(artifact) {
                    if let Some(&p) = producers.iter().rev().find(|&&p| p < command) {
                        deps.insert(p);
                    }
                }
            }
        }
        deps
    }

    /// Check that every consumed artifact is produced by a strictly earlier command
    pub fn check_order(&self) -> Result<(), GraphError> {
        for (command, consumed) in self.consumers.iter().enumerate() {
            for artifact in consumed {
                let producers = self.producers.get(artifact).ok_or_else(|| {
                    GraphError::UnknownArtifact {
                        command,
                        artifact: artifact.clone(),
                    }
                })?;
                let earliest = producers[0];
                if earliest >= command {
                    return Err(GraphError::ProducedLater {
                        command,
                        artifact: artifact.clone(),
                        producer: earliest,
                    });
                }
            }
        }
        Ok(())
    }
}
