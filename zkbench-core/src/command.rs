//! Command Sequences
//!
//! An integration turns one resolved configuration into an ordered list of
//! commands. Later commands read files written by earlier ones, so the
//! builder records which artifacts every step produces and consumes and
//! refuses sequences that are out of order.
//!
//! ```text
//! Step(compile)  produces: out, abi.json
//! Step(setup)    consumes: out            produces: proving.key, verification.key
//! Step(prove)    consumes: out, proving.key ...
//! Step(verify)   consumes: proof.json, verification.key
//!        │
//!        ▼  build()
//! CommandSequence (phase order non-decreasing, artifacts produced before use)
//! ```

use crate::label::ConfigLabel;
use crate::phase::Phase;
use thiserror::Error;
use zkbench_logic::{ArtifactGraph, GraphError};

/// Errors from command sequence construction
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SequenceError {
    /// The sequence has no commands
    #[error("Command sequence `{0}` is empty")]
    Empty(String),

    /// A command has no program to run
    #[error("Command {index} of `{label}` has an empty argument vector")]
    EmptyCommand {
        /// Sequence label
        label: String,
        /// Command index
        index: usize,
    },

    /// A command belongs to an earlier phase than its predecessor
    #[error("Command {index} of `{label}` is in phase {phase} after phase {previous}")]
    PhaseOrder {
        /// Sequence label
        label: String,
        /// Command index
        index: usize,
        /// Phase of the preceding command
        previous: Phase,
        /// Phase of the offending command
        phase: Phase,
    },

    /// A command reads an artifact no earlier command writes
    #[error("Sequence `{label}`: {source}")]
    Artifact {
        /// Sequence label
        label: String,
        /// Underlying dependency error
        #[source]
        source: GraphError,
    },
}

/// One argv-style invocation tagged with its phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Phase this command's cost is attributed to
    pub phase: Phase,
    /// Program followed by its arguments
    pub argv: Vec<String>,
}

impl Command {
    /// Create a command
    pub fn new<I, S>(phase: Phase, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phase,
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Program to execute
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Arguments after the program
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

/// Validated, ordered commands of one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSequence {
    label: ConfigLabel,
    commands: Vec<Command>,
}

impl CommandSequence {
    /// Validate commands that carry no artifact information
    pub fn new(label: ConfigLabel, commands: Vec<Command>) -> Result<Self, SequenceError> {
        check_commands(&label, &commands)?;
        Ok(Self { label, commands })
    }

    /// Label shared by every command
    pub fn label(&self) -> &ConfigLabel {
        &self.label
    }

    /// Commands in execution order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always false for a validated sequence
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Distinct phases present, in order
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases: Vec<Phase> = self.commands.iter().map(|c| c.phase).collect();
        phases.dedup();
        phases
    }
}

fn check_commands(label: &ConfigLabel, commands: &[Command]) -> Result<(), SequenceError> {
    if commands.is_empty() {
        return Err(SequenceError::Empty(label.to_string()));
    }

    for (index, command) in commands.iter().enumerate() {
        if command.argv.is_empty() {
            return Err(SequenceError::EmptyCommand {
                label: label.to_string(),
                index,
            });
        }
        if index > 0 {
            let previous = commands[index - 1].phase;
            if command.phase < previous {
                return Err(SequenceError::PhaseOrder {
                    label: label.to_string(),
                    index,
                    previous,
                    phase: command.phase,
                });
            }
        }
    }

    Ok(())
}

/// A command plus the artifacts it touches
#[derive(Debug, Clone)]
pub struct Step {
    command: Command,
    produces: Vec<String>,
    consumes: Vec<String>,
}

impl Step {
    /// Start a step
    pub fn new<I, S>(phase: Phase, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: Command::new(phase, argv),
            produces: Vec::new(),
            consumes: Vec::new(),
        }
    }

    /// Artifacts written by this step
    pub fn produces<I, S>(mut self, artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces.extend(artifacts.into_iter().map(Into::into));
        self
    }

    /// Artifacts read by this step
    pub fn consumes<I, S>(mut self, artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes.extend(artifacts.into_iter().map(Into::into));
        self
    }
}

/// Builder scoped to a single sequence construction
#[derive(Debug)]
pub struct CommandSequenceBuilder {
    label: ConfigLabel,
    commands: Vec<Command>,
    graph: ArtifactGraph,
}

impl CommandSequenceBuilder {
    /// Start a sequence for `label`
    pub fn new(label: ConfigLabel) -> Self {
        Self {
            label,
            commands: Vec::new(),
            graph: ArtifactGraph::new(),
        }
    }

    /// Label every command will share
    pub fn label(&self) -> &ConfigLabel {
        &self.label
    }

    /// Append a step
    pub fn push(&mut self, step: Step) -> &mut Self {
        self.graph.add_command(step.produces, step.consumes);
        self.commands.push(step.command);
        self
    }

    /// Validate phase order and artifact flow
    pub fn build(self) -> Result<CommandSequence, SequenceError> {
        check_commands(&self.label, &self.commands)?;
        self.graph
            .check_order()
            .map_err(|source| SequenceError::Artifact {
                label: self.label.to_string(),
                source,
            })?;
        Ok(CommandSequence {
            label: self.label,
            commands: self.commands,
        })
    }
}
