#![warn(missing_docs)]
//! zkbench Logic - Configuration Spaces and Artifact Dependencies
//!
//! Pure algorithms shared by the harness:
//! - Declarative configuration spaces and their Cartesian-product enumeration
//! - Resolved (single-valued) configurations with dotted-path lookup
//! - Artifact dependency checks for command sequences

mod graph;
mod resolved;
mod space;

pub use graph::{ArtifactGraph, GraphError};
pub use resolved::{AxisValue, ResolvedConfiguration};
pub use space::{Axis, Combinations, ConfigurationSpace, SpaceError};
