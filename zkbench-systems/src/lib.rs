#![warn(missing_docs)]
//! zkbench Systems - Proof-System Integrations
//!
//! Every supported toolchain implements [`Integration`] and is listed in a
//! static registry, so the orchestrator can look systems up by the name used
//! in the configuration file.

mod gnark;
mod toolchain;
mod zokrates;

pub use gnark::Gnark;
pub use zokrates::Zokrates;

use zkbench_core::Integration;

static INTEGRATIONS: &[&dyn Integration] = &[&Zokrates, &Gnark];

/// Every registered integration, in registration order
pub fn registry() -> &'static [&'static dyn Integration] {
    INTEGRATIONS
}

/// Find an integration by name
pub fn find(name: &str) -> Option<&'static dyn Integration> {
    INTEGRATIONS.iter().copied().find(|i| i.name() == name)
}

/// Names of all registered integrations
pub fn names() -> Vec<&'static str> {
    INTEGRATIONS.iter().map(|i| i.name()).collect()
}
