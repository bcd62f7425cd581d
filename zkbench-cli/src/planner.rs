//! Run Planner
//!
//! Expands every (system, statement) pair into concrete configurations:
//!
//! ```text
//! system × statement
//!   │ statement_name ──UnsupportedStatement──▶ rejected (once per pair)
//!   ▼
//! enumerate(space)
//!   │ is_valid_configuration ──no──▶ counted as invalid, nothing else
//!   ▼
//! statement_instance + label ──error──▶ rejected
//!   │ --filter on label ──no match──▶ dropped
//!   │ label already planned for the system ──▶ rejected
//!   ▼
//! PlannedRun
//! ```
//!
//! Ordering follows the configuration file: systems, then statements, then
//! the configuration space's enumeration order. A label names one workspace
//! and one table row, so it is unique per system within a plan.

use fxhash::FxHashMap;
use regex::Regex;
use tracing::{debug, warn};
use zkbench_core::{
    ConfigLabel, ConfigurationSpace, Integration, IntegrationError, ResolvedConfiguration,
    StatementConfig, StatementInstance,
};

/// One configuration to execute
pub struct PlannedRun<'a> {
    /// Integration under test
    pub integration: &'a dyn Integration,
    /// Statement as configured
    pub statement: StatementConfig,
    /// Resolved configuration
    pub config: ResolvedConfiguration,
    /// Statement with concrete values
    pub instance: StatementInstance,
    /// Configuration label
    pub label: ConfigLabel,
}

/// A pair or configuration that cannot be planned
#[derive(Debug, Clone)]
pub struct RejectedRun {
    /// Integration name
    pub system: &'static str,
    /// Statement as configured
    pub statement: StatementConfig,
    /// Offending configuration; empty when the whole statement is unsupported
    pub config: ResolvedConfiguration,
    /// Whether the system simply lacks the statement
    pub unsupported: bool,
    /// Error kind
    pub kind: &'static str,
    /// Error message
    pub message: String,
}

impl RejectedRun {
    fn new(
        integration: &dyn Integration,
        statement: StatementConfig,
        config: ResolvedConfiguration,
        error: &IntegrationError,
    ) -> Self {
        Self {
            system: integration.name(),
            statement,
            config,
            unsupported: matches!(error, IntegrationError::UnsupportedStatement { .. }),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Execution plan
pub struct ExecutionPlan<'a> {
    /// Configurations to run, in order
    pub runs: Vec<PlannedRun<'a>>,
    /// Combinations rejected by `is_valid_configuration`
    pub invalid: usize,
    /// Pairs and configurations that could not be planned
    pub rejected: Vec<RejectedRun>,
}

/// Build the execution plan
pub fn build_plan<'a>(
    systems: &[(&'a dyn Integration, &ConfigurationSpace)],
    statements: &[StatementConfig],
    filter: Option<&Regex>,
) -> ExecutionPlan<'a> {
    let mut plan = ExecutionPlan {
        runs: Vec::new(),
        invalid: 0,
        rejected: Vec::new(),
    };
    let mut labels: FxHashMap<(&'static str, String), ResolvedConfiguration> =
        FxHashMap::default();

    for &(integration, space) in systems {
        for statement in statements {
            if let Err(e) = integration.statement_name(statement) {
                debug!("{} skips {}: {}", integration.name(), statement, e);
                plan.rejected.push(RejectedRun::new(
                    integration,
                    *statement,
                    ResolvedConfiguration::new(),
                    &e,
                ));
                continue;
            }

            for config in space.enumerate() {
                if !integration.is_valid_configuration(&config, statement) {
                    debug!("{} skips invalid configuration {}", integration.name(), config);
                    plan.invalid += 1;
                    continue;
                }

                let planned = integration
                    .statement_instance(statement, &config)
                    .and_then(|instance| {
                        let label = integration.label(&config, &instance)?;
                        Ok((instance, label))
                    });

                match planned {
                    Ok((instance, label)) => {
                        let key = label.to_string();
                        if filter.is_some_and(|re| !re.is_match(&key)) {
                            continue;
                        }
                        if let Some(first) = labels.get(&(integration.name(), key.clone())) {
                            warn!("{} label {} is not unique", integration.name(), label);
                            plan.rejected.push(RejectedRun {
                                system: integration.name(),
                                statement: *statement,
                                message: format!(
                                    "Label `{}` is already used by configuration {}",
                                    label, first
                                ),
                                config,
                                unsupported: false,
                                kind: "duplicate-label",
                            });
                            continue;
                        }
                        labels.insert((integration.name(), key), config.clone());
                        plan.runs.push(PlannedRun {
                            integration,
                            statement: *statement,
                            config,
                            instance,
                            label,
                        });
                    }
                    Err(e) => {
                        debug!("{} cannot plan {}: {}", integration.name(), config, e);
                        plan.rejected
                            .push(RejectedRun::new(integration, *statement, config, &e));
                    }
                }
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkbench_core::{
        CommandSequence, ExecutableInterface, HashFunction, ProviderContext, RunWorkspace,
        SignatureScheme, required_axis,
    };

    /// Accepts `(A, X)` and `(B, Y)`, proves MiMC only
    struct Diagonal;

    impl Integration for Diagonal {
        fn name(&self) -> &'static str {
            "diagonal"
        }

        fn statement_name(&self, statement: &StatementConfig) -> Result<String, IntegrationError> {
            match statement {
                StatementConfig::Hash {
                    function: HashFunction::Mimc,
                } => Ok("mimc".to_string()),
                other => Err(IntegrationError::UnsupportedStatement {
                    system: "diagonal",
                    statement: other.to_string(),
                }),
            }
        }

        fn is_valid_configuration(&self, config: &ResolvedConfiguration, _: &StatementConfig) -> bool {
            matches!(
                (config.get_str("curve"), config.get_str("scheme")),
                (Some("A"), Some("X")) | (Some("B"), Some("Y"))
            )
        }

        fn acquire_interface(&self, _: &ProviderContext) -> Result<ExecutableInterface, IntegrationError> {
            unreachable!("planning never acquires toolchains")
        }

        fn statement_instance(
            &self,
            statement: &StatementConfig,
            _config: &ResolvedConfiguration,
        ) -> Result<StatementInstance, IntegrationError> {
            Ok(StatementInstance::new(self.statement_name(statement)?, Default::default()))
        }

        fn label(&self, config: &ResolvedConfiguration, statement: &StatementInstance) -> Result<ConfigLabel, IntegrationError> {
            Ok(ConfigLabel::new([
                statement.name.as_str(),
                required_axis(config, "curve")?,
                required_axis(config, "scheme")?,
            ]))
        }

        fn build_command_sequence(
            &self,
            _: &ResolvedConfiguration,
            _: &StatementInstance,
            _: &ExecutableInterface,
            _: &RunWorkspace,
        ) -> Result<CommandSequence, IntegrationError> {
            unreachable!("planning never builds sequences")
        }
    }

    fn space() -> ConfigurationSpace {
        ConfigurationSpace::new()
            .with_axis("curve", ["A", "B"])
            .unwrap()
            .with_axis("scheme", ["X", "Y"])
            .unwrap()
    }

    const MIMC: StatementConfig = StatementConfig::Hash {
        function: HashFunction::Mimc,
    };

    fn plan_one<'a>(
        integration: &'a dyn Integration,
        space: &ConfigurationSpace,
        statements: &[StatementConfig],
        filter: Option<&Regex>,
    ) -> ExecutionPlan<'a> {
        build_plan(&[(integration, space)], statements, filter)
    }

    #[test]
    fn test_only_valid_configurations_are_planned() {
        let space = space();
        let plan = plan_one(&Diagonal, &space, &[MIMC], None);

        let labels: Vec<String> = plan.runs.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, ["mimc/A/X", "mimc/B/Y"]);
        assert_eq!(plan.invalid, 2);
        assert!(plan.rejected.is_empty());
    }

    #[test]
    fn test_unsupported_statement_rejected_once() {
        let space = space();
        let eddsa = StatementConfig::Signature {
            scheme: SignatureScheme::Eddsa,
        };
        let plan = plan_one(&Diagonal, &space, &[eddsa, MIMC], None);

        assert_eq!(plan.runs.len(), 2);
        assert_eq!(plan.rejected.len(), 1);
        assert!(plan.rejected[0].unsupported);
        assert_eq!(plan.rejected[0].kind, "unsupported-statement");
        assert!(plan.rejected[0].config.is_empty());
    }

    #[test]
    fn test_label_filter() {
        let space = space();
        let filter = Regex::new("/B/").unwrap();
        let plan = plan_one(&Diagonal, &space, &[MIMC], Some(&filter));

        assert_eq!(plan.runs.len(), 1);
        assert_eq!(plan.runs[0].config.get_str("curve"), Some("B"));
        assert_eq!(plan.invalid, 2);
    }

    #[test]
    fn test_duplicate_labels_are_rejected() {
        // `threads` is not part of the label, so both values collide
        let space = space().with_axis("threads", ["1", "8"]).unwrap();
        let plan = plan_one(&Diagonal, &space, &[MIMC], None);

        let labels: Vec<String> = plan.runs.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, ["mimc/A/X", "mimc/B/Y"]);
        assert_eq!(plan.rejected.len(), 2);
        for rejected in &plan.rejected {
            assert_eq!(rejected.kind, "duplicate-label");
            assert!(!rejected.unsupported);
            assert_eq!(rejected.config.get_str("threads"), Some("8"));
        }
        assert!(plan.rejected[0].message.contains("mimc/A/X"));

        // The same label under another system does not collide
        struct Mirror;
        impl Integration for Mirror {
            fn name(&self) -> &'static str {
                "mirror"
            }
            fn statement_name(&self, s: &StatementConfig) -> Result<String, IntegrationError> {
                Diagonal.statement_name(s)
            }
            fn is_valid_configuration(&self, c: &ResolvedConfiguration, s: &StatementConfig) -> bool {
                Diagonal.is_valid_configuration(c, s)
            }
            fn acquire_interface(&self, _: &ProviderContext) -> Result<ExecutableInterface, IntegrationError> {
                unreachable!()
            }
            fn statement_instance(&self, s: &StatementConfig, c: &ResolvedConfiguration) -> Result<StatementInstance, IntegrationError> {
                Diagonal.statement_instance(s, c)
            }
            fn label(&self, c: &ResolvedConfiguration, s: &StatementInstance) -> Result<ConfigLabel, IntegrationError> {
                Diagonal.label(c, s)
            }
            fn build_command_sequence(
                &self,
                _: &ResolvedConfiguration,
                _: &StatementInstance,
                _: &ExecutableInterface,
                _: &RunWorkspace,
            ) -> Result<CommandSequence, IntegrationError> {
                unreachable!()
            }
        }

        let space = self::space();
        let systems: [(&dyn Integration, &ConfigurationSpace); 2] =
            [(&Diagonal, &space), (&Mirror, &space)];
        let plan = build_plan(&systems, &[MIMC], None);
        assert_eq!(plan.runs.len(), 4);
        assert!(plan.rejected.is_empty());
    }

    #[test]
    fn test_empty_space_plans_one_configuration() {
        struct Anything;
        impl Integration for Anything {
            fn name(&self) -> &'static str {
                "anything"
            }
            fn statement_name(&self, _: &StatementConfig) -> Result<String, IntegrationError> {
                Ok("s".to_string())
            }
            fn is_valid_configuration(&self, _: &ResolvedConfiguration, _: &StatementConfig) -> bool {
                true
            }
            fn acquire_interface(&self, _: &ProviderContext) -> Result<ExecutableInterface, IntegrationError> {
                unreachable!()
            }
            fn statement_instance(&self, _: &StatementConfig, _: &ResolvedConfiguration) -> Result<StatementInstance, IntegrationError> {
                Ok(StatementInstance::new("s", Default::default()))
            }
            fn label(&self, _: &ResolvedConfiguration, s: &StatementInstance) -> Result<ConfigLabel, IntegrationError> {
                Ok(ConfigLabel::new([s.name.as_str()]))
            }
            fn build_command_sequence(
                &self,
                _: &ResolvedConfiguration,
                _: &StatementInstance,
                _: &ExecutableInterface,
                _: &RunWorkspace,
            ) -> Result<CommandSequence, IntegrationError> {
                unreachable!()
            }
        }

        let empty = ConfigurationSpace::new();
        let plan = plan_one(&Anything, &empty, &[MIMC], None);
        assert_eq!(plan.runs.len(), 1);
        assert!(plan.runs[0].config.is_empty());
    }

    #[test]
    fn test_label_error_is_rejected() {
        let space = ConfigurationSpace::new().with_axis("scheme", ["X"]).unwrap();

        struct NoCurve;
        impl Integration for NoCurve {
            fn name(&self) -> &'static str {
                "nocurve"
            }
            fn statement_name(&self, s: &StatementConfig) -> Result<String, IntegrationError> {
                Diagonal.statement_name(s)
            }
            fn is_valid_configuration(&self, _: &ResolvedConfiguration, _: &StatementConfig) -> bool {
                true
            }
            fn acquire_interface(&self, _: &ProviderContext) -> Result<ExecutableInterface, IntegrationError> {
                unreachable!()
            }
            fn label(&self, c: &ResolvedConfiguration, s: &StatementInstance) -> Result<ConfigLabel, IntegrationError> {
                Diagonal.label(c, s)
            }
            fn build_command_sequence(
                &self,
                _: &ResolvedConfiguration,
                _: &StatementInstance,
                _: &ExecutableInterface,
                _: &RunWorkspace,
            ) -> Result<CommandSequence, IntegrationError> {
                unreachable!()
            }
        }

        // MiMC needs a curve for its constants
        let plan = plan_one(&NoCurve, &space, &[MIMC], None);
        assert!(plan.runs.is_empty());
        assert_eq!(plan.rejected.len(), 1);
        assert!(!plan.rejected[0].unsupported);
        assert_eq!(plan.rejected[0].kind, "missing-axis");
    }
}
