//! Configuration Execution
//!
//! ```text
//! PlannedRun
//!    │
//!    ▼
//! toolchain (cached per system and provider axes; failures are cached too)
//!    │
//!    ▼
//! build_command_sequence ──▶ create <results>/<system>/<label>
//!    │
//!    ▼
//! repeat 1..=N: every command through the CommandRunner
//!    │          (any error abandons the configuration)
//!    ▼
//! RepeatAccumulator ──▶ one row per phase in the phase tables
//! ```
//!
//! Execution is strictly sequential. A configuration either contributes a
//! complete set of rows or none at all.

use crate::planner::{ExecutionPlan, PlannedRun};
use crate::supervisor::{CommandRunner, SupervisorError};
use fxhash::FxHashMap;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use zkbench_core::{ArtifactRoot, ExecutableInterface, ProviderContext, ResolvedConfiguration};
use zkbench_report::{ConfigResult, FailureInfo, PhaseTables, RunStatus};
use zkbench_sandbox::RunPaths;
use zkbench_stats::{PhaseStatistics, RepeatAccumulator};

/// Configuration for benchmark execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Repeats of every configuration's full sequence
    pub repeats: u32,
    /// Root of artifact and log directories
    pub results_dir: PathBuf,
    /// Directory holding the toolchain sources
    pub systems_dir: PathBuf,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            repeats: 1,
            results_dir: PathBuf::from("results"),
            systems_dir: PathBuf::from("systems"),
        }
    }
}

type ProviderKey = (&'static str, ResolvedConfiguration);

/// Execute planned configurations and write their rows
pub struct Executor<R> {
    config: ExecutionConfig,
    runner: R,
    tables: PhaseTables,
    providers: FxHashMap<ProviderKey, Result<ExecutableInterface, String>>,
}

impl<R: CommandRunner> Executor<R> {
    /// Create an executor writing rows to `tables`
    pub fn new(config: ExecutionConfig, runner: R, tables: PhaseTables) -> Self {
        Self {
            config,
            runner,
            tables,
            providers: FxHashMap::default(),
        }
    }

    /// The command runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Execute all planned configurations in order
    pub fn execute(&mut self, plan: &ExecutionPlan<'_>) -> Vec<ConfigResult> {
        let pb = ProgressBar::new(plan.runs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut results = Vec::with_capacity(plan.runs.len());
        for run in &plan.runs {
            let system = run.integration.name();
            pb.set_message(format!("{} {}", system, run.label));

            let (status, phases, failure) = match self.execute_single(run) {
                Ok(phases) => {
                    info!("{} {}: done", system, run.label);
                    (RunStatus::Passed, phases, None)
                }
                Err(e) => {
                    warn!("{} {} failed: {}", system, run.label, e);
                    let failure = FailureInfo {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    };
                    (RunStatus::Failed, Vec::new(), Some(failure))
                }
            };

            results.push(ConfigResult {
                system: system.to_string(),
                statement: run.statement.to_string(),
                label: run.label.to_string(),
                config: run.config.clone(),
                status,
                phases,
                failure,
            });
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        results
    }

    /// Run one configuration `repeats` times and append its rows
    fn execute_single(
        &mut self,
        run: &PlannedRun<'_>,
    ) -> Result<Vec<PhaseStatistics>, SupervisorError> {
        let system = run.integration.name();
        let interface = self.interface(run)?;

        let workspace =
            ArtifactRoot::new(&self.config.results_dir, system).workspace(run.label.clone());
        let sequence = run.integration.build_command_sequence(
            &run.config,
            &run.instance,
            &interface,
            &workspace,
        )?;

        std::fs::create_dir_all(workspace.dir()).map_err(|source| SupervisorError::Workspace {
            path: workspace.dir().to_path_buf(),
            source,
        })?;

        let mut accumulator = RepeatAccumulator::new(sequence.phases());
        for repeat in 1..=self.config.repeats {
            let mut sample = accumulator.sample();
            for (index, command) in sequence.commands().iter().enumerate() {
                let paths =
                    RunPaths::in_dir(workspace.dir(), repeat, index, command.phase.as_str());
                debug!("{} repeat {} [{}] {}", run.label, repeat, command.phase, command.argv.join(" "));

                let metrics =
                    self.runner
                        .run(command, &paths)
                        .map_err(|source| SupervisorError::Run {
                            repeat,
                            index,
                            phase: command.phase,
                            source,
                        })?;
                sample.add(command.phase, metrics)?;
            }
            accumulator.commit(sample);
        }

        let stats = accumulator.finish()?;
        self.tables
            .append(system, &run.label, &stats)
            .map_err(SupervisorError::Table)?;
        Ok(stats)
    }

    /// Toolchain for `run`, acquired at most once per provider key
    fn interface(&mut self, run: &PlannedRun<'_>) -> Result<ExecutableInterface, SupervisorError> {
        let system = run.integration.name();
        let provider_config = run.config.project(run.integration.provider_axes());
        let systems_dir = &self.config.systems_dir;

        let entry = self
            .providers
            .entry((system, provider_config.clone()))
            .or_insert_with(|| {
                info!("Acquiring {} toolchain {}", system, provider_config);
                let context = ProviderContext {
                    systems_dir: systems_dir.clone(),
                    config: provider_config,
                };
                run.integration.acquire_interface(&context).map_err(|e| {
                    error!("{}", e);
                    e.to_string()
                })
            });

        entry
            .clone()
            .map_err(|message| SupervisorError::Provider { system, message })
    }
}
