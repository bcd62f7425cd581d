//! Phase Tables
//!
//! ```text
//! <dir>/compile.csv
//! <dir>/setup.csv      system,config,avg_cputime,sd_cputime,...
//! <dir>/prove.csv      zokrates,mimc.zok/ark/g16/bn254,1.25,0.05,...
//! <dir>/verify.csv
//! ```
//!
//! Every table is truncated and given its header once when the run starts.
//! Rows are appended unbuffered as configurations finish, so an interrupted
//! run keeps every row written so far. A configuration's rows land in all of
//! its tables or in none.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use zkbench_core::{ConfigLabel, Metric, Phase};
use zkbench_stats::PhaseStatistics;

/// Header row shared by every phase table
pub const CSV_HEADER: &str =
    "system,config,avg_cputime,sd_cputime,avg_walltime,sd_walltime,avg_memory,sd_memory";

/// Open per-phase result tables
#[derive(Debug)]
pub struct PhaseTables {
    dir: PathBuf,
    files: BTreeMap<Phase, File>,
}

impl PhaseTables {
    /// Create `dir` and a fresh table with a header for every phase
    pub fn create(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;

        let mut files = BTreeMap::new();
        for phase in Phase::ALL {
            let mut file = File::create(Self::path_in(dir, phase))?;
            file.write_all(format!("{}\n", CSV_HEADER).as_bytes())?;
            files.insert(phase, file);
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Directory holding the tables
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the table for `phase`
    pub fn path(&self, phase: Phase) -> PathBuf {
        Self::path_in(&self.dir, phase)
    }

    fn path_in(dir: &Path, phase: Phase) -> PathBuf {
        dir.join(format!("{}.csv", phase.as_str()))
    }

    /// Append one row per phase for a finished configuration
    ///
    /// On error, rows already written for this configuration are removed.
    pub fn append(
        &mut self,
        system: &str,
        label: &ConfigLabel,
        stats: &[PhaseStatistics],
    ) -> std::io::Result<()> {
        let rows: Vec<(Phase, String)> = stats
            .iter()
            .filter(|s| self.files.contains_key(&s.phase))
            .map(|s| (s.phase, format!("{}\n", format_row(system, label, s))))
            .collect();

        let mut written = Vec::with_capacity(rows.len());
        for (phase, row) in &rows {
            let Some(file) = self.files.get_mut(phase) else {
                continue;
            };
            let result = file.stream_position().and_then(|start| {
                written.push((*phase, start));
                file.write_all(row.as_bytes())
            });
            if let Err(e) = result {
                self.truncate(&written);
                return Err(e);
            }
        }
        Ok(())
    }

    fn truncate(&mut self, positions: &[(Phase, u64)]) {
        for (phase, len) in positions {
            if let Some(file) = self.files.get_mut(phase) {
                let _ = file.set_len(*len);
                let _ = file.seek(SeekFrom::Start(*len));
            }
        }
    }
}

/// Render one table row
pub fn format_row(system: &str, label: &ConfigLabel, stats: &PhaseStatistics) -> String {
    let mut fields = vec![esc(system), esc(&label.to_string())];
    for metric in Metric::ALL {
        let summary = stats.get(metric);
        fields.push(summary.mean.normalize().to_string());
        fields.push(summary.std_dev.normalize().to_string());
    }
    fields.join(",")
}

fn esc(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
