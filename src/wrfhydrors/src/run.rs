// wrfhydrors/src/run.rs

use crate::constants::{HYDRO_RESTART_PREFIX, LSM_RESTART_PREFIX, NUDGING_RESTART_PREFIX};
use anyhow::Context;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// The kinds of restart file a run writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartCategory {
    Hydro,   // HYDRO_RST.*
    Lsm,     // RESTART.*
    Nudging, // nudgingLastObs.*
}

impl RestartCategory {
    /// Report order
    pub const ALL: [RestartCategory; 3] = [
        RestartCategory::Hydro,
        RestartCategory::Lsm,
        RestartCategory::Nudging,
    ];

    /// Key used in `diff_counts`
    pub fn name(&self) -> &'static str {
        match self {
            RestartCategory::Hydro => "hydro",
            RestartCategory::Lsm => "lsm",
            RestartCategory::Nudging => "nudging",
        }
    }

    pub fn file_prefix(&self) -> &'static str {
        match self {
            RestartCategory::Hydro => HYDRO_RESTART_PREFIX,
            RestartCategory::Lsm => LSM_RESTART_PREFIX,
            RestartCategory::Nudging => NUDGING_RESTART_PREFIX,
        }
    }

    /// Category a restart file belongs to, judged by its file name
    pub fn classify(file_name: &str) -> Option<RestartCategory> {
        Self::ALL
            .into_iter()
            .find(|category| file_name.starts_with(category.file_prefix()))
    }
}

impl fmt::Display for RestartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can list a run's restart files
pub trait RestartFiles {
    fn restart_hydro(&self) -> &[PathBuf];
    fn restart_lsm(&self) -> &[PathBuf];
    fn restart_nudging(&self) -> &[PathBuf];

    fn restart_files(&self, category: RestartCategory) -> &[PathBuf] {
        match category {
            RestartCategory::Hydro => self.restart_hydro(),
            RestartCategory::Lsm => self.restart_lsm(),
            RestartCategory::Nudging => self.restart_nudging(),
        }
    }
}

/// Restart files of a single simulation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDirectory {
    hydro: Vec<PathBuf>,
    lsm: Vec<PathBuf>,
    nudging: Vec<PathBuf>,
}

impl RunDirectory {
    pub fn new(hydro: Vec<PathBuf>, lsm: Vec<PathBuf>, nudging: Vec<PathBuf>) -> Self {
        Self {
            hydro,
            lsm,
            nudging,
        }
    }

    /// Collect restart files from the top level of a run directory
    pub fn from_dir(path: &Path) -> anyhow::Result<Self> {
        let mut run = Self::default();

        let entries = fs_err::read_dir(path)
            .context(format!("Error listing run directory {}", path.display()))?;

        for entry in entries {
            let entry = entry.context(format!("Error reading entry in {}", path.display()))?;
            let file_path = entry.path();
            if !file_path.is_file() {
                continue;
            }

            let Some(category) = file_path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(RestartCategory::classify)
            else {
                continue;
            };

            run.files_mut(category).push(file_path);
        }

        for category in RestartCategory::ALL {
            run.files_mut(category).sort();
        }

        log::info!(
            "Found {} hydro, {} lsm, {} nudging restart files in {}",
            run.hydro.len(),
            run.lsm.len(),
            run.nudging.len(),
            path.display()
        );

        Ok(run)
    }

    fn files_mut(&mut self, category: RestartCategory) -> &mut Vec<PathBuf> {
        match category {
            RestartCategory::Hydro => &mut self.hydro,
            RestartCategory::Lsm => &mut self.lsm,
            RestartCategory::Nudging => &mut self.nudging,
        }
    }
}

impl RestartFiles for RunDirectory {
    fn restart_hydro(&self) -> &[PathBuf] {
        &self.hydro
    }

    fn restart_lsm(&self) -> &[PathBuf] {
        &self.lsm
    }

    fn restart_nudging(&self) -> &[PathBuf] {
        &self.nudging
    }
}
