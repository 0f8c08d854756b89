// wrfhydrors/src/report.rs

use crate::compare::matcher::match_and_compare;
use crate::compare::nccmp::{FileComparator, NccmpComparator};
use crate::compare::outcome::FileComparison;
use crate::config::CompareOptions;
use crate::run::{RestartCategory, RestartFiles};
use crate::warnings::DiffWarning;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;

/// Restart file differences between a candidate run and a reference run
///
/// A category field is `None` when either run had no files of that kind; only
/// compared categories get an entry in `diff_counts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffReport {
    pub hydro: Option<Vec<FileComparison>>,
    pub lsm: Option<Vec<FileComparison>>,
    pub nudging: Option<Vec<FileComparison>>,
    pub diff_counts: BTreeMap<String, usize>,
    pub warnings: Vec<DiffWarning>,
}

impl DiffReport {
    /// Compare the restart files of two runs, category by category
    pub fn new<C, A, B>(candidate_run: &A, reference_run: &B, comparator: &C) -> anyhow::Result<Self>
    where
        C: FileComparator + ?Sized,
        A: RestartFiles + ?Sized,
        B: RestartFiles + ?Sized,
    {
        let mut report = Self::default();

        for category in RestartCategory::ALL {
            let candidate_files = candidate_run.restart_files(category);
            let reference_files = reference_run.restart_files(category);

            if candidate_files.is_empty() || reference_files.is_empty() {
                report.warnings.push(
                    DiffWarning::EmptyCategory {
                        category: category.name().to_string(),
                        candidate_len: candidate_files.len(),
                        reference_len: reference_files.len(),
                    }
                    .emit(),
                );
                continue;
            }

            log::info!(
                "Comparing {} {} restart files",
                candidate_files.len(),
                category
            );
            let result = match_and_compare(candidate_files, reference_files, comparator)
                .context(format!("Error comparing {} restart files", category))?;

            report
                .diff_counts
                .insert(category.name().to_string(), result.diff_count());
            report.warnings.extend(result.warnings);
            *report.category_mut(category) = Some(result.comparisons);
        }

        Ok(report)
    }

    /// Same as [`DiffReport::new`] using nccmp with the given options
    pub fn with_options<A, B>(
        candidate_run: &A,
        reference_run: &B,
        options: CompareOptions,
    ) -> anyhow::Result<Self>
    where
        A: RestartFiles + ?Sized,
        B: RestartFiles + ?Sized,
    {
        Self::new(candidate_run, reference_run, &NccmpComparator::new(options))
    }

    pub fn category(&self, category: RestartCategory) -> Option<&[FileComparison]> {
        match category {
            RestartCategory::Hydro => self.hydro.as_deref(),
            RestartCategory::Lsm => self.lsm.as_deref(),
            RestartCategory::Nudging => self.nudging.as_deref(),
        }
    }

    fn category_mut(&mut self, category: RestartCategory) -> &mut Option<Vec<FileComparison>> {
        match category {
            RestartCategory::Hydro => &mut self.hydro,
            RestartCategory::Lsm => &mut self.lsm,
            RestartCategory::Nudging => &mut self.nudging,
        }
    }

    pub fn total_diffs(&self) -> usize {
        self.diff_counts.values().sum()
    }

    pub fn has_diffs(&self) -> bool {
        self.total_diffs() > 0
    }

    /// Get a summary of the report for display
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        for category in RestartCategory::ALL {
            let Some(comparisons) = self.category(category) else {
                lines.push(format!("{}: not compared", category));
                continue;
            };

            lines.push(format!(
                "{}: {} of {} files differ",
                category,
                self.diff_counts.get(category.name()).copied().unwrap_or(0),
                comparisons.len()
            ));
            for comparison in comparisons.iter().filter(|c| c.has_difference()) {
                let detail = match comparison.outcome.table() {
                    Some(table) => format!("{} variables", table.len()),
                    None => "unreadable nccmp output".to_string(),
                };
                lines.push(format!("  - {} ({})", comparison.candidate.display(), detail));
            }
        }

        if !self.warnings.is_empty() {
            lines.push(format!("Warnings: {}", self.warnings.len()));
            for warning in &self.warnings {
                lines.push(format!("  - {}", warning));
            }
        }

        lines.join("\n")
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Error serializing diff report")
    }
}
