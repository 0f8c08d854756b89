// wrfhydrors/src/compare/nccmp.rs

use crate::compare::outcome::{ComparisonOutcome, DiffTable, RawOutput};
use crate::config::CompareOptions;
use crate::constants::{NCCMP_EXCLUDE_FLAG, NCCMP_STATISTICS_FLAG};
use crate::warnings::DiffWarning;
use anyhow::Context;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Compares one candidate file against one reference file
pub trait FileComparator {
    fn compare(&self, candidate: &Path, reference: &Path) -> anyhow::Result<ComparisonOutcome>;
}

/// Runs the external nccmp tool on each pair
#[derive(Debug, Clone, Default)]
pub struct NccmpComparator {
    options: CompareOptions,
}

impl NccmpComparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }
}

impl FileComparator for NccmpComparator {
    fn compare(&self, candidate: &Path, reference: &Path) -> anyhow::Result<ComparisonOutcome> {
        compare_nc_nccmp(candidate, reference, &self.options)
    }
}

/// Build `<tool> <options...> -S [-x A,B,C] <candidate> <reference>`
pub fn nccmp_command(candidate: &Path, reference: &Path, options: &CompareOptions) -> Command {
    let mut command = Command::new(&options.nccmp);
    command.args(&options.nccmp_options);
    command.arg(NCCMP_STATISTICS_FLAG);

    if let Some(exclude) = options.exclude_list() {
        command.arg(NCCMP_EXCLUDE_FLAG);
        command.arg(exclude);
    }

    command.arg(candidate);
    command.arg(reference);
    command
}

/// Compare two NetCDF files with nccmp.
///
/// Exit status 0 means the files are equal. Any other status is read as a
/// statistics table; output that is not a table is kept verbatim in
/// [`ComparisonOutcome::Failed`]. Only a failure to run the tool is an error.
pub fn compare_nc_nccmp(
    candidate: &Path,
    reference: &Path,
    options: &CompareOptions,
) -> anyhow::Result<ComparisonOutcome> {
    let mut command = nccmp_command(candidate, reference, options);
    log::debug!("Running {:?}", command);

    let output = command.output().with_context(|| {
        format!(
            "Failed to execute {} on {}",
            options.nccmp.display(),
            candidate.display()
        )
    })?;

    let outcome = outcome_from_output(
        output.status,
        &String::from_utf8_lossy(&output.stdout),
        &String::from_utf8_lossy(&output.stderr),
    );

    if let ComparisonOutcome::Failed(raw) = &outcome {
        DiffWarning::OutputParseFailure {
            candidate: candidate.to_path_buf(),
            reference: reference.to_path_buf(),
            reason: raw.parse_error.clone(),
        }
        .emit();
    }

    Ok(outcome)
}

pub(crate) fn outcome_from_output(status: ExitStatus, stdout: &str, stderr: &str) -> ComparisonOutcome {
    if status.success() {
        return ComparisonOutcome::Equal;
    }

    match DiffTable::parse(stdout) {
        Ok(table) => ComparisonOutcome::Different(table),
        Err(err) => ComparisonOutcome::Failed(RawOutput {
            exit_code: status.code(),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            parse_error: err.to_string(),
        }),
    }
}
