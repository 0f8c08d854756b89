// wrfhydrors/src/compare/matcher.rs

use crate::compare::nccmp::FileComparator;
use crate::compare::outcome::{ComparisonOutcome, FileComparison};
use crate::warnings::DiffWarning;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Comparisons for one candidate/reference file set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    pub comparisons: Vec<FileComparison>,
    pub warnings: Vec<DiffWarning>,
}

impl MatchResult {
    /// Number of compared pairs that were not equal
    pub fn diff_count(&self) -> usize {
        self.comparisons
            .iter()
            .filter(|comparison| comparison.has_difference())
            .count()
    }
}

/// Compare every candidate file against the same-named file in the reference directory.
///
/// The reference directory is the parent of the first reference file. Candidates
/// without a counterpart there are skipped with a warning; reference files that
/// no candidate names are never visited.
pub fn match_and_compare<C>(
    candidate_files: &[PathBuf],
    reference_files: &[PathBuf],
    comparator: &C,
) -> anyhow::Result<MatchResult>
where
    C: FileComparator + ?Sized,
{
    let mut result = MatchResult::default();

    let Some(first_reference) = reference_files.first() else {
        return Ok(result);
    };
    if candidate_files.is_empty() {
        return Ok(result);
    }

    let reference_dir = first_reference.parent().unwrap_or(Path::new(""));

    for candidate in candidate_files {
        let reference = candidate
            .file_name()
            .map(|name| reference_dir.join(name))
            .filter(|path| path.is_file());

        let Some(reference) = reference else {
            result.warnings.push(
                DiffWarning::MissingCounterpart {
                    candidate: candidate.clone(),
                    reference_dir: reference_dir.to_path_buf(),
                }
                .emit(),
            );
            continue;
        };

        log::debug!("Comparing {} to {}", candidate.display(), reference.display());
        let outcome = comparator.compare(candidate, &reference)?;

        if let ComparisonOutcome::Failed(raw) = &outcome {
            result.warnings.push(DiffWarning::OutputParseFailure {
                candidate: candidate.clone(),
                reference: reference.clone(),
                reason: raw.parse_error.clone(),
            });
        }

        result.comparisons.push(FileComparison {
            candidate: candidate.clone(),
            reference,
            outcome,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::outcome::{DiffTable, RawOutput};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Reports a difference for file names starting with "diff", a parse failure
    /// for names starting with "bad", and equality otherwise.
    #[derive(Default)]
    struct MockComparator {
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl FileComparator for MockComparator {
        fn compare(&self, candidate: &Path, reference: &Path) -> anyhow::Result<ComparisonOutcome> {
            self.calls
                .borrow_mut()
                .push((candidate.to_path_buf(), reference.to_path_buf()));

            let name = candidate.file_name().unwrap().to_string_lossy();
            Ok(if name.starts_with("diff") {
                ComparisonOutcome::Different(DiffTable::parse("Variable\nSMC\n").unwrap())
            } else if name.starts_with("bad") {
                ComparisonOutcome::Failed(RawOutput {
                    exit_code: Some(1),
                    stdout: String::new(),
                    stderr: String::new(),
                    parse_error: "output has no header line".to_string(),
                })
            } else {
                ComparisonOutcome::Equal
            })
        }
    }

    struct FailingComparator;

    impl FileComparator for FailingComparator {
        fn compare(&self, _: &Path, _: &Path) -> anyhow::Result<ComparisonOutcome> {
            anyhow::bail!("nccmp not found")
        }
    }

    fn touch(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs_err::write(&path, b"").unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_missing_counterpart_is_warned_and_skipped() {
        let _ = pretty_env_logger::try_init();
        let cand_dir = TempDir::new().unwrap();
        let ref_dir = TempDir::new().unwrap();
        let candidates = touch(cand_dir.path(), &["a.nc", "b.nc"]);
        let references = touch(ref_dir.path(), &["a.nc"]);

        let comparator = MockComparator::default();
        let result = match_and_compare(&candidates, &references, &comparator).unwrap();

        assert_eq!(result.comparisons.len(), 1);
        assert_eq!(result.comparisons[0].reference, ref_dir.path().join("a.nc"));
        assert_eq!(
            result.warnings,
            vec![DiffWarning::MissingCounterpart {
                candidate: cand_dir.path().join("b.nc"),
                reference_dir: ref_dir.path().to_path_buf(),
            }]
        );
        assert_eq!(comparator.calls.borrow().len(), 1);
    }

    #[test]
    fn test_lookup_uses_directory_of_first_reference() {
        let cand_dir = TempDir::new().unwrap();
        let ref_dir = TempDir::new().unwrap();
        let candidates = touch(cand_dir.path(), &["a.nc"]);
        touch(ref_dir.path(), &["a.nc"]);
        // the listed reference file itself need not match any candidate
        let references = vec![ref_dir.path().join("z.nc")];

        let result = match_and_compare(&candidates, &references, &MockComparator::default()).unwrap();

        assert_eq!(result.comparisons.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_inputs_do_nothing() {
        let dir = TempDir::new().unwrap();
        let files = touch(dir.path(), &["a.nc"]);
        let comparator = MockComparator::default();

        let result = match_and_compare(&[], &files, &comparator).unwrap();
        assert_eq!(result, MatchResult::default());

        let result = match_and_compare(&files, &[], &comparator).unwrap();
        assert_eq!(result, MatchResult::default());
        assert!(comparator.calls.borrow().is_empty());
    }

    #[test]
    fn test_diff_count_includes_failures() {
        let cand_dir = TempDir::new().unwrap();
        let ref_dir = TempDir::new().unwrap();
        let names = ["same.nc", "diff.nc", "bad.nc"];
        let candidates = touch(cand_dir.path(), &names);
        let references = touch(ref_dir.path(), &names);

        let result = match_and_compare(&candidates, &references, &MockComparator::default()).unwrap();

        assert_eq!(result.comparisons.len(), 3);
        assert_eq!(result.diff_count(), 2);
        assert!(matches!(
            result.warnings.as_slice(),
            [DiffWarning::OutputParseFailure { .. }]
        ));
    }

    #[test]
    fn test_comparisons_follow_candidate_order() {
        let cand_dir = TempDir::new().unwrap();
        let ref_dir = TempDir::new().unwrap();
        let candidates = touch(cand_dir.path(), &["c.nc", "a.nc", "b.nc"]);
        let references = touch(ref_dir.path(), &["a.nc", "b.nc", "c.nc"]);

        let result = match_and_compare(&candidates, &references, &MockComparator::default()).unwrap();
        let order: Vec<_> = result
            .comparisons
            .iter()
            .map(|c| c.candidate.file_name().unwrap().to_owned())
            .collect();

        assert_eq!(order, ["c.nc", "a.nc", "b.nc"]);
    }

    #[test]
    fn test_comparator_error_propagates() {
        let cand_dir = TempDir::new().unwrap();
        let ref_dir = TempDir::new().unwrap();
        let candidates = touch(cand_dir.path(), &["a.nc"]);
        let references = touch(ref_dir.path(), &["a.nc"]);

        let err = match_and_compare(&candidates, &references, &FailingComparator).unwrap_err();
        assert_eq!(err.to_string(), "nccmp not found");
    }

    #[test]
    fn test_directory_with_candidate_name_is_not_a_counterpart() {
        let cand_dir = TempDir::new().unwrap();
        let ref_dir = TempDir::new().unwrap();
        let candidates = touch(cand_dir.path(), &["a.nc"]);
        fs_err::create_dir(ref_dir.path().join("a.nc")).unwrap();
        let references = touch(ref_dir.path(), &["other.nc"]);

        let result = match_and_compare(&candidates, &references, &MockComparator::default()).unwrap();

        assert!(result.comparisons.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }
}
