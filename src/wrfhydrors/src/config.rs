// wrfhydrors/src/config.rs

use crate::constants::{DEFAULT_EXCLUDE_VARS, DEFAULT_NCCMP, DEFAULT_NCCMP_OPTIONS};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How restart files are handed to nccmp.
///
/// Every field is optional in YAML; missing fields fall back to the defaults:
///
/// ```yaml
/// nccmp: /usr/local/bin/nccmp
/// nccmp_options: [--data, --metadata, --force, --quiet]
/// exclude_vars: [ACMELT, ACSNOW]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Name or path of the nccmp executable
    pub nccmp: PathBuf,
    /// Long-form options passed before the statistics flag
    pub nccmp_options: Vec<String>,
    /// Variables ignored in every comparison; `None` compares everything
    pub exclude_vars: Option<Vec<String>>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            nccmp: PathBuf::from(DEFAULT_NCCMP),
            nccmp_options: DEFAULT_NCCMP_OPTIONS.iter().map(|s| s.to_string()).collect(),
            exclude_vars: Some(DEFAULT_EXCLUDE_VARS.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl CompareOptions {
    pub fn with_nccmp<P: Into<PathBuf>>(mut self, nccmp: P) -> Self {
        self.nccmp = nccmp.into();
        self
    }

    pub fn with_nccmp_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nccmp_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_vars<I, S>(mut self, vars: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_vars = vars.map(|vars| vars.into_iter().map(Into::into).collect());
        self
    }

    /// Excluded variables as passed to nccmp, or `None` when nothing is excluded.
    pub fn exclude_list(&self) -> Option<String> {
        self.exclude_vars
            .as_ref()
            .filter(|vars| !vars.is_empty())
            .map(|vars| vars.join(","))
    }
}

impl TryFrom<&Path> for CompareOptions {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs_err::read_to_string(path)
            .context(format!("Error reading {} to string.", path.display()))?;

        serde_saphyr::from_str::<CompareOptions>(&content)
            .context(format!("Error parsing YAML file: {}", path.display()))
    }
}

impl TryFrom<&PathBuf> for CompareOptions {
    type Error = anyhow::Error;

    fn try_from(path: &PathBuf) -> anyhow::Result<Self> {
        Self::try_from(path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = CompareOptions::default();

        assert_eq!(options.nccmp, PathBuf::from("nccmp"));
        assert_eq!(
            options.nccmp_options,
            vec!["--data", "--metadata", "--force", "--quiet"]
        );
        assert_eq!(options.exclude_vars.as_ref().map(Vec::len), Some(9));
    }

    #[test]
    fn test_exclude_list_joins_with_commas() {
        let options = CompareOptions::default().with_exclude_vars(Some(["ACMELT", "ACSNOW"]));
        assert_eq!(options.exclude_list(), Some("ACMELT,ACSNOW".to_string()));
    }

    #[test]
    fn test_empty_exclude_list_is_none() {
        let none = CompareOptions::default().with_exclude_vars(None::<Vec<String>>);
        assert_eq!(none.exclude_list(), None);

        let empty = CompareOptions::default().with_exclude_vars(Some(Vec::<String>::new()));
        assert_eq!(empty.exclude_list(), None);
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("compare.yml");
        fs_err::write(&path, "nccmp: /opt/bin/nccmp\nexclude_vars:\n  - SNEQV\n").unwrap();

        let options = CompareOptions::try_from(&path).unwrap();

        assert_eq!(options.nccmp, PathBuf::from("/opt/bin/nccmp"));
        assert_eq!(options.exclude_vars, Some(vec!["SNEQV".to_string()]));
        assert_eq!(options.nccmp_options, CompareOptions::default().nccmp_options);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = CompareOptions::try_from(&temp_dir.path().join("absent.yml")).unwrap_err();
        assert!(err.to_string().contains("absent.yml"));
    }
}
