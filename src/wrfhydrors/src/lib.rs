// wrfhydrors/src/lib.rs

//! Compare the restart files and namelists of two WRF-Hydro runs.
//!
//! Restart files are compared pairwise by the external `nccmp` tool and the
//! results gathered per category (hydro, lsm, nudging) in a [`DiffReport`].
//! Namelists are parsed with `f90nmlrs` and diffed structurally.

pub mod compare;
pub mod config;
pub mod constants;
pub mod namelist_diff;
pub mod report;
pub mod run;
pub mod warnings;

// Re-export commonly used types
pub use compare::{
    compare_nc_nccmp, match_and_compare, ComparisonOutcome, DiffTable, FileComparator,
    FileComparison, MatchResult, NccmpComparator, RawOutput,
};
pub use config::CompareOptions;
pub use namelist_diff::{diff_namelist, diff_namelist_str, DiffOptions, NamelistDiff};
pub use report::DiffReport;
pub use run::{RestartCategory, RestartFiles, RunDirectory};
pub use warnings::DiffWarning;
