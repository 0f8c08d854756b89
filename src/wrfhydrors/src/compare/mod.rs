// wrfhydrors/src/compare/mod.rs

pub mod matcher;
pub mod nccmp;
pub mod outcome;

pub use matcher::{match_and_compare, MatchResult};
pub use nccmp::{compare_nc_nccmp, nccmp_command, FileComparator, NccmpComparator};
pub use outcome::{ComparisonOutcome, DiffTable, FileComparison, RawOutput, TableParseError};
