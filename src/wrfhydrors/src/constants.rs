// wrfhydrors/src/constants.rs

/// Executable used when no comparator path is configured.
pub const DEFAULT_NCCMP: &str = "nccmp";

/// Long-form nccmp options placed ahead of the statistics flag.
pub const DEFAULT_NCCMP_OPTIONS: [&str; 4] = ["--data", "--metadata", "--force", "--quiet"];

/// Accumulated fields that legitimately drift between otherwise identical runs.
pub const DEFAULT_EXCLUDE_VARS: [&str; 9] = [
    "ACMELT",
    "ACSNOW",
    "SFCRUNOFF",
    "UDRUNOFF",
    "ACCPRCP",
    "ACCECAN",
    "ACCEDIR",
    "ACCETRAN",
    "qstrmvolrt",
];

/// Statistics report, one row per differing variable.
pub const NCCMP_STATISTICS_FLAG: &str = "-S";
pub const NCCMP_EXCLUDE_FLAG: &str = "-x";

pub const HYDRO_RESTART_PREFIX: &str = "HYDRO_RST.";
pub const LSM_RESTART_PREFIX: &str = "RESTART.";
pub const NUDGING_RESTART_PREFIX: &str = "nudgingLastObs.";
