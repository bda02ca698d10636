//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `tally` exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args)                           |
//! | 3    | A dataset file could not be loaded                   |
//! | 4    | Config file unreadable or invalid                    |
//! | 5    | Precondition check failed (`--strict`, `validate`)   |
//! | 6    | Datasets differ (only with `--fail-on-diff`)         |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. cannot write output).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with the same code on its own.
pub const EXIT_USAGE: u8 = 2;

/// A dataset file is missing, unreadable, malformed, or has no rows.
pub const EXIT_LOAD: u8 = 3;

/// Config file cannot be read, parsed, or fails validation.
pub const EXIT_CONFIG: u8 = 4;

/// A dataset failed an error-severity precondition check.
pub const EXIT_PRECONDITION: u8 = 5;

/// Reconciliation ran but found mismatches or one-sided records.
pub const EXIT_DIFFERENCES: u8 = 6;
