//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, used by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (note id).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable holding the passphrase for non-interactive use.
pub const PASSPHRASE_ENV: &str = "POCKET_PASSPHRASE";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "POCKET_LOG";

/// Log filter used when `POCKET_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Log filter used with `--debug`.
pub const DEBUG_LOG_FILTER: &str = "pocket=debug,pocket_core=debug";

/// File written in the working directory with `--debug`.
pub const DEBUG_LOG_FILE: &str = "debug.log";

/// Notes per page when neither flag nor config sets one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Passphrase attempts allowed at an interactive prompt.
pub const MAX_PASSPHRASE_ATTEMPTS: u32 = 3;

/// Shown instead of note content unless `--reveal` is given.
pub const CONTENT_MASK: &str = "********";
