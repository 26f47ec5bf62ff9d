//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Range | Domain    | Description                                 |
//! |-------|-----------|---------------------------------------------|
//! | 0     | Universal | Success                                     |
//! | 1     | Universal | General error (unspecified)                 |
//! | 2     | Universal | CLI usage error (bad args)                  |
//! | 3-5   | Local     | File IO / input data / configuration        |
//! | 6     | Report    | Report written but contains zero data rows  |
//! | 50-59 | Fetch     | Fleet API connector                         |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// File IO error (local CSV unreadable, report not writable).
pub const EXIT_IO: u8 = 3;

/// Input data error: a configured column is absent from the datasets, or a
/// recency value is not a date.
pub const EXIT_PARSE: u8 = 4;

/// Job configuration error (bad TOML, invalid column layout).
pub const EXIT_CONFIG: u8 = 5;

/// The reconciled report has zero data rows. The report file is still
/// written; this code lets scripts detect emptiness.
pub const EXIT_EMPTY_REPORT: u8 = 6;

/// Fleet API rejected the credentials (401/403), or none were provided.
pub const EXIT_FETCH_AUTH: u8 = 51;

/// Network failure talking to the fleet API (after retries).
pub const EXIT_FETCH_NETWORK: u8 = 52;

/// Fleet API answered with an unexpected status or malformed body.
pub const EXIT_FETCH_UPSTREAM: u8 = 53;
