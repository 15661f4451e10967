//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `scm-gen` exit codes.
//! Scripts rely on these values; do not renumber them.
//!
//! | Code | Description                                               |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 2    | Usage / configuration error (bad flags, bad config file)  |
//! | 3    | I/O error (input missing, output unwritable)              |
//! | 4    | Input parse error (short rows, unparsable weights)        |
//! | 5    | Data error (length mismatch, unknown or missing labels)   |

use scm_engine::MatrixError;
use scm_io::IoError;

/// Success - matrix generated and written.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, contradictory or unparsable configuration.
pub const EXIT_USAGE: u8 = 2;

/// Input file missing/unreadable or output file unwritable.
pub const EXIT_IO: u8 = 3;

/// Input table malformed (too few columns, weight not a number, bad quoting).
pub const EXIT_PARSE: u8 = 4;

/// Input data inconsistent with the configuration (unknown label, empty input,
/// negative weight, mismatched lengths).
pub const EXIT_DATA: u8 = 5;

/// Map an engine error to its exit code.
pub fn matrix_exit_code(err: &MatrixError) -> u8 {
    if err.is_config() {
        return EXIT_USAGE;
    }
    match err {
        MatrixError::Io(_) => EXIT_IO,
        _ => EXIT_DATA,
    }
}

/// Map an I/O adapter error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } | IoError::Write { .. } => EXIT_IO,
        IoError::MissingColumn { .. } | IoError::WeightParse { .. } | IoError::Csv(_) => EXIT_PARSE,
        IoError::Render(e) => matrix_exit_code(e),
    }
}
