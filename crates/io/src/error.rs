use std::fmt;

use scm_engine::MatrixError;

#[derive(Debug)]
pub enum IoError {
    /// Input file missing or unreadable.
    Read { path: String, message: String },
    /// Output file could not be created or written.
    Write { path: String, message: String },
    /// A row has fewer columns than the configured column indices need.
    MissingColumn { line: u64, required: usize, found: usize },
    /// Weight cell is not a number.
    WeightParse { line: u64, value: String },
    /// Malformed delimited text (unbalanced quotes, invalid UTF-8, ...).
    Csv(String),
    /// Rendering failed before anything was written.
    Render(MatrixError),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read '{path}': {message}"),
            Self::Write { path, message } => write!(f, "cannot write '{path}': {message}"),
            Self::MissingColumn { line, required, found } => write!(
                f,
                "line {line}: expected at least {required} column(s), found {found}"
            ),
            Self::WeightParse { line, value } => {
                write!(f, "line {line}: cannot parse weight '{value}'")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<MatrixError> for IoError {
    fn from(e: MatrixError) -> Self {
        Self::Render(e)
    }
}
