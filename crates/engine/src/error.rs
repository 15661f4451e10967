use std::fmt;

/// Which side of an observation a label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Actual,
    Predicted,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actual => write!(f, "actual"),
            Self::Predicted => write!(f, "predicted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Invalid or contradictory configuration value.
    Config(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// An explicit label list names the same label twice.
    DuplicateLabel(String),
    /// Unrecognized matrix type / output format / label order name.
    UnknownSelector { kind: &'static str, value: String },
    /// Input sequences differ in length.
    ShapeMismatch { what: &'static str, expected: usize, found: usize },
    /// No labels could be resolved (empty input, empty explicit list).
    EmptyLabels,
    /// Observation references a label outside the label set. `index` is the
    /// 0-based observation; `line` is its input line when read from a file.
    UnknownLabel { label: String, axis: Axis, index: usize, line: Option<u64> },
    /// Weight is negative, NaN or infinite.
    InvalidWeight { index: usize, value: f64, line: Option<u64> },
    /// Sink write failure.
    Io(String),
}

impl MatrixError {
    /// Attach the input line of the offending observation, if `lines` maps it.
    pub fn at_lines(self, lines: &[u64]) -> Self {
        match self {
            Self::UnknownLabel { label, axis, index, .. } => Self::UnknownLabel {
                line: lines.get(index).copied(),
                label,
                axis,
                index,
            },
            Self::InvalidWeight { index, value, .. } => Self::InvalidWeight {
                line: lines.get(index).copied(),
                index,
                value,
            },
            other => other,
        }
    }

    /// True for errors caused by the configuration rather than the data.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::ConfigParse(_) | Self::DuplicateLabel(_) | Self::UnknownSelector { .. }
        )
    }
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::DuplicateLabel(label) => {
                write!(f, "config error: label '{label}' listed more than once")
            }
            Self::UnknownSelector { kind, value } => write!(f, "unknown {kind}: '{value}'"),
            Self::ShapeMismatch { what, expected, found } => {
                write!(f, "{what} differ in length: expected {expected}, found {found}")
            }
            Self::EmptyLabels => write!(f, "no labels: input is empty"),
            Self::UnknownLabel { label, axis, index, line } => {
                write!(f, "{axis} label '{label}' at {} is not in the label set", Location(*index, *line))
            }
            Self::InvalidWeight { index, value, line } => write!(
                f,
                "weight at {} must be a finite non-negative number, got {value}",
                Location(*index, *line)
            ),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for MatrixError {}

struct Location(usize, Option<u64>);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.1 {
            Some(line) => write!(f, "line {line}"),
            None => write!(f, "index {}", self.0),
        }
    }
}

impl From<std::io::Error> for MatrixError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatrixError>;
