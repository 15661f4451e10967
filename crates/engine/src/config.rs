use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Which view of the accumulated matrix to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixType {
    /// Weighted counts, unchanged.
    #[default]
    Counts,
    /// Every cell divided by the grand total.
    Percentages,
    /// Every cell divided by its row total.
    PercentagesPerRow,
}

impl MatrixType {
    pub const ALL: [MatrixType; 3] = [Self::Counts, Self::Percentages, Self::PercentagesPerRow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counts => "counts",
            Self::Percentages => "percentages",
            Self::PercentagesPerRow => "percentages_per_row",
        }
    }
}

impl std::fmt::Display for MatrixType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatrixType {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "counts" => Ok(Self::Counts),
            "percentages" => Ok(Self::Percentages),
            "percentages_per_row" => Ok(Self::PercentagesPerRow),
            _ => Err(MatrixError::UnknownSelector {
                kind: "matrix type",
                value: s.to_string(),
            }),
        }
    }
}

/// Encoding used when persisting a rendered matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Delimited table using the configured delimiter and quote character.
    #[default]
    Csv,
    /// Column-aligned plain text.
    #[serde(alias = "plaintext")]
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "text" | "plaintext" => Ok(Self::Text),
            _ => Err(MatrixError::UnknownSelector {
                kind: "output format",
                value: s.to_string(),
            }),
        }
    }
}

/// Ordering of labels when they are inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    /// First appearance, scanning all actual labels and then all predicted labels.
    #[default]
    FirstSeen,
    /// Lexicographic (byte-wise) order.
    Sorted,
}

impl std::fmt::Display for LabelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstSeen => write!(f, "first_seen"),
            Self::Sorted => write!(f, "sorted"),
        }
    }
}

impl FromStr for LabelOrder {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first_seen" => Ok(Self::FirstSeen),
            "sorted" => Ok(Self::Sorted),
            _ => Err(MatrixError::UnknownSelector {
                kind: "label order",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Precision
// ---------------------------------------------------------------------------

/// Decimal precision for non-integral cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Exactly this many digits after the decimal point.
    Fixed(u32),
    /// Shortest representation that round-trips the value.
    Unrestricted,
}

/// Largest fixed precision accepted. An f64 carries at most 17 significant
/// decimal digits, so further digits are noise.
pub const MAX_DECIMALS: i32 = 17;

impl Precision {
    /// `-1` means unrestricted; other values must lie in `0..=MAX_DECIMALS`.
    pub fn from_max_decimals(max_decimals: i32) -> Result<Self, MatrixError> {
        match max_decimals {
            -1 => Ok(Self::Unrestricted),
            d if (0..=MAX_DECIMALS).contains(&d) => Ok(Self::Fixed(d as u32)),
            d => Err(MatrixError::Config(format!(
                "max_decimals must be between 0 and {MAX_DECIMALS} (or -1 for no limit), got {d}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

pub const DEFAULT_ACTUAL_PREFIX: &str = "a: ";
pub const DEFAULT_PREDICTED_PREFIX: &str = "p: ";
pub const DEFAULT_CORNER: &str = "x";
pub const DEFAULT_MAX_DECIMALS: i32 = 3;

/// Everything one `scm-gen` run needs. Column indices are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub input: Option<String>,
    pub output: Option<String>,
    pub output_format: OutputFormat,
    pub delimiter: char,
    pub quotechar: char,
    pub header: bool,
    pub actual_column: usize,
    pub predicted_column: usize,
    pub weight_column: Option<usize>,
    pub actual_prefix: String,
    pub predicted_prefix: String,
    pub labels: Option<Vec<String>>,
    pub label_order: LabelOrder,
    pub corner: String,
    pub max_decimals: i32,
    pub matrix_type: MatrixType,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            output_format: OutputFormat::Csv,
            delimiter: ',',
            quotechar: '"',
            header: true,
            actual_column: 1,
            predicted_column: 2,
            weight_column: None,
            actual_prefix: DEFAULT_ACTUAL_PREFIX.to_string(),
            predicted_prefix: DEFAULT_PREDICTED_PREFIX.to_string(),
            labels: None,
            label_order: LabelOrder::FirstSeen,
            corner: DEFAULT_CORNER.to_string(),
            max_decimals: DEFAULT_MAX_DECIMALS,
            matrix_type: MatrixType::Counts,
        }
    }
}

impl GenerateConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatrixError> {
        let config: GenerateConfig =
            toml::from_str(input).map_err(|e| MatrixError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatrixError> {
        let columns = [
            ("actual", Some(self.actual_column)),
            ("predicted", Some(self.predicted_column)),
            ("weight", self.weight_column),
        ];
        for (name, col) in columns {
            if col == Some(0) {
                return Err(MatrixError::Config(format!(
                    "{name} column index is 1-based, got 0"
                )));
            }
        }

        delimiter_byte("delimiter", self.delimiter)?;
        delimiter_byte("quotechar", self.quotechar)?;
        if self.delimiter == self.quotechar {
            return Err(MatrixError::Config(format!(
                "delimiter and quotechar must differ, both are '{}'",
                self.delimiter
            )));
        }

        Precision::from_max_decimals(self.max_decimals)?;

        if let Some(ref labels) = self.labels {
            crate::labels::check_unique(labels)?;
        }

        Ok(())
    }

    pub fn precision(&self) -> Result<Precision, MatrixError> {
        Precision::from_max_decimals(self.max_decimals)
    }

    pub fn delimiter_byte(&self) -> Result<u8, MatrixError> {
        delimiter_byte("delimiter", self.delimiter)
    }

    pub fn quote_byte(&self) -> Result<u8, MatrixError> {
        delimiter_byte("quotechar", self.quotechar)
    }
}

/// Delimiters and quote characters are single ASCII bytes.
fn delimiter_byte(name: &str, c: char) -> Result<u8, MatrixError> {
    if c.is_ascii() && c != '\n' && c != '\r' {
        Ok(c as u8)
    } else {
        Err(MatrixError::Config(format!(
            "{name} must be a single ASCII character other than a line break, got {c:?}"
        )))
    }
}

/// Split a comma-separated label list as given on the command line.
pub fn parse_label_list(s: &str) -> Vec<String> {
    s.split(',').map(|l| l.to_string()).collect()
}
