// Delimited-text input/output for confusion matrices

use std::io::Read;
use std::path::Path;

use scm_engine::{GenerateConfig, MatrixError, Observations, OutputFormat, RenderedMatrix};
use tracing::debug;

use crate::error::IoError;

/// Where to find labels and weights in the input table. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub actual_column: usize,
    pub predicted_column: usize,
    pub weight_column: Option<usize>,
    pub delimiter: u8,
    pub quote: u8,
    pub has_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            actual_column: 0,
            predicted_column: 1,
            weight_column: None,
            delimiter: b',',
            quote: b'"',
            has_header: true,
        }
    }
}

impl LoadOptions {
    /// Convert the 1-based column indices of a validated config.
    pub fn from_config(config: &GenerateConfig) -> Result<Self, MatrixError> {
        config.validate()?;
        Ok(Self {
            actual_column: config.actual_column - 1,
            predicted_column: config.predicted_column - 1,
            weight_column: config.weight_column.map(|c| c - 1),
            delimiter: config.delimiter_byte()?,
            quote: config.quote_byte()?,
            has_header: config.header,
        })
    }

    fn required_columns(&self) -> usize {
        let widest = self
            .actual_column
            .max(self.predicted_column)
            .max(self.weight_column.unwrap_or(0));
        widest + 1
    }
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            debug!(path = %path.display(), "input is not UTF-8, decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Load actual/predicted (and optional weight) columns from a delimited file.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Observations, IoError> {
    let content = read_file_as_utf8(path)?;
    let observations = load_from_str(&content, options)?;
    debug!(
        path = %path.display(),
        rows = observations.len(),
        weighted = observations.weights.is_some(),
        "loaded observations"
    );
    Ok(observations)
}

pub fn load_from_str(content: &str, options: &LoadOptions) -> Result<Observations, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(content.as_bytes());

    let required = options.required_columns();
    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    let mut weights = options.weight_column.map(|_| Vec::new());
    let mut lines = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| IoError::Csv(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() < required {
            return Err(IoError::MissingColumn {
                line,
                required,
                found: record.len(),
            });
        }

        lines.push(line);
        actual.push(record[options.actual_column].to_string());
        predicted.push(record[options.predicted_column].to_string());

        if let (Some(col), Some(w)) = (options.weight_column, weights.as_mut()) {
            let raw = &record[col];
            let value: f64 = raw.trim().parse().map_err(|_| IoError::WeightParse {
                line,
                value: raw.to_string(),
            })?;
            w.push(value);
        }
    }

    Ok(Observations {
        actual,
        predicted,
        weights,
        lines,
    })
}

/// Generic row reader: every record as a vector of strings, no header handling.
pub fn read_rows(content: &str, delimiter: u8, quote: u8) -> Result<Vec<Vec<String>>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    reader
        .records()
        .map(|r| {
            r.map(|record| record.iter().map(|f| f.to_string()).collect::<Vec<_>>())
                .map_err(|e| IoError::Csv(e.to_string()))
        })
        .collect()
}

/// Write a rendered matrix to `path`. The content is rendered in memory
/// first, so a rendering error leaves no file behind.
pub fn persist(
    rendered: &RenderedMatrix,
    path: &Path,
    format: OutputFormat,
    delimiter: u8,
    quote: u8,
) -> Result<(), IoError> {
    let content = match format {
        OutputFormat::Csv => rendered.to_delimited(delimiter, quote)?,
        OutputFormat::Text => rendered.to_text(),
    };

    std::fs::write(path, content.as_bytes()).map_err(|e| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), %format, bytes = content.len(), "wrote matrix");
    Ok(())
}
