use std::io::Write;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::{MatrixType, OutputFormat, Precision};
use crate::error::MatrixError;
use crate::labels::LabelSet;
use crate::normalize::NormalizedGrid;

/// Axis decoration applied when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub precision: Precision,
    pub row_prefix: String,
    pub column_prefix: String,
    pub corner: String,
}

/// Display-ready matrix: every cell is already a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMatrix {
    pub matrix_type: MatrixType,
    pub corner: String,
    pub column_headers: Vec<String>,
    pub row_headers: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

pub fn render(grid: &NormalizedGrid, labels: &LabelSet, options: &RenderOptions) -> RenderedMatrix {
    let column_headers = labels
        .iter()
        .map(|l| format!("{}{}", options.column_prefix, l))
        .collect();
    let row_headers = labels
        .iter()
        .map(|l| format!("{}{}", options.row_prefix, l))
        .collect();
    let cells = grid
        .rows
        .iter()
        .zip(&grid.integral)
        .map(|(row, integral)| {
            row.iter()
                .zip(integral)
                .map(|(&v, &exact)| format_cell(v, exact, options.precision))
                .collect()
        })
        .collect();

    RenderedMatrix {
        matrix_type: grid.matrix_type,
        corner: options.corner.clone(),
        column_headers,
        row_headers,
        cells,
    }
}

/// Format one cell value.
///
/// Plain tallies (`integral`) print without a decimal point. Everything else
/// is rounded half away from zero at `10^-d` and printed with exactly `d` digits.
pub fn format_cell(value: f64, integral: bool, precision: Precision) -> String {
    if integral {
        return format!("{value:.0}");
    }
    match precision {
        Precision::Fixed(d) => format!("{:.*}", d as usize, round_half_away(value, d)),
        Precision::Unrestricted => format!("{value}"),
    }
}

fn round_half_away(value: f64, decimals: u32) -> f64 {
    // beyond f64's ~15 significant digits scaling only adds error
    if decimals > 15 {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = (value * factor).round() / factor;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}

impl RenderedMatrix {
    /// Header row followed by one row per label, as plain string rows.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.row_headers.len() + 1);

        let mut header = Vec::with_capacity(self.column_headers.len() + 1);
        header.push(self.corner.clone());
        header.extend(self.column_headers.iter().cloned());
        rows.push(header);

        for (label, cells) in self.row_headers.iter().zip(&self.cells) {
            let mut row = Vec::with_capacity(cells.len() + 1);
            row.push(label.clone());
            row.extend(cells.iter().cloned());
            rows.push(row);
        }

        rows
    }

    /// Column-aligned text. Row labels are left-aligned, values right-aligned,
    /// one space between columns.
    pub fn to_text(&self) -> String {
        let rows = self.to_rows();
        let ncols = rows.iter().map(|r| r.len()).max().unwrap_or(0);

        let mut widths = vec![0usize; ncols];
        for row in &rows {
            for (i, field) in row.iter().enumerate() {
                widths[i] = widths[i].max(field.width());
            }
        }

        // no trailing padding; spaces inside labels are kept
        let mut out = String::new();
        for row in &rows {
            for (i, field) in row.iter().enumerate() {
                let pad = widths[i] - field.width();
                if i == 0 {
                    out.push_str(field);
                    if row.len() > 1 {
                        out.extend(std::iter::repeat(' ').take(pad));
                    }
                } else {
                    out.push(' ');
                    out.extend(std::iter::repeat(' ').take(pad));
                    out.push_str(field);
                }
            }
            out.push('\n');
        }
        out
    }

    /// Delimited table with minimal quoting (embedded quotes are doubled).
    pub fn to_delimited(&self, delimiter: u8, quote: u8) -> Result<String, MatrixError> {
        if delimiter == quote {
            return Err(MatrixError::Config(
                "delimiter and quote character must differ".into(),
            ));
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .quote(quote)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .flexible(false)
            .from_writer(Vec::new());

        for row in self.to_rows() {
            writer
                .write_record(&row)
                .map_err(|e| MatrixError::Io(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| MatrixError::Io(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| MatrixError::Io(e.to_string()))
    }

    /// Render fully, then write to `sink`. Nothing is written if rendering fails.
    pub fn write<W: Write>(
        &self,
        sink: &mut W,
        format: OutputFormat,
        delimiter: u8,
        quote: u8,
    ) -> Result<(), MatrixError> {
        let content = match format {
            OutputFormat::Csv => self.to_delimited(delimiter, quote)?,
            OutputFormat::Text => self.to_text(),
        };
        sink.write_all(content.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}
