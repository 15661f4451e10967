//! `scm-engine`: confusion matrix accumulation and rendering.
//!
//! Pure engine crate: receives pre-loaded label sequences, returns rendered
//! matrices. No CLI or filesystem dependencies.

pub mod config;
pub mod error;
pub mod labels;
pub mod matrix;
pub mod normalize;
pub mod render;

pub use config::{GenerateConfig, LabelOrder, MatrixType, OutputFormat, Precision};
pub use error::{Axis, MatrixError};
pub use labels::LabelSet;
pub use matrix::Matrix;
pub use normalize::{normalize, NormalizedGrid};
pub use render::{RenderOptions, RenderedMatrix};

/// Index-aligned actual/predicted/weight sequences from one input table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations {
    pub actual: Vec<String>,
    pub predicted: Vec<String>,
    /// `None` when no weight column is configured; every weight is then 1.
    pub weights: Option<Vec<f64>>,
    /// Input line of each observation. Empty when not read from a file.
    pub lines: Vec<u64>,
}

impl Observations {
    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}

/// Resolve labels (first-seen order unless given) and accumulate the matrix.
pub fn build_matrix<S: AsRef<str>>(
    actual: &[S],
    predicted: &[S],
    weights: Option<&[f64]>,
    labels: Option<&[String]>,
) -> Result<Matrix, MatrixError> {
    build_matrix_with_order(actual, predicted, weights, labels, LabelOrder::FirstSeen)
}

pub fn build_matrix_with_order<S: AsRef<str>>(
    actual: &[S],
    predicted: &[S],
    weights: Option<&[f64]>,
    labels: Option<&[String]>,
    order: LabelOrder,
) -> Result<Matrix, MatrixError> {
    let label_set = LabelSet::resolve(actual, predicted, labels, order)?;
    Matrix::accumulate(actual, predicted, weights, label_set)
}

/// Normalize and render one view of `matrix`.
pub fn generate(
    matrix: &Matrix,
    matrix_type: MatrixType,
    max_decimals: i32,
    row_prefix: &str,
    column_prefix: &str,
    corner: &str,
) -> Result<RenderedMatrix, MatrixError> {
    let options = RenderOptions {
        precision: Precision::from_max_decimals(max_decimals)?,
        row_prefix: row_prefix.to_string(),
        column_prefix: column_prefix.to_string(),
        corner: corner.to_string(),
    };
    let grid = normalize(matrix, matrix_type);
    Ok(render::render(&grid, matrix.labels(), &options))
}

/// Build and render per config.
pub fn run(config: &GenerateConfig, input: &Observations) -> Result<RenderedMatrix, MatrixError> {
    config.validate()?;
    let matrix = build_matrix_with_order(
        &input.actual,
        &input.predicted,
        input.weights.as_deref(),
        config.labels.as_deref(),
        config.label_order,
    )
    .map_err(|e| e.at_lines(&input.lines))?;
    generate(
        &matrix,
        config.matrix_type,
        config.max_decimals,
        &config.actual_prefix,
        &config.predicted_prefix,
        &config.corner,
    )
}
