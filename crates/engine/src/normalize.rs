use crate::config::MatrixType;
use crate::matrix::Matrix;

/// A matrix view produced for one [`MatrixType`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGrid {
    pub matrix_type: MatrixType,
    pub rows: Vec<Vec<f64>>,
    /// Cells that are plain tallies and print as integers. Only ever set for
    /// [`MatrixType::Counts`].
    pub integral: Vec<Vec<bool>>,
}

impl NormalizedGrid {
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().flatten().sum()
    }
}

/// Derive the requested view. The source matrix is left untouched.
///
/// Zero totals yield zero cells rather than NaN.
pub fn normalize(matrix: &Matrix, matrix_type: MatrixType) -> NormalizedGrid {
    let dim = matrix.dim();
    let rows = match matrix_type {
        MatrixType::Counts => (0..dim).map(|r| matrix.row(r).to_vec()).collect(),
        MatrixType::Percentages => {
            let total = matrix.total();
            (0..dim).map(|r| divide(matrix.row(r), total)).collect()
        }
        MatrixType::PercentagesPerRow => (0..dim)
            .map(|r| divide(matrix.row(r), matrix.row_total(r)))
            .collect(),
    };

    let integral = (0..dim)
        .map(|r| {
            (0..dim)
                .map(|c| matrix_type == MatrixType::Counts && matrix.is_unit(r, c))
                .collect()
        })
        .collect();

    NormalizedGrid {
        matrix_type,
        rows,
        integral,
    }
}

fn divide(row: &[f64], denominator: f64) -> Vec<f64> {
    if denominator > 0.0 {
        row.iter().map(|v| v / denominator).collect()
    } else {
        vec![0.0; row.len()]
    }
}
