use crate::error::{Axis, MatrixError};
use crate::labels::LabelSet;

/// Square grid of weighted counts. Rows are actual labels, columns predicted.
///
/// Row-major storage: `cells[actual * dim + predicted]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    labels: LabelSet,
    cells: Vec<f64>,
    /// Per cell: every contributing weight was exactly 1. Cells nothing landed
    /// in take the value for the whole matrix.
    unit: Vec<bool>,
}

impl Matrix {
    /// Tally observations into a grid over `labels`.
    ///
    /// Weights are added in input order so repeated runs over the same input
    /// produce bit-identical sums.
    pub fn accumulate<S: AsRef<str>>(
        actual: &[S],
        predicted: &[S],
        weights: Option<&[f64]>,
        labels: LabelSet,
    ) -> Result<Self, MatrixError> {
        check_shape(actual.len(), predicted.len(), weights.map(|w| w.len()))?;

        let dim = labels.len();
        let mut cells = vec![0.0f64; dim * dim];
        let mut hit = vec![false; dim * dim];
        let mut unit = vec![true; dim * dim];
        let mut all_unit = true;

        for (k, (a, p)) in actual.iter().zip(predicted.iter()).enumerate() {
            let row = lookup(&labels, a.as_ref(), Axis::Actual, k)?;
            let col = lookup(&labels, p.as_ref(), Axis::Predicted, k)?;

            let weight = match weights {
                Some(w) => {
                    let value = w[k];
                    if !value.is_finite() || value < 0.0 {
                        return Err(MatrixError::InvalidWeight {
                            index: k,
                            value,
                            line: None,
                        });
                    }
                    value
                }
                None => 1.0,
            };

            let cell = row * dim + col;
            cells[cell] += weight;
            hit[cell] = true;
            if weight != 1.0 {
                unit[cell] = false;
                all_unit = false;
            }
        }

        for (u, h) in unit.iter_mut().zip(&hit) {
            if !h {
                *u = all_unit;
            }
        }

        Ok(Self { labels, cells, unit })
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    /// True when the cell holds a plain tally: every weight added to it was 1.
    pub fn is_unit(&self, row: usize, col: usize) -> bool {
        self.unit[row * self.dim() + col]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.dim() + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let dim = self.dim();
        &self.cells[row * dim..(row + 1) * dim]
    }

    pub fn row_total(&self, row: usize) -> f64 {
        self.row(row).iter().sum()
    }

    /// Sum of all cells.
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }
}

fn check_shape(actual: usize, predicted: usize, weights: Option<usize>) -> Result<(), MatrixError> {
    if predicted != actual {
        return Err(MatrixError::ShapeMismatch {
            what: "actual and predicted labels",
            expected: actual,
            found: predicted,
        });
    }
    if let Some(w) = weights {
        if w != actual {
            return Err(MatrixError::ShapeMismatch {
                what: "weights and labels",
                expected: actual,
                found: w,
            });
        }
    }
    Ok(())
}

fn lookup(labels: &LabelSet, label: &str, axis: Axis, index: usize) -> Result<usize, MatrixError> {
    labels.index_of(label).ok_or_else(|| MatrixError::UnknownLabel {
        label: label.to_string(),
        axis,
        index,
        line: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelOrder;

    fn labels(v: &[&str]) -> LabelSet {
        let owned: Vec<String> = v.iter().map(|s| s.to_string()).collect();
        LabelSet::explicit(&owned).unwrap()
    }

    #[test]
    fn unweighted_counts() {
        let m = Matrix::accumulate(&["a", "a", "b"], &["a", "b", "b"], None, labels(&["a", "b"])).unwrap();
        assert_eq!(m.cells(), &[1.0, 1.0, 0.0, 1.0]);
        assert_eq!(m.total(), 3.0);
        assert!(m.is_unit(0, 0) && m.is_unit(1, 0));
    }

    #[test]
    fn weighted_counts() {
        let w = [0.5, 0.25, 2.0];
        let m = Matrix::accumulate(&["a", "a", "b"], &["a", "a", "a"], Some(&w[..]), labels(&["a", "b"]))
            .unwrap();
        assert_eq!(m.get(0, 0), 0.75);
        assert_eq!(m.get(1, 0), 2.0);
        assert_eq!(m.row_total(1), 2.0);
        assert_eq!(m.total(), 2.75);
        assert!(!m.is_unit(0, 0));
        assert!(!m.is_unit(1, 0));
    }

    #[test]
    fn whole_weighted_sums_are_not_unit() {
        let w = [0.5, 0.5, 2.0];
        let m = Matrix::accumulate(&["a", "a", "b"], &["a", "a", "b"], Some(&w[..]), labels(&["a", "b"]))
            .unwrap();
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 1), 2.0);
        assert!(!m.is_unit(0, 0));
        assert!(!m.is_unit(1, 1));
        // empty cells follow the rest of the matrix
        assert!(!m.is_unit(0, 1));
    }

    #[test]
    fn unit_weights_keep_tally_cells() {
        let w = [1.0, 1.0];
        let m = Matrix::accumulate(&["a", "b"], &["a", "a"], Some(&w[..]), labels(&["a", "b"])).unwrap();
        assert!((0..2).all(|r| (0..2).all(|c| m.is_unit(r, c))));
    }

    #[test]
    fn mixed_weights_mark_only_touched_cells() {
        let w = [1.0, 0.5];
        let m = Matrix::accumulate(&["a", "b"], &["a", "b"], Some(&w[..]), labels(&["a", "b"])).unwrap();
        assert!(m.is_unit(0, 0));
        assert!(!m.is_unit(1, 1));
        assert!(!m.is_unit(0, 1));
    }

    #[test]
    fn zero_weight_is_allowed() {
        let m = Matrix::accumulate(&["a"], &["a"], Some(&[0.0][..]), labels(&["a"])).unwrap();
        assert_eq!(m.total(), 0.0);
    }

    #[test]
    fn length_mismatch() {
        let err = Matrix::accumulate(&["a", "b"], &["a"], None, labels(&["a", "b"])).unwrap_err();
        assert_eq!(
            err,
            MatrixError::ShapeMismatch {
                what: "actual and predicted labels",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn weight_length_mismatch() {
        let err = Matrix::accumulate(&["a"], &["a"], Some(&[1.0, 1.0][..]), labels(&["a"])).unwrap_err();
        assert!(matches!(err, MatrixError::ShapeMismatch { found: 2, .. }));
    }

    #[test]
    fn unknown_predicted_label_reports_axis_and_index() {
        let err = Matrix::accumulate(&["a", "a"], &["a", "q"], None, labels(&["a"])).unwrap_err();
        assert_eq!(
            err,
            MatrixError::UnknownLabel {
                label: "q".into(),
                axis: Axis::Predicted,
                index: 1,
                line: None
            }
        );
        assert_eq!(err.to_string(), "predicted label 'q' at index 1 is not in the label set");
    }

    #[test]
    fn negative_weight_rejected() {
        let err = Matrix::accumulate(&["a", "a"], &["a", "a"], Some(&[1.0, -0.5][..]), labels(&["a"]))
            .unwrap_err();
        assert_eq!(
            err,
            MatrixError::InvalidWeight {
                index: 1,
                value: -0.5,
                line: None
            }
        );
    }

    #[test]
    fn nan_weight_rejected() {
        let err = Matrix::accumulate(&["a"], &["a"], Some(&[f64::NAN][..]), labels(&["a"])).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidWeight { index: 0, .. }));
    }

    #[test]
    fn unobserved_explicit_label_is_zero_filled() {
        let m = Matrix::accumulate(&["a"], &["a"], None, labels(&["a", "never"])).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.row(1), &[0.0, 0.0]);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn inferred_labels_cover_all_observations() {
        let actual = ["x", "y", "y"];
        let predicted = ["y", "z", "y"];
        let set = LabelSet::infer(&actual, &predicted, LabelOrder::FirstSeen).unwrap();
        let m = Matrix::accumulate(&actual, &predicted, None, set).unwrap();
        assert_eq!(m.dim(), 3);
        assert_eq!(m.total(), 3.0);
    }
}
