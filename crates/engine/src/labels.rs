use std::collections::{HashMap, HashSet};

use crate::config::LabelOrder;
use crate::error::MatrixError;

/// Ordered, duplicate-free labels shared by both matrix axes.
///
/// The label → position map is built once so accumulation does not scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelSet {
    /// Use a caller-supplied list verbatim. Duplicates are a config error.
    pub fn explicit(labels: &[String]) -> Result<Self, MatrixError> {
        check_unique(labels)?;
        if labels.is_empty() {
            return Err(MatrixError::EmptyLabels);
        }
        Ok(Self::from_unique(labels.to_vec()))
    }

    /// Collect labels from all actual values, then all predicted values.
    pub fn infer<S: AsRef<str>>(
        actual: &[S],
        predicted: &[S],
        order: LabelOrder,
    ) -> Result<Self, MatrixError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut labels: Vec<String> = Vec::new();

        for label in actual.iter().chain(predicted.iter()) {
            let label = label.as_ref();
            if seen.insert(label) {
                labels.push(label.to_string());
            }
        }

        if labels.is_empty() {
            return Err(MatrixError::EmptyLabels);
        }

        if order == LabelOrder::Sorted {
            labels.sort();
        }

        Ok(Self::from_unique(labels))
    }

    /// Explicit list if given, otherwise inferred from the data.
    pub fn resolve<S: AsRef<str>>(
        actual: &[S],
        predicted: &[S],
        explicit: Option<&[String]>,
        order: LabelOrder,
    ) -> Result<Self, MatrixError> {
        match explicit {
            Some(labels) => Self::explicit(labels),
            None => Self::infer(actual, predicted, order),
        }
    }

    fn from_unique(labels: Vec<String>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self { labels, index }
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.labels.iter()
    }
}

/// Fails on the first label that occurs twice.
pub fn check_unique(labels: &[String]) -> Result<(), MatrixError> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(MatrixError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}
