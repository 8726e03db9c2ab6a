//! Top-k extraction over per-class scores.

use crate::core::{ClassifyError, Tensor2D};

/// Result structure for top-k extraction.
///
/// Contains the top-k class indexes and their corresponding confidence
/// scores for each row of the score matrix.
#[derive(Debug, Clone)]
pub struct TopkResult {
    /// Top-k class indexes per row, best first.
    pub indexes: Vec<Vec<usize>>,
    /// Confidence scores matching `indexes`.
    pub scores: Vec<Vec<f32>>,
}

/// Extracts the k highest-scoring classes from model output rows.
///
/// Scores are ordered with a stable descending sort, so equal maxima resolve
/// to the lowest class index (first-maximum-wins).
#[derive(Debug, Clone, Copy)]
pub struct Topk {
    k: usize,
}

impl Topk {
    /// Creates a Topk processor that keeps `k` predictions per row.
    pub fn new(k: usize) -> Result<Self, ClassifyError> {
        if k == 0 {
            return Err(ClassifyError::config_error("k must be greater than 0"));
        }
        Ok(Self { k })
    }

    /// Number of predictions kept per row.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Extracts the top-k classes for each row of the score matrix.
    ///
    /// Rows with fewer than `k` classes return all of them.
    pub fn process(&self, predictions: &Tensor2D) -> Result<TopkResult, ClassifyError> {
        let mut indexes = Vec::with_capacity(predictions.nrows());
        let mut scores = Vec::with_capacity(predictions.nrows());

        for row in predictions.outer_iter() {
            if row.is_empty() {
                return Err(ClassifyError::invalid_input(
                    "prediction row has no class scores",
                ));
            }
            let mut indexed: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
            indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

            let (row_indexes, row_scores): (Vec<usize>, Vec<f32>) = indexed
                .into_iter()
                .take(self.k.min(row.len()))
                .unzip();
            indexes.push(row_indexes);
            scores.push(row_scores);
        }

        Ok(TopkResult { indexes, scores })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_argmax_selects_highest_score() {
        let topk = Topk::new(1).unwrap();
        let predictions = array![[
            0.1f32, 0.05, 0.02, 0.9, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01
        ]];

        let result = topk.process(&predictions).unwrap();
        assert_eq!(result.indexes, vec![vec![3]]);
        assert!((result.scores[0][0] - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tie_resolves_to_first_maximum() {
        let topk = Topk::new(1).unwrap();
        let predictions = array![[0.2f32, 0.9, 0.9, 0.1]];

        let result = topk.process(&predictions).unwrap();
        assert_eq!(result.indexes[0], vec![1]);
    }

    #[test]
    fn test_topk_ordering() {
        let topk = Topk::new(3).unwrap();
        let predictions = array![[0.1f32, 0.8, 0.05, 0.3]];

        let result = topk.process(&predictions).unwrap();
        assert_eq!(result.indexes[0], vec![1, 3, 0]);
    }

    #[test]
    fn test_k_larger_than_classes_is_clamped() {
        let topk = Topk::new(5).unwrap();
        let predictions = array![[0.1f32, 0.8]];

        let result = topk.process(&predictions).unwrap();
        assert_eq!(result.indexes[0].len(), 2);
    }

    #[test]
    fn test_one_result_row_per_prediction() {
        let topk = Topk::new(1).unwrap();
        let predictions = array![[0.9f32, 0.1], [0.2, 0.7]];

        let result = topk.process(&predictions).unwrap();
        assert_eq!(result.indexes, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_zero_k_rejected() {
        assert!(Topk::new(0).is_err());
    }
}
