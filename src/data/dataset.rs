//! In-memory dataset and stratified train/test splitting

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

use crate::patient::record::Feature;

/// Feature matrix and binary target vector
#[derive(Debug, Clone)]
pub struct HeartDataset {
    /// Feature matrix (n_samples x 13)
    pub x: Array2<f64>,
    /// Target vector, 0 = no disease, 1 = disease present
    pub y: Array1<f64>,
    /// Feature codes in column order
    pub feature_names: Vec<String>,
}

/// Row count and class balance, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub features: usize,
    /// Rows with target 0
    pub healthy: usize,
    /// Rows with target 1
    pub disease: usize,
    /// Feature cells without a usable value
    pub missing: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows x {} features ({} healthy, {} heart disease, {} missing values)",
            self.rows, self.features, self.healthy, self.disease, self.missing
        )
    }
}

impl HeartDataset {
    /// Create a new dataset
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Self {
        Self {
            x,
            y,
            feature_names: Feature::codes(),
        }
    }

    /// Get number of samples
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Get number of features
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn summary(&self) -> DatasetSummary {
        let disease = self.y.iter().filter(|&&t| t >= 0.5).count();
        DatasetSummary {
            rows: self.n_samples(),
            features: self.n_features(),
            healthy: self.n_samples() - disease,
            disease,
            missing: self.x.iter().filter(|v| !v.is_finite()).count(),
        }
    }

    /// Rows at the given indices, in that order
    pub fn select(&self, indices: &[usize]) -> HeartDataset {
        let x = self.x.select(Axis(0), indices);
        let y = self.y.select(Axis(0), indices);
        HeartDataset {
            x,
            y,
            feature_names: self.feature_names.clone(),
        }
    }

    /// Split into disjoint train and test sets, preserving class balance
    ///
    /// Each class is shuffled with a seeded RNG and `round(test_ratio * n)`
    /// of its rows go to the test set, so split sizes depend only on the
    /// class counts and the ratio.
    pub fn stratified_split(&self, test_ratio: f64, seed: u64) -> (HeartDataset, HeartDataset) {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut train_indices = Vec::new();
        let mut test_indices = Vec::new();

        for positive in [false, true] {
            let mut indices: Vec<usize> = self
                .y
                .iter()
                .enumerate()
                .filter(|&(_, &t)| (t >= 0.5) == positive)
                .map(|(i, _)| i)
                .collect();

            indices.shuffle(&mut rng);

            let n_test = (indices.len() as f64 * test_ratio).round() as usize;
            test_indices.extend_from_slice(&indices[..n_test]);
            train_indices.extend_from_slice(&indices[n_test..]);
        }

        train_indices.sort_unstable();
        test_indices.sort_unstable();

        (self.select(&train_indices), self.select(&test_indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Dataset whose first column is the row index, so rows are traceable
    fn indexed_dataset(healthy: usize, disease: usize) -> HeartDataset {
        let n = healthy + disease;
        let x = Array2::from_shape_fn((n, 13), |(i, j)| if j == 0 { i as f64 } else { 1.0 });
        let y = Array1::from_shape_fn(n, |i| if i < healthy { 0.0 } else { 1.0 });
        HeartDataset::new(x, y)
    }

    #[test]
    fn test_summary() {
        let dataset = indexed_dataset(165, 138);
        let summary = dataset.summary();

        assert_eq!(summary.rows, 303);
        assert_eq!(summary.features, 13);
        assert_eq!(summary.healthy, 165);
        assert_eq!(summary.disease, 138);
        assert_eq!(summary.missing, 0);
    }

    #[test]
    fn test_stratified_split_sizes() {
        let dataset = indexed_dataset(165, 138);
        let (train, test) = dataset.stratified_split(0.2, 42);

        assert_eq!(test.n_samples(), 61);
        assert_eq!(train.n_samples(), 242);
        assert_eq!(test.summary().healthy, 33);
        assert_eq!(test.summary().disease, 28);
    }

    #[test]
    fn test_stratified_split_is_disjoint_and_complete() {
        let dataset = indexed_dataset(165, 138);
        let (train, test) = dataset.stratified_split(0.2, 7);

        let train_ids: HashSet<i64> = train.x.column(0).iter().map(|&v| v as i64).collect();
        let test_ids: HashSet<i64> = test.x.column(0).iter().map(|&v| v as i64).collect();

        assert!(train_ids.is_disjoint(&test_ids));
        assert_eq!(train_ids.len() + test_ids.len(), 303);
    }

    #[test]
    fn test_stratified_split_is_seeded() {
        let dataset = indexed_dataset(50, 50);

        let (_, a) = dataset.stratified_split(0.2, 42);
        let (_, b) = dataset.stratified_split(0.2, 42);
        let (_, c) = dataset.stratified_split(0.2, 43);

        assert_eq!(a.x, b.x);
        assert_ne!(a.x, c.x);
    }
}
