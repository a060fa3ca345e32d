//! Feature standardization
//!
//! Clinical features live on very different scales (cholesterol in the
//! hundreds, flags in {0, 1}), so gradient descent works on z-scores.

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Per-column mean / standard deviation scaler
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl StandardScaler {
    /// Fit on the rows of `x` using the population standard deviation
    ///
    /// `x` must have at least one row.
    pub fn fit(x: &Array2<f64>) -> Self {
        let means = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        let stds = x.std_axis(Axis(0), 0.0);
        Self { means, stds }
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Standardize one value of column `j`; constant columns map to 0
    fn scale(&self, j: usize, value: f64) -> f64 {
        let std = self.stds[j];
        if std > 1e-10 {
            (value - self.means[j]) / std
        } else {
            0.0
        }
    }

    /// Transform a matrix with the same column layout as the fit data
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        Array2::from_shape_fn(x.raw_dim(), |(i, j)| self.scale(j, x[[i, j]]))
    }

    /// Transform a single feature vector
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Array1<f64> {
        Array1::from_shape_fn(row.len(), |j| self.scale(j, row[j]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_standardized_columns_have_zero_mean_unit_std() {
        let x = array![[1.0, 100.0], [2.0, 200.0], [3.0, 300.0], [4.0, 400.0]];
        let scaler = StandardScaler::fit(&x);
        let z = scaler.transform(&x);

        for col in z.columns() {
            assert_abs_diff_eq!(col.mean().unwrap(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(col.std(0.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let scaler = StandardScaler::fit(&x);

        let row = scaler.transform_row(array![2.0, 5.0].view());
        assert_abs_diff_eq!(row[0], 0.0, epsilon = 1e-12);
        assert_eq!(row[1], 0.0);
    }

    #[test]
    fn test_row_and_matrix_transforms_agree() {
        let x = array![[1.0, 10.0], [4.0, 30.0], [7.0, 20.0]];
        let scaler = StandardScaler::fit(&x);

        let z = scaler.transform(&x);
        let row = scaler.transform_row(x.row(1));
        assert_eq!(z.row(1).to_owned(), row);
    }
}
