//! Logistic Regression for binary classification
//!
//! Batch gradient descent on the mean log-loss with an optional L2 penalty
//! on the coefficients. The intercept is never penalized.

use ndarray::{Array1, Array2, ArrayView1};
use thiserror::Error;
use tracing::debug;

/// Errors for model fitting and prediction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient training data: {0}")]
    InsufficientData(String),
}

/// Regularization type for logistic regression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Regularization {
    /// No regularization
    None,
    /// L2 regularization (Ridge)
    L2(f64),
}

/// Logistic Regression classifier
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Fitted coefficients
    coefficients: Option<Array1<f64>>,
    /// Intercept term
    intercept: Option<f64>,
    learning_rate: f64,
    max_iter: usize,
    /// Convergence tolerance on the change in cost
    tolerance: f64,
    regularization: Regularization,
    /// Cost history during training
    pub cost_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(0.1, 1000, 1e-7, Regularization::None)
    }
}

impl LogisticRegression {
    /// Create a new Logistic Regression model
    pub fn new(
        learning_rate: f64,
        max_iter: usize,
        tolerance: f64,
        regularization: Regularization,
    ) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate,
            max_iter,
            tolerance,
            regularization,
            cost_history: Vec::new(),
        }
    }

    /// Create with L2 penalty strength `alpha`
    pub fn with_l2(learning_rate: f64, max_iter: usize, tolerance: f64, alpha: f64) -> Self {
        let regularization = if alpha > 0.0 {
            Regularization::L2(alpha)
        } else {
            Regularization::None
        };
        Self::new(learning_rate, max_iter, tolerance, regularization)
    }

    /// Sigmoid activation function
    pub(crate) fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    /// Compute log loss (binary cross-entropy)
    fn log_loss(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let eps = 1e-15;
        let n = y_true.len() as f64;

        -y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p_clipped = p.clamp(eps, 1.0 - eps);
                y * p_clipped.ln() + (1.0 - y) * (1.0 - p_clipped).ln()
            })
            .sum::<f64>()
            / n
    }

    fn check_parameters(&self) -> Result<(), ModelError> {
        if !(self.learning_rate > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iter == 0 {
            return Err(ModelError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if let Regularization::L2(alpha) = self.regularization {
            if !(alpha >= 0.0) {
                return Err(ModelError::InvalidParameter(format!(
                    "L2 penalty must be non-negative, got {}",
                    alpha
                )));
            }
        }
        Ok(())
    }

    /// Fit using gradient descent
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        self.check_parameters()?;

        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ModelError::InsufficientData("no training rows".to_string()));
        }

        let n_samples = x.nrows() as f64;
        let n_features = x.ncols();

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;

        self.cost_history.clear();

        for iter in 0..self.max_iter {
            // Forward pass
            let linear = x.dot(&weights) + bias;
            let predictions = linear.mapv(Self::sigmoid);

            // Gradients
            let errors = &predictions - y;
            let mut dw = x.t().dot(&errors) / n_samples;
            let db = errors.sum() / n_samples;

            if let Regularization::L2(alpha) = self.regularization {
                dw = &dw + &(&weights * alpha);
            }

            weights = &weights - &(&dw * self.learning_rate);
            bias -= self.learning_rate * db;

            let mut cost = Self::log_loss(y, &predictions);
            if let Regularization::L2(alpha) = self.regularization {
                cost += 0.5 * alpha * weights.dot(&weights);
            }
            self.cost_history.push(cost);

            if iter > 0 {
                let cost_diff = (self.cost_history[iter - 1] - cost).abs();
                if cost_diff < self.tolerance {
                    debug!("Converged at iteration {}", iter);
                    break;
                }
            }
        }

        debug!(
            "Finished after {} iterations, final cost {:.6}",
            self.cost_history.len(),
            self.cost_history.last().copied().unwrap_or(f64::NAN)
        );

        self.coefficients = Some(weights);
        self.intercept = Some(bias);

        Ok(())
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    /// Iterations actually run during the last fit
    pub fn n_iter(&self) -> usize {
        self.cost_history.len()
    }

    fn fitted(&self) -> Result<(&Array1<f64>, f64), ModelError> {
        let weights = self
            .coefficients
            .as_ref()
            .ok_or(ModelError::NotFitted)?;
        let bias = self.intercept.ok_or(ModelError::NotFitted)?;
        Ok((weights, bias))
    }

    /// Get decision function values (log-odds)
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let (weights, bias) = self.fitted()?;
        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(weights) + bias)
    }

    /// Predict probabilities of the positive class
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        Ok(self.decision_function(x)?.mapv(Self::sigmoid))
    }

    /// Positive-class probability for one feature vector
    pub fn predict_proba_one(&self, row: ArrayView1<f64>) -> Result<f64, ModelError> {
        let (weights, bias) = self.fitted()?;
        if row.len() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: row.len(),
            });
        }
        Ok(Self::sigmoid(row.dot(weights) + bias))
    }

    /// Predict class labels (0 or 1)
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Get model summary
    pub fn summary(&self, feature_names: &[String]) -> String {
        let mut s = String::new();
        s.push_str("Logistic Regression Summary\n");
        s.push_str("===========================\n\n");

        match (&self.coefficients, self.intercept) {
            (Some(coef), Some(intercept)) => {
                s.push_str(&format!("Intercept: {:.6}\n\n", intercept));
                s.push_str("Coefficients (log-odds per std dev):\n");

                for (i, (name, &c)) in feature_names.iter().zip(coef.iter()).enumerate() {
                    s.push_str(&format!(
                        "  {:3}. {:10}: {:>10.6} (OR: {:.4})\n",
                        i + 1,
                        name,
                        c,
                        c.exp()
                    ));
                }

                if let Some(cost) = self.cost_history.last() {
                    s.push_str(&format!(
                        "\nFinal cost: {:.6} after {} iterations\n",
                        cost,
                        self.n_iter()
                    ));
                }
            }
            _ => s.push_str("Model not fitted yet.\n"),
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 5.0, 5.0, 5.5, 5.5, 6.0, 6.0],
        )
        .unwrap();
        let y = Array1::from_vec(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        (x, y)
    }

    #[test]
    fn test_sigmoid() {
        assert!((LogisticRegression::sigmoid(0.0) - 0.5).abs() < 1e-10);
        assert!(LogisticRegression::sigmoid(100.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-100.0) < 0.01);
        assert!(LogisticRegression::sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn test_logistic_regression_fit() {
        let (x, y) = separable();

        let mut model = LogisticRegression::new(0.1, 5000, 1e-9, Regularization::None);
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();

        // Should correctly classify most points
        let accuracy = predictions
            .iter()
            .zip(y.iter())
            .filter(|(&p, &a)| (p - a).abs() < 0.5)
            .count() as f64
            / y.len() as f64;

        assert!(accuracy >= 0.8);
    }

    #[test]
    fn test_cost_decreases() {
        let (x, y) = separable();

        let mut model = LogisticRegression::new(0.1, 200, 0.0, Regularization::None);
        model.fit(&x, &y).unwrap();

        let first = model.cost_history[0];
        let last = *model.cost_history.last().unwrap();
        assert!(last < first);
        assert_eq!(model.n_iter(), 200);
    }

    #[test]
    fn test_l2_shrinks_coefficients() {
        let (x, y) = separable();

        let mut plain = LogisticRegression::new(0.1, 2000, 0.0, Regularization::None);
        plain.fit(&x, &y).unwrap();
        let mut ridge = LogisticRegression::with_l2(0.1, 2000, 0.0, 0.5);
        ridge.fit(&x, &y).unwrap();

        let norm = |m: &LogisticRegression| {
            let c = m.coefficients().unwrap();
            c.dot(c).sqrt()
        };
        assert!(norm(&ridge) < norm(&plain));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LogisticRegression::default();
        let x = array![[1.0, 2.0]];

        assert_eq!(model.predict_proba(&x), Err(ModelError::NotFitted));
        assert_eq!(
            model.predict_proba_one(x.row(0)),
            Err(ModelError::NotFitted)
        );
    }

    #[test]
    fn test_dimension_checks() {
        let (x, y) = separable();
        let mut model = LogisticRegression::default();

        let short_y = Array1::from_vec(vec![0.0, 1.0]);
        assert!(matches!(
            model.fit(&x, &short_y),
            Err(ModelError::DimensionMismatch { .. })
        ));

        model.fit(&x, &y).unwrap();
        assert_eq!(
            model.predict_proba_one(array![1.0, 2.0, 3.0].view()),
            Err(ModelError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let (x, y) = separable();

        let mut model = LogisticRegression::new(0.0, 100, 1e-6, Regularization::None);
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));

        let mut model = LogisticRegression::new(0.1, 0, 1e-6, Regularization::None);
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_row_and_batch_probabilities_agree() {
        let (x, y) = separable();
        let mut model = LogisticRegression::default();
        model.fit(&x, &y).unwrap();

        let batch = model.predict_proba(&x).unwrap();
        for (i, row) in x.rows().into_iter().enumerate() {
            let single = model.predict_proba_one(row).unwrap();
            assert!((single - batch[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_summary_lists_features() {
        let (x, y) = separable();
        let mut model = LogisticRegression::default();

        assert!(model.summary(&[]).contains("not fitted"));

        model.fit(&x, &y).unwrap();
        let names = vec!["age".to_string(), "chol".to_string()];
        let summary = model.summary(&names);
        assert!(summary.contains("age"));
        assert!(summary.contains("chol"));
        assert!(summary.contains("Intercept"));
    }
}
