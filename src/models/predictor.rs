//! Heart disease risk predictor
//!
//! Owns the fitted scaler and logistic regression. Fitting happens once at
//! startup; afterwards the predictor is only read.

use ndarray::Array1;
use std::fmt;
use tracing::{debug, info};

use super::logistic::{LogisticRegression, ModelError};
use crate::config::TrainingConfig;
use crate::data::dataset::HeartDataset;
use crate::data::processor::StandardScaler;
use crate::metrics::classification::{accuracy, ClassificationMetrics};
use crate::patient::record::PatientRecord;

/// Probability of disease at or above which a record is high risk
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Low,
    High,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Low => f.write_str("LOW RISK"),
            RiskLabel::High => f.write_str("HIGH RISK"),
        }
    }
}

/// Banding of the risk score into four levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score < 0.25 {
            RiskLevel::VeryLow
        } else if risk_score < 0.50 {
            RiskLevel::Low
        } else if risk_score < 0.75 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::VeryLow => "Very Low Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
        };
        f.write_str(s)
    }
}

/// Outcome of one prediction
///
/// `confidence` is the probability of the *predicted* class, so it is
/// always at least 0.5. `risk_score` is the probability of disease whatever
/// the label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub label: RiskLabel,
    pub confidence: f64,
    pub risk_score: f64,
}

impl PredictionResult {
    /// Derive label and confidence from the positive-class probability
    pub fn from_probability(probability: f64) -> Self {
        if probability >= DECISION_THRESHOLD {
            Self {
                label: RiskLabel::High,
                confidence: probability,
                risk_score: probability,
            }
        } else {
            Self {
                label: RiskLabel::Low,
                confidence: 1.0 - probability,
                risk_score: probability,
            }
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

/// Split sizes and accuracies from fitting
#[derive(Debug, Clone)]
pub struct FitReport {
    pub train_size: usize,
    pub test_size: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Full metrics on the held-out split
    pub test_metrics: ClassificationMetrics,
    pub iterations: usize,
}

/// State that only exists once fitting has succeeded
#[derive(Debug, Clone)]
struct TrainedModel {
    scaler: StandardScaler,
    model: LogisticRegression,
    report: FitReport,
}

/// Logistic regression risk predictor
#[derive(Debug, Clone)]
pub struct RiskPredictor {
    config: TrainingConfig,
    trained: Option<TrainedModel>,
}

impl RiskPredictor {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            trained: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.trained.is_some()
    }

    /// Report from the last successful fit
    pub fn report(&self) -> Option<&FitReport> {
        self.trained.as_ref().map(|t| &t.report)
    }

    /// Split the dataset, fit on the training part and score both parts
    pub fn fit(&mut self, dataset: &HeartDataset) -> Result<&FitReport, ModelError> {
        let summary = dataset.summary();
        if summary.healthy < 2 || summary.disease < 2 {
            return Err(ModelError::InsufficientData(format!(
                "need at least two rows per class, found {} healthy and {} disease",
                summary.healthy, summary.disease
            )));
        }

        let (train, test) = dataset.stratified_split(self.config.test_ratio, self.config.seed);
        if train.n_samples() == 0 || test.n_samples() == 0 {
            return Err(ModelError::InsufficientData(format!(
                "split left {} training and {} held-out rows",
                train.n_samples(),
                test.n_samples()
            )));
        }
        info!(
            "Split {} rows into {} training / {} held-out",
            summary.rows,
            train.n_samples(),
            test.n_samples()
        );

        let scaler = StandardScaler::fit(&train.x);
        let x_train = scaler.transform(&train.x);
        let x_test = scaler.transform(&test.x);

        let mut model = LogisticRegression::with_l2(
            self.config.learning_rate,
            self.config.max_iter,
            self.config.tolerance,
            self.config.l2_penalty,
        );
        model.fit(&x_train, &train.y)?;
        debug!("\n{}", model.summary(&dataset.feature_names));

        let train_pred = model.predict(&x_train)?;
        let test_proba = model.predict_proba(&x_test)?;
        let test_pred = test_proba.mapv(|p| if p >= DECISION_THRESHOLD { 1.0 } else { 0.0 });

        let test_metrics =
            ClassificationMetrics::calculate_with_proba(&test.y, &test_pred, Some(&test_proba));
        debug!("\n{}", test_metrics.report());

        let report = FitReport {
            train_size: train.n_samples(),
            test_size: test.n_samples(),
            train_accuracy: accuracy(&train.y, &train_pred),
            test_accuracy: test_metrics.accuracy,
            test_metrics,
            iterations: model.n_iter(),
        };
        info!(
            "Model trained in {} iterations: training accuracy {:.3}, held-out accuracy {:.3}",
            report.iterations, report.train_accuracy, report.test_accuracy
        );

        let trained = self.trained.insert(TrainedModel {
            scaler,
            model,
            report,
        });
        Ok(&trained.report)
    }

    /// Probability that the record belongs to the disease class
    pub fn probability(&self, record: &PatientRecord) -> Result<f64, ModelError> {
        let trained = self.trained.as_ref().ok_or(ModelError::NotFitted)?;

        let features: Array1<f64> = record.to_array();
        if features.len() != trained.scaler.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: trained.scaler.n_features(),
                got: features.len(),
            });
        }

        let scaled = trained.scaler.transform_row(features.view());
        trained.model.predict_proba_one(scaled.view())
    }

    /// Classify one record
    pub fn predict(&self, record: &PatientRecord) -> Result<PredictionResult, ModelError> {
        let probability = self.probability(record)?;
        let result = PredictionResult::from_probability(probability);
        debug!(
            "Predicted {} (p = {:.4}, confidence = {:.4})",
            result.label, probability, result.confidence
        );
        Ok(result)
    }
}
