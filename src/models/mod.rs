//! Logistic regression and the heart disease risk predictor

pub mod logistic;
pub mod predictor;

pub use logistic::{LogisticRegression, ModelError, Regularization};
pub use predictor::{
    FitReport, PredictionResult, RiskLabel, RiskLevel, RiskPredictor, DECISION_THRESHOLD,
};
