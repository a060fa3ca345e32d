//! # Heart Risk - Logistic Regression Risk Assessment
//!
//! This library trains a logistic regression classifier on the 13-feature
//! heart disease dataset and assesses one patient record at a time through
//! an interactive terminal session.
//!
//! ## Modules
//!
//! - `config` - Training parameters, field ranges and logging level
//! - `data` - Dataset loading, summary statistics and stratified splits
//! - `models` - Logistic regression and the risk predictor built on it
//! - `metrics` - Classification metrics for the held-out split
//! - `patient` - Patient record schema and field validation
//! - `session` - Interactive collect / predict / display loop

pub mod config;
pub mod data;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod patient;
pub mod session;

pub use config::Config;
pub use data::dataset::{DatasetSummary, HeartDataset};
pub use data::loader::{DatasetError, DatasetLoader};
pub use metrics::classification::ClassificationMetrics;
pub use models::logistic::LogisticRegression;
pub use models::predictor::{FitReport, PredictionResult, RiskLabel, RiskLevel, RiskPredictor};
pub use patient::record::{Feature, PatientRecord};
pub use patient::validation::{FieldError, FieldRanges};
pub use session::{Session, SessionEnd, SessionOutcome};
