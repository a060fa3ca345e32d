//! Model evaluation metrics

pub mod classification;

pub use classification::{accuracy, ClassificationMetrics, ConfusionMatrix};
