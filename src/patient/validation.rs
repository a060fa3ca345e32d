//! Field validation for operator input
//!
//! Every feature has a closed valid range. Input that does not parse, or
//! parses to a value outside the range, is rejected with a corrective
//! message and the same field is asked for again.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::{Feature, FieldKind, N_FEATURES};

/// Rejected operator input for a single field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Please enter a valid number")]
    NotANumber { feature: Feature, input: String },

    #[error("Please enter a whole number")]
    NotAWholeNumber { feature: Feature, input: String },

    #[error("Please enter a value between {min} and {max}")]
    OutOfRange {
        feature: Feature,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FieldError {
    /// Feature the rejected input was meant for
    pub fn feature(&self) -> Feature {
        match self {
            FieldError::NotANumber { feature, .. }
            | FieldError::NotAWholeNumber { feature, .. }
            | FieldError::OutOfRange { feature, .. } => *feature,
        }
    }
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Valid range for each of the 13 features, indexed by column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRanges {
    ranges: [FieldRange; N_FEATURES],
}

impl Default for FieldRanges {
    fn default() -> Self {
        Self {
            ranges: [
                FieldRange::new(1.0, 120.0),   // age
                FieldRange::new(0.0, 1.0),     // sex
                FieldRange::new(0.0, 3.0),     // cp
                FieldRange::new(50.0, 300.0),  // trestbps
                FieldRange::new(100.0, 600.0), // chol
                FieldRange::new(0.0, 1.0),     // fbs
                FieldRange::new(0.0, 2.0),     // restecg
                FieldRange::new(50.0, 250.0),  // thalach
                FieldRange::new(0.0, 1.0),     // exang
                FieldRange::new(0.0, 10.0),    // oldpeak
                FieldRange::new(0.0, 2.0),     // slope
                FieldRange::new(0.0, 4.0),     // ca
                FieldRange::new(0.0, 3.0),     // thal
            ],
        }
    }
}

impl FieldRanges {
    /// Range for one feature
    pub fn range(&self, feature: Feature) -> FieldRange {
        self.ranges[feature.index()]
    }

    /// Replace the range for one feature
    pub fn with_range(mut self, feature: Feature, range: FieldRange) -> Self {
        self.ranges[feature.index()] = range;
        self
    }

    /// Check that a value lies inside the feature's closed range
    pub fn check(&self, feature: Feature, value: f64) -> Result<f64, FieldError> {
        let range = self.range(feature);
        if range.contains(value) {
            Ok(value)
        } else {
            Err(FieldError::OutOfRange {
                feature,
                value,
                min: range.min,
                max: range.max,
            })
        }
    }

    /// Parse raw operator input for a feature and check its range
    pub fn parse(&self, feature: Feature, input: &str) -> Result<f64, FieldError> {
        let trimmed = input.trim();

        let value = trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FieldError::NotANumber {
                feature,
                input: trimmed.to_string(),
            })?;

        if feature.kind() == FieldKind::Integer && value.fract() != 0.0 {
            return Err(FieldError::NotAWholeNumber {
                feature,
                input: trimmed.to_string(),
            });
        }

        self.check(feature, value)
    }

    /// Features whose configured range is empty (`min > max`)
    pub fn inverted(&self) -> Vec<Feature> {
        Feature::ALL
            .iter()
            .copied()
            .filter(|&f| {
                let r = self.range(f);
                !(r.min <= r.max)
            })
            .collect()
    }
}
