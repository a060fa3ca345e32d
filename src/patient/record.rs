//! Patient record schema
//!
//! The 13 clinical features in the fixed column order used by the dataset
//! file, the model and the interactive prompts.

use ndarray::Array1;
use std::fmt;

use super::validation::{FieldError, FieldRanges};

/// Number of feature columns in a record
pub const N_FEATURES: usize = 13;

/// How operator input for a feature is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Codes, flags and counts: whole numbers only
    Integer,
    /// Measured value that may carry a fractional part
    Continuous,
}

/// One of the 13 features, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Age,
    Sex,
    ChestPain,
    RestingBp,
    Cholesterol,
    FastingBloodSugar,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    StSlope,
    MajorVessels,
    Thalassemia,
}

impl Feature {
    /// All features in column order
    pub const ALL: [Feature; N_FEATURES] = [
        Feature::Age,
        Feature::Sex,
        Feature::ChestPain,
        Feature::RestingBp,
        Feature::Cholesterol,
        Feature::FastingBloodSugar,
        Feature::RestingEcg,
        Feature::MaxHeartRate,
        Feature::ExerciseAngina,
        Feature::StDepression,
        Feature::StSlope,
        Feature::MajorVessels,
        Feature::Thalassemia,
    ];

    /// Column position in the dataset and feature vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short column code as used in the public heart disease dataset
    pub fn code(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Sex => "sex",
            Feature::ChestPain => "cp",
            Feature::RestingBp => "trestbps",
            Feature::Cholesterol => "chol",
            Feature::FastingBloodSugar => "fbs",
            Feature::RestingEcg => "restecg",
            Feature::MaxHeartRate => "thalach",
            Feature::ExerciseAngina => "exang",
            Feature::StDepression => "oldpeak",
            Feature::StSlope => "slope",
            Feature::MajorVessels => "ca",
            Feature::Thalassemia => "thal",
        }
    }

    /// Short human-readable name
    pub fn label(self) -> &'static str {
        match self {
            Feature::Age => "Age",
            Feature::Sex => "Sex",
            Feature::ChestPain => "Chest Pain",
            Feature::RestingBp => "Resting BP",
            Feature::Cholesterol => "Cholesterol",
            Feature::FastingBloodSugar => "Fasting BS",
            Feature::RestingEcg => "Resting ECG",
            Feature::MaxHeartRate => "Max HR",
            Feature::ExerciseAngina => "Exercise Angina",
            Feature::StDepression => "ST Depression",
            Feature::StSlope => "ST Slope",
            Feature::MajorVessels => "Major Vessels",
            Feature::Thalassemia => "Thalassemia",
        }
    }

    /// Prompt text explaining the expected value and its coding
    pub fn description(self) -> &'static str {
        match self {
            Feature::Age => "Age (years)",
            Feature::Sex => "Sex (0: Female, 1: Male)",
            Feature::ChestPain => {
                "Chest Pain Type (0: Typical angina, 1: Atypical angina, 2: Non-anginal pain, 3: Asymptomatic)"
            }
            Feature::RestingBp => "Resting Blood Pressure (mm Hg)",
            Feature::Cholesterol => "Serum Cholesterol (mg/dl)",
            Feature::FastingBloodSugar => "Fasting Blood Sugar > 120 mg/dl (0: False, 1: True)",
            Feature::RestingEcg => {
                "Resting ECG Results (0: Normal, 1: ST-T wave abnormality, 2: Left ventricular hypertrophy)"
            }
            Feature::MaxHeartRate => "Maximum Heart Rate Achieved",
            Feature::ExerciseAngina => "Exercise Induced Angina (0: No, 1: Yes)",
            Feature::StDepression => "ST Depression Induced by Exercise",
            Feature::StSlope => {
                "Slope of Peak Exercise ST Segment (0: Upsloping, 1: Flat, 2: Downsloping)"
            }
            Feature::MajorVessels => "Number of Major Vessels Colored by Fluoroscopy (0-4)",
            Feature::Thalassemia => {
                "Thalassemia (0: Normal, 1: Fixed defect, 2: Reversible defect, 3: Not described)"
            }
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Feature::StDepression => FieldKind::Continuous,
            _ => FieldKind::Integer,
        }
    }

    /// Feature codes in column order
    pub fn codes() -> Vec<String> {
        Self::ALL.iter().map(|f| f.code().to_string()).collect()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complete, range-checked patient record
///
/// Can only be built through [`PatientRecord::new`], which checks every
/// value against the configured ranges, so a record that exists is always
/// fit to hand to the predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientRecord {
    values: [f64; N_FEATURES],
}

impl PatientRecord {
    /// Build a record, rejecting the first value that fails its range check
    pub fn new(values: [f64; N_FEATURES], ranges: &FieldRanges) -> Result<Self, FieldError> {
        for feature in Feature::ALL {
            ranges.check(feature, values[feature.index()])?;
        }
        Ok(Self { values })
    }

    /// Value of one feature
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Feature vector for the model
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.values.to_vec())
    }

    /// Iterate `(feature, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.values[f.index()]))
    }
}

/// Format a value the way the operator would have typed it
pub fn format_value(feature: Feature, value: f64) -> String {
    match feature.kind() {
        FieldKind::Integer => format!("{}", value as i64),
        FieldKind::Continuous => format!("{:.1}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_values() -> [f64; N_FEATURES] {
        [45.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 1.0, 0.0, 2.0]
    }

    #[test]
    fn test_feature_order_matches_index() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
        assert_eq!(Feature::ALL[0].code(), "age");
        assert_eq!(Feature::ALL[N_FEATURES - 1].code(), "thal");
    }

    #[test]
    fn test_only_st_depression_is_continuous() {
        let continuous: Vec<_> = Feature::ALL
            .iter()
            .filter(|f| f.kind() == FieldKind::Continuous)
            .collect();
        assert_eq!(continuous, vec![&Feature::StDepression]);
    }

    #[test]
    fn test_record_accessors() {
        let record = PatientRecord::new(sample_values(), &FieldRanges::default()).unwrap();

        assert_eq!(record.get(Feature::Age), 45.0);
        assert_eq!(record.get(Feature::Thalassemia), 2.0);
        assert_eq!(record.to_array().len(), N_FEATURES);
        assert_eq!(record.iter().count(), N_FEATURES);
    }

    #[test]
    fn test_record_rejects_out_of_range_value() {
        let mut values = sample_values();
        values[Feature::Cholesterol.index()] = 99.0;

        let err = PatientRecord::new(values, &FieldRanges::default()).unwrap_err();
        assert!(matches!(
            err,
            FieldError::OutOfRange {
                feature: Feature::Cholesterol,
                ..
            }
        ));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Feature::Age, 45.0), "45");
        assert_eq!(format_value(Feature::StDepression, 1.0), "1.0");
        assert_eq!(format_value(Feature::StDepression, 2.5), "2.5");
    }
}
