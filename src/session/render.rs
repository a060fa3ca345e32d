//! Terminal rendering for the assessment session

use chrono::{DateTime, Local};
use colored::Colorize;
use std::io::{self, Write};

use super::SessionEnd;
use crate::data::dataset::DatasetSummary;
use crate::models::predictor::{FitReport, PredictionResult, RiskLabel, RiskLevel};
use crate::patient::record::{format_value, PatientRecord};

const WIDTH: usize = 60;

fn rule(c: char) -> String {
    std::iter::repeat(c).take(WIDTH).collect()
}

/// Banner shown once, after the model is trained
pub fn write_welcome<W: Write>(
    out: &mut W,
    summary: &DatasetSummary,
    report: &FitReport,
) -> io::Result<()> {
    writeln!(out, "{}", "Heart Disease Prediction System".bold())?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Dataset loaded:")?;
    writeln!(out, "   - Shape: ({}, {})", summary.rows, summary.features + 1)?;
    writeln!(out, "   - Healthy hearts: {}", summary.healthy)?;
    writeln!(out, "   - Heart disease cases: {}", summary.disease)?;
    writeln!(out, "   - Missing values: {}", summary.missing)?;
    writeln!(out, "Model trained:")?;
    writeln!(
        out,
        "   - Training accuracy: {:.3} ({} rows)",
        report.train_accuracy, report.train_size
    )?;
    writeln!(
        out,
        "   - Test accuracy: {:.3} ({} rows)",
        report.test_accuracy, report.test_size
    )?;
    Ok(())
}

/// Heading printed before the first prompt of each assessment
pub fn write_assessment_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "{}", "HEART DISEASE RISK ASSESSMENT".bold())?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Please provide the following information:")?;
    writeln!(out)?;
    Ok(())
}

/// Corrective message after rejected input
pub fn write_rejection<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "   {} {}", "!".yellow().bold(), message.yellow())
}

fn colored_level(level: RiskLevel) -> String {
    let text = level.to_string();
    match level {
        RiskLevel::VeryLow => text.green().to_string(),
        RiskLevel::Low => text.bright_green().to_string(),
        RiskLevel::Moderate => text.yellow().to_string(),
        RiskLevel::High => text.red().to_string(),
    }
}

/// Full result block for one assessment
pub fn write_result<W: Write>(
    out: &mut W,
    record: &PatientRecord,
    result: &PredictionResult,
    assessed_at: DateTime<Local>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "{}", "ASSESSMENT RESULTS".bold())?;
    writeln!(out, "{}", rule('='))?;
    writeln!(
        out,
        "Assessment Date: {}",
        assessed_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out)?;

    writeln!(out, "Input Summary:")?;
    for (feature, value) in record.iter() {
        writeln!(out, "   - {}: {}", feature.label(), format_value(feature, value))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", rule('-'))?;

    let label = result.label.to_string();
    match result.label {
        RiskLabel::Low => {
            writeln!(out, "RESULT: {}", label.green().bold())?;
            writeln!(out, "   The model indicates a LOW risk of heart disease.")?;
        }
        RiskLabel::High => {
            writeln!(out, "RESULT: {}", label.red().bold())?;
            writeln!(out, "   The model indicates a HIGH risk of heart disease.")?;
        }
    }
    writeln!(out, "   Confidence: {:.1}%", result.confidence * 100.0)?;
    writeln!(out)?;
    writeln!(out, "Risk Score: {:.1}%", result.risk_score * 100.0)?;
    writeln!(out, "Risk Level: {}", colored_level(result.risk_level()))?;

    writeln!(out)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "{}", "IMPORTANT DISCLAIMER:".bold())?;
    writeln!(out, "This prediction is for educational purposes only.")?;
    writeln!(
        out,
        "Always consult with healthcare professionals for medical advice."
    )?;
    writeln!(out, "{}", rule('='))?;
    Ok(())
}

/// Parting message for each way a session can end
pub fn write_farewell<W: Write>(out: &mut W, end: SessionEnd) -> io::Result<()> {
    match end {
        SessionEnd::Declined => {
            writeln!(out)?;
            writeln!(out, "Thank you for using Heart Disease Prediction System!")
        }
        SessionEnd::Interrupted | SessionEnd::InputClosed => {
            writeln!(out)?;
            writeln!(out, "Goodbye!")
        }
    }
}
