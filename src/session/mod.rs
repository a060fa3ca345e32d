//! Interactive assessment session
//!
//! The session is an explicit state machine:
//!
//! ```text
//! Collecting -> Validating -> (Collecting | Predicting) -> Displaying
//!     -> AskingToContinue -> (Collecting | Terminated)
//! ```
//!
//! Rejected input sends `Validating` back to `Collecting` for the same
//! field. An interrupt or end of input at any prompt moves straight to
//! `Terminated`; neither is an error.

pub mod input;
pub mod render;

use chrono::Local;
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::logistic::ModelError;
use crate::models::predictor::{PredictionResult, RiskPredictor};
use crate::patient::record::{Feature, PatientRecord, N_FEATURES};
use crate::patient::validation::{FieldError, FieldRanges};

pub use input::{Line, LineSource, ScriptedInput, TerminalInput};

const CONTINUE_PROMPT: &str = "Would you like to make another prediction? (y/n): ";

/// Failures that end a session abnormally
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read input: {0}")]
    Input(String),

    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),

    #[error("invalid patient record: {0}")]
    Record(#[from] FieldError),
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The operator answered "no" to another round
    Declined,
    /// Ctrl-C at a prompt
    Interrupted,
    /// Input ran out (Ctrl-D or closed stdin)
    InputClosed,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::Declined => f.write_str("operator declined another round"),
            SessionEnd::Interrupted => f.write_str("interrupted"),
            SessionEnd::InputClosed => f.write_str("input closed"),
        }
    }
}

/// Summary of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Assessments completed and displayed
    pub assessments: usize,
    pub end: SessionEnd,
}

/// Session states
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionState {
    /// Waiting for the value of field `next`
    Collecting {
        values: [f64; N_FEATURES],
        next: usize,
    },
    /// Checking the raw input for field `next`
    Validating {
        values: [f64; N_FEATURES],
        next: usize,
        input: String,
    },
    Predicting(PatientRecord),
    Displaying(PatientRecord, PredictionResult),
    AskingToContinue,
    Terminated(SessionEnd),
}

impl SessionState {
    fn start() -> Self {
        SessionState::Collecting {
            values: [0.0; N_FEATURES],
            next: 0,
        }
    }
}

/// Interactive loop around a fitted predictor
pub struct Session<'a, S: LineSource, W: Write> {
    predictor: &'a RiskPredictor,
    ranges: &'a FieldRanges,
    input: S,
    out: W,
    assessments: usize,
}

impl<'a, S: LineSource, W: Write> Session<'a, S, W> {
    pub fn new(predictor: &'a RiskPredictor, ranges: &'a FieldRanges, input: S, out: W) -> Self {
        Self {
            predictor,
            ranges,
            input,
            out,
            assessments: 0,
        }
    }

    /// Run assessments until the operator declines, interrupts or input ends
    pub fn run(&mut self) -> Result<SessionOutcome, SessionError> {
        render::write_assessment_header(&mut self.out)?;

        let mut state = SessionState::start();
        let end = loop {
            state = match self.step(state)? {
                SessionState::Terminated(end) => break end,
                next => next,
            };
        };

        render::write_farewell(&mut self.out, end)?;
        self.out.flush()?;
        info!(
            "Session ended ({}) after {} assessment(s)",
            end, self.assessments
        );

        Ok(SessionOutcome {
            assessments: self.assessments,
            end,
        })
    }

    /// Advance the state machine by one transition
    pub(crate) fn step(&mut self, state: SessionState) -> Result<SessionState, SessionError> {
        let next = match state {
            SessionState::Collecting { values, next } if next == N_FEATURES => {
                SessionState::Predicting(PatientRecord::new(values, self.ranges)?)
            }
            SessionState::Collecting { values, next } => {
                let feature = Feature::ALL[next];
                let prompt = format!("{}: ", feature.description());
                self.out.flush()?;
                match self.input.read_line(&prompt)? {
                    Line::Text(input) => SessionState::Validating {
                        values,
                        next,
                        input,
                    },
                    Line::Interrupted => SessionState::Terminated(SessionEnd::Interrupted),
                    Line::Closed => SessionState::Terminated(SessionEnd::InputClosed),
                }
            }
            SessionState::Validating {
                mut values,
                next,
                input,
            } => {
                let feature = Feature::ALL[next];
                match self.ranges.parse(feature, &input) {
                    Ok(value) => {
                        values[next] = value;
                        SessionState::Collecting {
                            values,
                            next: next + 1,
                        }
                    }
                    Err(err) => {
                        debug!("Rejected {:?} for {}: {}", input, feature.code(), err);
                        render::write_rejection(&mut self.out, &err.to_string())?;
                        SessionState::Collecting { values, next }
                    }
                }
            }
            SessionState::Predicting(record) => {
                let result = self.predictor.predict(&record)?;
                SessionState::Displaying(record, result)
            }
            SessionState::Displaying(record, result) => {
                render::write_result(&mut self.out, &record, &result, Local::now())?;
                self.assessments += 1;
                writeln!(self.out)?;
                SessionState::AskingToContinue
            }
            SessionState::AskingToContinue => {
                self.out.flush()?;
                match self.input.read_line(CONTINUE_PROMPT)? {
                    Line::Text(answer) => match answer.trim().to_lowercase().as_str() {
                        "y" | "yes" => {
                            render::write_assessment_header(&mut self.out)?;
                            SessionState::start()
                        }
                        "n" | "no" => SessionState::Terminated(SessionEnd::Declined),
                        _ => {
                            render::write_rejection(
                                &mut self.out,
                                "Please enter 'y' for yes or 'n' for no.",
                            )?;
                            SessionState::AskingToContinue
                        }
                    },
                    Line::Interrupted => SessionState::Terminated(SessionEnd::Interrupted),
                    Line::Closed => SessionState::Terminated(SessionEnd::InputClosed),
                }
            }
            SessionState::Terminated(end) => SessionState::Terminated(end),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;
    use crate::data::dataset::HeartDataset;
    use ndarray::{Array1, Array2};

    const SAMPLE: [&str; N_FEATURES] = [
        "45", "1", "0", "120", "200", "0", "0", "150", "0", "1.0", "1", "0", "2",
    ];

    fn fitted_predictor() -> RiskPredictor {
        let n = 40;
        let x = Array2::from_shape_fn((n, 13), |(i, j)| {
            let sick = i % 2 == 1;
            let jitter = (i / 2) as f64;
            match j {
                0 => if sick { 60.0 + jitter } else { 40.0 + jitter },
                7 => if sick { 120.0 + jitter } else { 170.0 - jitter },
                _ => 1.0,
            }
        });
        let y = Array1::from_shape_fn(n, |i| (i % 2) as f64);

        let mut predictor = RiskPredictor::new(TrainingConfig::default());
        predictor.fit(&HeartDataset::new(x, y)).unwrap();
        predictor
    }

    fn run_script(input: ScriptedInput) -> (SessionOutcome, ScriptedInput, String) {
        let predictor = fitted_predictor();
        let ranges = FieldRanges::default();
        let mut input = input;
        let mut out = Vec::new();

        let outcome = Session::new(&predictor, &ranges, &mut input, &mut out)
            .run()
            .unwrap();
        (outcome, input, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_assessment_then_decline() {
        let lines = SAMPLE.iter().copied().chain(["n"]);
        let (outcome, input, text) = run_script(ScriptedInput::new(lines));

        assert_eq!(
            outcome,
            SessionOutcome {
                assessments: 1,
                end: SessionEnd::Declined
            }
        );
        assert_eq!(input.prompts.len(), N_FEATURES + 1);
        assert!(text.contains("ASSESSMENT RESULTS"));
        assert!(text.contains("Thank you"));
    }

    #[test]
    fn test_invalid_input_reprompts_same_field() {
        let lines = ["abc", "0", "121", "45.5", "45"]
            .into_iter()
            .chain(SAMPLE[1..].iter().copied())
            .chain(["no"]);
        let (outcome, input, text) = run_script(ScriptedInput::new(lines));

        assert_eq!(outcome.assessments, 1);
        let age_prompt = format!("{}: ", Feature::Age.description());
        assert_eq!(input.prompts.iter().filter(|p| **p == age_prompt).count(), 5);
        assert!(text.contains("Please enter a valid number"));
        assert!(text.contains("Please enter a value between 1 and 120"));
        assert!(text.contains("Please enter a whole number"));
    }

    #[test]
    fn test_continue_prompt_requires_yes_or_no() {
        let lines = SAMPLE
            .iter()
            .copied()
            .chain(["maybe", " YES "])
            .chain(SAMPLE.iter().copied())
            .chain(["N"]);
        let (outcome, input, text) = run_script(ScriptedInput::new(lines));

        assert_eq!(outcome.assessments, 2);
        assert_eq!(outcome.end, SessionEnd::Declined);
        assert_eq!(input.remaining(), 0);
        assert!(text.contains("Please enter 'y' for yes or 'n' for no."));
    }

    #[test]
    fn test_interrupt_mid_record_is_graceful() {
        let input = ScriptedInput::new(SAMPLE[..5].iter().copied()).then_interrupt();
        let (outcome, _, text) = run_script(input);

        assert_eq!(
            outcome,
            SessionOutcome {
                assessments: 0,
                end: SessionEnd::Interrupted
            }
        );
        assert!(!text.contains("ASSESSMENT RESULTS"));
        assert!(text.contains("Goodbye!"));
    }

    #[test]
    fn test_closed_input_at_continue_prompt() {
        let (outcome, _, _) = run_script(ScriptedInput::new(SAMPLE.iter().copied()));

        assert_eq!(
            outcome,
            SessionOutcome {
                assessments: 1,
                end: SessionEnd::InputClosed
            }
        );
    }

    #[test]
    fn test_last_field_moves_to_prediction_without_prompting() {
        let predictor = fitted_predictor();
        let ranges = FieldRanges::default();
        let mut input = ScriptedInput::default();
        let mut session = Session::new(&predictor, &ranges, &mut input, Vec::new());

        let values = [45.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 1.0, 0.0, 2.0];
        let next = session
            .step(SessionState::Collecting {
                values,
                next: N_FEATURES,
            })
            .unwrap();

        assert!(matches!(next, SessionState::Predicting(_)));
        drop(session);
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_rejected_value_does_not_advance_state() {
        let predictor = fitted_predictor();
        let ranges = FieldRanges::default();
        let mut session = Session::new(&predictor, &ranges, ScriptedInput::default(), Vec::new());

        let state = SessionState::Validating {
            values: [0.0; N_FEATURES],
            next: 3,
            input: "301".to_string(),
        };
        let next = session.step(state).unwrap();

        assert_eq!(
            next,
            SessionState::Collecting {
                values: [0.0; N_FEATURES],
                next: 3
            }
        );
    }
}
