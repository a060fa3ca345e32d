//! Operator input sources
//!
//! The session reads one line per prompt through [`LineSource`]. The
//! terminal source wraps `rustyline` so Ctrl-C and Ctrl-D arrive as
//! [`Line::Interrupted`] and [`Line::Closed`] instead of killing the
//! process mid-prompt.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;

use super::SessionError;

/// Result of one read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A submitted line, without the trailing newline
    Text(String),
    /// The operator pressed Ctrl-C
    Interrupted,
    /// End of input (Ctrl-D or closed stdin)
    Closed,
}

/// Blocking source of operator input lines
pub trait LineSource {
    /// Show `prompt` and block until the operator submits a line
    fn read_line(&mut self, prompt: &str) -> Result<Line, SessionError>;
}

/// Interactive terminal input with line editing
pub struct TerminalInput {
    editor: DefaultEditor,
}

impl TerminalInput {
    pub fn new() -> Result<Self, SessionError> {
        let editor = DefaultEditor::new().map_err(|e| SessionError::Input(e.to_string()))?;
        Ok(Self { editor })
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<Line, SessionError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Line::Text(line)),
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => Ok(Line::Closed),
            Err(err) => Err(SessionError::Input(err.to_string())),
        }
    }
}

/// Pre-recorded input, for driving a session without a terminal
///
/// Yields the queued lines in order, then reports [`Line::Closed`]. Every
/// prompt shown is recorded.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<Line>,
    pub prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|s| Line::Text(s.into())).collect(),
            prompts: Vec::new(),
        }
    }

    /// Queue an interrupt after the lines given so far
    pub fn then_interrupt(mut self) -> Self {
        self.lines.push_back(Line::Interrupted);
        self
    }

    /// Lines not yet consumed
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Line, SessionError> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().unwrap_or(Line::Closed))
    }
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self, prompt: &str) -> Result<Line, SessionError> {
        (**self).read_line(prompt)
    }
}
