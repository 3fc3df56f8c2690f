//! Input and output seams for the shell loop.
//!
//! The kernel core never touches a console directly. A [`LineReader`]
//! supplies raw command lines (and surfaces cancellation), a
//! [`TerminalSink`] receives user-facing text. Console, TTY, and remote
//! transports all live behind these traits.

use std::collections::VecDeque;

use novakern_types::Result;

/// What a blocking line read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One full raw command line, without the trailing newline.
    Line(String),
    /// A cancellation request was observed (and consumed).
    Cancelled,
    /// The input source is exhausted.
    Eof,
}

/// Blocking line input for one shell loop.
pub trait LineReader {
    /// Read the next raw command line, showing `prompt` where applicable.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;
}

/// Receives user-facing output lines.
pub trait TerminalSink {
    /// Print one line of text.
    fn print_line(&mut self, line: &str);
}

/// A reader that replays a fixed script of lines, then reports EOF.
///
/// Used by tests and by scripted kernel sessions.
pub struct ScriptedReader {
    lines: VecDeque<String>,
}

impl ScriptedReader {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        match self.lines.pop_front() {
            Some(line) => Ok(ReadOutcome::Line(line)),
            None => Ok(ReadOutcome::Eof),
        }
    }
}

/// A sink that buffers everything printed, for inspection.
#[derive(Default)]
pub struct BufferSink {
    lines: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line printed so far, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any printed line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl TerminalSink for BufferSink {
    fn print_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
