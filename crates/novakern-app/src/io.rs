//! Console transport for the interactive binary.

use std::io::{self, BufRead, Write};

use novakern_shell::{LineReader, ReadOutcome, TerminalSink};
use novakern_types::{CancellationToken, Result};

/// Reads lines from standard input, honoring the cancellation token.
pub struct StdinReader {
    cancel: CancellationToken,
}

impl StdinReader {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

impl LineReader for StdinReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        // A request raised while a command was running is consumed here,
        // before the next blocking read.
        if self.cancel.observe() {
            return Ok(ReadOutcome::Cancelled);
        }

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(ReadOutcome::Eof);
        }
        Ok(ReadOutcome::Line(
            line.trim_end_matches(['\n', '\r']).to_string(),
        ))
    }
}

/// Prints shell output to standard output.
#[derive(Default)]
pub struct StdoutSink;

impl TerminalSink for StdoutSink {
    fn print_line(&mut self, line: &str) {
        println!("{line}");
    }
}
