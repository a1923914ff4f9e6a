//! Presentation boundary: displays text in the order received.

use std::io::{self, Write};

use tracing::warn;

pub trait Sink {
    /// Display one line of session output.
    fn present(&mut self, line: &str);

    /// Show the input prompt (no trailing newline).
    fn prompt(&mut self, prompt: &str);

    /// Update the countdown indicator. Cosmetic; may be dropped.
    fn status(&mut self, text: &str);
}

/// Writes to the process stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn present(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(err) = writeln!(out, "{line}") {
            warn!(err = %err, "failed to write output");
        }
    }

    fn prompt(&mut self, prompt: &str) {
        let mut out = io::stdout().lock();
        if let Err(err) = write!(out, "{prompt}").and_then(|()| out.flush()) {
            warn!(err = %err, "failed to write prompt");
        }
    }

    fn status(&mut self, text: &str) {
        let mut out = io::stdout().lock();
        // Overwrite in place so the indicator does not scroll the session.
        if let Err(err) = write!(out, "\r{text} ").and_then(|()| out.flush()) {
            warn!(err = %err, "failed to write countdown status");
        }
    }
}
