//! Line input boundary.
//!
//! Reads block indefinitely, so they run on a dedicated thread that forwards
//! each completed line to the session controller.

use std::io::{BufRead, BufReader, Stdin};
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// A blocking source of completed command lines.
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// What the reader thread observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Closed,
    Failed(String),
}

pub struct StdinLines {
    reader: BufReader<Stdin>,
}

impl StdinLines {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(std::io::stdin()),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLines {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).context("read stdin")?;
        if n == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Spawn a thread that reads `source` until end of input.
///
/// `emit` returns false once nobody is listening, which stops the thread after
/// its current read.
pub fn spawn_line_reader<S, F>(mut source: S, emit: F) -> thread::JoinHandle<()>
where
    S: LineSource + 'static,
    F: Fn(InputEvent) -> bool + Send + 'static,
{
    thread::spawn(move || {
        loop {
            let event = match source.next_line() {
                Ok(Some(line)) => InputEvent::Line(line),
                Ok(None) => {
                    debug!("input closed");
                    emit(InputEvent::Closed);
                    return;
                }
                Err(err) => {
                    warn!(err = %err, "input source failed");
                    emit(InputEvent::Failed(format!("{err:#}")));
                    return;
                }
            };
            if !emit(event) {
                debug!("session gone, stopping line reader");
                return;
            }
        }
    })
}
