//! Test-only input sources and sinks.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::config::{NightshadeConfig, write_config};
use crate::io::input::LineSource;
use crate::io::sink::Sink;

/// What a scripted source does once its lines run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterScript {
    /// Report end of input.
    Close,
    /// Block forever, like a terminal nobody types into.
    Block,
    /// Fail with the given message.
    Fail(String),
}

/// Input source that replays lines, each after an optional delay.
#[derive(Debug)]
pub struct ScriptedLines {
    lines: VecDeque<(Duration, String)>,
    after: AfterScript,
}

impl ScriptedLines {
    pub fn new(lines: Vec<(Duration, String)>, after: AfterScript) -> Self {
        Self {
            lines: lines.into(),
            after,
        }
    }

    /// Replay `lines` immediately, then report end of input.
    pub fn closing<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(immediate(lines), AfterScript::Close)
    }

    /// Replay `lines` immediately, then block forever.
    pub fn blocking<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(immediate(lines), AfterScript::Block)
    }

    /// Fail on the first read.
    pub fn failing(message: &str) -> Self {
        Self::new(Vec::new(), AfterScript::Fail(message.to_string()))
    }
}

fn immediate<I, T>(lines: I) -> Vec<(Duration, String)>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    lines
        .into_iter()
        .map(|line| (Duration::ZERO, line.into()))
        .collect()
}

impl LineSource for ScriptedLines {
    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some((delay, line)) = self.lines.pop_front() {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            return Ok(Some(line));
        }
        match &self.after {
            AfterScript::Close => Ok(None),
            AfterScript::Fail(message) => Err(anyhow!("{message}")),
            AfterScript::Block => loop {
                thread::park();
            },
        }
    }
}

/// Sink that records everything it is given.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    pub lines: Vec<String>,
    pub prompts: Vec<String>,
    pub statuses: Vec<String>,
}

impl Sink for RecordingSink {
    fn present(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn prompt(&mut self, prompt: &str) {
        self.prompts.push(prompt.to_string());
    }

    fn status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }
}

/// A config file written into its own temporary directory.
pub struct TempConfig {
    _dir: TempDir,
    path: PathBuf,
}

impl TempConfig {
    pub fn new(cfg: &NightshadeConfig) -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let path = dir.path().join("nightshade.toml");
        write_config(&path, cfg)?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
