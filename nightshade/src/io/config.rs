//! Session configuration stored in `nightshade.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "nightshade.toml";

/// Session configuration (TOML).
///
/// Missing fields default to the values of the original game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NightshadeConfig {
    /// Show the welcome text before the first prompt.
    pub intro: bool,

    pub countdown: CountdownConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CountdownConfig {
    /// Shortest countdown, in seconds, drawn when the device is armed.
    pub min_secs: u64,

    /// Longest countdown, in seconds (inclusive).
    pub max_secs: u64,

    /// Interval between countdown checks and remaining-time updates.
    pub tick_millis: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            min_secs: 20,
            max_secs: 30,
            tick_millis: 1000,
        }
    }
}

impl Default for NightshadeConfig {
    fn default() -> Self {
        Self {
            intro: true,
            countdown: CountdownConfig::default(),
        }
    }
}

impl CountdownConfig {
    /// Fixed countdown of exactly `secs` seconds.
    pub fn fixed(secs: u64) -> Self {
        Self {
            min_secs: secs,
            max_secs: secs,
            ..Self::default()
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Draw a countdown uniformly from `[min_secs, max_secs]`.
    pub fn sample_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_secs(rng.gen_range(self.min_secs..=self.max_secs))
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_secs == 0 {
            return Err(anyhow!("countdown.min_secs must be > 0"));
        }
        if self.min_secs > self.max_secs {
            return Err(anyhow!(
                "countdown.min_secs ({}) must be <= countdown.max_secs ({})",
                self.min_secs,
                self.max_secs
            ));
        }
        if self.tick_millis == 0 {
            return Err(anyhow!("countdown.tick_millis must be > 0"));
        }
        Ok(())
    }
}

impl NightshadeConfig {
    pub fn validate(&self) -> Result<()> {
        self.countdown.validate()
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `NightshadeConfig::default()`.
pub fn load_config(path: &Path) -> Result<NightshadeConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = NightshadeConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: NightshadeConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    debug!(path = %path.display(), ?cfg, "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &NightshadeConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, &buf)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
