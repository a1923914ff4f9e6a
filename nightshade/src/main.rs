//! Spy-terminal session engine.
//!
//! Browse a virtual file system, gather intel, and defuse the device before
//! the countdown runs out.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use nightshade::core::namespace::{build, validate_namespace};
use nightshade::exit_codes;
use nightshade::io::config::{CountdownConfig, DEFAULT_CONFIG_PATH, NightshadeConfig, load_config};
use nightshade::io::input::StdinLines;
use nightshade::io::sink::StdoutSink;
use nightshade::logging;
use nightshade::session::run_session;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "nightshade",
    version,
    about = "Interactive spy terminal with a ticking device"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive session on stdin/stdout.
    Play {
        /// Config file (TOML). Missing files fall back to defaults.
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Use a fixed countdown of this many seconds.
        #[arg(long)]
        countdown_secs: Option<u64>,
        /// Skip the welcome text.
        #[arg(long)]
        quiet_intro: bool,
    },
    /// Validate the config and the built-in namespace.
    Check {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            config,
            countdown_secs,
            quiet_intro,
        } => cmd_play(&config, countdown_secs, quiet_intro),
        Command::Check { config } => cmd_check(&config),
    }
}

fn cmd_play(config_path: &Path, countdown_secs: Option<u64>, quiet_intro: bool) -> Result<i32> {
    let cfg = play_config(load_config(config_path)?, countdown_secs, quiet_intro)?;
    debug!(?cfg, "starting session");
    let mut sink = StdoutSink;
    let end = run_session(&cfg, StdinLines::new(), &mut sink)?;
    Ok(end.outcome.exit_code())
}

fn cmd_check(config_path: &Path) -> Result<i32> {
    load_config(config_path)?;
    let errors = validate_namespace(&build());
    if !errors.is_empty() {
        bail!("namespace violations:\n- {}", errors.join("\n- "));
    }
    println!("ok");
    Ok(exit_codes::OK)
}

/// Apply CLI overrides on top of the loaded config.
fn play_config(
    mut cfg: NightshadeConfig,
    countdown_secs: Option<u64>,
    quiet_intro: bool,
) -> Result<NightshadeConfig> {
    if let Some(secs) = countdown_secs {
        cfg.countdown = CountdownConfig {
            tick_millis: cfg.countdown.tick_millis,
            ..CountdownConfig::fixed(secs)
        };
    }
    if quiet_intro {
        cfg.intro = false;
    }
    cfg.validate()?;
    Ok(cfg)
}
