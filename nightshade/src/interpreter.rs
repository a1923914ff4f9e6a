//! Line-oriented command interpreter.
//!
//! [`Interpreter::handle_line`] records the raw line, splits it on `|` and
//! runs each segment in order against the namespace (read-only) or the hazard
//! (state-changing), returning the lines to present.

use std::time::Instant;

use tracing::debug;

use crate::core::command::{Command, parse_segment, split_segments};
use crate::core::hazard::{DefuseOutcome, Hazard, Phase};
use crate::core::namespace::{
    BOMB_MODULE_DIR, INTEL_DIR, INTEL_DOCUMENT, MISSIONS_DIR, NamespaceNode,
};
use crate::core::path::{PARENT, display_path, resolve};
use crate::core::session::SessionState;
use crate::core::types::{CommandError, Milestone, NotFoundTarget, Precondition};
use crate::io::config::CountdownConfig;

const HELP: [&str; 10] = [
    "Commands:",
    "  ls                    : List directories and files.",
    "  cd <dir>              : Change directory (use '..' to go up).",
    "  cat <file>            : Read a file's contents.",
    "  grep <pattern> <file> : Search for a literal pattern in a file.",
    "  history               : Display command history.",
    "  arm                   : Activate the device (only in bomb_module).",
    "  defuse <code>         : Attempt to defuse the device.",
    "  status                : Show mission status.",
    "  exit                  : Quit the session.",
];

pub struct Interpreter {
    root: NamespaceNode,
    countdown: CountdownConfig,
}

impl Interpreter {
    pub fn new(root: NamespaceNode, countdown: CountdownConfig) -> Self {
        Self { root, countdown }
    }

    pub fn root(&self) -> &NamespaceNode {
        &self.root
    }

    /// Prompt shown before each read, e.g. `spy@terminal:/missions$ `.
    pub fn prompt(&self, state: &SessionState) -> String {
        format!("spy@terminal:{}$ ", display_path(state.cwd()))
    }

    pub fn intro(&self) -> Vec<String> {
        vec![
            "Welcome, Agent. You have been entrusted with Operation NIGHTSHADE.".to_string(),
            "Your mission: extract the secret intel and neutralize the imminent bomb threat."
                .to_string(),
            "Type 'help' for your command list. Pay close attention to file contents and logs for vital clues."
                .to_string(),
        ]
    }

    pub fn handle_line(
        &self,
        state: &mut SessionState,
        hazard: &Hazard,
        raw_line: &str,
    ) -> Vec<String> {
        self.handle_line_at(state, hazard, raw_line, Instant::now())
    }

    /// Like [`Interpreter::handle_line`] with an explicit clock reading.
    ///
    /// Blank lines are ignored and not recorded. Segments after the session
    /// has ended (exit requested or device resolved) are not run.
    pub fn handle_line_at(
        &self,
        state: &mut SessionState,
        hazard: &Hazard,
        raw_line: &str,
        now: Instant,
    ) -> Vec<String> {
        let line = raw_line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        state.record(line);

        let mut output = Vec::new();
        for segment in split_segments(line) {
            if state.exit_requested() || hazard.phase().is_terminal() {
                debug!(segment, "session over, skipping segment");
                break;
            }
            let result = parse_segment(segment)
                .and_then(|command| self.execute(command, state, hazard, now));
            match result {
                Ok(lines) => output.extend(lines),
                Err(err) => {
                    debug!(segment, err = %err, "command failed");
                    output.push(err.to_string());
                }
            }
        }
        output
    }

    fn execute(
        &self,
        command: Command,
        state: &mut SessionState,
        hazard: &Hazard,
        now: Instant,
    ) -> Result<Vec<String>, CommandError> {
        match command {
            Command::Help => Ok(HELP.iter().map(|line| (*line).to_string()).collect()),
            Command::Ls => self.ls(state),
            Command::Cd { target } => self.cd(state, &target),
            Command::Cat { name } => self.cat(state, &name),
            Command::Grep { pattern, name } => self.grep(state, &pattern, &name),
            Command::History => Ok(history(state)),
            Command::Arm => self.arm(state, hazard, now),
            Command::Defuse { code } => defuse(hazard, code.as_deref(), now),
            Command::Status => Ok(status(state)),
            Command::Exit => {
                state.request_exit();
                Ok(vec!["Goodbye, Agent. Stay vigilant!".to_string()])
            }
        }
    }

    fn ls(&self, state: &SessionState) -> Result<Vec<String>, CommandError> {
        let no_target: [&str; 0] = [];
        let children = resolve(&self.root, state.cwd(), &no_target)
            .ok()
            .and_then(NamespaceNode::children)
            .ok_or(NotFoundTarget::CurrentDirectory)?;
        if children.is_empty() {
            return Ok(vec!["(empty)".to_string()]);
        }
        let entries: Vec<String> = children
            .values()
            .map(|child| {
                if child.is_directory() {
                    format!("{}/", child.name())
                } else {
                    child.name().to_string()
                }
            })
            .collect();
        Ok(vec![entries.join("  ")])
    }

    fn cd(&self, state: &mut SessionState, target: &str) -> Result<Vec<String>, CommandError> {
        if target == PARENT {
            if !state.leave() {
                return Err(Precondition::AlreadyAtRoot.into());
            }
            return Ok(Vec::new());
        }
        let is_directory = resolve(&self.root, state.cwd(), &[target])
            .is_ok_and(NamespaceNode::is_directory);
        if !is_directory {
            return Err(NotFoundTarget::Directory(target.to_string()).into());
        }
        state.enter(target);
        Ok(entered_directory(state))
    }

    fn document<'a>(&'a self, state: &SessionState, name: &str) -> Result<&'a str, CommandError> {
        resolve(&self.root, state.cwd(), &[name])
            .ok()
            .and_then(NamespaceNode::content)
            .ok_or_else(|| NotFoundTarget::File(name.to_string()).into())
    }

    fn cat(&self, state: &mut SessionState, name: &str) -> Result<Vec<String>, CommandError> {
        let content = self.document(state, name)?;
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        let is_intel = state.cwd() == [INTEL_DIR] && name == INTEL_DOCUMENT;
        if is_intel && state.milestones_mut().reach(Milestone::IntelAcquired) {
            lines.push(
                "Intel acquired: The disarm code is hidden in our history. Review logs and use your intuition."
                    .to_string(),
            );
        }
        Ok(lines)
    }

    fn grep(
        &self,
        state: &SessionState,
        pattern: &str,
        name: &str,
    ) -> Result<Vec<String>, CommandError> {
        let content = self.document(state, name)?;
        let matches: Vec<String> = content
            .lines()
            .filter(|line| line.contains(pattern))
            .map(str::to_string)
            .collect();
        if matches.is_empty() {
            return Ok(vec!["no matches found.".to_string()]);
        }
        Ok(matches)
    }

    fn arm(
        &self,
        state: &mut SessionState,
        hazard: &Hazard,
        now: Instant,
    ) -> Result<Vec<String>, CommandError> {
        if state.cwd().last().map(String::as_str) != Some(BOMB_MODULE_DIR) {
            return Err(Precondition::OutsideBombModule.into());
        }
        let duration = self.countdown.sample_duration(&mut rand::thread_rng());
        let arming = hazard.arm(now, duration)?;
        state.milestones_mut().reach(Milestone::BombEngaged);
        Ok(vec![
            "*** ALERT: Device Activated ***".to_string(),
            format!(
                "You have {} seconds. Enter the code with 'defuse <code>'.",
                arming.duration.as_secs()
            ),
        ])
    }
}

/// Narrative side text for the directory just entered.
fn entered_directory(state: &mut SessionState) -> Vec<String> {
    let mut lines = Vec::new();
    let in_missions = state.cwd() == [MISSIONS_DIR];
    let in_bomb_module = state.cwd() == [BOMB_MODULE_DIR];
    if in_missions && state.milestones_mut().reach(Milestone::MissionStarted) {
        lines.push(
            "New Mission: Infiltrate enemy systems, secure classified intel, and neutralize the bomb threat."
                .to_string(),
        );
    } else if in_bomb_module {
        lines.push(
            "You are in the Bomb Module. To begin the sequence, type 'arm'.".to_string(),
        );
    }
    lines
}

fn history(state: &SessionState) -> Vec<String> {
    state
        .history()
        .iter()
        .enumerate()
        .map(|(idx, line)| format!("{}: {}", idx + 1, line))
        .collect()
}

/// The device must be armed before the code is even looked at. A correct code
/// that arrives too late prints nothing; the session reports the detonation.
fn defuse(
    hazard: &Hazard,
    code: Option<&str>,
    now: Instant,
) -> Result<Vec<String>, CommandError> {
    if hazard.phase() != Phase::Armed {
        return Err(Precondition::NoActiveDevice.into());
    }
    let code = code.ok_or(CommandError::InvalidArgs("defuse <code>"))?;
    let remaining = match hazard.try_defuse(code, now)? {
        DefuseOutcome::Defused { remaining } => remaining,
        DefuseOutcome::Expired => return Ok(Vec::new()),
    };
    Ok(vec![
        format!("Bomb defused with {} sec remaining!", remaining.as_secs()),
        "The enemy plot has been thwarted. Mission accomplished.".to_string(),
    ])
}

fn status(state: &SessionState) -> Vec<String> {
    let mut lines = vec!["----- Mission Status -----".to_string()];
    for milestone in Milestone::ALL {
        let flag = if state.milestones().is_reached(milestone) {
            "Yes"
        } else {
            "No"
        };
        lines.push(format!("{:<20}{}", format!("{}:", milestone.label()), flag));
    }
    lines.push("--------------------------".to_string());
    lines
}
