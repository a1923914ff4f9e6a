//! Interpreter-owned session state.
//!
//! Never shared with the countdown thread. Every mutation goes through the
//! methods below so cwd, history and milestone changes happen at one call
//! boundary.

use crate::core::types::Milestone;

/// Monotonic milestone flags: once reached, never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Milestones {
    mission_started: bool,
    intel_acquired: bool,
    bomb_engaged: bool,
}

impl Milestones {
    pub fn is_reached(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::MissionStarted => self.mission_started,
            Milestone::IntelAcquired => self.intel_acquired,
            Milestone::BombEngaged => self.bomb_engaged,
        }
    }

    /// Flip `milestone` to reached. Returns true only on the first call.
    pub fn reach(&mut self, milestone: Milestone) -> bool {
        let flag = match milestone {
            Milestone::MissionStarted => &mut self.mission_started,
            Milestone::IntelAcquired => &mut self.intel_acquired,
            Milestone::BombEngaged => &mut self.bomb_engaged,
        };
        let newly = !*flag;
        *flag = true;
        newly
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    cwd: Vec<String>,
    history: Vec<String>,
    milestones: Milestones,
    exit_requested: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path components from the root.
    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    pub fn milestones_mut(&mut self) -> &mut Milestones {
        &mut self.milestones
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn record(&mut self, raw_line: &str) {
        self.history.push(raw_line.to_string());
    }

    /// Descend into `name`. Callers resolve the directory first.
    pub fn enter(&mut self, name: &str) {
        self.cwd.push(name.to_string());
    }

    /// Pop one level. Returns false at the root.
    pub fn leave(&mut self) -> bool {
        self.cwd.pop().is_some()
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}
