//! Shared types for the interpreter core.
//!
//! Errors here are recovered locally: each renders as one line of output and
//! the session continues.

use thiserror::Error;

/// A command failed without changing session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0}")]
    NotFound(NotFoundTarget),
    #[error("usage: {0}")]
    InvalidArgs(&'static str),
    #[error("unknown command: '{0}'. Try 'help' if you're lost, Agent.")]
    UnknownCommand(String),
    #[error("{0}")]
    PreconditionFailed(Precondition),
    #[error("incorrect code! Recheck your intel and try again.")]
    IncorrectCode,
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundTarget {
    #[error("directory not found.")]
    CurrentDirectory,
    #[error("no such directory: {0}")]
    Directory(String),
    #[error("no such file: {0}")]
    File(String),
}

/// A command was valid but not applicable in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("already at root directory.")]
    AlreadyAtRoot,
    #[error("you can only arm the device within the 'bomb_module' directory.")]
    OutsideBombModule,
    #[error("device already armed!")]
    AlreadyArmed,
    #[error("device already resolved.")]
    AlreadyResolved,
    #[error("there is no active device to defuse!")]
    NoActiveDevice,
}

impl From<Precondition> for CommandError {
    fn from(value: Precondition) -> Self {
        Self::PreconditionFailed(value)
    }
}

impl From<NotFoundTarget> for CommandError {
    fn from(value: NotFoundTarget) -> Self {
        Self::NotFound(value)
    }
}

/// One-shot narrative progress flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    MissionStarted,
    IntelAcquired,
    BombEngaged,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [
        Milestone::MissionStarted,
        Milestone::IntelAcquired,
        Milestone::BombEngaged,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Milestone::MissionStarted => "Mission Brief Read",
            Milestone::IntelAcquired => "Intel Acquired",
            Milestone::BombEngaged => "Bomb Activated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_as_single_lines() {
        let rendered = [
            CommandError::from(NotFoundTarget::Directory("vault".to_string())).to_string(),
            CommandError::InvalidArgs("cat <file>").to_string(),
            CommandError::from(Precondition::NoActiveDevice).to_string(),
            CommandError::IncorrectCode.to_string(),
        ];
        assert_eq!(rendered[0], "no such directory: vault");
        assert_eq!(rendered[1], "usage: cat <file>");
        assert!(rendered[2].contains("no active device"));
        assert!(rendered.iter().all(|line| !line.contains('\n')));
    }
}
