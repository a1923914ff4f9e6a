//! Countdown device phase machine.
//!
//! `Inactive -> Armed -> {Defused | Detonated}`. The two terminal phases are
//! absorbing and mutually exclusive. Every transition out of `Armed` is one
//! compare-and-swap on the phase byte, shared by the interpreter's defuse
//! handler and the countdown thread's expiry check, so exactly one of them can
//! win.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::core::types::{CommandError, Precondition};

/// Code that defuses the device unless configured otherwise.
pub const DEFAULT_SECRET_CODE: &str = "1-4-1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Inactive = 0,
    Armed = 1,
    Defused = 2,
    Detonated = 3,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Defused | Phase::Detonated)
    }

    fn from_u8(value: u8) -> Phase {
        match value {
            x if x == Phase::Armed as u8 => Phase::Armed,
            x if x == Phase::Defused as u8 => Phase::Defused,
            x if x == Phase::Detonated as u8 => Phase::Detonated,
            _ => Phase::Inactive,
        }
    }
}

/// When the device was armed and for how long. Written once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arming {
    pub armed_at: Instant,
    pub duration: Duration,
}

impl Arming {
    pub fn deadline(&self) -> Instant {
        self.armed_at + self.duration
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline().saturating_duration_since(now)
    }
}

/// How a correct code played out against the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefuseOutcome {
    /// The device is defused; carries the time that was left.
    Defused { remaining: Duration },
    /// The deadline had passed, so the device detonated instead.
    Expired,
}

/// Shared hazard state. Only `phase` changes after arming.
#[derive(Debug)]
pub struct Hazard {
    phase: AtomicU8,
    arming: OnceLock<Arming>,
    secret_code: String,
}

impl Default for Hazard {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_CODE)
    }
}

impl Hazard {
    pub fn new(secret_code: impl Into<String>) -> Self {
        Self {
            phase: AtomicU8::new(Phase::Inactive as u8),
            arming: OnceLock::new(),
            secret_code: secret_code.into(),
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn arming(&self) -> Option<Arming> {
        self.arming.get().copied()
    }

    /// Arm the device with a deadline of `now + duration`.
    ///
    /// A second call is a strict no-op: the duration is never re-rolled.
    pub fn arm(&self, now: Instant, duration: Duration) -> Result<Arming, Precondition> {
        match self.phase() {
            Phase::Inactive => {}
            Phase::Armed => return Err(Precondition::AlreadyArmed),
            Phase::Defused | Phase::Detonated => return Err(Precondition::AlreadyResolved),
        }
        let arming = Arming {
            armed_at: now,
            duration,
        };
        if self.arming.set(arming).is_err() || !self.transition(Phase::Inactive, Phase::Armed) {
            return Err(Precondition::AlreadyArmed);
        }
        info!(duration_secs = duration.as_secs(), "device armed");
        Ok(arming)
    }

    /// Detonate if the deadline has passed and the device is still armed.
    ///
    /// Returns true only for the caller that performed the transition.
    pub fn expire_if_due(&self, now: Instant) -> bool {
        let Some(arming) = self.arming() else {
            return false;
        };
        if now < arming.deadline() {
            return false;
        }
        let won = self.transition(Phase::Armed, Phase::Detonated);
        if won {
            info!("device detonated");
        }
        won
    }

    /// Attempt to defuse with `code`.
    ///
    /// A wrong code leaves the device armed. A correct code submitted at or
    /// after the deadline, or beaten by the countdown thread, loses to expiry
    /// and yields [`DefuseOutcome::Expired`].
    pub fn try_defuse(&self, code: &str, now: Instant) -> Result<DefuseOutcome, CommandError> {
        let arming = match (self.phase(), self.arming()) {
            (Phase::Armed, Some(arming)) => arming,
            _ => return Err(Precondition::NoActiveDevice.into()),
        };
        if code.trim() != self.secret_code {
            debug!("incorrect defuse code");
            return Err(CommandError::IncorrectCode);
        }
        if self.expire_if_due(now) {
            return Ok(DefuseOutcome::Expired);
        }
        if self.transition(Phase::Armed, Phase::Defused) {
            info!("device defused");
            return Ok(DefuseOutcome::Defused {
                remaining: arming.remaining(now),
            });
        }
        debug!(phase = ?self.phase(), "defuse lost the race");
        match self.phase() {
            Phase::Detonated => Ok(DefuseOutcome::Expired),
            Phase::Inactive | Phase::Armed | Phase::Defused => {
                Err(Precondition::NoActiveDevice.into())
            }
        }
    }

    fn transition(&self, from: Phase, to: Phase) -> bool {
        self.phase
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
