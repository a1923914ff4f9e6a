//! Session controller: the read-eval loop.
//!
//! Input lines and countdown events arrive on one channel, so a detonation can
//! end the session while the user is still typing. The controller is the only
//! consumer of that channel and the only writer to the sink.

use std::sync::Arc;
use std::sync::mpsc;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument, warn};

use crate::core::hazard::{Hazard, Phase};
use crate::core::namespace::build;
use crate::core::session::SessionState;
use crate::exit_codes;
use crate::interpreter::Interpreter;
use crate::io::config::NightshadeConfig;
use crate::io::countdown::{CountdownEvent, spawn_countdown};
use crate::io::input::{InputEvent, LineSource, spawn_line_reader};
use crate::io::sink::Sink;

const DETONATION_MESSAGE: &str = "BOOM! The bomb exploded! Mission Failed.";
const INPUT_CLOSED_MESSAGE: &str = "Exiting SpyTerminal. Stay safe, Agent.";

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user ran `exit`.
    Exited,
    /// The input source reached end of input.
    InputClosed,
    /// The device was defused.
    Defused,
    /// The device detonated.
    Detonated,
}

impl SessionOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            SessionOutcome::Exited | SessionOutcome::InputClosed | SessionOutcome::Defused => {
                exit_codes::OK
            }
            SessionOutcome::Detonated => exit_codes::DETONATED,
        }
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnd {
    pub outcome: SessionOutcome,
    pub state: SessionState,
}

enum SessionEvent {
    Input(InputEvent),
    Countdown(CountdownEvent),
}

/// Run one session until exit, end of input, defusal or detonation.
///
/// Returns an error only when the input source fails.
#[instrument(skip_all, fields(intro = config.intro))]
pub fn run_session<L, S>(config: &NightshadeConfig, source: L, sink: &mut S) -> Result<SessionEnd>
where
    L: LineSource + 'static,
    S: Sink + ?Sized,
{
    let interpreter = Interpreter::new(build(), config.countdown.clone());
    let hazard = Arc::new(Hazard::default());
    let mut state = SessionState::new();

    let (tx, rx) = mpsc::channel();
    let input_tx = tx.clone();
    spawn_line_reader(source, move |event| {
        input_tx.send(SessionEvent::Input(event)).is_ok()
    });

    if config.intro {
        for line in interpreter.intro() {
            sink.present(&line);
        }
    }
    sink.prompt(&interpreter.prompt(&state));

    let mut countdown_started = false;
    loop {
        // `tx` stays alive in this scope, so the channel never disconnects.
        let event = rx.recv().context("session event channel closed")?;
        match event {
            SessionEvent::Input(InputEvent::Line(line)) => {
                debug!(line = %line, "handling line");
                for out in interpreter.handle_line(&mut state, &hazard, &line) {
                    sink.present(&out);
                }
                if !countdown_started && hazard.phase() == Phase::Armed {
                    countdown_started = true;
                    let countdown_tx = tx.clone();
                    spawn_countdown(Arc::clone(&hazard), config.countdown.tick(), move |event| {
                        countdown_tx.send(SessionEvent::Countdown(event)).is_ok()
                    });
                }
                if let Some(outcome) = finished(&state, &hazard) {
                    if outcome == SessionOutcome::Detonated {
                        sink.present(DETONATION_MESSAGE);
                    }
                    return Ok(end(outcome, state));
                }
                sink.prompt(&interpreter.prompt(&state));
            }
            SessionEvent::Input(InputEvent::Closed) => {
                sink.present("");
                sink.present(INPUT_CLOSED_MESSAGE);
                return Ok(end(SessionOutcome::InputClosed, state));
            }
            SessionEvent::Input(InputEvent::Failed(err)) => {
                warn!(err = %err, "input source failed");
                bail!("read input: {err}");
            }
            SessionEvent::Countdown(CountdownEvent::Tick { remaining }) => {
                if hazard.phase() == Phase::Armed {
                    sink.status(&format!("Time left: {} sec", remaining.as_secs()));
                }
            }
            SessionEvent::Countdown(CountdownEvent::Detonated) => {
                sink.present("");
                sink.present(DETONATION_MESSAGE);
                return Ok(end(SessionOutcome::Detonated, state));
            }
        }
    }
}

/// Terminal condition after a handled line, if any.
fn finished(state: &SessionState, hazard: &Hazard) -> Option<SessionOutcome> {
    match hazard.phase() {
        Phase::Defused => return Some(SessionOutcome::Defused),
        Phase::Detonated => return Some(SessionOutcome::Detonated),
        Phase::Inactive | Phase::Armed => {}
    }
    state.exit_requested().then_some(SessionOutcome::Exited)
}

fn end(outcome: SessionOutcome, state: SessionState) -> SessionEnd {
    info!(?outcome, lines = state.history().len(), "session ended");
    SessionEnd { outcome, state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::CountdownConfig;
    use crate::test_support::{RecordingSink, ScriptedLines};

    fn config(secs: u64) -> NightshadeConfig {
        NightshadeConfig {
            intro: false,
            countdown: CountdownConfig {
                tick_millis: 10,
                ..CountdownConfig::fixed(secs)
            },
        }
    }

    #[test]
    fn exit_ends_session_and_skips_later_lines() {
        let mut sink = RecordingSink::default();
        let source = ScriptedLines::closing(["ls", "exit", "cd intel"]);
        let end = run_session(&config(5), source, &mut sink).expect("session");

        assert_eq!(end.outcome, SessionOutcome::Exited);
        assert_eq!(end.state.history(), ["ls", "exit"]);
        assert_eq!(
            sink.lines.last().map(String::as_str),
            Some("Goodbye, Agent. Stay vigilant!")
        );
    }

    #[test]
    fn end_of_input_is_a_normal_termination() {
        let mut sink = RecordingSink::default();
        let end = run_session(&config(5), ScriptedLines::closing(["ls"]), &mut sink)
            .expect("session");
        assert_eq!(end.outcome, SessionOutcome::InputClosed);
        assert_eq!(end.outcome.exit_code(), exit_codes::OK);
        assert_eq!(sink.lines.last().map(String::as_str), Some(INPUT_CLOSED_MESSAGE));
    }

    #[test]
    fn prompt_follows_cwd() {
        let mut sink = RecordingSink::default();
        run_session(
            &config(5),
            ScriptedLines::closing(["cd missions", "cd .."]),
            &mut sink,
        )
        .expect("session");
        assert_eq!(
            sink.prompts,
            vec![
                "spy@terminal:/$ ",
                "spy@terminal:/missions$ ",
                "spy@terminal:/$ ",
            ]
        );
    }

    #[test]
    fn intro_is_presented_when_enabled() {
        let mut sink = RecordingSink::default();
        let cfg = NightshadeConfig {
            intro: true,
            ..config(5)
        };
        run_session(&cfg, ScriptedLines::closing(["exit"]), &mut sink).expect("session");
        assert!(sink.lines[0].contains("Operation NIGHTSHADE"));
    }

    #[test]
    fn input_failure_is_an_error() {
        let mut sink = RecordingSink::default();
        let err = run_session(&config(5), ScriptedLines::failing("disk on fire"), &mut sink)
            .expect_err("input failure");
        assert!(format!("{err:#}").contains("disk on fire"));
    }
}
