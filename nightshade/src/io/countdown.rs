//! The countdown device's independent schedule.
//!
//! Once the device is armed, a dedicated thread wakes every tick, reports the
//! remaining time and checks the deadline. It is the only code that can end
//! the session without user input, and it touches nothing but the shared
//! [`Hazard`].

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::core::hazard::{Hazard, Phase};

/// Events emitted by the countdown thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Remaining-time update. Cosmetic.
    Tick { remaining: Duration },
    /// This thread won the transition to `Detonated`.
    Detonated,
}

/// Spawn the countdown for an armed `hazard`.
///
/// The thread ends when the device reaches a terminal phase or when `emit`
/// returns false (nobody is listening any more). It returns immediately if the
/// device was never armed.
pub fn spawn_countdown<F>(hazard: Arc<Hazard>, tick: Duration, emit: F) -> thread::JoinHandle<()>
where
    F: Fn(CountdownEvent) -> bool + Send + 'static,
{
    thread::spawn(move || run_countdown(&hazard, tick, &emit))
}

fn run_countdown<F: Fn(CountdownEvent) -> bool>(hazard: &Hazard, tick: Duration, emit: &F) {
    let Some(arming) = hazard.arming() else {
        debug!("countdown started on an unarmed device");
        return;
    };
    info!(duration_secs = arming.duration.as_secs(), "countdown started");
    loop {
        thread::sleep(tick.min(arming.remaining(Instant::now())));
        let now = Instant::now();
        if hazard.expire_if_due(now) {
            emit(CountdownEvent::Detonated);
            return;
        }
        if hazard.phase() != Phase::Armed {
            debug!(phase = ?hazard.phase(), "countdown stopped");
            return;
        }
        if !emit(CountdownEvent::Tick {
            remaining: arming.remaining(now),
        }) {
            debug!("session gone, stopping countdown");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    const TICK: Duration = Duration::from_millis(10);

    #[test]
    fn unarmed_device_ends_immediately() {
        let (tx, rx) = mpsc::channel();
        spawn_countdown(Arc::new(Hazard::default()), TICK, move |event| {
            tx.send(event).is_ok()
        })
        .join()
        .expect("countdown thread");
        assert_eq!(rx.iter().count(), 0);
    }

    #[test]
    fn expiry_emits_ticks_then_one_detonation() {
        let hazard = Arc::new(Hazard::default());
        hazard
            .arm(Instant::now(), Duration::from_millis(80))
            .expect("arm");
        let (tx, rx) = mpsc::channel();
        spawn_countdown(Arc::clone(&hazard), TICK, move |event| {
            tx.send(event).is_ok()
        })
        .join()
        .expect("countdown thread");

        let events: Vec<CountdownEvent> = rx.iter().collect();
        assert_eq!(events.last(), Some(&CountdownEvent::Detonated));
        assert_eq!(
            events
                .iter()
                .filter(|event| **event == CountdownEvent::Detonated)
                .count(),
            1
        );
        assert_eq!(hazard.phase(), Phase::Detonated);
    }

    #[test]
    fn defuse_stops_countdown_without_detonation() {
        let hazard = Arc::new(Hazard::default());
        hazard
            .arm(Instant::now(), Duration::from_secs(5))
            .expect("arm");
        let (tx, rx) = mpsc::channel();
        let handle = spawn_countdown(Arc::clone(&hazard), TICK, move |event| {
            tx.send(event).is_ok()
        });

        thread::sleep(Duration::from_millis(30));
        hazard
            .try_defuse("1-4-1", Instant::now())
            .expect("defuse");
        handle.join().expect("countdown thread");

        assert!(!rx.iter().any(|event| event == CountdownEvent::Detonated));
        assert_eq!(hazard.phase(), Phase::Defused);
    }

    #[test]
    fn dropped_listener_stops_countdown() {
        let hazard = Arc::new(Hazard::default());
        hazard
            .arm(Instant::now(), Duration::from_secs(5))
            .expect("arm");
        spawn_countdown(Arc::clone(&hazard), TICK, |_| false)
            .join()
            .expect("countdown thread");
        assert_eq!(hazard.phase(), Phase::Armed);
    }
}
