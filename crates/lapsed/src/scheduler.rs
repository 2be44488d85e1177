//! Wall-clock-aligned tick generation.
//!
//! A dedicated timer task produces ticks and tries the guard at tick time:
//! on admission the permit is forwarded through a bounded channel to the
//! single cycle worker, otherwise the tick is skipped. The cycle body can
//! block as long as it likes without ever stalling tick generation.

use crate::guard::{CycleGuard, CyclePermit};
use chrono::{Local, Timelike};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

/// Fixed startup overhead the alignment accounts for: the periodic timer's
/// first tick fires this long after the alignment sleep ends.
const STARTUP_OVERHEAD_SECS: u64 = 1;

/// Seconds to sleep so the first tick lands at the top of a minute.
///
/// Starting within two seconds of the boundary would make the first tick
/// nearly immediate, so the wait rolls over to the next minute instead.
pub fn alignment_wait(current_second: u32) -> u64 {
    let remaining = 60u64.saturating_sub(u64::from(current_second));
    if remaining >= 2 {
        remaining - STARTUP_OVERHEAD_SECS
    } else {
        60
    }
}

/// Spawn the tick producer.
pub fn spawn_ticker(
    interval: Duration,
    guard: CycleGuard,
    ticks: mpsc::Sender<CyclePermit>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let wait = alignment_wait(Local::now().second());
        tracing::info!(wait_secs = wait, "waiting for the top of the minute");
        sleep(Duration::from_secs(wait)).await;

        let first = Instant::now() + Duration::from_secs(STARTUP_OVERHEAD_SECS);
        let mut ticker = interval_at(first, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match guard.try_enter() {
                Some(permit) => {
                    // Worker gone means shutdown.
                    if ticks.send(permit).await.is_err() {
                        break;
                    }
                }
                None => {
                    tracing::warn!("previous capture cycle still running; skipping this tick");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_from_mid_minute() {
        // Starting at second 37 leaves a 22 s wait before the timer starts.
        assert_eq!(alignment_wait(37), 22);
    }

    #[test]
    fn test_alignment_spans_the_minute() {
        assert_eq!(alignment_wait(0), 59);
        assert_eq!(alignment_wait(30), 29);
        assert_eq!(alignment_wait(58), 1);
    }

    #[test]
    fn test_alignment_rolls_over_near_the_boundary() {
        assert_eq!(alignment_wait(59), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_guard_skips_ticks() {
        let guard = CycleGuard::new();
        let held = guard.try_enter().unwrap();
        let (tx, mut rx) = mpsc::channel(1);
        let _ticker = spawn_ticker(Duration::from_secs(60), guard.clone(), tx);

        // Several virtual minutes pass; every tick finds the guard busy.
        let skipped = tokio::time::timeout(Duration::from_secs(300), rx.recv()).await;
        assert!(skipped.is_err(), "no permit may be forwarded while a cycle runs");

        // Releasing the guard lets the next tick through.
        drop(held);
        let admitted = tokio::time::timeout(Duration::from_secs(120), rx.recv()).await;
        assert!(admitted.is_ok_and(|permit| permit.is_some()));
    }
}
