//! Fixed-period job trigger.
//!
//! Jobs run to completion on the calling task. If a job outlasts its period
//! the next tick is delayed rather than overlapped or bursted, so ticks
//! never run concurrently.

use std::future::Future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Periodic tick source.
#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
}

impl Ticker {
    /// Tick every `period`. The first tick fires immediately when `immediate`
    /// is set, otherwise one period from now.
    pub fn new(period: Duration, immediate: bool) -> Self {
        let start = if immediate {
            Instant::now()
        } else {
            Instant::now() + period
        };
        let mut interval = interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Run `job` on every tick, forever.
pub async fn run_forever<F, Fut>(period: Duration, immediate: bool, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    info!(?period, immediate, "Scheduler started");
    let mut ticker = Ticker::new(period, immediate);
    let mut tick = 0u64;
    loop {
        ticker.tick().await;
        tick += 1;
        debug!(tick, "Tick");
        job().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_immediate_first_tick() {
        let mut ticker = Ticker::new(Duration::from_secs(60), true);
        let t0 = std::time::Instant::now();
        ticker.tick().await;
        assert!(t0.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_first_tick_waits_one_period() {
        let period = Duration::from_millis(40);
        let mut ticker = Ticker::new(period, false);
        let t0 = std::time::Instant::now();
        ticker.tick().await;
        assert!(t0.elapsed() >= Duration::from_millis(35));
    }

    #[tokio::test]
    async fn test_slow_job_delays_instead_of_bursting() {
        let period = Duration::from_millis(20);
        let mut ticker = Ticker::new(period, true);
        ticker.tick().await;

        // Job overruns three periods.
        sleep(Duration::from_millis(70)).await;
        ticker.tick().await;
        let after_overrun = std::time::Instant::now();
        ticker.tick().await;
        assert!(after_overrun.elapsed() >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn test_run_forever_runs_jobs_sequentially() {
        let runs = Cell::new(0u32);
        let running = Cell::new(false);
        let (runs_ref, running) = (&runs, &running);
        let result = timeout(
            Duration::from_millis(200),
            run_forever(Duration::from_millis(10), true, move || async move {
                assert!(!running.get(), "ticks overlapped");
                running.set(true);
                sleep(Duration::from_millis(15)).await;
                runs_ref.set(runs_ref.get() + 1);
                running.set(false);
            }),
        )
        .await;

        assert!(result.is_err());
        assert!(runs.get() >= 2);
    }
}
